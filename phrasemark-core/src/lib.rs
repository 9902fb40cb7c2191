//! # phrasemark
//!
//! Locate every occurrence of a search phrase in documents and images and
//! outline it with a bounding box.
//!
//! ## Features
//!
//! - **Phrase Matching**: Greedy, non-overlapping word-window search over positioned tokens
//! - **Fast Path**: Engine-native exact hits are used as-is when a text layer provides them
//! - **Case Policy**: Case-sensitive or Unicode case-folded comparison
//! - **Confidence Filtering**: Blank and zero-confidence OCR tokens never widen a box
//! - **Parallel Pages**: Pages are extracted and searched on worker threads
//! - **OCR Integration**: Tesseract TSV output turned into tokens
//! - **PDF Text Layers**: Words and native search hits read through PDFium, outlines
//!   stroked into `<name>_boxed.pdf` (`pdf` feature)
//! - **Outlines**: Unfilled rectangles drawn on page rasters (`external-images` feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use phrasemark::{highlight, HighlightOptions, MemorySource, RecordingRenderer};
//! use phrasemark::{Rectangle, Result, SearchPhrase, Token};
//!
//! # fn main() -> Result<()> {
//! let page = vec![
//!     Token::new("Amount", Rectangle::new(10.0, 10.0, 60.0, 22.0)),
//!     Token::new("due:", Rectangle::new(64.0, 10.0, 92.0, 22.0)),
//!     Token::new("$42", Rectangle::new(96.0, 10.0, 120.0, 22.0)),
//! ];
//! let source = MemorySource::new(vec![page]);
//! let mut renderer = RecordingRenderer::new();
//!
//! let report = highlight(
//!     &source,
//!     &SearchPhrase::case_insensitive("amount due:"),
//!     &mut renderer,
//!     &HighlightOptions::default(),
//! )?;
//!
//! assert_eq!(report.total_matches(), 1);
//! assert_eq!(report.pages[&0], vec![Rectangle::new(10.0, 10.0, 92.0, 22.0)]);
//! # Ok(())
//! # }
//! ```
//!
//! ### Images through OCR
//!
//! ```rust,no_run
//! use phrasemark::render::{output_path_for, ImageRenderer, PageTarget};
//! use phrasemark::source::ImageOcrSource;
//! use phrasemark::text::{OcrOptions, TesseractCliProvider};
//! use phrasemark::{highlight, HighlightOptions, SearchPhrase};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let scan = PathBuf::from("receipt.png");
//! let source = ImageOcrSource::new(
//!     vec![scan.clone()],
//!     Arc::new(TesseractCliProvider::new()),
//!     OcrOptions::default(),
//! );
//! let mut renderer = ImageRenderer::new(vec![PageTarget::new(&scan, output_path_for(&scan, 0, 1))]);
//!
//! let report = highlight(
//!     &source,
//!     &SearchPhrase::case_insensitive("total"),
//!     &mut renderer,
//!     &HighlightOptions::default(),
//! )?;
//! println!("{} matches written to {:?}", report.total_matches(), report.outputs);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`geometry`] - Axis-aligned rectangles in page space
//! - [`text`] - Tokens and OCR providers
//! - [`search`] - Phrase compilation, matching and document aggregation
//! - [`source`] - Token sources (memory, JSON dumps, PDF text layers, OCR'd images)
//! - [`render`] - Outline renderers and output naming
//! - [`convert`] - Office to PDF conversion and PDF rasterization
//! - `pdfium` - PDFium binding and PDF coordinate mapping (`pdf` feature)
//! - [`pipeline`] - End-to-end highlighting

pub mod convert;
pub mod error;
pub mod geometry;
#[cfg(feature = "pdf")]
pub mod pdfium;
pub mod pipeline;
pub mod render;
pub mod search;
pub mod source;
pub mod text;

pub use error::{PhrasemarkError, Result};
pub use geometry::Rectangle;
pub use pipeline::{highlight, HighlightOptions, HighlightReport};
pub use render::{Color, OutlineStyle, RecordingRenderer, Renderer};
pub use search::{
    find_matches, search_document, search_document_parallel, Match, PageMatches, SearchOptions,
    SearchPhrase,
};
pub use source::{MemorySource, SourceFormat, TokenSource};
pub use text::Token;

/// Current version of phrasemark
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
