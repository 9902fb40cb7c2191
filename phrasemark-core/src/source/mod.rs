//! Token sources: where page tokens come from
//!
//! A [`TokenSource`] is a paged document that can hand out the tokens of
//! each page in reading order. Sources backed by a text layer may also
//! answer a phrase search natively ([`TokenSource::fast_search`]); OCR
//! sources never do.

pub mod image;
#[cfg(feature = "serde")]
pub mod json;
#[cfg(feature = "pdf")]
pub mod pdf;

pub use self::image::ImageOcrSource;
#[cfg(feature = "serde")]
pub use json::{DumpPage, JsonTokenSource, SearchHit, TokenDump};
#[cfg(feature = "pdf")]
pub use self::pdf::{words_from_chars, PdfTextSource};

use crate::error::{PhrasemarkError, Result};
use crate::geometry::Rectangle;
use crate::search::SearchPhrase;
use crate::text::Token;
use std::collections::HashMap;
use std::path::Path;

/// A paged document yielding positioned tokens
pub trait TokenSource: Send + Sync {
    /// Number of pages (or images) in the document
    fn page_count(&self) -> usize;

    /// Tokens of one page in reading order
    fn extract_tokens(&self, page_index: usize) -> Result<Vec<Token>>;

    /// Engine-native exact search on one page.
    ///
    /// `Ok(None)` means the source cannot search natively and the caller
    /// should scan the tokens instead.
    fn fast_search(&self, _page_index: usize, _phrase: &SearchPhrase) -> Result<Option<Vec<Rectangle>>> {
        Ok(None)
    }

    /// Whether tokens come from OCR rather than a text layer
    fn is_ocr(&self) -> bool;

    /// Fail with `InvalidPageNumber` unless `page_index` is in range
    fn check_page(&self, page_index: usize) -> Result<()> {
        if page_index < self.page_count() {
            Ok(())
        } else {
            Err(PhrasemarkError::InvalidPageNumber(page_index))
        }
    }
}

/// Input kinds recognized by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Fixed-layout PDF document
    Pdf,
    /// Raster image (one page)
    Image,
    /// Word processor or spreadsheet document, converted to PDF first
    Office,
    /// JSON token dump produced by an external extractor
    TokenDump,
}

impl SourceFormat {
    /// Detect the format from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(SourceFormat::Pdf),
            "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" | "gif" => Ok(SourceFormat::Image),
            "docx" | "xlsx" => Ok(SourceFormat::Office),
            "json" => Ok(SourceFormat::TokenDump),
            "" => Err(PhrasemarkError::UnsupportedSource(format!(
                "{} has no file extension",
                path.display()
            ))),
            other => Err(PhrasemarkError::UnsupportedSource(format!(
                "unsupported file extension: .{other}"
            ))),
        }
    }
}

/// Pages of tokens held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<Vec<Token>>,
    fast_ranges: HashMap<usize, Vec<Rectangle>>,
    ocr: bool,
}

impl MemorySource {
    /// Text-layer source over the given pages
    pub fn new(pages: Vec<Vec<Token>>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    /// OCR source over the given pages; never answers fast searches
    pub fn ocr(pages: Vec<Vec<Token>>) -> Self {
        Self {
            pages,
            ocr: true,
            ..Default::default()
        }
    }

    /// Answer fast searches on `page_index` with `rects`, whatever the phrase
    pub fn with_fast_ranges(mut self, page_index: usize, rects: Vec<Rectangle>) -> Self {
        self.fast_ranges.insert(page_index, rects);
        self
    }
}

impl TokenSource for MemorySource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn extract_tokens(&self, page_index: usize) -> Result<Vec<Token>> {
        self.pages
            .get(page_index)
            .cloned()
            .ok_or(PhrasemarkError::InvalidPageNumber(page_index))
    }

    fn fast_search(&self, page_index: usize, _phrase: &SearchPhrase) -> Result<Option<Vec<Rectangle>>> {
        self.check_page(page_index)?;
        if self.ocr {
            return Ok(None);
        }
        Ok(self.fast_ranges.get(&page_index).cloned())
    }

    fn is_ocr(&self) -> bool {
        self.ocr
    }
}
