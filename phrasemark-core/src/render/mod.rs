//! Drawing match outlines
//!
//! A [`Renderer`] receives every match in document order and produces the
//! output files when finished. [`ImageRenderer`] outlines matches on page
//! rasters, `PdfRenderer` strokes them into a copy of a PDF, and
//! [`RecordingRenderer`] only remembers what it was asked to draw.

pub mod color;
#[cfg(feature = "external-images")]
pub mod image;
#[cfg(feature = "pdf")]
pub mod pdf;

pub use color::Color;
#[cfg(feature = "external-images")]
pub use self::image::{draw_outline_on, ImageRenderer, PageTarget};
#[cfg(feature = "pdf")]
pub use self::pdf::PdfRenderer;

use crate::error::{PhrasemarkError, Result};
use crate::geometry::Rectangle;
use crate::search::Match;
use std::path::{Path, PathBuf};

const OUTPUT_SUFFIX: &str = "_boxed";

/// Raster extensions that are kept as-is for outlined copies
const KEPT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif"];

/// Stroke used for outlines
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineStyle {
    pub color: Color,
    /// Stroke width: pixels on rasters, points on PDF pages
    pub width: f64,
}

impl Default for OutlineStyle {
    fn default() -> Self {
        Self {
            color: Color::red(),
            width: 3.0,
        }
    }
}

impl OutlineStyle {
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Reject widths that cannot be drawn
    pub fn validate(&self) -> Result<()> {
        if self.width.is_finite() && self.width > 0.0 {
            Ok(())
        } else {
            Err(PhrasemarkError::InvalidArgument(format!(
                "outline width must be positive, got {}",
                self.width
            )))
        }
    }
}

/// Sink for match outlines
pub trait Renderer {
    /// Outline one match rectangle on a page
    fn draw_outline(&mut self, page_index: usize, rect: &Rectangle, style: &OutlineStyle) -> Result<()>;

    /// Write all outputs and return their paths
    fn finish(&mut self) -> Result<Vec<PathBuf>>;
}

/// Renderer that records draw calls and writes nothing
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    matches: Vec<Match>,
    finished: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches in the order they were drawn
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Renderer for RecordingRenderer {
    fn draw_outline(&mut self, page_index: usize, rect: &Rectangle, _style: &OutlineStyle) -> Result<()> {
        self.matches.push(Match {
            page_index,
            rect: *rect,
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<PathBuf>> {
        self.finished = true;
        Ok(Vec::new())
    }
}

/// Path of the outlined copy of `input` for one page.
///
/// Single raster inputs keep their extension (`scan.jpg` becomes
/// `scan_boxed.jpg`). Rasterized documents produce PNGs, numbered from 1
/// when there is more than one page (`report_boxed_p2.png`).
pub fn output_path_for(input: &Path, page_index: usize, page_count: usize) -> PathBuf {
    let extension = input
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| KEPT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or("png");

    if page_count > 1 {
        sibling(input, &format!("{OUTPUT_SUFFIX}_p{}", page_index + 1), "png")
    } else {
        sibling(input, OUTPUT_SUFFIX, extension)
    }
}

/// Path of the outlined copy of a PDF or office document (`letter_boxed.pdf`)
pub fn pdf_output_path_for(input: &Path) -> PathBuf {
    sibling(input, OUTPUT_SUFFIX, "pdf")
}

/// Path of the JSON match report written for `input`
pub fn report_path_for(input: &Path) -> PathBuf {
    sibling(input, OUTPUT_SUFFIX, "json")
}

fn sibling(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}{suffix}.{extension}"))
}
