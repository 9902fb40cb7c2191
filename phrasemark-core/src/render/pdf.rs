//! Outlines stroked into a copy of a PDF
//!
//! Matches are collected as they arrive and written in one pass by
//! [`PdfRenderer::finish`]: the source document is opened, one unfilled
//! rectangle path is added per match and the result saved as a new file.
//! The source PDF is never modified.

use crate::error::{PhrasemarkError, Result};
use crate::geometry::Rectangle;
use crate::pdfium::{to_user_space, Pdfium};
use crate::render::{OutlineStyle, Renderer};
use pdfium_render::prelude::{PdfColor, PdfPageIndex, PdfPageObjectsCommon, PdfPoints};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
struct PendingOutline {
    page_index: usize,
    rect: Rectangle,
    style: OutlineStyle,
}

/// Renderer writing an outlined copy of a PDF
pub struct PdfRenderer<'a> {
    pdfium: &'a Pdfium,
    source: PathBuf,
    output: PathBuf,
    pending: Vec<PendingOutline>,
}

impl<'a> PdfRenderer<'a> {
    pub fn new(pdfium: &'a Pdfium, source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            pdfium,
            source: source.into(),
            output: output.into(),
            pending: Vec::new(),
        }
    }
}

impl Renderer for PdfRenderer<'_> {
    fn draw_outline(&mut self, page_index: usize, rect: &Rectangle, style: &OutlineStyle) -> Result<()> {
        self.pending.push(PendingOutline {
            page_index,
            rect: *rect,
            style: style.clone(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<PathBuf>> {
        let document = self
            .pdfium
            .load_pdf_from_file(&self.source, None)
            .map_err(|e| render_error(&self.source, "cannot open", e))?;
        let page_count = usize::from(document.pages().len());

        for outline in &self.pending {
            let index = PdfPageIndex::try_from(outline.page_index)
                .ok()
                .filter(|_| outline.page_index < page_count)
                .ok_or(PhrasemarkError::InvalidPageNumber(outline.page_index))?;
            let mut page = document
                .pages()
                .get(index)
                .map_err(|e| render_error(&self.source, "cannot load page", e))?;

            let height = page.height().value;
            let [r, g, b] = outline.style.color.to_rgb8();
            page.objects_mut()
                .create_path_object_rect(
                    to_user_space(&outline.rect, height),
                    Some(PdfColor::new(r, g, b, 255)),
                    Some(PdfPoints::new(outline.style.width as f32)),
                    None,
                )
                .map_err(|e| render_error(&self.source, "cannot add outline", e))?;
        }

        document
            .save_to_file(&self.output)
            .map_err(|e| render_error(&self.output, "cannot save", e))?;

        tracing::debug!(
            output = %self.output.display(),
            outlines = self.pending.len(),
            "outlined PDF written"
        );
        self.pending.clear();
        Ok(vec![self.output.clone()])
    }
}

fn render_error(path: &Path, context: &str, err: impl std::fmt::Debug) -> PhrasemarkError {
    PhrasemarkError::RenderFailure(format!("{}: {context}: {err:?}", path.display()))
}
