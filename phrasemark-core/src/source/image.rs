//! Raster images searched through OCR

use crate::error::{PhrasemarkError, Result};
use crate::source::TokenSource;
use crate::text::{OcrOptions, OcrProvider, Token};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One or more images, each a page, tokenized by an OCR provider
pub struct ImageOcrSource {
    images: Vec<PathBuf>,
    provider: Arc<dyn OcrProvider>,
    options: OcrOptions,
}

impl ImageOcrSource {
    pub fn new(images: Vec<PathBuf>, provider: Arc<dyn OcrProvider>, options: OcrOptions) -> Self {
        Self {
            images,
            provider,
            options,
        }
    }

    /// Image file backing `page_index`
    pub fn image_path(&self, page_index: usize) -> Result<&Path> {
        self.images
            .get(page_index)
            .map(PathBuf::as_path)
            .ok_or(PhrasemarkError::InvalidPageNumber(page_index))
    }

    /// All page images in order
    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }
}

impl TokenSource for ImageOcrSource {
    fn page_count(&self) -> usize {
        self.images.len()
    }

    fn extract_tokens(&self, page_index: usize) -> Result<Vec<Token>> {
        let image = self.image_path(page_index)?;
        let tokens = self.provider.recognize_tokens(image, &self.options)?;

        tracing::debug!(
            page = page_index,
            image = %image.display(),
            engine = %self.provider.engine_type(),
            tokens = tokens.len(),
            "OCR tokens extracted"
        );
        Ok(tokens)
    }

    fn is_ocr(&self) -> bool {
        true
    }
}
