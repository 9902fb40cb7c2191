use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhrasemarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    #[error("Conversion failed: {0}")]
    ConversionFailure(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailure(String),

    #[error("Render failed: {0}")]
    RenderFailure(String),

    #[error("Invalid page number: {0}")]
    InvalidPageNumber(usize),

    #[error("PDF engine unavailable: {0}")]
    EngineUnavailable(String),
}

pub type Result<T> = std::result::Result<T, PhrasemarkError>;

impl From<crate::text::OcrError> for PhrasemarkError {
    fn from(err: crate::text::OcrError) -> Self {
        PhrasemarkError::ExtractionFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_error_display() {
        let error = PhrasemarkError::InvalidArgument("search phrase is empty".to_string());
        assert_eq!(error.to_string(), "Invalid argument: search phrase is empty");

        let error = PhrasemarkError::InvalidPageNumber(7);
        assert_eq!(error.to_string(), "Invalid page number: 7");
    }

    #[test]
    fn test_error_debug() {
        let error = PhrasemarkError::UnsupportedSource(".odt".to_string());
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("UnsupportedSource"));
        assert!(debug_str.contains(".odt"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = IoError::new(ErrorKind::NotFound, "file not found");
        let error = PhrasemarkError::from(io_error);

        match error {
            PhrasemarkError::Io(ref err) => {
                assert_eq!(err.kind(), ErrorKind::NotFound);
            }
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_ocr_error_becomes_extraction_failure() {
        let ocr_error = crate::text::OcrError::InvalidOutput("row 3: expected 12 columns".to_string());
        let error = PhrasemarkError::from(ocr_error);

        match error {
            PhrasemarkError::ExtractionFailure(msg) => assert!(msg.contains("row 3")),
            other => panic!("Expected ExtractionFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_all_variants_display() {
        let errors = vec![
            PhrasemarkError::InvalidArgument("argument".to_string()),
            PhrasemarkError::UnsupportedSource("source".to_string()),
            PhrasemarkError::ConversionFailure("conversion".to_string()),
            PhrasemarkError::ExtractionFailure("extraction".to_string()),
            PhrasemarkError::RenderFailure("render".to_string()),
            PhrasemarkError::InvalidPageNumber(3),
            PhrasemarkError::EngineUnavailable("engine".to_string()),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }
}
