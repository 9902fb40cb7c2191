//! Text tokens and OCR token extraction

pub mod ocr;
pub mod token;

pub use ocr::{
    parse_tsv, words_to_tokens, MockOcrProvider, OcrEngine, OcrError, OcrOptions, OcrProvider,
    OcrResult, OcrWord, PageSegmentationMode, TesseractCliProvider,
};
pub use token::Token;
