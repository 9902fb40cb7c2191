//! OCR (Optical Character Recognition) token extraction
//!
//! Scanned pages and plain images carry no text layer, so their tokens come
//! from an OCR engine. This module defines a small provider trait, a
//! Tesseract implementation that drives the `tesseract` command-line tool
//! and parses its TSV report, and a mock provider for tests.
//!
//! # Usage
//!
//! ```rust,no_run
//! use phrasemark::text::ocr::{OcrOptions, OcrProvider, TesseractCliProvider};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = TesseractCliProvider::new();
//! let words = provider.recognize(Path::new("scan.png"), &OcrOptions::default())?;
//!
//! for word in &words {
//!     println!("'{}' at ({}, {}) conf {:.1}", word.text, word.left, word.top, word.conf);
//! }
//! # Ok(())
//! # }
//! ```

use crate::geometry::Rectangle;
use crate::text::Token;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

/// Result type for OCR operations
pub type OcrResult<T> = Result<T, OcrError>;

/// Errors that can occur during OCR processing
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    /// OCR provider is not available or not configured
    #[error("OCR provider not available: {0}")]
    ProviderNotAvailable(String),

    /// OCR processing failed
    #[error("OCR processing failed: {0}")]
    ProcessingFailed(String),

    /// The engine produced output that could not be parsed
    #[error("Invalid OCR output: {0}")]
    InvalidOutput(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Page Segmentation Mode for Tesseract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSegmentationMode {
    /// Fully automatic page segmentation, but no OSD (Default)
    #[default]
    Auto,
    /// Assume a single column of text of variable sizes
    SingleColumn,
    /// Assume a single uniform block of text
    SingleBlock,
    /// Treat the image as a single text line
    SingleLine,
    /// Treat the image as a single word
    SingleWord,
    /// Sparse text. Find as much text as possible in no particular order
    SparseText,
}

impl PageSegmentationMode {
    /// Numeric value understood by `tesseract --psm`
    pub fn to_psm_value(self) -> u8 {
        match self {
            PageSegmentationMode::Auto => 3,
            PageSegmentationMode::SingleColumn => 4,
            PageSegmentationMode::SingleBlock => 6,
            PageSegmentationMode::SingleLine => 7,
            PageSegmentationMode::SingleWord => 8,
            PageSegmentationMode::SparseText => 11,
        }
    }

    /// Parse a `--psm` number back into a mode
    pub fn from_psm_value(value: u8) -> Option<Self> {
        match value {
            3 => Some(PageSegmentationMode::Auto),
            4 => Some(PageSegmentationMode::SingleColumn),
            6 => Some(PageSegmentationMode::SingleBlock),
            7 => Some(PageSegmentationMode::SingleLine),
            8 => Some(PageSegmentationMode::SingleWord),
            11 => Some(PageSegmentationMode::SparseText),
            _ => None,
        }
    }
}

/// OCR processing options and configuration
#[derive(Debug, Clone)]
pub struct OcrOptions {
    /// Tesseract language code(s), e.g. "eng" or "spa+eng"
    pub language: String,

    /// Page segmentation mode
    pub page_segmentation_mode: PageSegmentationMode,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            page_segmentation_mode: PageSegmentationMode::default(),
        }
    }
}

impl OcrOptions {
    /// Set the recognition language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the page segmentation mode
    pub fn with_page_segmentation_mode(mut self, mode: PageSegmentationMode) -> Self {
        self.page_segmentation_mode = mode;
        self
    }
}

/// One row of Tesseract's TSV report.
///
/// Tesseract reports a hierarchy (page, block, paragraph, line, word);
/// only word rows (`level == 5`) carry text.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrWord {
    pub level: u32,
    pub page_num: u32,
    pub block_num: u32,
    pub par_num: u32,
    pub line_num: u32,
    pub word_num: u32,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Confidence 0-100, `-1` for structural rows
    pub conf: f64,
    pub text: String,
}

/// TSV level of word rows
pub const WORD_LEVEL: u32 = 5;

const TSV_COLUMNS: usize = 12;

impl OcrWord {
    /// Whether this row is a recognized word rather than a layout row
    pub fn is_word(&self) -> bool {
        self.level == WORD_LEVEL
    }

    /// Pixel rectangle of the word
    pub fn rect(&self) -> Rectangle {
        Rectangle::from_position_and_size(self.left, self.top, self.width, self.height)
    }

    /// Convert into a matcher token
    pub fn to_token(&self) -> Token {
        Token::with_confidence(self.text.clone(), self.rect(), self.conf)
    }
}

/// Parse Tesseract TSV output (`tesseract <image> stdout tsv`).
///
/// All rows are returned, structural ones included; callers usually keep
/// only [`OcrWord::is_word`] rows.
pub fn parse_tsv(tsv: &str) -> OcrResult<Vec<OcrWord>> {
    let mut lines = tsv.lines().enumerate();

    match lines.next() {
        Some((_, header)) if header.starts_with("level\t") => {}
        Some((_, header)) => {
            return Err(OcrError::InvalidOutput(format!(
                "unexpected TSV header: {header:?}"
            )))
        }
        None => return Err(OcrError::InvalidOutput("empty TSV output".to_string())),
    }

    let mut rows = Vec::new();
    for (line_no, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        rows.push(parse_tsv_row(line).map_err(|reason| {
            OcrError::InvalidOutput(format!("line {}: {reason}", line_no + 1))
        })?);
    }

    Ok(rows)
}

fn parse_tsv_row(line: &str) -> Result<OcrWord, String> {
    // Empty text may drop the trailing column entirely
    let mut fields: Vec<&str> = line.splitn(TSV_COLUMNS, '\t').collect();
    if fields.len() == TSV_COLUMNS - 1 {
        fields.push("");
    }
    if fields.len() != TSV_COLUMNS {
        return Err(format!(
            "expected {TSV_COLUMNS} columns, found {}",
            fields.len()
        ));
    }

    fn int(field: &str, name: &str) -> Result<u32, String> {
        field
            .trim()
            .parse()
            .map_err(|_| format!("invalid {name}: {field:?}"))
    }
    fn num(field: &str, name: &str) -> Result<f64, String> {
        field
            .trim()
            .parse()
            .map_err(|_| format!("invalid {name}: {field:?}"))
    }

    Ok(OcrWord {
        level: int(fields[0], "level")?,
        page_num: int(fields[1], "page_num")?,
        block_num: int(fields[2], "block_num")?,
        par_num: int(fields[3], "par_num")?,
        line_num: int(fields[4], "line_num")?,
        word_num: int(fields[5], "word_num")?,
        left: num(fields[6], "left")?,
        top: num(fields[7], "top")?,
        width: num(fields[8], "width")?,
        height: num(fields[9], "height")?,
        conf: num(fields[10], "conf")?,
        text: fields[11].to_string(),
    })
}

/// Turn parsed OCR rows into tokens in reading order, keeping word rows only
pub fn words_to_tokens(words: &[OcrWord]) -> Vec<Token> {
    words
        .iter()
        .filter(|word| word.is_word())
        .map(OcrWord::to_token)
        .collect()
}

/// Supported OCR engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrEngine {
    /// Mock OCR provider for testing
    Mock,
    /// Tesseract OCR (local processing)
    Tesseract,
}

impl OcrEngine {
    /// Get the name of the OCR engine
    pub fn name(&self) -> &'static str {
        match self {
            OcrEngine::Mock => "Mock OCR",
            OcrEngine::Tesseract => "Tesseract",
        }
    }
}

impl fmt::Display for OcrEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Trait for OCR providers
///
/// Implementations turn an image file into TSV-style rows. They must be
/// shareable across the page workers, hence `Send + Sync`.
pub trait OcrProvider: Send + Sync {
    /// Recognize the words of one image
    fn recognize(&self, image: &Path, options: &OcrOptions) -> OcrResult<Vec<OcrWord>>;

    /// Get the engine type for this provider
    fn engine_type(&self) -> OcrEngine;

    /// Recognize an image and return word tokens in reading order
    fn recognize_tokens(&self, image: &Path, options: &OcrOptions) -> OcrResult<Vec<Token>> {
        Ok(words_to_tokens(&self.recognize(image, options)?))
    }
}

/// Tesseract provider driving the `tesseract` executable
#[derive(Debug, Clone)]
pub struct TesseractCliProvider {
    executable: PathBuf,
}

impl TesseractCliProvider {
    /// Use `tesseract` from `PATH`
    pub fn new() -> Self {
        Self {
            executable: PathBuf::from("tesseract"),
        }
    }

    /// Use a specific tesseract binary
    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Path of the binary this provider runs
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Check that the executable can be started
    pub fn check_availability(&self) -> OcrResult<()> {
        match Command::new(&self.executable).arg("--version").output() {
            Ok(output) if output.status.success() => Ok(()),
            Ok(output) => Err(OcrError::ProviderNotAvailable(format!(
                "{} --version exited with {}",
                self.executable.display(),
                output.status
            ))),
            Err(e) => Err(self.spawn_error(e)),
        }
    }

    fn spawn_error(&self, e: std::io::Error) -> OcrError {
        if e.kind() == ErrorKind::NotFound {
            OcrError::ProviderNotAvailable(format!(
                "'{}' not found in PATH. Install Tesseract OCR or set its path explicitly",
                self.executable.display()
            ))
        } else {
            OcrError::Io(e)
        }
    }
}

impl Default for TesseractCliProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrProvider for TesseractCliProvider {
    fn recognize(&self, image: &Path, options: &OcrOptions) -> OcrResult<Vec<OcrWord>> {
        let start = Instant::now();

        let output = Command::new(&self.executable)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&options.language)
            .arg("--psm")
            .arg(options.page_segmentation_mode.to_psm_value().to_string())
            .arg("tsv")
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(OcrError::ProcessingFailed(format!(
                "tesseract failed on {} ({}): {}",
                image.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let words = parse_tsv(&stdout)?;

        tracing::debug!(
            image = %image.display(),
            rows = words.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "tesseract finished"
        );

        Ok(words)
    }

    fn engine_type(&self) -> OcrEngine {
        OcrEngine::Tesseract
    }
}

/// Mock OCR provider for testing and development
///
/// Returns the same rows for every image it is asked about.
#[derive(Debug, Clone, Default)]
pub struct MockOcrProvider {
    words: Vec<OcrWord>,
}

impl MockOcrProvider {
    /// Create a mock provider that recognizes nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock provider returning the given rows
    pub fn with_words(words: Vec<OcrWord>) -> Self {
        Self { words }
    }

    /// Create a mock provider from TSV text
    pub fn from_tsv(tsv: &str) -> OcrResult<Self> {
        Ok(Self {
            words: parse_tsv(tsv)?,
        })
    }
}

impl OcrProvider for MockOcrProvider {
    fn recognize(&self, _image: &Path, _options: &OcrOptions) -> OcrResult<Vec<OcrWord>> {
        Ok(self.words.clone())
    }

    fn engine_type(&self) -> OcrEngine {
        OcrEngine::Mock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t640\t480\t-1\t
2\t1\t1\t0\t0\t0\t36\t92\t582\t68\t-1\t
3\t1\t1\t1\t0\t0\t36\t92\t582\t68\t-1\t
4\t1\t1\t1\t1\t0\t36\t92\t582\t30\t-1\t
5\t1\t1\t1\t1\t1\t36\t92\t60\t30\t96.06\tThe
5\t1\t1\t1\t1\t2\t104\t92\t98\t30\t95.4\tquick
5\t1\t1\t1\t1\t3\t210\t92\t90\t30\t0\t
5\t1\t1\t1\t1\t4\t308\t92\t58\t30\t91.2\tfox
";

    #[test]
    fn test_ocr_options_default() {
        let options = OcrOptions::default();
        assert_eq!(options.language, "eng");
        assert_eq!(options.page_segmentation_mode, PageSegmentationMode::Auto);
    }

    #[test]
    fn test_ocr_options_builders() {
        let options = OcrOptions::default()
            .with_language("spa+eng")
            .with_page_segmentation_mode(PageSegmentationMode::SparseText);
        assert_eq!(options.language, "spa+eng");
        assert_eq!(options.page_segmentation_mode.to_psm_value(), 11);
    }

    #[test]
    fn test_page_segmentation_mode_values() {
        for mode in [
            PageSegmentationMode::Auto,
            PageSegmentationMode::SingleColumn,
            PageSegmentationMode::SingleBlock,
            PageSegmentationMode::SingleLine,
            PageSegmentationMode::SingleWord,
            PageSegmentationMode::SparseText,
        ] {
            assert_eq!(
                PageSegmentationMode::from_psm_value(mode.to_psm_value()),
                Some(mode)
            );
        }
        assert_eq!(PageSegmentationMode::from_psm_value(0), None);
    }

    #[test]
    fn test_parse_tsv() {
        let rows = parse_tsv(SAMPLE_TSV).unwrap();
        assert_eq!(rows.len(), 8);
        assert_eq!(rows.iter().filter(|w| w.is_word()).count(), 4);

        let quick = &rows[5];
        assert_eq!(quick.text, "quick");
        assert_eq!(quick.conf, 95.4);
        assert_eq!(quick.rect(), Rectangle::new(104.0, 92.0, 202.0, 122.0));
    }

    #[test]
    fn test_parse_tsv_missing_text_column() {
        let tsv = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
                   4\t1\t1\t1\t1\t0\t36\t92\t582\t30\t-1\n";
        let rows = parse_tsv(tsv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "");
    }

    #[test]
    fn test_parse_tsv_keeps_inner_whitespace_in_text() {
        let tsv = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
                   5\t1\t1\t1\t1\t1\t0\t0\t10\t10\t50\ta\tb\n";
        let rows = parse_tsv(tsv).unwrap();
        assert_eq!(rows[0].text, "a\tb");
    }

    #[test]
    fn test_parse_tsv_errors() {
        assert!(matches!(parse_tsv(""), Err(OcrError::InvalidOutput(_))));
        assert!(matches!(
            parse_tsv("Tesseract Open Source OCR Engine\n"),
            Err(OcrError::InvalidOutput(_))
        ));

        let bad = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
                   5\t1\tx\t1\t1\t1\t0\t0\t10\t10\t50\tword\n";
        match parse_tsv(bad) {
            Err(OcrError::InvalidOutput(msg)) => {
                assert!(msg.contains("line 2"));
                assert!(msg.contains("block_num"));
            }
            other => panic!("expected InvalidOutput, got {other:?}"),
        }

        let short = "level\tpage_num\n5\t1\n";
        assert!(parse_tsv(short).is_err());
    }

    #[test]
    fn test_words_to_tokens() {
        let rows = parse_tsv(SAMPLE_TSV).unwrap();
        let tokens = words_to_tokens(&rows);

        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["The", "quick", "", "fox"]);
        assert_eq!(tokens[0].confidence, Some(96.06));
        assert!(!tokens[2].contributes_rect());
    }

    #[test]
    fn test_mock_provider() {
        let provider = MockOcrProvider::from_tsv(SAMPLE_TSV).unwrap();
        assert_eq!(provider.engine_type(), OcrEngine::Mock);

        let tokens = provider
            .recognize_tokens(Path::new("any.png"), &OcrOptions::default())
            .unwrap();
        assert_eq!(tokens.len(), 4);

        let empty = MockOcrProvider::new();
        assert!(empty
            .recognize(Path::new("any.png"), &OcrOptions::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_ocr_engine_name() {
        assert_eq!(OcrEngine::Mock.name(), "Mock OCR");
        assert_eq!(OcrEngine::Tesseract.to_string(), "Tesseract");
    }

    #[test]
    fn test_tesseract_missing_executable() {
        let provider = TesseractCliProvider::with_executable("/nonexistent/tesseract-binary");
        assert!(matches!(
            provider.check_availability(),
            Err(OcrError::ProviderNotAvailable(_))
        ));
        assert!(matches!(
            provider.recognize(Path::new("scan.png"), &OcrOptions::default()),
            Err(OcrError::ProviderNotAvailable(_))
        ));
    }
}
