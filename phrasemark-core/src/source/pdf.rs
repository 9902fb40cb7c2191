//! PDF text layers read through PDFium
//!
//! The document is read once when loaded: every page's words with their
//! boxes, plus PDFium's own search hits for the phrase being looked for.
//! Fast searches for that phrase answer from the stored hits; any other
//! phrase falls back to scanning the words.

use crate::error::{PhrasemarkError, Result};
use crate::geometry::Rectangle;
use crate::pdfium::{to_page_space, Pdfium};
use crate::search::{PhrasePattern, SearchPhrase};
use crate::source::TokenSource;
use crate::text::Token;
use pdfium_render::prelude::{PdfPage, PdfSearchOptions};
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq)]
struct TextLayerPage {
    tokens: Vec<Token>,
    hits: Vec<Rectangle>,
}

/// Text layer of a PDF with engine search hits for one phrase
#[derive(Debug, Clone)]
pub struct PdfTextSource {
    pattern: PhrasePattern,
    pages: Vec<TextLayerPage>,
}

impl PdfTextSource {
    /// Read the words of every page of `path` and search them for `phrase`
    pub fn load(pdfium: &Pdfium, path: &Path, phrase: &SearchPhrase) -> Result<Self> {
        let pattern = phrase.compile()?;
        let needle = phrase.words()?.join(" ");
        let options = PdfSearchOptions::new().match_case(phrase.case_sensitive);
        let start = Instant::now();

        let document = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| extraction_error(path, "cannot open", e))?;

        let mut pages = Vec::new();
        for (index, page) in document.pages().iter().enumerate() {
            let text_page = read_page(&page, &needle, &options)
                .map_err(|e| extraction_error(path, &format!("page {}", index + 1), e))?;
            pages.push(text_page);
        }

        let source = Self { pattern, pages };
        tracing::debug!(
            pdf = %path.display(),
            pages = source.page_count(),
            text_layer = source.has_text_layer(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "PDF text layer read"
        );
        Ok(source)
    }

    /// Whether any page carries at least one word
    pub fn has_text_layer(&self) -> bool {
        self.pages.iter().any(|page| !page.tokens.is_empty())
    }
}

fn read_page(
    page: &PdfPage<'_>,
    needle: &str,
    options: &PdfSearchOptions,
) -> std::result::Result<TextLayerPage, pdfium_render::prelude::PdfiumError> {
    let height = page.height().value;
    let text = page.text()?;

    let chars = text.chars();
    let tokens = words_from_chars(chars.iter().filter_map(|ch| {
        let unicode = ch.unicode_char().unwrap_or(' ');
        match ch.loose_bounds() {
            Ok(bounds) => Some((unicode, to_page_space(&bounds, height))),
            // Generated separators may have no box but still end a word
            Err(_) if unicode.is_whitespace() || unicode.is_control() => {
                Some((' ', Rectangle::new(0.0, 0.0, 0.0, 0.0)))
            }
            Err(_) => None,
        }
    }));

    let mut hits = Vec::new();
    let search = text.search(needle, options)?;
    while let Some(segments) = search.find_next() {
        // A hit wrapping onto a second line comes back as one segment per line
        let rects: Vec<Rectangle> = segments
            .iter()
            .map(|segment| to_page_space(&segment.bounds(), height))
            .collect();
        if let Some(rect) = Rectangle::union_all(&rects) {
            hits.push(rect);
        }
    }

    Ok(TextLayerPage { tokens, hits })
}

fn extraction_error(path: &Path, context: &str, err: impl std::fmt::Debug) -> PhrasemarkError {
    PhrasemarkError::ExtractionFailure(format!("{}: {context}: {err:?}", path.display()))
}

/// Group positioned characters into words.
///
/// Whitespace ends a word, and so does a character starting below the
/// bottom of the word so far (a line break with no space character). Each
/// word's box is the union of its characters' boxes.
pub fn words_from_chars<I>(chars: I) -> Vec<Token>
where
    I: IntoIterator<Item = (char, Rectangle)>,
{
    let mut words = Vec::new();
    let mut text = String::new();
    let mut bounds: Option<Rectangle> = None;

    for (ch, rect) in chars {
        let new_line = bounds.is_some_and(|word| rect.y0 >= word.y1);
        if ch.is_whitespace() || ch.is_control() || new_line {
            if let Some(word) = bounds.take() {
                words.push(Token::new(std::mem::take(&mut text), word));
            }
            if ch.is_whitespace() || ch.is_control() {
                continue;
            }
        }
        text.push(ch);
        bounds = Some(bounds.map_or(rect, |word| word.union(&rect)));
    }
    if let Some(word) = bounds {
        words.push(Token::new(text, word));
    }
    words
}

impl TokenSource for PdfTextSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn extract_tokens(&self, page_index: usize) -> Result<Vec<Token>> {
        self.check_page(page_index)?;
        Ok(self.pages[page_index].tokens.clone())
    }

    fn fast_search(&self, page_index: usize, phrase: &SearchPhrase) -> Result<Option<Vec<Rectangle>>> {
        self.check_page(page_index)?;
        if phrase.compile()? != self.pattern {
            return Ok(None);
        }
        Ok(Some(self.pages[page_index].hits.clone()))
    }

    fn is_ocr(&self) -> bool {
        false
    }
}
