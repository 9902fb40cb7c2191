//! Token dumps produced by an external text extractor
//!
//! A dump is a JSON document listing the tokens of every page. Dumps taken
//! from a text layer may also carry the engine's own search hits, which
//! are served through [`TokenSource::fast_search`].
//!
//! ```json
//! {
//!   "ocr": false,
//!   "pages": [
//!     {
//!       "tokens": [
//!         { "text": "Total", "rect": { "x0": 72.0, "y0": 700.0, "x1": 101.5, "y1": 712.0 } },
//!         { "text": "due", "rect": { "x0": 104.0, "y0": 700.0, "x1": 121.0, "y1": 712.0 }, "confidence": 96.0 }
//!       ],
//!       "hits": [
//!         { "phrase": "total due", "rects": [ { "x0": 72.0, "y0": 700.0, "x1": 121.0, "y1": 712.0 } ] }
//!       ]
//!     }
//!   ]
//! }
//! ```

use crate::error::{PhrasemarkError, Result};
use crate::geometry::Rectangle;
use crate::search::{normalizer, SearchPhrase};
use crate::source::TokenSource;
use crate::text::Token;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

/// Serialized form of a whole document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenDump {
    /// Tokens came from OCR; hits are ignored when set
    #[serde(default)]
    pub ocr: bool,
    pub pages: Vec<DumpPage>,
}

/// Serialized form of one page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DumpPage {
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hits: Vec<SearchHit>,
}

/// Precomputed occurrences of one phrase on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub phrase: String,
    pub rects: Vec<Rectangle>,
}

impl SearchHit {
    /// Whether this hit answers a search for `phrase`.
    ///
    /// Phrases are compared word by word under the search's case policy, so
    /// spacing differences do not matter.
    fn answers(&self, phrase: &SearchPhrase) -> bool {
        let normalize = normalizer(phrase.case_sensitive);
        let mut ours = self.phrase.split_whitespace().map(normalize);
        let mut theirs = phrase.raw.split_whitespace().map(normalize);
        loop {
            match (ours.next(), theirs.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a == b => continue,
                _ => return false,
            }
        }
    }
}

/// A [`TokenSource`] backed by a [`TokenDump`]
#[derive(Debug, Clone)]
pub struct JsonTokenSource {
    dump: TokenDump,
}

impl JsonTokenSource {
    pub fn new(dump: TokenDump) -> Self {
        Self { dump }
    }

    /// Read a dump from a JSON file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        tracing::debug!(path = %path.display(), "reading token dump");
        Self::from_reader(BufReader::new(file))
    }

    /// Read a dump from any JSON stream
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let dump: TokenDump = serde_json::from_reader(reader)
            .map_err(|e| PhrasemarkError::ExtractionFailure(format!("invalid token dump: {e}")))?;
        Ok(Self::new(dump))
    }

    pub fn dump(&self) -> &TokenDump {
        &self.dump
    }

    fn page(&self, page_index: usize) -> Result<&DumpPage> {
        self.dump
            .pages
            .get(page_index)
            .ok_or(PhrasemarkError::InvalidPageNumber(page_index))
    }
}

impl FromStr for JsonTokenSource {
    type Err = PhrasemarkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_reader(s.as_bytes())
    }
}

impl TokenSource for JsonTokenSource {
    fn page_count(&self) -> usize {
        self.dump.pages.len()
    }

    fn extract_tokens(&self, page_index: usize) -> Result<Vec<Token>> {
        Ok(self.page(page_index)?.tokens.clone())
    }

    fn fast_search(&self, page_index: usize, phrase: &SearchPhrase) -> Result<Option<Vec<Rectangle>>> {
        let page = self.page(page_index)?;
        if self.dump.ocr {
            return Ok(None);
        }
        Ok(page
            .hits
            .iter()
            .find(|hit| hit.answers(phrase))
            .map(|hit| hit.rects.clone()))
    }

    fn is_ocr(&self) -> bool {
        self.dump.ocr
    }
}
