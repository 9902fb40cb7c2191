//! Phrase matching over positioned tokens
//!
//! Two strategies are tried in order:
//!
//! 1. **Fast path**: exact occurrence rectangles computed by the engine that
//!    owns the text layer. When any are supplied they are the answer.
//! 2. **Token window scan**: a greedy, leftmost-first, non-overlapping
//!    sliding window over the token texts, compared word by word after
//!    normalization.
//!
//! # Example
//!
//! ```rust
//! use phrasemark::search::{find_matches, SearchPhrase};
//! use phrasemark::{Rectangle, Token};
//!
//! # fn main() -> phrasemark::Result<()> {
//! let tokens = vec![
//!     Token::new("The", Rectangle::new(0.0, 0.0, 1.0, 1.0)),
//!     Token::new("quick", Rectangle::new(1.0, 0.0, 2.0, 1.0)),
//!     Token::new("brown", Rectangle::new(2.0, 0.0, 3.0, 1.0)),
//!     Token::new("fox", Rectangle::new(3.0, 0.0, 4.0, 1.0)),
//! ];
//!
//! let phrase = SearchPhrase::case_insensitive("quick brown");
//! let rects = find_matches(&tokens, &phrase, None)?;
//! assert_eq!(rects, vec![Rectangle::new(1.0, 0.0, 3.0, 1.0)]);
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use crate::geometry::Rectangle;
use crate::search::phrase::{Normalizer, PhrasePattern, SearchPhrase};
use crate::text::Token;
use std::borrow::Cow;
use std::ops::Range;

/// A run of tokens that matched the phrase
#[derive(Debug, Clone, PartialEq)]
pub struct MatchWindow {
    /// Index of the first member token
    pub start: usize,
    /// Number of member tokens (the phrase length)
    pub len: usize,
    /// Union of the contributing members' rectangles, `None` when every
    /// member was filtered out
    pub rect: Option<Rectangle>,
}

impl MatchWindow {
    /// Token indices consumed by this match
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// Find every occurrence of `phrase` in `tokens`.
///
/// Non-empty `fast_ranges` are returned unchanged. Otherwise the tokens are
/// scanned, see [`PhrasePattern::find_windows`]. Fails only when the phrase
/// has no words.
pub fn find_matches(
    tokens: &[Token],
    phrase: &SearchPhrase,
    fast_ranges: Option<&[Rectangle]>,
) -> Result<Vec<Rectangle>> {
    let pattern = phrase.compile()?;
    Ok(pattern.find_matches(tokens, fast_ranges))
}

impl PhrasePattern {
    /// Match this pattern against one page, fast path first
    pub fn find_matches(&self, tokens: &[Token], fast_ranges: Option<&[Rectangle]>) -> Vec<Rectangle> {
        if let Some(ranges) = fast_ranges.filter(|ranges| !ranges.is_empty()) {
            tracing::trace!(hits = ranges.len(), "using fast-path ranges");
            return ranges.to_vec();
        }

        self.find_windows(tokens)
            .into_iter()
            .filter_map(|window| window.rect)
            .collect()
    }

    /// Scan `tokens` for the pattern and report every consumed window.
    ///
    /// Windows are found greedily from the left and never overlap. A window
    /// whose members are all blank or zero-confidence is still reported and
    /// still consumed, with `rect: None`.
    pub fn find_windows(&self, tokens: &[Token]) -> Vec<MatchWindow> {
        scan_windows(tokens, self.words(), self.normalizer())
    }
}

/// Sliding-window matcher shared by both case policies.
///
/// `words` must already be normalized with `normalize`.
fn scan_windows(tokens: &[Token], words: &[String], normalize: Normalizer) -> Vec<MatchWindow> {
    let m = words.len();
    let mut windows = Vec::new();

    if m == 0 || tokens.len() < m {
        return windows;
    }

    let texts: Vec<Cow<'_, str>> = tokens.iter().map(|token| normalize(&token.text)).collect();

    let mut i = 0;
    while i <= texts.len() - m {
        let is_match = texts[i..i + m]
            .iter()
            .zip(words)
            .all(|(text, word)| text.as_ref() == word.as_str());

        if !is_match {
            i += 1;
            continue;
        }

        let members = &tokens[i..i + m];
        let rect = Rectangle::union_all(
            members
                .iter()
                .filter(|token| token.contributes_rect())
                .map(|token| &token.rect),
        );

        if rect.is_none() {
            tracing::warn!(
                start = i,
                len = m,
                "matched window has no usable token boxes, skipping outline"
            );
        }

        windows.push(MatchWindow { start: i, len: m, rect });
        i += m;
    }

    windows
}
