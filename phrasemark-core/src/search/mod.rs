//! Phrase search over positioned tokens
//!
//! - [`phrase`]: the user's phrase, its case policy and its compiled form
//! - [`matcher`]: fast path and sliding-window matching on one page
//! - [`aggregator`]: sequential and parallel document-wide search

pub mod aggregator;
pub mod matcher;
pub mod phrase;

pub use aggregator::{
    page_matches, search_document, search_document_parallel, search_page, search_pages,
    FastRanges, PageMatches, SearchOptions,
};
pub use matcher::{find_matches, MatchWindow};
pub use phrase::{normalizer, Normalizer, PhrasePattern, SearchPhrase};

use crate::geometry::Rectangle;

/// One outlined occurrence of the phrase
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Match {
    pub page_index: usize,
    pub rect: Rectangle,
}

/// Flatten per-page results into matches in document order
pub fn matches_in_order(matches: &PageMatches) -> Vec<Match> {
    matches
        .iter()
        .flat_map(|(&page_index, rects)| {
            rects.iter().map(move |&rect| Match { page_index, rect })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_in_order() {
        let mut matches = PageMatches::new();
        matches.insert(2, vec![Rectangle::new(0.0, 0.0, 1.0, 1.0)]);
        matches.insert(0, vec![
            Rectangle::new(5.0, 5.0, 6.0, 6.0),
            Rectangle::new(1.0, 1.0, 2.0, 2.0),
        ]);
        matches.insert(1, vec![]);

        let flat = matches_in_order(&matches);
        let pages: Vec<usize> = flat.iter().map(|m| m.page_index).collect();
        assert_eq!(pages, vec![0, 0, 2]);
        assert_eq!(flat[1].rect, Rectangle::new(1.0, 1.0, 2.0, 2.0));
    }
}
