//! Document-wide search across independent pages
//!
//! The phrase is validated once, before any page is touched. Each page is
//! then matched on its own, so pages can be spread over worker threads and
//! reassembled by page index.

use crate::error::{PhrasemarkError, Result};
use crate::geometry::Rectangle;
use crate::search::phrase::{PhrasePattern, SearchPhrase};
use crate::text::Token;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Match rectangles keyed by page index, in page order
pub type PageMatches = BTreeMap<usize, Vec<Rectangle>>;

/// Fast-path rectangles supplied per page index
pub type FastRanges = HashMap<usize, Vec<Rectangle>>;

/// Options for document searches
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Number of worker threads used by [`search_document_parallel`]
    pub parallelism: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            parallelism: num_cpus::get().min(8),
        }
    }
}

impl SearchOptions {
    /// Set the number of worker threads
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    /// Single-threaded search
    pub fn sequential() -> Self {
        Self { parallelism: 1 }
    }
}

/// Search every page of a document for `phrase`.
///
/// The result holds one entry per page, empty when the page has no match.
/// An invalid phrase fails before any page is searched.
pub fn search_document<P>(
    pages: &[P],
    phrase: &SearchPhrase,
    fast_ranges_per_page: Option<&FastRanges>,
) -> Result<PageMatches>
where
    P: AsRef<[Token]>,
{
    let pattern = phrase.compile()?;
    let matches = scan_pages(&pattern, pages, fast_ranges_per_page);

    log_summary(&pattern, &matches);
    Ok(matches)
}

/// Like [`search_document`], with pages spread over worker threads.
pub fn search_document_parallel<P>(
    pages: &[P],
    phrase: &SearchPhrase,
    fast_ranges_per_page: Option<&FastRanges>,
    options: &SearchOptions,
) -> Result<PageMatches>
where
    P: AsRef<[Token]> + Sync,
{
    let pattern = phrase.compile()?;
    Ok(search_pages(&pattern, pages, fast_ranges_per_page, options))
}

/// Search every page with an already compiled pattern.
///
/// Workers pull page indices from a shared counter; results are keyed by
/// page index so completion order does not matter.
pub fn search_pages<P>(
    pattern: &PhrasePattern,
    pages: &[P],
    fast_ranges_per_page: Option<&FastRanges>,
    options: &SearchOptions,
) -> PageMatches
where
    P: AsRef<[Token]> + Sync,
{
    let workers = options.parallelism.max(1).min(pages.len());
    let matches = if workers <= 1 {
        scan_pages(pattern, pages, fast_ranges_per_page)
    } else {
        let next_page = AtomicUsize::new(0);
        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            for _ in 0..workers {
                handles.push(scope.spawn(|| {
                    let mut found = Vec::new();
                    loop {
                        let index = next_page.fetch_add(1, Ordering::Relaxed);
                        let Some(tokens) = pages.get(index) else {
                            break;
                        };
                        found.push((
                            index,
                            search_page(pattern, index, tokens.as_ref(), fast_ranges_per_page),
                        ));
                    }
                    found
                }));
            }

            let mut matches = PageMatches::new();
            for handle in handles {
                match handle.join() {
                    Ok(found) => matches.extend(found),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            matches
        })
    };

    log_summary(pattern, &matches);
    matches
}

fn scan_pages<P>(pattern: &PhrasePattern, pages: &[P], fast_ranges_per_page: Option<&FastRanges>) -> PageMatches
where
    P: AsRef<[Token]>,
{
    pages
        .iter()
        .enumerate()
        .map(|(index, tokens)| {
            (
                index,
                search_page(pattern, index, tokens.as_ref(), fast_ranges_per_page),
            )
        })
        .collect()
}

/// Search a single page with an already validated pattern
pub fn search_page(
    pattern: &PhrasePattern,
    page_index: usize,
    tokens: &[Token],
    fast_ranges_per_page: Option<&FastRanges>,
) -> Vec<Rectangle> {
    let fast = fast_ranges_per_page
        .and_then(|ranges| ranges.get(&page_index))
        .map(Vec::as_slice);

    let rects = pattern.find_matches(tokens, fast);
    tracing::debug!(
        page = page_index,
        tokens = tokens.len(),
        fast_path = fast.map_or(false, |f| !f.is_empty()),
        matches = rects.len(),
        "page searched"
    );
    rects
}

/// Look up one page in a result map
pub fn page_matches(matches: &PageMatches, page_index: usize) -> Result<&[Rectangle]> {
    matches
        .get(&page_index)
        .map(Vec::as_slice)
        .ok_or(PhrasemarkError::InvalidPageNumber(page_index))
}

fn log_summary(pattern: &PhrasePattern, matches: &PageMatches) {
    let total: usize = matches.values().map(Vec::len).sum();
    tracing::info!(
        words = pattern.len(),
        case_sensitive = pattern.is_case_sensitive(),
        pages = matches.len(),
        matches = total,
        "document searched"
    );
}
