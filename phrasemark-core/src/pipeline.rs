//! End-to-end highlighting: extract, match, draw
//!
//! [`highlight`] drives a [`TokenSource`] and a [`Renderer`]:
//!
//! 1. the phrase is validated before any page is read
//! 2. tokens are extracted for every page, on worker threads when allowed
//! 3. text-layer sources are asked for engine-native hits
//! 4. pages are searched (see [`crate::search::aggregator`])
//! 5. matches are drawn in document order and the renderer is finished

use crate::error::{PhrasemarkError, Result};
use crate::geometry::Rectangle;
use crate::render::{OutlineStyle, Renderer};
use crate::search::{matches_in_order, search_pages, FastRanges, PageMatches, SearchOptions, SearchPhrase};
use crate::source::TokenSource;
use crate::text::Token;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

/// Options for [`highlight`]
#[derive(Debug, Clone, Default)]
pub struct HighlightOptions {
    pub search: SearchOptions,
    pub style: OutlineStyle,
}

impl HighlightOptions {
    pub fn with_search(mut self, search: SearchOptions) -> Self {
        self.search = search;
        self
    }

    pub fn with_style(mut self, style: OutlineStyle) -> Self {
        self.style = style;
        self
    }
}

/// What a highlighting run found and produced
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HighlightReport {
    pub phrase: String,
    pub case_sensitive: bool,
    /// Match rectangles per page, one entry for every page
    pub pages: PageMatches,
    /// Files written by the renderer
    pub outputs: Vec<PathBuf>,
    pub generated_at: DateTime<Utc>,
}

impl HighlightReport {
    pub fn total_matches(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    /// Pages with at least one match, in page order
    pub fn pages_with_matches(&self) -> impl Iterator<Item = (usize, &[Rectangle])> + '_ {
        self.pages
            .iter()
            .filter(|(_, rects)| !rects.is_empty())
            .map(|(&page, rects)| (page, rects.as_slice()))
    }
}

/// Find every occurrence of `phrase` in `source` and outline it with `renderer`
pub fn highlight<S, R>(
    source: &S,
    phrase: &SearchPhrase,
    renderer: &mut R,
    options: &HighlightOptions,
) -> Result<HighlightReport>
where
    S: TokenSource + ?Sized,
    R: Renderer + ?Sized,
{
    let pattern = phrase.compile()?;
    options.style.validate()?;

    let start = Instant::now();
    let pages = extract_pages(source, options.search.parallelism)?;
    let fast_ranges = collect_fast_ranges(source, phrase)?;

    let matches = search_pages(&pattern, &pages, fast_ranges.as_ref(), &options.search);

    for found in matches_in_order(&matches) {
        renderer.draw_outline(found.page_index, &found.rect, &options.style)?;
    }
    let outputs = renderer.finish()?;

    let report = HighlightReport {
        phrase: phrase.raw.clone(),
        case_sensitive: phrase.case_sensitive,
        pages: matches,
        outputs,
        generated_at: Utc::now(),
    };

    tracing::info!(
        pages = report.pages.len(),
        matches = report.total_matches(),
        outputs = report.outputs.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "highlighting finished"
    );
    Ok(report)
}

/// Tokens of every page in page order.
///
/// The first failing page (lowest index) aborts the run.
pub fn extract_pages<S>(source: &S, parallelism: usize) -> Result<Vec<Vec<Token>>>
where
    S: TokenSource + ?Sized,
{
    let page_count = source.page_count();
    let workers = parallelism.max(1).min(page_count);
    if workers <= 1 {
        return (0..page_count).map(|page| source.extract_tokens(page)).collect();
    }

    let next_page = AtomicUsize::new(0);
    let mut slots: Vec<Option<Result<Vec<Token>>>> = (0..page_count).map(|_| None).collect();

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            handles.push(scope.spawn(|| {
                let mut extracted = Vec::new();
                loop {
                    let page = next_page.fetch_add(1, Ordering::Relaxed);
                    if page >= page_count {
                        break;
                    }
                    extracted.push((page, source.extract_tokens(page)));
                }
                extracted
            }));
        }

        for handle in handles {
            match handle.join() {
                Ok(extracted) => {
                    for (page, tokens) in extracted {
                        slots[page] = Some(tokens);
                    }
                }
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
    });

    slots
        .into_iter()
        .enumerate()
        .map(|(page, slot)| slot.unwrap_or(Err(PhrasemarkError::InvalidPageNumber(page))))
        .collect()
}

fn collect_fast_ranges<S>(source: &S, phrase: &SearchPhrase) -> Result<Option<FastRanges>>
where
    S: TokenSource + ?Sized,
{
    if source.is_ocr() {
        return Ok(None);
    }

    let mut ranges = FastRanges::new();
    for page in 0..source.page_count() {
        if let Some(rects) = source.fast_search(page, phrase)? {
            tracing::debug!(page, hits = rects.len(), "engine search hits");
            ranges.insert(page, rects);
        }
    }
    Ok(Some(ranges))
}
