//! Search phrases and their compiled word patterns

use crate::error::{PhrasemarkError, Result};
use std::borrow::Cow;

/// The user-supplied search string and its case policy
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchPhrase {
    /// Phrase as typed by the user
    pub raw: String,
    /// Compare token text verbatim instead of case-folded
    pub case_sensitive: bool,
}

impl SearchPhrase {
    /// Create a phrase with an explicit case policy
    pub fn new(raw: impl Into<String>, case_sensitive: bool) -> Self {
        Self {
            raw: raw.into(),
            case_sensitive,
        }
    }

    /// Case-insensitive phrase (the default policy)
    pub fn case_insensitive(raw: impl Into<String>) -> Self {
        Self::new(raw, false)
    }

    /// Case-sensitive phrase
    pub fn case_sensitive(raw: impl Into<String>) -> Self {
        Self::new(raw, true)
    }

    /// Split the phrase into words on whitespace.
    ///
    /// Fails with [`PhrasemarkError::InvalidArgument`] when nothing but
    /// whitespace was given.
    pub fn words(&self) -> Result<Vec<&str>> {
        let words: Vec<&str> = self.raw.split_whitespace().collect();
        if words.is_empty() {
            return Err(PhrasemarkError::InvalidArgument(
                "search phrase must contain at least one word".to_string(),
            ));
        }
        Ok(words)
    }

    /// Validate the phrase and normalize its words for matching
    pub fn compile(&self) -> Result<PhrasePattern> {
        let normalize = normalizer(self.case_sensitive);
        let words = self
            .words()?
            .into_iter()
            .map(|word| normalize(word).into_owned())
            .collect();

        Ok(PhrasePattern {
            words,
            case_sensitive: self.case_sensitive,
        })
    }
}

/// A validated phrase: non-empty list of normalized words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhrasePattern {
    words: Vec<String>,
    case_sensitive: bool,
}

impl PhrasePattern {
    /// Normalized phrase words, never empty
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of tokens a match spans
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false, a compiled pattern has at least one word
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// The normalization applied to token text before comparison
    pub fn normalizer(&self) -> Normalizer {
        normalizer(self.case_sensitive)
    }
}

/// Maps token text to the form compared against phrase words
pub type Normalizer = for<'a> fn(&'a str) -> Cow<'a, str>;

/// Text normalization for a case policy
pub fn normalizer(case_sensitive: bool) -> Normalizer {
    if case_sensitive {
        verbatim
    } else {
        fold_case
    }
}

fn verbatim(text: &str) -> Cow<'_, str> {
    Cow::Borrowed(text)
}

fn fold_case(text: &str) -> Cow<'_, str> {
    if text.chars().all(|c| c.to_lowercase().eq(std::iter::once(c))) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_split_on_any_whitespace() {
        let phrase = SearchPhrase::case_insensitive("  quick \t brown\nfox ");
        assert_eq!(phrase.words().unwrap(), vec!["quick", "brown", "fox"]);
    }

    #[test]
    fn test_empty_phrase_rejected() {
        for raw in ["", "   ", "\t\n"] {
            let phrase = SearchPhrase::case_insensitive(raw);
            assert!(matches!(
                phrase.words(),
                Err(PhrasemarkError::InvalidArgument(_))
            ));
            assert!(matches!(
                phrase.compile(),
                Err(PhrasemarkError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_compile_folds_case_when_insensitive() {
        let pattern = SearchPhrase::case_insensitive("Quick BROWN").compile().unwrap();
        assert_eq!(pattern.words(), &["quick".to_string(), "brown".to_string()]);
        assert_eq!(pattern.len(), 2);
        assert!(!pattern.is_empty());
        assert!(!pattern.is_case_sensitive());
    }

    #[test]
    fn test_compile_keeps_case_when_sensitive() {
        let pattern = SearchPhrase::case_sensitive("Quick BROWN").compile().unwrap();
        assert_eq!(pattern.words(), &["Quick".to_string(), "BROWN".to_string()]);
        assert!(pattern.is_case_sensitive());
    }

    #[test]
    fn test_normalizer() {
        let fold = normalizer(false);
        assert_eq!(fold("HeLLo"), "hello");
        assert!(matches!(fold("hello"), Cow::Borrowed(_)));
        assert_eq!(fold("ÉCOLE"), "école");

        let keep = normalizer(true);
        assert_eq!(keep("HeLLo"), "HeLLo");
    }
}
