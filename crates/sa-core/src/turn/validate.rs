//! Question validation
//!
//! Client input errors are rejected here before anything is persisted.

use crate::{Error, Result};

/// Maximum accepted question length in characters
pub const MAX_QUESTION_LEN: usize = 300;

const MIN_WORDS: usize = 2;
const MAX_REPEAT_RUN: usize = 10;

/// Validate and normalize an incoming question
///
/// Returns the trimmed question. Accepted questions are 1-300
/// characters after trimming, contain at least two whitespace-separated
/// words, and have no character repeated more than ten times in a row.
pub fn validate_question(raw: &str) -> Result<String> {
    let question = raw.trim();

    if question.is_empty() {
        return Err(Error::InvalidQuestion("Question cannot be empty".to_string()));
    }
    if question.chars().count() > MAX_QUESTION_LEN {
        return Err(Error::InvalidQuestion(
            "Question must be under 300 characters".to_string(),
        ));
    }
    if question.split_whitespace().count() < MIN_WORDS {
        return Err(Error::InvalidQuestion(
            "Question must contain at least 2 words".to_string(),
        ));
    }
    if has_repeated_run(question, MAX_REPEAT_RUN + 1) {
        return Err(Error::InvalidQuestion("Invalid question format".to_string()));
    }

    Ok(question.to_string())
}

/// Whether any character repeats at least `len` times consecutively
fn has_repeated_run(text: &str, len: usize) -> bool {
    let mut run = 0usize;
    let mut prev: Option<char> = None;

    for c in text.chars() {
        if Some(c) == prev {
            run += 1;
        } else {
            run = 1;
            prev = Some(c);
        }
        if run >= len {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_normal_question() {
        let question = validate_question("  What is the price of HBL?  ").unwrap();
        assert_eq!(question, "What is the price of HBL?");
    }

    #[test]
    fn test_rejects_empty() {
        assert!(validate_question("").is_err());
        assert!(validate_question("   ").is_err());
    }

    #[test]
    fn test_rejects_single_word() {
        assert!(validate_question("hi").is_err());
    }

    #[test]
    fn test_rejects_over_300_chars() {
        let long = "a ".repeat(151); // 302 chars after trim: 301
        assert!(validate_question(&long).is_err());

        let ok = format!("tell me {}", "x ".repeat(100));
        assert!(validate_question(&ok).is_ok());
    }

    #[test]
    fn test_rejects_repeated_run() {
        assert!(validate_question("aaaaaaaaaaax here").is_err());
        // Exactly ten repeats is still fine.
        assert!(validate_question("aaaaaaaaaa here").is_ok());
    }

    #[test]
    fn test_error_is_invalid_question() {
        let err = validate_question("hi").unwrap_err();
        assert!(matches!(err, Error::InvalidQuestion(_)));
    }
}
