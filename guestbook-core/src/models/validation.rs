//! Draft validation errors and spam heuristics

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// A run of this many identical characters marks a message as spam
const REPEATED_RUN_LEN: usize = 11;

/// http(s) URL anywhere in the body
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://\S+").expect("invalid url regex"));

/// Promotional keywords, whole words only. Word boundaries are ASCII, so a
/// keyword next to a non-ASCII letter still counts.
static KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?-u:\b)(buy|sale|discount|offer|deal|free|win|prize)(?-u:\b)")
        .expect("invalid keyword regex")
});

/// A single failed validation rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty after trimming
    Required { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Message body tripped a spam heuristic
    Spam,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { field } => write!(f, "{} is required.", field),
            Self::TooLong { field, max } => {
                write!(f, "{} must be {} characters or less.", field, max)
            }
            Self::Spam => write!(
                f,
                "Message appears to be spam. Please write a genuine message."
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Every rule a draft failed, in rule order.
///
/// Displays as one banner line: the individual messages joined by a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn as_slice(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Check a message body against the spam heuristics.
///
/// A body is spam-like if it contains a character repeated 11 or more times
/// in a row, an http(s) URL, or a promotional keyword.
///
/// # Example
/// ```
/// use guestbook_core::models::is_spam_like;
///
/// assert!(is_spam_like("aaaaaaaaaaa"));
/// assert!(is_spam_like("see http://x"));
/// assert!(is_spam_like("totally FREE"));
/// assert!(!is_spam_like("Lovely page, thanks!"));
/// ```
pub fn is_spam_like(message: &str) -> bool {
    has_repeated_run(message, REPEATED_RUN_LEN)
        || URL_RE.is_match(message)
        || KEYWORD_RE.is_match(message)
}

/// True if some character occurs `run` times consecutively.
///
/// Line terminators never count toward a run.
fn has_repeated_run(s: &str, run: usize) -> bool {
    let mut prev: Option<char> = None;
    let mut count = 0;

    for c in s.chars() {
        if matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}') {
            prev = None;
            count = 0;
            continue;
        }
        if prev == Some(c) {
            count += 1;
        } else {
            prev = Some(c);
            count = 1;
        }
        if count >= run {
            return true;
        }
    }

    false
}
