//! Character ranges over the source document

use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open range `[start, end)` of characters in the source document
///
/// The indefinite range (`start == end == -1`) means no specific span is known.
///
/// # Examples
///
/// ```
/// use docqa_domain::Range;
///
/// let range = Range::new(4, 10);
/// assert_eq!(range.len(), Some(6));
///
/// assert!(Range::indefinite().is_indefinite());
/// assert_eq!(Range::indefinite().len(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// First character offset (inclusive)
    pub start: i64,
    /// Last character offset (exclusive)
    pub end: i64,
}

impl Range {
    const INDEFINITE: i64 = -1;

    /// Create a new range
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// The range meaning "no specific span is known"
    pub const fn indefinite() -> Self {
        Self::new(Self::INDEFINITE, Self::INDEFINITE)
    }

    /// Check whether this is the indefinite range
    pub fn is_indefinite(&self) -> bool {
        *self == Self::indefinite()
    }

    /// Number of characters spanned, or `None` for the indefinite range
    pub fn len(&self) -> Option<i64> {
        if self.is_indefinite() {
            None
        } else {
            Some(self.end - self.start)
        }
    }

    /// Check whether the range spans no characters
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::indefinite()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_indefinite() {
            write!(f, "[indefinite]")
        } else {
            write!(f, "[{}, {})", self.start, self.end)
        }
    }
}
