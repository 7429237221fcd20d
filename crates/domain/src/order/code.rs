//! Human-readable order code.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Human-readable order code: current year followed by the order sequence
/// plus one, zero-padded to nine digits.
///
/// `OrderCode::with_year(0, 2024)` yields `"2024000000001"`. Codes are never
/// blank by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderCode(String);

impl OrderCode {
    /// Creates a code from the given sequence and the current year.
    pub fn new(sequence: u64) -> Self {
        Self::with_year(sequence, Utc::now().year())
    }

    /// Creates a code from the given sequence and an explicit year.
    pub fn with_year(sequence: u64, year: i32) -> Self {
        Self(format!("{year}{:09}", sequence + 1))
    }

    /// Reconstructs a code from stored state.
    pub fn from_string(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
