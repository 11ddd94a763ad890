//! Department labels and row filtering.
//!
//! A department is a year-derived grouping label such as `"2nd Year"`.
//! Rows belong to a department when their `Year` field matches the
//! label's leading token, compared trimmed and uppercased. The sentinel
//! `"Default Department"` disables filtering.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::YearRow;

/// A department label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Department(String);

impl Department {
    /// Sentinel label meaning "no filtering".
    pub const DEFAULT: &'static str = "Default Department";

    /// Wraps a label as given.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The unfiltered default department.
    pub fn default_department() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    /// Label for a source year value, e.g. `2ND` → `2ND Year`.
    pub fn for_year(year: &str) -> Self {
        Self(format!("{} Year", year.trim()))
    }

    /// Whether this is the sentinel default department.
    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }

    /// Uppercased leading token, or `None` for the default department.
    ///
    /// A blank label yields an empty token, which only matches rows
    /// without a year.
    pub fn year_token(&self) -> Option<String> {
        if self.is_default() {
            return None;
        }
        Some(
            self.0
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_uppercase(),
        )
    }

    /// Whether a row's year belongs to this department.
    pub fn contains<R: YearRow>(&self, row: &R) -> bool {
        match self.year_token() {
            None => true,
            Some(token) => row.year().trim().to_uppercase() == token,
        }
    }

    /// Raw label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Department {
    fn default() -> Self {
        Self::default_department()
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Department {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Department {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// Keeps the rows that belong to `department`.
///
/// The default department returns every row unchanged. An empty result
/// is a valid outcome, not an error.
pub fn filter_rows<R: YearRow + Clone>(rows: &[R], department: &Department) -> Vec<R> {
    if department.is_default() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|row| department.contains(*row))
        .cloned()
        .collect()
}
