use std::{fmt, ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};

/// Number of characters in a valid ISBN.
pub const ISBN_LENGTH: usize = 13;

/// A validated 13-digit book identifier.
///
/// Only the shape is checked (exactly thirteen ASCII digits). No ISBN-13
/// checksum validation is performed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn(String);

impl Isbn {
    /// Creates a new `Isbn` from a string.
    ///
    /// # Errors
    ///
    /// Returns an [`IsbnError`] listing every format rule the string breaks.
    pub fn new(s: String) -> Result<Self, IsbnError> {
        let problems = format_problems(&s);
        if problems.is_empty() {
            Ok(Self(s))
        } else {
            Err(IsbnError {
                candidate: s,
                problems,
            })
        }
    }

    #[cfg(test)]
    pub(crate) fn new_unchecked(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Isbn {
    type Error = IsbnError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Isbn {
    type Error = IsbnError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl From<Isbn> for String {
    fn from(isbn: Isbn) -> Self {
        isbn.0
    }
}

impl FromStr for Isbn {
    type Err = IsbnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for Isbn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for Isbn {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// A single reason an ISBN candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IsbnProblem {
    /// The candidate is not exactly 13 characters long.
    WrongLength,
    /// The candidate contains characters other than ASCII digits.
    NotNumeric,
    /// Another book in the catalog already uses the candidate.
    AlreadyUsed,
}

impl fmt::Display for IsbnProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::WrongLength => "must be 13 digits",
            Self::NotNumeric => "must be numeric",
            Self::AlreadyUsed => "already used",
        };
        f.write_str(reason)
    }
}

/// Checks the shape of an ISBN candidate.
///
/// Each rule is checked independently so that every violation is reported.
/// An empty candidate is neither the right length nor numeric.
#[must_use]
pub fn format_problems(candidate: &str) -> Vec<IsbnProblem> {
    let mut problems = Vec::new();

    if candidate.chars().count() != ISBN_LENGTH {
        problems.push(IsbnProblem::WrongLength);
    }

    if candidate.is_empty() || !candidate.chars().all(|c| c.is_ascii_digit()) {
        problems.push(IsbnProblem::NotNumeric);
    }

    problems
}

/// Error returned when a string is not a well-formed ISBN.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid ISBN '{candidate}': {}", join_problems(.problems))]
pub struct IsbnError {
    candidate: String,
    problems: Vec<IsbnProblem>,
}

impl IsbnError {
    /// The rules the candidate broke.
    #[must_use]
    pub fn problems(&self) -> &[IsbnProblem] {
        &self.problems
    }
}

/// The outcome of validating an ISBN candidate for a new book.
///
/// Validation collects every problem rather than stopping at the first, so
/// callers can show them all at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IsbnValidation {
    problems: Vec<IsbnProblem>,
}

impl IsbnValidation {
    pub(crate) const fn new(problems: Vec<IsbnProblem>) -> Self {
        Self { problems }
    }

    /// Returns `true` if no rule was violated.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }

    /// The rules the candidate broke, in check order.
    #[must_use]
    pub fn problems(&self) -> &[IsbnProblem] {
        &self.problems
    }

    /// Human-readable reasons, one per violated rule.
    #[must_use]
    pub fn reasons(&self) -> Vec<String> {
        self.problems.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for IsbnValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            f.write_str("valid")
        } else {
            f.write_str(&join_problems(&self.problems))
        }
    }
}

fn join_problems(problems: &[IsbnProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
