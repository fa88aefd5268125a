//! On-disk representation of a book.
//!
//! Books are written as versioned JSON objects. Files written by the legacy
//! desktop tool (`PascalCase` keys, .NET date-time strings with sentinel values
//! for "no date") are still accepted on load.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Book, Isbn, IsbnError};

/// A book in the current serialized format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_version")]
pub enum BookRecord {
    #[serde(rename = "1")]
    V1 {
        title: String,
        author: String,
        isbn: String,
        copy_count: u32,
        borrowed_count: u32,
        #[serde(default)]
        borrow_date: Option<NaiveDate>,
        #[serde(default)]
        due_date: Option<NaiveDate>,
    },
}

/// A book as written by the legacy tool.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegacyRecord {
    title: String,
    author: String,
    #[serde(rename = "ISBN")]
    isbn: String,
    copy_count: u32,
    borrowed_count: u32,
    borrow_date: String,
    due_date: String,
}

/// Any record that can appear in a catalog file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StoredRecord {
    Current(BookRecord),
    Legacy(LegacyRecord),
}

/// Errors that make a stored record unusable.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The stored ISBN is malformed.
    #[error(transparent)]
    Isbn(#[from] IsbnError),
    /// More copies are on loan than exist.
    #[error("{borrowed} copies borrowed but only {copies} owned")]
    BorrowedExceedsCopies {
        /// The stored borrowed count.
        borrowed: u32,
        /// The stored copy count.
        copies: u32,
    },
    /// A legacy date could not be parsed.
    #[error("unrecognised date '{0}'")]
    Date(String),
}

impl From<&Book> for BookRecord {
    fn from(book: &Book) -> Self {
        Self::V1 {
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.to_string(),
            copy_count: book.copy_count,
            borrowed_count: book.borrowed_count,
            borrow_date: book.borrow_date,
            due_date: book.due_date,
        }
    }
}

impl TryFrom<BookRecord> for Book {
    type Error = RecordError;

    fn try_from(record: BookRecord) -> Result<Self, Self::Error> {
        let BookRecord::V1 {
            title,
            author,
            isbn,
            copy_count,
            borrowed_count,
            borrow_date,
            due_date,
        } = record;

        build(
            title,
            author,
            &isbn,
            copy_count,
            borrowed_count,
            borrow_date,
            due_date,
        )
    }
}

impl TryFrom<LegacyRecord> for Book {
    type Error = RecordError;

    fn try_from(record: LegacyRecord) -> Result<Self, Self::Error> {
        let LegacyRecord {
            title,
            author,
            isbn,
            copy_count,
            borrowed_count,
            borrow_date,
            due_date,
        } = record;

        build(
            title,
            author,
            &isbn,
            copy_count,
            borrowed_count,
            parse_legacy_date(&borrow_date)?,
            parse_legacy_date(&due_date)?,
        )
    }
}

impl TryFrom<StoredRecord> for Book {
    type Error = RecordError;

    fn try_from(record: StoredRecord) -> Result<Self, Self::Error> {
        match record {
            StoredRecord::Current(record) => record.try_into(),
            StoredRecord::Legacy(record) => record.try_into(),
        }
    }
}

fn build(
    title: String,
    author: String,
    isbn: &str,
    copy_count: u32,
    borrowed_count: u32,
    borrow_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
) -> Result<Book, RecordError> {
    if borrowed_count > copy_count {
        return Err(RecordError::BorrowedExceedsCopies {
            borrowed: borrowed_count,
            copies: copy_count,
        });
    }

    let mut book = Book::new(title, author, Isbn::try_from(isbn)?, copy_count);
    book.borrowed_count = borrowed_count;
    book.borrow_date = borrow_date;
    book.due_date = due_date;
    Ok(book)
}

/// Parses a .NET `DateTime` string such as `2024-03-01T00:00:00`.
///
/// The minimum and maximum representable dates were used as "no date" and
/// map to `None`.
fn parse_legacy_date(value: &str) -> Result<Option<NaiveDate>, RecordError> {
    let date_part = value.split('T').next().unwrap_or_default();
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| RecordError::Date(value.to_string()))?;

    if is_legacy_sentinel(date) {
        Ok(None)
    } else {
        Ok(Some(date))
    }
}

fn is_legacy_sentinel(date: NaiveDate) -> bool {
    Some(date) == NaiveDate::from_ymd_opt(1, 1, 1)
        || Some(date) == NaiveDate::from_ymd_opt(9999, 12, 31)
}
