use std::fmt;

use chrono::{Days, Local, NaiveDate};
use serde::Serialize;

use crate::domain::Isbn;

/// Number of days a borrowed copy may be kept before it becomes overdue.
pub const LOAN_PERIOD_DAYS: u64 = 15;

/// A single title in the catalog, together with its lending state.
///
/// A book owns a number of physical copies, some of which may be out on loan.
/// Only the most recent borrow is remembered: borrowing a second copy
/// overwrites the borrow and due dates of the first, and returning any copy
/// clears them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) isbn: Isbn,
    pub(crate) copy_count: u32,
    pub(crate) borrowed_count: u32,
    pub(crate) borrow_date: Option<NaiveDate>,
    pub(crate) due_date: Option<NaiveDate>,
}

impl Book {
    /// Construct a new [`Book`] with no copies on loan.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: Isbn,
        copy_count: u32,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn,
            copy_count,
            borrowed_count: 0,
            borrow_date: None,
            due_date: None,
        }
    }

    /// The title of the book.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The author of the book.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// The unique identifier of the book.
    #[must_use]
    pub const fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    /// Total number of copies owned.
    #[must_use]
    pub const fn copy_count(&self) -> u32 {
        self.copy_count
    }

    /// Number of copies currently on loan.
    #[must_use]
    pub const fn borrowed_count(&self) -> u32 {
        self.borrowed_count
    }

    /// Number of copies on the shelf.
    #[must_use]
    pub const fn available_count(&self) -> u32 {
        self.copy_count.saturating_sub(self.borrowed_count)
    }

    /// The date of the most recent borrow, if a copy is out.
    #[must_use]
    pub const fn borrow_date(&self) -> Option<NaiveDate> {
        self.borrow_date
    }

    /// The due date of the most recent borrow, if a copy is out.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns `true` if at least one copy is on the shelf.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.copy_count > self.borrowed_count
    }

    /// Lend out one copy, starting the loan today.
    ///
    /// # Errors
    ///
    /// Returns [`LoanError::Unavailable`] if every copy is already on loan. The
    /// book is left unchanged.
    pub fn borrow(&mut self) -> Result<(), LoanError> {
        self.borrow_on(today())
    }

    /// Lend out one copy, starting the loan on the given date.
    ///
    /// The due date is set to [`LOAN_PERIOD_DAYS`] after `date`.
    ///
    /// # Errors
    ///
    /// Returns [`LoanError::Unavailable`] if every copy is already on loan. The
    /// book is left unchanged.
    pub fn borrow_on(&mut self, date: NaiveDate) -> Result<(), LoanError> {
        if !self.is_available() {
            return Err(LoanError::Unavailable);
        }

        let due = date
            .checked_add_days(Days::new(LOAN_PERIOD_DAYS))
            .ok_or(LoanError::DateOutOfRange)?;

        self.borrowed_count += 1;
        self.borrow_date = Some(date);
        self.due_date = Some(due);
        Ok(())
    }

    /// Take back one copy and clear the loan dates.
    ///
    /// # Errors
    ///
    /// Returns [`LoanError::NothingToReturn`] if no copy is on loan. The book is
    /// left unchanged.
    pub fn return_copy(&mut self) -> Result<(), LoanError> {
        if self.borrowed_count == 0 {
            return Err(LoanError::NothingToReturn);
        }

        self.borrowed_count -= 1;
        self.borrow_date = None;
        self.due_date = None;
        Ok(())
    }

    /// Returns `true` if the current loan is past its due date.
    #[must_use]
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(today())
    }

    /// Returns `true` if the current loan was due strictly before `date`.
    ///
    /// A book with no due date is never overdue.
    #[must_use]
    pub fn is_overdue_on(&self, date: NaiveDate) -> bool {
        self.due_date.is_some_and(|due| due < date)
    }

    /// A snapshot of every field plus the derived lending state.
    #[must_use]
    pub fn describe(&self) -> BookSummary<'_> {
        self.describe_on(today())
    }

    /// As [`Book::describe`], evaluating overdue status against `date`.
    #[must_use]
    pub fn describe_on(&self, date: NaiveDate) -> BookSummary<'_> {
        BookSummary {
            title: &self.title,
            author: &self.author,
            isbn: self.isbn.as_str(),
            copy_count: self.copy_count,
            borrowed_count: self.borrowed_count,
            available_count: self.available_count(),
            borrow_date: self.borrow_date,
            due_date: self.due_date,
            overdue: self.is_overdue_on(date),
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Author: {}", self.author)?;
        writeln!(f, "ISBN: {}", self.isbn)?;
        writeln!(f, "Copies: {}", self.copy_count)?;
        writeln!(f, "Borrowed: {}", self.borrowed_count)?;
        writeln!(f, "Available: {}", self.available_count())?;
        writeln!(f, "Borrowed on: {}", DateDisplay(self.borrow_date))?;
        write!(f, "Due on: {}", DateDisplay(self.due_date))
    }
}

/// Renders an optional date, using `-` when unset.
#[derive(Debug, Clone, Copy)]
pub struct DateDisplay(pub Option<NaiveDate>);

impl fmt::Display for DateDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(date) = self.0 else {
            return f.write_str("-");
        };
        write!(f, "{}", date.format("%Y-%m-%d"))
    }
}

/// A read-only view of a [`Book`], suitable for display or JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSummary<'a> {
    /// The title of the book.
    pub title: &'a str,
    /// The author of the book.
    pub author: &'a str,
    /// The unique identifier of the book.
    pub isbn: &'a str,
    /// Total number of copies owned.
    pub copy_count: u32,
    /// Number of copies currently on loan.
    pub borrowed_count: u32,
    /// Number of copies on the shelf.
    pub available_count: u32,
    /// The date of the most recent borrow.
    pub borrow_date: Option<NaiveDate>,
    /// The due date of the most recent borrow.
    pub due_date: Option<NaiveDate>,
    /// Whether the most recent loan is past due.
    pub overdue: bool,
}

/// A borrow or return that the book's current state does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoanError {
    /// Every copy is already on loan.
    #[error("no copies of this book are available")]
    Unavailable,
    /// No copy is on loan.
    #[error("this book has no borrowed copies to return")]
    NothingToReturn,
    /// The due date would fall outside the supported calendar range.
    #[error("the due date is out of range")]
    DateOutOfRange,
}

/// Today's date in the local time zone.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
