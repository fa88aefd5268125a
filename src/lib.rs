//! Library catalog management
//!
//! Books, their copies and loans are kept in a single JSON file.

pub mod domain;
pub use domain::{
    Book, BookSummary, Config, Isbn, IsbnProblem, IsbnValidation, LoanError, LOAN_PERIOD_DAYS,
};

/// File-backed storage for the catalog.
pub mod storage;
pub use storage::{Catalog, CatalogError, CaseSensitivity, LoadError, SaveError};
