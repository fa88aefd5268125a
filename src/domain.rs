//! Domain models for the library catalog.
//!
//! This module contains the core domain types: books and their lending
//! state, validated ISBNs, and configuration.

/// Book domain model and loan state transitions.
pub mod book;
pub use book::{Book, BookSummary, LoanError, LOAN_PERIOD_DAYS};

mod config;
pub use config::{Config, ConfigError, DEFAULT_DATA_FILE_NAME};

/// ISBN parsing and validation rules.
pub mod isbn;
pub use isbn::{Isbn, IsbnError, IsbnProblem, IsbnValidation};
