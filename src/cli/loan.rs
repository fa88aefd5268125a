use std::process;

use clap::Parser;
use shelf::{Book, Catalog, CatalogError};
use tracing::instrument;

use super::{terminal::Colorize, Session};

#[derive(Debug, Parser)]
#[command(about = "Borrow a copy of a book for 15 days")]
pub struct Borrow {
    /// ISBN of the book to borrow
    isbn: String,
}

impl Borrow {
    #[instrument(skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let mut catalog = session.open_catalog()?;
        exit_if_refused(borrow(&mut catalog, &self.isbn)?);
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "Return a borrowed copy of a book")]
pub struct Return {
    /// ISBN of the book to return
    isbn: String,
}

impl Return {
    #[instrument(skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let mut catalog = session.open_catalog()?;
        exit_if_refused(return_copy(&mut catalog, &self.isbn)?);
        Ok(())
    }
}

/// Whether the catalog accepted a borrow or return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Refused,
}

/// Borrow a copy and report the result.
///
/// Unknown ISBNs and unavailable books are reported and return
/// [`Outcome::Refused`]. Only a failure to save is an error.
pub fn borrow(catalog: &mut Catalog, isbn: &str) -> anyhow::Result<Outcome> {
    report(catalog.borrow(isbn.trim()), |book| {
        format!("Borrowed \"{}\"", book.title())
    })
}

/// Return a copy and report the result.
///
/// See [`borrow`] for how failures are reported.
pub fn return_copy(catalog: &mut Catalog, isbn: &str) -> anyhow::Result<Outcome> {
    report(catalog.return_copy(isbn.trim()), |book| {
        format!("Returned \"{}\"", book.title())
    })
}

fn report(
    result: Result<&Book, CatalogError>,
    message: impl FnOnce(&Book) -> String,
) -> anyhow::Result<Outcome> {
    match result {
        Ok(book) => {
            println!("{}", format!("✅ {}", message(book)).success());
            if let Some(due) = book.due_date() {
                println!("   Due back on {}", due.format("%Y-%m-%d"));
            }
            println!(
                "   {} of {} copies available",
                book.available_count(),
                book.copy_count()
            );
            Ok(Outcome::Done)
        }
        Err(CatalogError::Save(e)) => Err(e.into()),
        Err(e) => {
            println!("{}", format!("⚠️  {e}").warning());
            Ok(Outcome::Refused)
        }
    }
}

fn exit_if_refused(outcome: Outcome) {
    if outcome == Outcome::Refused {
        process::exit(2);
    }
}
