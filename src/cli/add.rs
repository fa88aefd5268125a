use std::process;

use clap::Parser;
use shelf::{Book, Catalog, Isbn, IsbnValidation};
use tracing::instrument;

use super::{non_empty, terminal::Colorize, Session};

#[derive(Debug, Parser)]
#[command(about = "Add a book to the catalog")]
pub struct Add {
    /// The title of the book
    #[arg(long, short, value_parser = non_empty)]
    title: String,

    /// The author of the book
    #[arg(long, short, value_parser = non_empty)]
    author: String,

    /// A 13-digit ISBN not already used in the catalog
    #[arg(long, short)]
    isbn: String,

    /// How many copies the library owns
    #[arg(long, short)]
    copies: u32,
}

impl Add {
    #[instrument(skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let mut catalog = session.open_catalog()?;

        let isbn = self.isbn.trim();
        let validation = validate(&catalog, isbn);
        if !validation.is_valid() {
            print_problems(isbn, &validation);
            process::exit(2);
        }

        let isbn = Isbn::try_from(isbn)?;
        add_book(&mut catalog, Book::new(self.title, self.author, isbn, self.copies))
    }
}

#[derive(Debug, Parser)]
#[command(about = "Check whether an ISBN can be used for a new book")]
pub struct CheckIsbn {
    /// The ISBN to check
    isbn: String,
}

impl CheckIsbn {
    #[instrument(skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let catalog = session.open_catalog()?;
        let isbn = self.isbn.trim();
        let validation = validate(&catalog, isbn);

        if validation.is_valid() {
            println!("{}", format!("✅ {isbn} can be used").success());
            Ok(())
        } else {
            print_problems(isbn, &validation);
            process::exit(2);
        }
    }
}

/// Check a typed ISBN, ignoring surrounding whitespace.
fn validate(catalog: &Catalog, isbn: &str) -> IsbnValidation {
    catalog.validate_isbn(isbn.trim())
}

/// Add `book` and confirm on the terminal.
pub fn add_book(catalog: &mut Catalog, book: Book) -> anyhow::Result<()> {
    let title = book.title().to_string();
    catalog.add(book)?;
    println!("{}", format!("✅ Added \"{title}\" to the catalog").success());
    Ok(())
}

/// List every reason an ISBN was rejected.
pub fn print_problems(isbn: &str, validation: &IsbnValidation) {
    println!("{}", format!("⚠️  ISBN '{isbn}' cannot be used:").warning());
    for reason in validation.reasons() {
        println!("  - {reason}");
    }
}
