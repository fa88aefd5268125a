use clap::Parser;
use tracing::instrument;

use super::{
    render::{print_book, print_books, OutputFormat},
    Session,
};

#[derive(Debug, Parser, Default)]
#[command(about = "List every book in the catalog")]
pub struct List {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl List {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let catalog = session.open_catalog()?;
        let books: Vec<_> = catalog.books().iter().collect();
        print_books(&books, self.output, "The catalog is empty.")
    }
}

#[derive(Debug, Parser)]
#[command(about = "Find books whose title or author contains the query")]
pub struct Search {
    /// Text to look for in titles and authors
    query: String,

    /// Ignore letter case when matching
    #[arg(long, short)]
    ignore_case: bool,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Search {
    #[instrument(level = "debug", skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let catalog = session.open_catalog()?;
        let books = catalog.search(&self.query, session.case_sensitivity(self.ignore_case));
        print_books(
            &books,
            self.output,
            &format!("No books match '{}'.", self.query),
        )
    }
}

#[derive(Debug, Parser)]
#[command(about = "Show every field of one book")]
pub struct Show {
    /// ISBN of the book
    isbn: String,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Show {
    #[instrument(level = "debug", skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let catalog = session.open_catalog()?;
        let book = catalog
            .get(self.isbn.trim())
            .ok_or_else(|| anyhow::anyhow!("No book with ISBN {}", self.isbn))?;
        print_book(book, self.output)
    }
}

#[derive(Debug, Parser, Default)]
#[command(about = "List books whose loan is past due")]
pub struct Overdue {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Overdue {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let catalog = session.open_catalog()?;
        print_books(&catalog.overdue(), self.output, "No overdue books.")
    }
}

#[derive(Debug, Parser, Default)]
#[command(about = "List the most borrowed books")]
pub struct Popular {
    /// How many books to show (defaults to the configured count)
    #[arg(long, short = 'n')]
    count: Option<usize>,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Popular {
    #[instrument(level = "debug", skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let catalog = session.open_catalog()?;
        let count = self.count.unwrap_or_else(|| session.config.popular_count());
        print_books(&catalog.popular(count), self.output, "The catalog is empty.")
    }
}
