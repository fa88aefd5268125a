//! Book listings for the terminal

use std::io::{self, Write};

use shelf::{domain::book::DateDisplay, Book, BookSummary};

use super::terminal::{is_narrow, Colorize};

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Print a list of books, or `empty_message` if there are none.
pub fn print_books(
    books: &[&Book],
    format: OutputFormat,
    empty_message: &str,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(books),
        OutputFormat::Table => {
            if books.is_empty() {
                println!("{}", empty_message.dim());
            } else if is_narrow() {
                print_stacked(books);
            } else {
                print_table(books);
            }
            Ok(())
        }
    }
}

/// Print every field of a single book.
pub fn print_book(book: &Book, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&book.describe())?);
        }
        OutputFormat::Table => {
            println!("{book}");
            if book.is_overdue() {
                println!("{}", "Overdue".warning());
            }
        }
    }
    Ok(())
}

fn print_json(books: &[&Book]) -> anyhow::Result<()> {
    write_json(&mut io::stdout().lock(), books)
}

/// Write a JSON array of book summaries to `out`.
pub fn write_json(out: &mut impl Write, books: &[&Book]) -> anyhow::Result<()> {
    let summaries: Vec<BookSummary<'_>> = books.iter().map(|book| book.describe()).collect();
    serde_json::to_writer_pretty(&mut *out, &summaries)?;
    writeln!(out)?;
    Ok(())
}

fn print_stacked(books: &[&Book]) {
    for book in books {
        println!("{}", book.title().bold());
        println!("  {}", book.author());
        println!(
            "  {}  {}/{} available",
            book.isbn(),
            book.available_count(),
            book.copy_count()
        );
        if let Some(due) = book.due_date() {
            let line = format!("  due {}", DateDisplay(Some(due)));
            if book.is_overdue() {
                println!("{}", line.warning());
            } else {
                println!("{line}");
            }
        }
    }
}

fn print_table(books: &[&Book]) {
    const MAX_COLUMN: usize = 40;

    let width = |text: fn(&Book) -> &str, header: &str| {
        books
            .iter()
            .map(|book| text(book).chars().count())
            .chain(std::iter::once(header.chars().count()))
            .max()
            .unwrap_or_default()
            .min(MAX_COLUMN)
    };
    let title_width = width(Book::title, "Title");
    let author_width = width(Book::author, "Author");

    println!(
        "{:<13}  {:<title_width$}  {:<author_width$}  {:>9}  Due",
        "ISBN", "Title", "Author", "Available"
    );
    println!(
        "{}",
        "─".repeat(13 + title_width + author_width + 9 + 3 * 2 + 10).dim()
    );

    for book in books {
        let due = DateDisplay(book.due_date()).to_string();
        let due = if book.is_overdue() {
            format!("{due} (overdue)").warning()
        } else {
            due
        };
        println!(
            "{:<13}  {:<title_width$}  {:<author_width$}  {:>9}  {}",
            book.isbn(),
            truncate(book.title(), title_width),
            truncate(book.author(), author_width),
            format!("{}/{}", book.available_count(), book.copy_count()),
            due
        );
    }
}

/// Shorten `text` to at most `max` characters, marking the cut with `…`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(max.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}
