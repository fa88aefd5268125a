//! The interactive numbered menu
//!
//! Each pass of the loop shows the menu, reads one choice and runs exactly one
//! catalog operation. Recoverable problems (bad input, unknown ISBN, no copies
//! left) are reported and the loop continues; failing to save ends it.

use std::fmt;

use dialoguer::Input;
use shelf::{Book, Catalog, Isbn, LOAN_PERIOD_DAYS};
use tracing::instrument;

use super::{
    add::add_book,
    loan,
    render::{print_books, OutputFormat},
    terminal::Colorize,
    Session,
};

/// An entry in the numbered menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Exit,
    AddBook,
    ListAll,
    Search,
    Borrow,
    Return,
    Overdue,
    Popular,
}

impl MenuChoice {
    const ALL: [Self; 8] = [
        Self::AddBook,
        Self::ListAll,
        Self::Search,
        Self::Borrow,
        Self::Return,
        Self::Overdue,
        Self::Popular,
        Self::Exit,
    ];

    const fn number(self) -> u8 {
        match self {
            Self::Exit => 0,
            Self::AddBook => 1,
            Self::ListAll => 2,
            Self::Search => 3,
            Self::Borrow => 4,
            Self::Return => 5,
            Self::Overdue => 6,
            Self::Popular => 7,
        }
    }
}

impl TryFrom<u8> for MenuChoice {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|choice| choice.number() == value)
            .ok_or(value)
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Exit => "Exit",
            Self::AddBook => "Add a book",
            Self::ListAll => "List all books",
            Self::Search => "Search by title or author",
            Self::Borrow => "Borrow a book",
            Self::Return => "Return a book",
            Self::Overdue => "List overdue books",
            Self::Popular => "Most borrowed books",
        };
        write!(f, "{}- {label}", self.number())
    }
}

#[instrument(skip_all)]
pub fn run(session: &Session) -> anyhow::Result<()> {
    let mut catalog = session.open_catalog()?;

    loop {
        print_menu();

        let number: u8 = Input::new().with_prompt("Your choice").interact_text()?;
        println!();

        let choice = match MenuChoice::try_from(number) {
            Ok(MenuChoice::Exit) => break,
            Ok(choice) => choice,
            Err(number) => {
                println!("{}", format!("{number} is not on the menu.").warning());
                continue;
            }
        };

        tracing::debug!("Menu choice: {choice:?}");
        run_choice(choice, &mut catalog, session)?;
    }

    Ok(())
}

fn print_menu() {
    println!();
    println!("{}", "Library Catalog".bold());
    println!(
        "{}",
        format!("(Borrowed books must be returned within {LOAN_PERIOD_DAYS} days)").dim()
    );
    println!();
    for choice in MenuChoice::ALL {
        println!("  {choice}");
    }
    println!();
}

fn run_choice(
    choice: MenuChoice,
    catalog: &mut Catalog,
    session: &Session,
) -> anyhow::Result<()> {
    let format = OutputFormat::Table;

    match choice {
        MenuChoice::AddBook => prompt_add(catalog)?,
        MenuChoice::ListAll => {
            let books: Vec<_> = catalog.books().iter().collect();
            print_books(&books, format, "The catalog is empty.")?;
        }
        MenuChoice::Search => {
            let query: String = Input::new()
                .with_prompt("Title or author to search for (empty lists every book)")
                .allow_empty(true)
                .interact_text()?;
            let books = catalog.search(&query, session.case_sensitivity(false));
            print_books(&books, format, &format!("No books match '{query}'."))?;
        }
        MenuChoice::Borrow => {
            let isbn = prompt_text("ISBN of the book to borrow")?;
            loan::borrow(catalog, &isbn)?;
        }
        MenuChoice::Return => {
            let isbn = prompt_text("ISBN of the book to return")?;
            loan::return_copy(catalog, &isbn)?;
        }
        MenuChoice::Overdue => print_books(&catalog.overdue(), format, "No overdue books.")?,
        MenuChoice::Popular => {
            let books = catalog.popular(session.config.popular_count());
            print_books(&books, format, "The catalog is empty.")?;
        }
        MenuChoice::Exit => {}
    }

    Ok(())
}

fn prompt_add(catalog: &mut Catalog) -> anyhow::Result<()> {
    println!("Enter the details of the new book:");
    let title = prompt_text("Title")?;
    let author = prompt_text("Author")?;

    println!("{}", "(the ISBN must be 13 digits and not already used)".dim());
    let isbn: String = Input::new()
        .with_prompt("ISBN")
        .validate_with(|candidate: &String| -> Result<(), String> {
            let validation = catalog.validate_isbn(candidate.trim());
            if validation.is_valid() {
                Ok(())
            } else {
                Err(validation.to_string())
            }
        })
        .interact_text()?;
    let isbn = Isbn::try_from(isbn.trim())?;

    let copies: u32 = Input::new().with_prompt("Number of copies").interact_text()?;

    add_book(catalog, Book::new(title, author, isbn, copies))
}

/// Ask for a line of text until something other than whitespace is entered.
fn prompt_text(prompt: &str) -> anyhow::Result<String> {
    let text: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("please enter a value")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(text.trim().to_string())
}
