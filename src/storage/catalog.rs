//! A file-backed catalog of books
//!
//! The [`Catalog`] keeps every book in memory, in insertion order, and writes
//! the whole collection back to a single JSON file after each change.

use std::{
    fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;

use crate::{
    domain::{
        book::today,
        isbn::{format_problems, IsbnProblem},
        Book, Isbn, IsbnValidation, LoanError,
    },
    storage::record::{BookRecord, RecordError, StoredRecord},
};

/// How [`Catalog::search`] compares the query against titles and authors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseSensitivity {
    /// The query must match exactly, including letter case.
    #[default]
    Sensitive,
    /// Letter case is ignored.
    Insensitive,
}

/// An ordered collection of books persisted to a JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// The location of the catalog file.
    path: PathBuf,
    books: Vec<Book>,
}

impl Catalog {
    /// Opens the catalog stored at `path`.
    ///
    /// If the file exists it is loaded. Otherwise a new catalog is created,
    /// seeded with a small set of default books, and written to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, if
    /// any stored book is invalid, or if a new catalog cannot be written.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let path = path.into();

        if path.exists() {
            let books = read_books(&path)?;
            tracing::debug!("Loaded {} books from {}", books.len(), path.display());
            Ok(Self { path, books })
        } else {
            let catalog = Self {
                path,
                books: default_books()?,
            };
            catalog.save()?;
            tracing::info!(
                "Created new catalog at {} with {} books",
                catalog.path.display(),
                catalog.books.len()
            );
            Ok(catalog)
        }
    }

    /// The location of the catalog file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every book, in the order it was added.
    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// The number of books in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Returns `true` if the catalog holds no books.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Looks up a book by ISBN.
    #[must_use]
    pub fn get(&self, isbn: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.isbn.as_str() == isbn)
    }

    /// Add a book to the end of the catalog and save.
    ///
    /// The book is not validated; call [`Catalog::validate_isbn`] first to
    /// keep ISBNs unique.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be saved. The book is not added
    /// in that case.
    pub fn add(&mut self, book: Book) -> Result<(), SaveError> {
        self.books.push(book);

        if let Err(e) = self.save() {
            self.books.pop();
            return Err(e);
        }

        if let Some(book) = self.books.last() {
            tracing::info!("Added book: {} ({})", book.title, book.isbn);
        }
        Ok(())
    }

    /// The `n` most borrowed books, most borrowed first.
    ///
    /// Books with equal borrow counts keep their catalog order. Fewer than `n`
    /// books are returned if the catalog is smaller.
    #[must_use]
    pub fn popular(&self, n: usize) -> Vec<&Book> {
        let mut books: Vec<&Book> = self.books.iter().collect();
        books.sort_by(|a, b| b.borrowed_count.cmp(&a.borrowed_count));
        books.truncate(n);
        books
    }

    /// Books whose title or author contains `query`.
    #[must_use]
    pub fn search(&self, query: &str, case: CaseSensitivity) -> Vec<&Book> {
        match case {
            CaseSensitivity::Sensitive => self
                .books
                .iter()
                .filter(|book| book.title.contains(query) || book.author.contains(query))
                .collect(),
            CaseSensitivity::Insensitive => {
                let query = query.to_lowercase();
                self.books
                    .iter()
                    .filter(|book| {
                        book.title.to_lowercase().contains(&query)
                            || book.author.to_lowercase().contains(&query)
                    })
                    .collect()
            }
        }
    }

    /// Checks whether `candidate` can be used as the ISBN of a new book.
    ///
    /// Length, digits and uniqueness are checked independently and every
    /// failing rule is reported.
    #[must_use]
    pub fn validate_isbn(&self, candidate: &str) -> IsbnValidation {
        let mut problems = format_problems(candidate);
        if self.is_duplicate_isbn(candidate) {
            problems.push(IsbnProblem::AlreadyUsed);
        }
        IsbnValidation::new(problems)
    }

    /// Returns `true` if a book in the catalog already uses `candidate`.
    #[must_use]
    pub fn is_duplicate_isbn(&self, candidate: &str) -> bool {
        self.get(candidate).is_some()
    }

    /// Lend out one copy of the book with the given ISBN and save.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] if no book has that ISBN
    /// - [`CatalogError::Loan`] if no copy is available
    /// - [`CatalogError::Save`] if the catalog cannot be saved, in which case
    ///   the borrow is undone
    pub fn borrow(&mut self, isbn: &str) -> Result<&Book, CatalogError> {
        self.borrow_on(isbn, today())
    }

    /// As [`Catalog::borrow`], with the loan starting on `date`.
    ///
    /// # Errors
    ///
    /// See [`Catalog::borrow`].
    pub fn borrow_on(&mut self, isbn: &str, date: NaiveDate) -> Result<&Book, CatalogError> {
        let book = self.update(isbn, |book| book.borrow_on(date))?;
        tracing::info!("Borrowed: {} ({})", book.title, book.isbn);
        Ok(book)
    }

    /// Take back one copy of the book with the given ISBN and save.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] if no book has that ISBN
    /// - [`CatalogError::Loan`] if no copy is on loan
    /// - [`CatalogError::Save`] if the catalog cannot be saved, in which case
    ///   the return is undone
    pub fn return_copy(&mut self, isbn: &str) -> Result<&Book, CatalogError> {
        let book = self.update(isbn, Book::return_copy)?;
        tracing::info!("Returned: {} ({})", book.title, book.isbn);
        Ok(book)
    }

    /// Books whose current loan is past due.
    #[must_use]
    pub fn overdue(&self) -> Vec<&Book> {
        self.overdue_on(today())
    }

    /// Books whose current loan was due strictly before `date`.
    #[must_use]
    pub fn overdue_on(&self, date: NaiveDate) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|book| book.is_overdue_on(date))
            .collect()
    }

    /// Write the whole catalog to its file.
    ///
    /// The data is written to a temporary file next to the catalog which then
    /// replaces it, so readers never see a partially written catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be serialized or written.
    pub fn save(&self) -> Result<(), SaveError> {
        let records: Vec<BookRecord> = self.books.iter().map(BookRecord::from).collect();
        write_atomically(&self.path, &records)?;
        tracing::debug!("Saved {} books to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Apply `change` to one book, then save, undoing the change if the save
    /// fails.
    fn update<F>(&mut self, isbn: &str, change: F) -> Result<&Book, CatalogError>
    where
        F: FnOnce(&mut Book) -> Result<(), LoanError>,
    {
        let index = self
            .books
            .iter()
            .position(|book| book.isbn.as_str() == isbn)
            .ok_or_else(|| CatalogError::NotFound(isbn.to_string()))?;

        let previous = self.books[index].clone();
        change(&mut self.books[index])?;

        if let Err(e) = self.save() {
            tracing::warn!("Failed to save catalog, reverting change to {isbn}");
            self.books[index] = previous;
            return Err(e.into());
        }

        Ok(&self.books[index])
    }
}

fn read_books(path: &Path) -> Result<Vec<Book>, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<StoredRecord> =
        serde_json::from_str(&content).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            Book::try_from(record).map_err(|source| LoadError::Record { index, source })
        })
        .collect()
}

fn write_atomically(path: &Path, records: &[BookRecord]) -> Result<(), SaveError> {
    let io_error = |source: io::Error| SaveError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_error)?;

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.write_all(b"\n").map_err(io_error)?;
        writer.flush().map_err(io_error)?;
    }
    file.persist(path).map_err(|e| io_error(e.error))?;

    Ok(())
}

/// The books a new catalog starts with: title, author, ISBN, copies.
const DEFAULT_BOOKS: [(&str, &str, &str, u32); 6] = [
    ("Sineklerin Tanrısı", "William Golding", "9789750719383", 10),
    ("1984", "George Orwell", "9789753429986", 15),
    ("Suç ve Ceza", "Fyodor Dostoyevski", "9789754584085", 20),
    ("Savaş ve Barış", "Lev Tolstoy", "9789754584092", 25),
    ("Yüzüklerin Efendisi", "J.R.R. Tolkien", "9789754584108", 30),
    ("Harry Potter ve Felsefe Taşı", "J.K. Rowling", "9789754584115", 15),
];

fn default_books() -> Result<Vec<Book>, LoadError> {
    DEFAULT_BOOKS
        .iter()
        .enumerate()
        .map(|(index, &(title, author, isbn, copies))| {
            let isbn = Isbn::try_from(isbn).map_err(|e| LoadError::Record {
                index,
                source: e.into(),
            })?;
            Ok(Book::new(title, author, isbn, copies))
        })
        .collect()
}

/// Errors that can occur when opening a catalog.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The catalog file could not be read.
    #[error("failed to read catalog file {}", .path.display())]
    Io {
        /// The catalog file location.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// The catalog file is not valid JSON, or not a list of books.
    #[error("failed to parse catalog file {}", .path.display())]
    Json {
        /// The catalog file location.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
    /// A stored book is invalid.
    #[error("book #{} in the catalog file is invalid", .index + 1)]
    Record {
        /// Zero-based position of the book in the file.
        index: usize,
        /// What is wrong with it.
        source: RecordError,
    },
    /// A new catalog could not be written.
    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Errors that can occur when saving a catalog.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The catalog file could not be written.
    #[error("failed to write catalog file {}", .path.display())]
    Io {
        /// The catalog file location.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// The catalog could not be serialized.
    #[error("failed to serialize catalog")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when borrowing or returning a book.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// No book has the requested ISBN.
    #[error("no book with ISBN {0}")]
    NotFound(String),
    /// The book's state does not allow the operation.
    #[error(transparent)]
    Loan(#[from] LoanError),
    /// The change could not be saved and was undone.
    #[error(transparent)]
    Save(#[from] SaveError),
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn isbn(s: &str) -> Isbn {
        Isbn::try_from(s).unwrap()
    }

    /// A catalog in a fresh directory, emptied of the default books.
    fn empty_catalog() -> (TempDir, Catalog) {
        let tmp = TempDir::new().unwrap();
        let mut catalog = Catalog::open(tmp.path().join("books.json")).unwrap();
        catalog.books.clear();
        catalog.save().unwrap();
        (tmp, catalog)
    }

    fn catalog_with(books: &[(&str, &str, &str, u32)]) -> (TempDir, Catalog) {
        let (tmp, mut catalog) = empty_catalog();
        for &(title, author, id, copies) in books {
            catalog.add(Book::new(title, author, isbn(id), copies)).unwrap();
        }
        (tmp, catalog)
    }

    fn titles<'a>(books: &[&'a Book]) -> Vec<&'a str> {
        books.iter().map(|book| book.title()).collect()
    }

    #[test]
    fn open_missing_file_seeds_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("lib_data.json");

        let catalog = Catalog::open(&path).unwrap();

        assert!(path.exists());
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.books()[0].title(), "Sineklerin Tanrısı");
        assert_eq!(catalog.books()[5].isbn().as_str(), "9789754584115");
        assert!(catalog.books().iter().all(|book| book.borrowed_count() == 0));
    }

    #[test]
    fn every_default_book_is_seeded() {
        let books = default_books().unwrap();

        assert_eq!(books.len(), DEFAULT_BOOKS.len());
        for (book, &(title, _, isbn, copies)) in books.iter().zip(&DEFAULT_BOOKS) {
            assert_eq!(book.title(), title);
            assert_eq!(book.isbn().as_str(), isbn);
            assert_eq!(book.copy_count(), copies);
        }
    }

    #[test]
    fn open_creates_missing_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a").join("b").join("books.json");

        Catalog::open(&path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn save_then_open_round_trips() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("books.json");

        let mut catalog = Catalog::open(&path).unwrap();
        catalog.borrow_on("9789753429986", date(2024, 6, 1)).unwrap();
        catalog.borrow_on("9789753429986", date(2024, 6, 2)).unwrap();
        catalog
            .add(Book::new("Dune", "Frank Herbert", isbn("9780441013593"), 2))
            .unwrap();

        let reopened = Catalog::open(&path).unwrap();

        assert_eq!(reopened, catalog);
        assert_eq!(reopened.books()[0].borrow_date(), None);
        assert_eq!(reopened.books()[0].due_date(), None);
        assert_eq!(reopened.books()[6].title(), "Dune");
    }

    #[test]
    fn open_reads_legacy_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("lib_data.json");
        fs::write(
            &path,
            r#"[
                {
                    "Title": "1984",
                    "Author": "George Orwell",
                    "ISBN": "9789753429986",
                    "CopyCount": 15,
                    "BorrowedCount": 1,
                    "BorrowDate": "2024-01-01T00:00:00",
                    "DueDate": "2024-01-16T00:00:00"
                },
                {
                    "Title": "Suç ve Ceza",
                    "Author": "Fyodor Dostoyevski",
                    "ISBN": "9789754584085",
                    "CopyCount": 20,
                    "BorrowedCount": 0,
                    "BorrowDate": "9999-12-31T23:59:59.9999999",
                    "DueDate": "9999-12-31T23:59:59.9999999"
                }
            ]"#,
        )
        .unwrap();

        let catalog = Catalog::open(&path).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.books()[0].due_date(), Some(date(2024, 1, 16)));
        assert_eq!(catalog.books()[1].due_date(), None);
        assert_eq!(titles(&catalog.overdue_on(date(2024, 2, 1))), vec!["1984"]);
    }

    #[test]
    fn open_rejects_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("books.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            Catalog::open(&path),
            Err(LoadError::Json { .. })
        ));
    }

    #[test]
    fn open_names_invalid_record() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("books.json");
        fs::write(
            &path,
            r#"[
                {"_version": "1", "title": "A", "author": "B", "isbn": "1234567890123",
                 "copy_count": 1, "borrowed_count": 0},
                {"_version": "1", "title": "C", "author": "D", "isbn": "1234567890124",
                 "copy_count": 1, "borrowed_count": 3}
            ]"#,
        )
        .unwrap();

        let error = Catalog::open(&path).unwrap_err();
        assert!(matches!(error, LoadError::Record { index: 1, .. }));
        assert_eq!(error.to_string(), "book #2 in the catalog file is invalid");
    }

    #[test]
    fn add_appends_and_persists() {
        let (tmp, mut catalog) = empty_catalog();

        catalog
            .add(Book::new("Dune", "Frank Herbert", isbn("9780441013593"), 2))
            .unwrap();

        let reopened = Catalog::open(tmp.path().join("books.json")).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.books()[0].author(), "Frank Herbert");
    }

    #[test]
    fn add_is_undone_when_save_fails() {
        let (tmp, mut catalog) = empty_catalog();
        // a directory where the catalog file should be makes the rename fail
        let path = tmp.path().join("blocked");
        fs::create_dir_all(path.join("child")).unwrap();
        catalog.path = path;

        let result = catalog.add(Book::new("Dune", "Frank Herbert", isbn("9780441013593"), 2));

        assert!(matches!(result, Err(SaveError::Io { .. })));
        assert!(catalog.is_empty());
    }

    #[test]
    fn isbn_validation_accepts_fresh_isbn() {
        let (_tmp, catalog) = catalog_with(&[("A", "B", "9789753429986", 1)]);

        let validation = catalog.validate_isbn("1234567890123");

        assert!(validation.is_valid());
        assert!(validation.reasons().is_empty());
    }

    #[test]
    fn isbn_validation_reports_each_rule() {
        let (_tmp, catalog) = catalog_with(&[("A", "B", "9789753429986", 1)]);

        assert_eq!(
            catalog.validate_isbn("12345").reasons(),
            vec!["must be 13 digits"]
        );
        assert_eq!(
            catalog.validate_isbn("12345678901AB").reasons(),
            vec!["must be numeric"]
        );
        assert_eq!(
            catalog.validate_isbn("9789753429986").reasons(),
            vec!["already used"]
        );
    }

    #[test]
    fn isbn_validation_reports_all_rules_at_once() {
        // a well-formed catalog cannot hold a malformed ISBN, so force one in
        let (_tmp, mut catalog) = empty_catalog();
        let mut book = Book::new("A", "B", isbn("1234567890123"), 1);
        book.isbn = Isbn::new_unchecked("12AB5");
        catalog.books.push(book);

        let validation = catalog.validate_isbn("12AB5");

        assert!(!validation.is_valid());
        assert_eq!(
            validation.problems(),
            &[
                IsbnProblem::WrongLength,
                IsbnProblem::NotNumeric,
                IsbnProblem::AlreadyUsed
            ]
        );
    }

    #[test]
    fn duplicate_isbn_detection() {
        let (_tmp, catalog) = catalog_with(&[("A", "B", "9789753429986", 1)]);
        assert!(catalog.is_duplicate_isbn("9789753429986"));
        assert!(!catalog.is_duplicate_isbn("9789753429987"));
    }

    #[test]
    fn popular_clamps_to_catalog_size() {
        let (_tmp, mut catalog) = catalog_with(&[
            ("Low", "A", "1000000000001", 5),
            ("High", "B", "1000000000002", 5),
            ("Mid", "C", "1000000000003", 5),
        ]);
        let day = date(2024, 1, 1);
        for _ in 0..3 {
            catalog.borrow_on("1000000000002", day).unwrap();
        }
        catalog.borrow_on("1000000000003", day).unwrap();
        catalog.borrow_on("1000000000003", day).unwrap();

        let popular = catalog.popular(5);

        assert_eq!(titles(&popular), vec!["High", "Mid", "Low"]);
    }

    #[test]
    fn popular_ties_keep_catalog_order() {
        let (_tmp, mut catalog) = catalog_with(&[
            ("First", "A", "1000000000001", 5),
            ("Second", "B", "1000000000002", 5),
            ("Third", "C", "1000000000003", 5),
            ("Fourth", "D", "1000000000004", 5),
        ]);
        let day = date(2024, 1, 1);
        catalog.borrow_on("1000000000004", day).unwrap();
        catalog.borrow_on("1000000000002", day).unwrap();

        assert_eq!(titles(&catalog.popular(3)), vec!["Second", "Fourth", "First"]);
        assert!(catalog.popular(0).is_empty());
    }

    #[test]
    fn search_matches_title_or_author() {
        let (_tmp, catalog) = catalog_with(&[
            ("1984", "George Orwell", "1000000000001", 1),
            ("Animal Farm", "George Orwell", "1000000000002", 1),
            ("Dune", "Frank Herbert", "1000000000003", 1),
        ]);

        assert_eq!(
            titles(&catalog.search("Orwell", CaseSensitivity::Sensitive)),
            vec!["1984", "Animal Farm"]
        );
        assert_eq!(
            titles(&catalog.search("Dun", CaseSensitivity::Sensitive)),
            vec!["Dune"]
        );
        assert!(catalog.search("Tolkien", CaseSensitivity::Sensitive).is_empty());
    }

    #[test]
    fn empty_query_matches_every_book() {
        let (_tmp, catalog) = catalog_with(&[
            ("1984", "George Orwell", "1000000000001", 1),
            ("Dune", "Frank Herbert", "1000000000003", 1),
        ]);

        for case in [CaseSensitivity::Sensitive, CaseSensitivity::Insensitive] {
            assert_eq!(titles(&catalog.search("", case)), vec!["1984", "Dune"]);
        }
    }

    #[test]
    fn search_case_sensitivity() {
        let (_tmp, catalog) = catalog_with(&[("Dune", "Frank Herbert", "1000000000003", 1)]);

        assert!(catalog.search("dune", CaseSensitivity::Sensitive).is_empty());
        assert_eq!(
            titles(&catalog.search("dune", CaseSensitivity::Insensitive)),
            vec!["Dune"]
        );
        assert_eq!(
            titles(&catalog.search("HERBERT", CaseSensitivity::Insensitive)),
            vec!["Dune"]
        );
    }

    #[test]
    fn borrow_and_return_persist() {
        let (tmp, mut catalog) = catalog_with(&[("Dune", "Frank Herbert", "1000000000003", 2)]);
        let path = tmp.path().join("books.json");

        let book = catalog.borrow_on("1000000000003", date(2024, 3, 1)).unwrap();
        assert_eq!(book.borrowed_count(), 1);
        assert_eq!(book.due_date(), Some(date(2024, 3, 16)));
        assert_eq!(Catalog::open(&path).unwrap().books()[0].borrowed_count(), 1);

        let book = catalog.return_copy("1000000000003").unwrap();
        assert_eq!(book.borrowed_count(), 0);
        assert_eq!(book.due_date(), None);
        assert_eq!(Catalog::open(&path).unwrap().books()[0].borrowed_count(), 0);
    }

    #[test]
    fn unknown_isbn_is_not_found() {
        let (_tmp, mut catalog) = empty_catalog();

        assert!(matches!(
            catalog.borrow("1234567890123"),
            Err(CatalogError::NotFound(isbn)) if isbn == "1234567890123"
        ));
        assert!(matches!(
            catalog.return_copy("1234567890123"),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn loan_conditions_are_reported() {
        let (_tmp, mut catalog) = catalog_with(&[("Dune", "Frank Herbert", "1000000000003", 1)]);

        assert!(matches!(
            catalog.return_copy("1000000000003"),
            Err(CatalogError::Loan(LoanError::NothingToReturn))
        ));

        catalog.borrow("1000000000003").unwrap();
        assert!(matches!(
            catalog.borrow("1000000000003"),
            Err(CatalogError::Loan(LoanError::Unavailable))
        ));
        assert_eq!(catalog.books()[0].borrowed_count(), 1);
    }

    #[test]
    fn borrow_is_undone_when_save_fails() {
        let (tmp, mut catalog) = catalog_with(&[("Dune", "Frank Herbert", "1000000000003", 1)]);
        let path = tmp.path().join("blocked");
        fs::create_dir_all(path.join("child")).unwrap();
        catalog.path = path;

        let result = catalog.borrow("1000000000003");

        assert!(matches!(result, Err(CatalogError::Save(_))));
        assert_eq!(catalog.books()[0].borrowed_count(), 0);
        assert_eq!(catalog.books()[0].due_date(), None);
    }

    #[test]
    fn fresh_catalog_has_nothing_overdue() {
        let tmp = TempDir::new().unwrap();
        let catalog = Catalog::open(tmp.path().join("books.json")).unwrap();

        assert!(catalog.overdue().is_empty());
    }

    #[test]
    fn overdue_lists_only_past_due_books() {
        let (_tmp, mut catalog) = catalog_with(&[
            ("Old loan", "A", "1000000000001", 1),
            ("Recent loan", "B", "1000000000002", 1),
            ("On shelf", "C", "1000000000003", 1),
        ]);
        let today = date(2024, 6, 30);
        catalog.borrow_on("1000000000001", date(2024, 6, 1)).unwrap();
        catalog.borrow_on("1000000000002", date(2024, 6, 15)).unwrap();

        // the recent loan is due on the 30th, so not yet overdue
        assert_eq!(titles(&catalog.overdue_on(today)), vec!["Old loan"]);
        assert!(catalog.overdue_on(date(2024, 6, 16)).is_empty());
    }

    #[test]
    fn back_dated_borrow_shows_as_overdue_today() {
        let (_tmp, mut catalog) = catalog_with(&[("Dune", "Frank Herbert", "1000000000003", 1)]);
        let long_ago = today() - chrono::Days::new(30);

        catalog.borrow_on("1000000000003", long_ago).unwrap();

        assert_eq!(titles(&catalog.overdue()), vec!["Dune"]);
    }
}
