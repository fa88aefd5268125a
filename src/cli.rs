use std::{
    io::{self, Write},
    path::PathBuf,
};

mod add;
mod config;
mod list;
mod loan;
mod menu;
mod render;
mod terminal;

use add::{Add, CheckIsbn};
use clap::ArgAction;
use list::{List, Overdue, Popular, Search, Show};
use loan::{Borrow, Return};
use shelf::{CaseSensitivity, Catalog, Config};
use tracing::instrument;

/// Reject blank command-line values.
fn non_empty(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Err("value must not be empty".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The catalog file to use, overriding the configured location
    #[arg(long, value_name = "PATH", global = true)]
    data_file: Option<PathBuf>,

    /// The configuration file to use
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let session = Session::new(self.config, self.data_file)?;

        self.command.unwrap_or(Command::Menu).run(&session)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = EnvFilter::from_default_env().add_directive(level.into());

        // logs go to stderr so that JSON output on stdout stays parseable
        let fmt_layer = tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Run the interactive menu (default)
    Menu,

    /// Add a book to the catalog
    Add(Add),

    /// List every book in the catalog
    List(List),

    /// Find books by title or author
    Search(Search),

    /// Show one book in detail
    Show(Show),

    /// Borrow a copy of a book
    ///
    /// The loan lasts 15 days from today.
    Borrow(Borrow),

    /// Return a borrowed copy of a book
    Return(Return),

    /// List books whose loan is past due
    Overdue(Overdue),

    /// List the most borrowed books
    Popular(Popular),

    /// Check whether an ISBN can be used for a new book
    CheckIsbn(CheckIsbn),

    /// Show or modify configuration settings
    Config(config::Command),
}

impl Command {
    fn run(self, session: &Session) -> anyhow::Result<()> {
        match self {
            Self::Menu => menu::run(session)?,
            Self::Add(command) => command.run(session)?,
            Self::List(command) => command.run(session)?,
            Self::Search(command) => command.run(session)?,
            Self::Show(command) => command.run(session)?,
            Self::Borrow(command) => command.run(session)?,
            Self::Return(command) => command.run(session)?,
            Self::Overdue(command) => command.run(session)?,
            Self::Popular(command) => command.run(session)?,
            Self::CheckIsbn(command) => command.run(session)?,
            Self::Config(command) => command.run(session)?,
        }
        Ok(())
    }
}

/// Settings resolved once per run and shared by every command.
#[derive(Debug)]
pub struct Session {
    config: Config,
    config_path: Option<PathBuf>,
    data_file: PathBuf,
}

impl Session {
    /// Resolve the configuration and catalog locations.
    ///
    /// An explicit `--config` file must exist. The default config file is
    /// optional.
    #[instrument]
    fn new(config_path: Option<PathBuf>, data_file: Option<PathBuf>) -> anyhow::Result<Self> {
        let (config, config_path) = match config_path {
            Some(path) => (Config::load(&path)?, Some(path)),
            None => match Config::default_path() {
                Some(path) => (Config::load_or_default(&path)?, Some(path)),
                None => (Config::default(), None),
            },
        };

        let data_file = data_file.unwrap_or_else(|| config.data_file());
        tracing::debug!("Using catalog file {}", data_file.display());

        Ok(Self {
            config,
            config_path,
            data_file,
        })
    }

    /// Load the catalog, creating it if this is the first run.
    ///
    /// The first-run notice goes to stderr; stdout carries only the command's
    /// own output.
    fn open_catalog(&self) -> anyhow::Result<Catalog> {
        self.open_catalog_noting(&mut io::stderr().lock())
    }

    fn open_catalog_noting(&self, notices: &mut impl Write) -> anyhow::Result<Catalog> {
        let existed = self.data_file.exists();
        let catalog = Catalog::open(&self.data_file)?;
        if !existed {
            writeln!(
                notices,
                "Created a new catalog at {} (you can delete it at any time)",
                catalog.path().display()
            )?;
        }
        Ok(catalog)
    }

    /// The search mode, given whether `--ignore-case` was passed.
    const fn case_sensitivity(&self, ignore_case: bool) -> CaseSensitivity {
        if ignore_case || self.config.ignore_case {
            CaseSensitivity::Insensitive
        } else {
            CaseSensitivity::Sensitive
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["shelf"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["shelf", "list", "--data-file", "books.json", "-vv"])
            .unwrap();
        assert_eq!(cli.data_file, Some(PathBuf::from("books.json")));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Command::List(_))));
    }

    #[test]
    fn blank_values_are_rejected() {
        assert!(non_empty("   ").is_err());
        assert_eq!(non_empty(" Dune ").unwrap(), "Dune");
    }

    #[test]
    fn session_prefers_explicit_data_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("config.toml");
        let mut config = Config::default();
        config.set_data_file(Some(tmp.path().join("configured.json")));
        config.save(&config_path).unwrap();

        let session = Session::new(Some(config_path.clone()), None).unwrap();
        assert_eq!(session.data_file, tmp.path().join("configured.json"));

        let explicit = tmp.path().join("explicit.json");
        let session = Session::new(Some(config_path), Some(explicit.clone())).unwrap();
        assert_eq!(session.data_file, explicit);
    }

    #[test]
    fn explicit_config_must_exist() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(Session::new(Some(tmp.path().join("missing.toml")), None).is_err());
    }

    #[test]
    fn first_run_notice_stays_out_of_json_output() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("config.toml");
        Config::default().save(&config_path).unwrap();
        let session =
            Session::new(Some(config_path), Some(tmp.path().join("books.json"))).unwrap();

        let mut notices = Vec::new();
        let catalog = session.open_catalog_noting(&mut notices).unwrap();
        assert!(String::from_utf8(notices)
            .unwrap()
            .starts_with("Created a new catalog at"));

        let mut stdout = Vec::new();
        let books: Vec<_> = catalog.books().iter().collect();
        render::write_json(&mut stdout, &books).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&stdout).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(6));

        let mut notices = Vec::new();
        session.open_catalog_noting(&mut notices).unwrap();
        assert!(notices.is_empty());
    }

    #[test]
    fn case_sensitivity_follows_flag_and_config() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("config.toml");
        Config::default().save(&config_path).unwrap();

        let mut session =
            Session::new(Some(config_path), Some(tmp.path().join("books.json"))).unwrap();
        assert_eq!(session.case_sensitivity(false), CaseSensitivity::Sensitive);
        assert_eq!(session.case_sensitivity(true), CaseSensitivity::Insensitive);

        session.config.ignore_case = true;
        assert_eq!(session.case_sensitivity(false), CaseSensitivity::Insensitive);
    }
}
