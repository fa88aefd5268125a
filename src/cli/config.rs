use std::path::Path;

use shelf::Config;
use tracing::instrument;

use super::{terminal::Colorize, Session};

#[derive(Debug, clap::Parser)]
/// Show or modify configuration settings
///
/// Available configuration keys:
///   `data_file`      Location of the catalog file
///   `popular_count`  Books shown by 'popular' (default: 5)
///   `ignore_case`    Case-insensitive search (default: false)
pub struct Command {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show all configuration values
    Show,

    /// Print the location of the catalog file
    Path,

    /// Set a configuration value
    ///
    /// Examples:
    ///   shelf config set `popular_count` 10
    ///   shelf config set `ignore_case` true
    Set {
        /// Configuration key to set
        key: String,

        /// Value to set
        value: String,
    },
}

impl Command {
    #[instrument(skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        match self.command {
            ConfigCommand::Show => {
                Self::show_config(session);
                Ok(())
            }
            ConfigCommand::Path => {
                println!("{}", session.data_file.display());
                Ok(())
            }
            ConfigCommand::Set { key, value } => Self::set_config(session, &key, &value),
        }
    }

    fn show_config(session: &Session) {
        let config = &session.config;

        println!("Configuration:");
        match &session.config_path {
            Some(path) if path.exists() => println!("  file: {}", path.display()),
            Some(path) => println!("  file: {} {}", path.display(), "(not created yet)".dim()),
            None => println!("  file: {}", "(no home directory)".dim()),
        }
        let data_file = config.configured_data_file().map_or_else(
            || format!("{} {}", config.data_file().display(), "(default)".dim()),
            |path| path.display().to_string(),
        );
        println!("  data_file: {data_file}");
        if session.data_file != config.data_file() {
            println!(
                "  {}",
                format!("overridden on the command line: {}", session.data_file.display()).dim()
            );
        }
        println!("  popular_count: {}", config.popular_count());
        println!("  ignore_case: {}", config.ignore_case);
    }

    fn set_config(session: &Session, key: &str, value: &str) -> anyhow::Result<()> {
        let Some(config_path) = session.config_path.as_deref() else {
            anyhow::bail!("No config file location available; pass one with --config");
        };

        let mut config = session.config.clone();
        apply(&mut config, key, value)?;
        save(&config, config_path)?;

        println!("{}", format!("✅ Set {key} = {value}").success());
        Ok(())
    }
}

/// Update one configuration key from its string form.
fn apply(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
    match key {
        "data_file" => {
            let path = if value.is_empty() {
                None
            } else {
                Some(value.into())
            };
            config.set_data_file(path);
        }
        "popular_count" => {
            let count = value
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("Value must be a non-negative whole number"))?;
            config.set_popular_count(count);
        }
        "ignore_case" => {
            config.ignore_case = value
                .parse::<bool>()
                .map_err(|_| anyhow::anyhow!("Value must be 'true' or 'false'"))?;
        }
        _ => {
            anyhow::bail!(
                "Unknown configuration key: '{key}'\n\nAvailable keys:\n  data_file\n  \
                 popular_count\n  ignore_case",
            );
        }
    }
    Ok(())
}

fn save(config: &Config, path: &Path) -> anyhow::Result<()> {
    config.save(path)?;
    tracing::info!("Saved configuration to {}", path.display());
    Ok(())
}
