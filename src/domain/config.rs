use std::path::{Path, PathBuf};

use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};

/// File name of the catalog when no location is configured.
pub const DEFAULT_DATA_FILE_NAME: &str = "lib_data.json";

/// Configuration for the catalog manager.
///
/// Controls where the catalog is stored and how queries behave by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Explicit location of the catalog file.
    ///
    /// When unset, the catalog lives in the user's documents directory.
    data_file: Option<PathBuf>,

    /// How many books the popularity listing shows by default.
    popular_count: usize,

    /// Whether searches ignore letter case by default.
    pub ignore_case: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            popular_count: default_popular_count(),
            ignore_case: false,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the configuration, falling back to defaults if the file does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// Parent directories are created if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        let write = |path: &Path| -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)
        };
        write(path).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The default location of the configuration file.
    ///
    /// Returns `None` if no home directory can be determined.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The explicitly configured catalog location, if any.
    #[must_use]
    pub fn configured_data_file(&self) -> Option<&Path> {
        self.data_file.as_deref()
    }

    /// Sets an explicit catalog location.
    pub fn set_data_file(&mut self, path: Option<PathBuf>) {
        self.data_file = path;
    }

    /// The catalog location to use.
    ///
    /// This is the configured `data_file` if set, otherwise
    /// [`DEFAULT_DATA_FILE_NAME`] in the user's documents directory, the
    /// per-user data directory, or the current directory, in that order.
    #[must_use]
    pub fn data_file(&self) -> PathBuf {
        self.data_file.clone().unwrap_or_else(default_data_file)
    }

    /// Returns the default number of books in the popularity listing.
    #[must_use]
    pub const fn popular_count(&self) -> usize {
        self.popular_count
    }

    /// Sets the default number of books in the popularity listing.
    pub const fn set_popular_count(&mut self, count: usize) {
        self.popular_count = count;
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "library-catalog")
}

fn default_data_file() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(Path::to_path_buf))
        .or_else(|| project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DATA_FILE_NAME)
}

const fn default_popular_count() -> usize {
    5
}

/// Errors that can occur when reading or writing the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {}", .path.display())]
    Read {
        /// The config file location.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid configuration TOML.
    #[error("failed to parse config file {}", .path.display())]
    Parse {
        /// The config file location.
        path: PathBuf,
        /// The underlying TOML error.
        source: toml::de::Error,
    },
    /// The configuration could not be serialized.
    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
    /// The file could not be written.
    #[error("failed to write config file {}", .path.display())]
    Write {
        /// The config file location.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data_file: Option<PathBuf>,

        #[serde(default = "default_popular_count")]
        popular_count: usize,

        #[serde(default)]
        ignore_case: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                data_file,
                popular_count,
                ignore_case,
            } => Self {
                data_file,
                popular_count,
                ignore_case,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            data_file: config.data_file,
            popular_count: config.popular_count,
            ignore_case: config.ignore_case,
        }
    }
}
