//! Configuration for ompwatch
//!
//! Loaded once at startup from a TOML file (default `.ompwatch.toml` in the
//! current directory) and never mutated afterwards. Every component borrows
//! the same `Config`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{OmpwatchError, OmpwatchResult};

/// Default config file name, looked up in the current directory
pub const CONFIG_FILE_NAME: &str = ".ompwatch.toml";

/// Subdirectory of the server installation that watched files are copied into
pub const COMPONENTS_DIR: &str = "components";

fn default_entrypoint() -> String {
    "omp-server".to_string()
}

/// Server section: where the server lives and what to execute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server installation directory (contains the entrypoint and `components/`)
    pub directory: PathBuf,

    /// Executable file name inside the server directory
    #[serde(default = "default_entrypoint")]
    pub entrypoint: String,
}

/// Watcher section: what to watch and which files matter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// Directory monitored for edits (top-level only, no recursion)
    pub directory: PathBuf,

    /// File names (relative to `directory`) that trigger a sync + restart
    #[serde(deserialize_with = "deserialize_files")]
    pub files: Vec<String>,
}

/// Watched file list accepts both forms:
///
///   [watcher]
///   files = ["a.json", "b.json"]
///
///   [watcher]
///   files = "a.json,b.json"
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FileListDe {
    List(Vec<String>),
    Csv(String),
}

fn deserialize_files<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let files = match FileListDe::deserialize(deserializer)? {
        FileListDe::List(files) => files,
        FileListDe::Csv(csv) => csv.split(',').map(str::to_string).collect(),
    };
    Ok(files
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect())
}

/// Full ompwatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub watcher: WatcherConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A missing file or a missing/malformed key is fatal at startup, before
    /// any watching begins.
    pub fn load(path: &Path) -> OmpwatchResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OmpwatchError::ConfigNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                OmpwatchError::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| OmpwatchError::Config {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;

        config.validate(path)?;
        Ok(config)
    }

    /// Check that the configuration points at something usable.
    fn validate(&self, path: &Path) -> OmpwatchResult<()> {
        if !self.server.directory.is_dir() {
            return Err(OmpwatchError::DirectoryNotFound {
                path: self.server.directory.clone(),
            });
        }
        if !self.components_dir().is_dir() {
            return Err(OmpwatchError::DirectoryNotFound {
                path: self.components_dir(),
            });
        }
        if !self.watcher.directory.is_dir() {
            return Err(OmpwatchError::DirectoryNotFound {
                path: self.watcher.directory.clone(),
            });
        }
        if self.watcher.files.is_empty() {
            return Err(OmpwatchError::Config {
                path: path.to_path_buf(),
                message: "watcher.files must name at least one file".to_string(),
            });
        }
        Ok(())
    }

    /// Destination directory for watched files
    pub fn components_dir(&self) -> PathBuf {
        self.server.directory.join(COMPONENTS_DIR)
    }

    /// Full path to the server executable
    pub fn entrypoint_path(&self) -> PathBuf {
        self.server.directory.join(&self.server.entrypoint)
    }

    /// Check if a file name (relative to the watch directory) is watched
    pub fn is_watched(&self, name: &str) -> bool {
        self.watcher.files.iter().any(|f| f == name)
    }
}

/// Template written by `ompwatch init`
pub const CONFIG_TEMPLATE: &str = r#"# ompwatch configuration

[server]
# Server installation directory. Must contain the executable entry point
# and a `components` subdirectory.
directory = "./server"
entrypoint = "omp-server"

[watcher]
# Directory to watch for edits (top-level only).
directory = "./src"
# Files that trigger a sync + restart. Array or comma-separated string.
files = ["a.json", "b.json"]
"#;
