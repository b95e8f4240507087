use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::io::store_io::atomic_write;
use crate::model::config::ConfigFile;

/// File name used when nothing else says where the todo file lives
pub const DEFAULT_TODO_FILE: &str = "todo.txt";

/// Error type for configuration I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not edit {path}: {source}")]
    EditError {
        path: PathBuf,
        source: toml_edit::TomlError,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where the resolved todo path came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSource {
    /// `--file` on the command line
    Override,
    /// `todo.file` in the given config file
    Config(PathBuf),
    /// Built-in `~/todo.txt`
    Default,
}

impl fmt::Display for PathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSource::Override => write!(f, "--file"),
            PathSource::Config(path) => write!(f, "{}", path.display()),
            PathSource::Default => write!(f, "built-in default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: PathBuf,
    pub source: PathSource,
}

/// Get the config file path, respecting XDG_CONFIG_HOME
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    config_dir.join("tdx").join("config.toml")
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read the config from a specific path. A missing file is an empty config.
pub fn read_config_from(path: &Path) -> Result<ConfigFile, ConfigError> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Resolve the todo file: explicit override, then persisted config, then
/// `~/todo.txt`
pub fn resolve_todo_path(
    override_path: Option<&str>,
    config: &ConfigFile,
    config_file: &Path,
) -> ResolvedPath {
    resolve_with_home(override_path, config, config_file, &dirs_home())
}

fn resolve_with_home(
    override_path: Option<&str>,
    config: &ConfigFile,
    config_file: &Path,
    home: &Path,
) -> ResolvedPath {
    if let Some(path) = override_path {
        return ResolvedPath {
            path: expand_home(path, home),
            source: PathSource::Override,
        };
    }
    if let Some(path) = config.todo.file.as_deref()
        && !path.trim().is_empty()
    {
        return ResolvedPath {
            path: expand_home(path.trim(), home),
            source: PathSource::Config(config_file.to_path_buf()),
        };
    }
    ResolvedPath {
        path: home.join(DEFAULT_TODO_FILE),
        source: PathSource::Default,
    }
}

fn expand_home(path: &str, home: &Path) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None if path == "~" => home.to_path_buf(),
        None => PathBuf::from(path),
    }
}

/// Persist `todo.file`, keeping every other key and comment in the file
pub fn set_todo_file(config_file: &Path, todo_file: &str) -> Result<(), ConfigError> {
    let text = match fs::read_to_string(config_file) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: config_file.to_path_buf(),
                source: e,
            });
        }
    };
    let mut doc: toml_edit::DocumentMut =
        text.parse().map_err(|e| ConfigError::EditError {
            path: config_file.to_path_buf(),
            source: e,
        })?;

    if !doc.contains_key("todo") {
        doc["todo"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["todo"]["file"] = toml_edit::value(todo_file);

    let write_err = |e: std::io::Error| ConfigError::WriteError {
        path: config_file.to_path_buf(),
        source: e,
    };
    if let Some(parent) = config_file.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    atomic_write(config_file, doc.to_string().as_bytes()).map_err(write_err)?;
    tracing::info!(config = %config_file.display(), todo_file, "saved todo file path");
    Ok(())
}
