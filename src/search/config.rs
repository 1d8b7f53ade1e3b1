// Search configuration
// Loaded from `<config_dir>/file-search/config.toml`; every field is optional

use super::error::SearchError;
use super::pattern::DotRule;
use super::walker::SearchOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User-level defaults, overridable from the command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Where file names are split into base name and extension
    pub dot_rule: DotRule,
    /// Visit dot-files and dot-directories
    pub include_hidden: bool,
    /// Sort matches instead of printing them in listing order
    pub sort_results: bool,
    /// Wait for Enter before the CLI exits
    pub pause_on_exit: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            dot_rule: DotRule::First,
            include_hidden: true,
            sort_results: false,
            pause_on_exit: false,
        }
    }
}

impl SearchConfig {
    /// Default config file location, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("file-search").join("config.toml"))
    }

    /// Load from `path`, or from the default location when `path` is `None`
    ///
    /// A missing file is not an error and yields the defaults. An explicitly
    /// given path that does not exist is reported as `ConfigRead`.
    pub fn load(path: Option<&Path>) -> Result<Self, SearchError> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::load_from(&path),
                Some(path) => {
                    tracing::debug!("No config file at {}, using defaults", path.display());
                    Ok(Self::default())
                }
                None => Ok(Self::default()),
            },
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, SearchError> {
        let content = fs::read_to_string(path).map_err(|e| SearchError::ConfigRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, SearchError> {
        toml::from_str(content).map_err(|e| SearchError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            include_hidden: self.include_hidden,
            sort_results: self.sort_results,
        }
    }
}
