// Centralized error handling for file search
// Every variant carries enough context to print a useful diagnostic on its own

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the search library
///
/// Only `InvalidPattern`, the config errors and `Prompt` stop an invocation.
/// `ListingFailure` is collected per directory while the walk keeps going.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The pattern cannot be classified
    #[error("Invalid pattern \"{pattern}\": {reason}\nSuggestion: Use \"*.ext\", \"name.*\", \"*.*\" or an exact file name")]
    InvalidPattern { pattern: String, reason: String },

    /// Directory vanished or never existed
    #[error("Directory not found: {}\nSuggestion: Check that the directory path is correct and the directory exists", .path.display())]
    DirectoryNotFound { path: PathBuf },

    /// Directory exists but could not be listed
    #[error("Failed to list directory {} (error code {}): {source}\nSuggestion: Check directory permissions or run with appropriate privileges", .path.display(), code_label(.code))]
    ListingFailure {
        path: PathBuf,
        code: Option<i32>,
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Failed to read config {}: {reason}\nSuggestion: Check that the config file is readable", .path.display())]
    ConfigRead { path: PathBuf, reason: String },

    #[error("Error parsing config {}: {reason}\nSuggestion: Check the TOML syntax and the option names", .path.display())]
    ConfigParse { path: PathBuf, reason: String },

    /// Interactive input errors
    #[error("Failed to read input: {reason}\nSuggestion: Pass the directory and pattern as arguments")]
    Prompt { reason: String },
}

fn code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unknown".to_string(),
    }
}

impl SearchError {
    /// Classify an I/O error raised while listing `path`
    ///
    /// `NotFound` becomes `DirectoryNotFound` so the walker can tell the silent
    /// case apart from real failures.
    pub fn from_io_error(err: io::Error, path: PathBuf) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => SearchError::DirectoryNotFound { path },
            _ => SearchError::ListingFailure {
                path,
                code: err.raw_os_error(),
                source: err,
            },
        }
    }

    /// True for errors the walker swallows without reporting
    pub fn is_not_found(&self) -> bool {
        matches!(self, SearchError::DirectoryNotFound { .. })
    }

    /// OS error code for listing failures, if the platform supplied one
    pub fn os_code(&self) -> Option<i32> {
        match self {
            SearchError::ListingFailure { code, .. } => *code,
            _ => None,
        }
    }
}
