// File search core
// Pattern classification, directory listing backends and the tree walker

pub mod config;
pub mod error;
pub mod listing;
pub mod pattern;
pub mod walker;

// Re-export commonly used types for convenience
pub use config::SearchConfig;
pub use error::SearchError;
pub use listing::{DirLister, EntryKind, ListedEntry, LocalLister, MemoryLister};
pub use pattern::{DotRule, Pattern, PatternMode};
pub use walker::{find_files, FileSearch, SearchOptions, SearchReport};
