// Directory tree walker
// Depth-first descent over a DirLister, filtering regular files by a Pattern

use super::error::SearchError;
use super::listing::{DirLister, EntryKind, ListedEntry, LocalLister};
use super::pattern::Pattern;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use std::vec;

/// Outcome of a single search
#[derive(Debug, serde::Serialize)]
pub struct SearchReport {
    #[serde(serialize_with = "serialize_path")]
    pub root: PathBuf,
    pub pattern: String,
    /// Matching paths in discovery order (sorted only when requested)
    #[serde(serialize_with = "serialize_paths")]
    pub files: Vec<PathBuf>,
    /// Directories that could not be listed; the walk went on without them
    #[serde(serialize_with = "serialize_errors")]
    pub errors: Vec<SearchError>,
    pub directories_scanned: usize,
    #[serde(serialize_with = "serialize_duration")]
    pub duration: Duration,
}

impl SearchReport {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

// Helper function to serialize Duration as seconds
fn serialize_duration<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}

// Paths that are not valid UTF-8 are written lossily rather than failing the report
fn serialize_path<S>(path: &Path, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&path.to_string_lossy())
}

fn serialize_paths<S>(paths: &[PathBuf], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(paths.iter().map(|p| p.to_string_lossy()))
}

fn serialize_errors<S>(errors: &[SearchError], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(errors.iter().map(|e| e.to_string()))
}

/// Walker knobs that are not part of the pattern itself
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Visit entries whose name starts with `.`
    pub include_hidden: bool,
    /// Sort `files` once the walk is done instead of keeping listing order
    pub sort_results: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            include_hidden: true,
            sort_results: false,
        }
    }
}

/// One open directory on the explicit stack
struct Frame {
    dir: PathBuf,
    entries: vec::IntoIter<ListedEntry>,
}

/// Recursive file search over any `DirLister`
///
/// The walk uses an explicit stack of per-directory iterators instead of
/// native recursion, so tree depth is bounded by heap rather than call stack.
/// Files come out in the same pre-order a recursive walk would produce.
pub struct FileSearch<L: DirLister> {
    lister: L,
    pattern: Pattern,
    options: SearchOptions,
}

impl<L: DirLister> FileSearch<L> {
    pub fn new(lister: L, pattern: Pattern) -> Self {
        Self {
            lister,
            pattern,
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Include or skip dot-files and dot-directories
    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.options.include_hidden = include_hidden;
        self
    }

    pub fn with_sorted_results(mut self, sort_results: bool) -> Self {
        self.options.sort_results = sort_results;
        self
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Walk `root` and collect every file the pattern accepts
    ///
    /// Never fails as a whole: a missing directory contributes nothing, and
    /// any other listing failure is logged and recorded in `errors`.
    pub fn search(&self, root: &Path) -> SearchReport {
        let start_time = Instant::now();
        tracing::info!(root = %root.display(), pattern = %self.pattern, mode = ?self.pattern.mode(), "starting search");

        let mut files = Vec::new();
        let mut errors = Vec::new();
        let mut directories_scanned = 0;
        let mut stack: Vec<Frame> = Vec::new();

        if let Some(frame) = self.open_dir(root, &mut errors) {
            directories_scanned += 1;
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            let Some(entry) = frame.entries.next() else {
                stack.pop();
                continue;
            };

            if !self.options.include_hidden && entry.is_hidden() {
                continue;
            }

            let path = frame.dir.join(&entry.name);
            match entry.kind {
                EntryKind::Directory => {
                    if let Some(child) = self.open_dir(&path, &mut errors) {
                        directories_scanned += 1;
                        stack.push(child);
                    }
                }
                EntryKind::File => {
                    if self.pattern.matches_os(&entry.name) {
                        files.push(path);
                    } else if entry.name.to_str().is_none() {
                        tracing::debug!(path = %path.display(), "name is not valid UTF-8, cannot compare");
                    }
                }
                EntryKind::Other => {
                    tracing::debug!(path = %path.display(), "skipping non-regular entry");
                }
            }
        }

        if self.options.sort_results {
            files.sort();
        }

        let duration = start_time.elapsed();
        tracing::info!(
            matched = files.len(),
            failed_dirs = errors.len(),
            directories_scanned,
            elapsed_ms = duration.as_millis() as u64,
            "search finished"
        );

        SearchReport {
            root: root.to_path_buf(),
            pattern: self.pattern.as_str().to_string(),
            files,
            errors,
            directories_scanned,
            duration,
        }
    }

    fn open_dir(&self, dir: &Path, errors: &mut Vec<SearchError>) -> Option<Frame> {
        match self.lister.list_dir(dir) {
            Ok(entries) => Some(Frame {
                dir: dir.to_path_buf(),
                entries: entries.into_iter(),
            }),
            Err(e) => {
                let err = SearchError::from_io_error(e, dir.to_path_buf());
                if err.is_not_found() {
                    tracing::debug!(dir = %dir.display(), "directory not found, nothing to search");
                } else {
                    tracing::warn!(dir = %dir.display(), code = ?err.os_code(), "{}", err);
                    errors.push(err);
                }
                None
            }
        }
    }
}

/// Convenience wrapper: classify `pattern` and search `root` on the local disk
pub fn find_files(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, SearchError> {
    let pattern = Pattern::parse(pattern)?;
    let report = FileSearch::new(LocalLister::new(), pattern).search(root);
    Ok(report.files)
}
