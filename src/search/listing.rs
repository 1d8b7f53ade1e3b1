// Directory listing backends
// The walker only talks to `DirLister`, so it never touches the OS directly

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What a listed entry is, as far as the walker cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Sockets, devices, broken links, links to directories
    Other,
}

/// A single directory entry: bare name plus kind
///
/// The name is kept exactly as the OS returned it, so paths rebuilt from it
/// still exist even when the name is not valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    pub name: OsString,
    pub kind: EntryKind,
}

impl ListedEntry {
    pub fn new(name: impl Into<OsString>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn name(&self) -> &OsStr {
        &self.name
    }

    pub fn is_hidden(&self) -> bool {
        self.name.to_string_lossy().starts_with('.')
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Lists the immediate entries of one directory
///
/// Implementations never return the `.` and `..` pseudo-entries and must have
/// released any OS handle by the time `list_dir` returns.
pub trait DirLister {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<ListedEntry>>;
}

impl<L: DirLister + ?Sized> DirLister for &L {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<ListedEntry>> {
        (**self).list_dir(dir)
    }
}

/// Lister backed by `std::fs::read_dir`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalLister;

impl LocalLister {
    pub fn new() -> Self {
        Self
    }

    fn entry_kind(entry: &fs::DirEntry) -> io::Result<EntryKind> {
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            return Ok(EntryKind::Directory);
        }
        if file_type.is_file() {
            return Ok(EntryKind::File);
        }
        if file_type.is_symlink() {
            // Links to files count as files; links to directories are not followed
            return Ok(match fs::metadata(entry.path()) {
                Ok(target) if target.is_file() => EntryKind::File,
                _ => EntryKind::Other,
            });
        }
        Ok(EntryKind::Other)
    }
}

impl DirLister for LocalLister {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<ListedEntry>> {
        // The ReadDir handle is dropped when this function returns, on every path
        let read_dir = fs::read_dir(dir)?;
        let mut entries = Vec::new();

        for entry_result in read_dir {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "cannot read directory entry");
                    continue;
                }
            };

            let kind = match Self::entry_kind(&entry) {
                Ok(kind) => kind,
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "cannot read entry type");
                    continue;
                }
            };

            entries.push(ListedEntry {
                name: entry.file_name(),
                kind,
            });
        }

        Ok(entries)
    }
}

#[derive(Debug, Clone)]
enum MemoryNode {
    Dir(Vec<ListedEntry>),
    Failing(io::ErrorKind),
}

/// In-memory directory tree for driving the walker without touching disk
///
/// Entries come back in insertion order. Parent directories are created
/// implicitly. A directory marked with `with_failure` refuses to be listed.
///
/// ```
/// use file_search::search::MemoryLister;
///
/// let fs = MemoryLister::new()
///     .with_file("root/a.txt")
///     .with_file("root/sub/b.txt")
///     .with_failure("root/locked", std::io::ErrorKind::PermissionDenied);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLister {
    nodes: HashMap<PathBuf, MemoryNode>,
}

impl MemoryLister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.add_entry(path.as_ref(), EntryKind::File);
        self
    }

    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.ensure_dir(path.as_ref());
        self
    }

    /// Add an entry that is neither a file nor a directory (e.g. a socket)
    pub fn with_other(mut self, path: impl AsRef<Path>) -> Self {
        self.add_entry(path.as_ref(), EntryKind::Other);
        self
    }

    /// Add a directory whose listing fails with `kind`
    pub fn with_failure(mut self, path: impl AsRef<Path>, kind: io::ErrorKind) -> Self {
        let path = path.as_ref();
        self.ensure_dir(path);
        self.nodes.insert(path.to_path_buf(), MemoryNode::Failing(kind));
        self
    }

    fn add_entry(&mut self, path: &Path, kind: EntryKind) {
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return;
        };
        self.ensure_dir(parent);
        let name = name.to_os_string();
        if let Some(MemoryNode::Dir(children)) = self.nodes.get_mut(parent) {
            if !children.iter().any(|c| c.name == name) {
                children.push(ListedEntry::new(name, kind));
            }
        }
    }

    fn ensure_dir(&mut self, path: &Path) {
        if self.nodes.contains_key(path) {
            return;
        }
        self.nodes.insert(path.to_path_buf(), MemoryNode::Dir(Vec::new()));
        self.add_entry(path, EntryKind::Directory);
    }
}

impl DirLister for MemoryLister {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<ListedEntry>> {
        match self.nodes.get(dir) {
            Some(MemoryNode::Dir(children)) => Ok(children.clone()),
            Some(MemoryNode::Failing(kind)) => Err(io::Error::new(
                *kind,
                format!("listing {} refused", dir.display()),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", dir.display()),
            )),
        }
    }
}
