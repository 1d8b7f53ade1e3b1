// Tests for the tree walker
// In-memory trees for ordering and fault injection, temp dirs for the real disk

use file_search::search::{
    find_files, FileSearch, LocalLister, MemoryLister, Pattern, SearchError, SearchOptions,
};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn sample_tree() -> MemoryLister {
    MemoryLister::new()
        .with_file("root/a.txt")
        .with_file("root/sub/b.txt")
        .with_file("root/sub/c.md")
}

fn search(lister: &MemoryLister, pattern: &str) -> Vec<PathBuf> {
    FileSearch::new(lister, Pattern::parse(pattern).unwrap())
        .search(Path::new("root"))
        .files
}

fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

// ============ Pattern scenarios ============

#[test]
fn test_extension_scenario() {
    let tree = sample_tree();
    assert_eq!(search(&tree, "*.txt"), paths(&["root/a.txt", "root/sub/b.txt"]));
}

#[test]
fn test_base_name_scenario() {
    let tree = sample_tree();
    assert_eq!(search(&tree, "b.*"), paths(&["root/sub/b.txt"]));
}

#[test]
fn test_full_name_scenario() {
    let tree = sample_tree();
    assert_eq!(search(&tree, "a.txt"), paths(&["root/a.txt"]));
}

#[test]
fn test_match_all_scenario() {
    let tree = sample_tree();
    assert_eq!(
        search(&tree, "*.*"),
        paths(&["root/a.txt", "root/sub/b.txt", "root/sub/c.md"])
    );
}

#[test]
fn test_match_all_returns_each_file_once() {
    let tree = MemoryLister::new()
        .with_file("root/Makefile")
        .with_file("root/x/y/z/deep.rs")
        .with_file("root/x/.env")
        .with_file("root/x/y/notes.")
        .with_dir("root/empty");

    let found = search(&tree, "*.*");
    assert_eq!(found.len(), 4);
    let unique: HashSet<_> = found.iter().collect();
    assert_eq!(unique.len(), 4);
}

#[test]
fn test_no_match_is_empty() {
    let tree = sample_tree();
    assert!(search(&tree, "*.rs").is_empty());
}

// ============ Ordering ============

#[test]
fn test_preorder_matches_recursive_walk() {
    // A file listed after a subdirectory comes after that subdirectory's files
    let tree = MemoryLister::new()
        .with_file("root/first.txt")
        .with_file("root/sub/inner.txt")
        .with_file("root/sub/deeper/leaf.txt")
        .with_file("root/last.txt");

    assert_eq!(
        search(&tree, "*.txt"),
        paths(&[
            "root/first.txt",
            "root/sub/inner.txt",
            "root/sub/deeper/leaf.txt",
            "root/last.txt",
        ])
    );
}

#[test]
fn test_sorted_results() {
    let tree = MemoryLister::new()
        .with_file("root/z.txt")
        .with_file("root/a/b.txt");

    let unsorted = search(&tree, "*.txt");
    assert_eq!(unsorted, paths(&["root/z.txt", "root/a/b.txt"]));

    let report = FileSearch::new(&tree, Pattern::parse("*.txt").unwrap())
        .with_sorted_results(true)
        .search(Path::new("root"));
    assert_eq!(report.files, paths(&["root/a/b.txt", "root/z.txt"]));
}

// ============ Empty and missing directories ============

#[test]
fn test_empty_directory() {
    let tree = MemoryLister::new().with_dir("root");
    let report = FileSearch::new(&tree, Pattern::parse("*.*").unwrap()).search(Path::new("root"));

    assert!(report.files.is_empty());
    assert!(report.errors.is_empty());
    assert_eq!(report.directories_scanned, 1);
}

#[test]
fn test_missing_root_is_silent() {
    let tree = MemoryLister::new();
    let report = FileSearch::new(&tree, Pattern::parse("*.*").unwrap()).search(Path::new("nowhere"));

    assert!(report.files.is_empty());
    assert!(report.errors.is_empty());
    assert_eq!(report.directories_scanned, 0);
}

#[test]
fn test_vanished_subdirectory_is_silent() {
    let tree = MemoryLister::new()
        .with_file("root/a.txt")
        .with_failure("root/gone", io::ErrorKind::NotFound);

    let report = FileSearch::new(&tree, Pattern::parse("*.txt").unwrap()).search(Path::new("root"));
    assert_eq!(report.files, paths(&["root/a.txt"]));
    assert!(report.errors.is_empty());
}

// ============ Listing failures ============

#[test]
fn test_listing_failure_is_reported_and_walk_continues() {
    let tree = MemoryLister::new()
        .with_file("root/a.txt")
        .with_failure("root/locked", io::ErrorKind::PermissionDenied)
        .with_file("root/open/b.txt");

    let report = FileSearch::new(&tree, Pattern::parse("*.txt").unwrap()).search(Path::new("root"));

    assert_eq!(report.files, paths(&["root/a.txt", "root/open/b.txt"]));
    assert_eq!(report.errors.len(), 1);
    match &report.errors[0] {
        SearchError::ListingFailure { path, .. } => assert_eq!(path, &PathBuf::from("root/locked")),
        other => panic!("expected ListingFailure, got {:?}", other),
    }
    assert_eq!(report.directories_scanned, 2);
}

#[test]
fn test_failing_root_is_reported() {
    let tree = MemoryLister::new().with_failure("root", io::ErrorKind::InvalidInput);
    let report = FileSearch::new(&tree, Pattern::parse("*.*").unwrap()).search(Path::new("root"));

    assert!(report.files.is_empty());
    assert_eq!(report.errors.len(), 1);
}

// ============ Entry kinds and hidden entries ============

#[test]
fn test_non_regular_entries_skipped() {
    let tree = MemoryLister::new()
        .with_file("root/a.txt")
        .with_other("root/socket.txt");

    assert_eq!(search(&tree, "*.txt"), paths(&["root/a.txt"]));
}

#[test]
fn test_directories_never_reported() {
    let tree = MemoryLister::new()
        .with_dir("root/dir.txt")
        .with_file("root/file.txt");

    assert_eq!(search(&tree, "*.txt"), paths(&["root/file.txt"]));
}

#[test]
fn test_hidden_entries_included_by_default() {
    let tree = MemoryLister::new()
        .with_file("root/.env")
        .with_file("root/.git/config");

    assert_eq!(search(&tree, "*.*"), paths(&["root/.env", "root/.git/config"]));
}

#[test]
fn test_hidden_entries_skipped_when_disabled() {
    let tree = MemoryLister::new()
        .with_file("root/.env")
        .with_file("root/.git/config")
        .with_file("root/visible.txt");

    let options = SearchOptions {
        include_hidden: false,
        sort_results: false,
    };
    let report = FileSearch::new(&tree, Pattern::parse("*.*").unwrap())
        .with_options(options)
        .search(Path::new("root"));

    assert_eq!(report.files, paths(&["root/visible.txt"]));
    assert_eq!(report.directories_scanned, 1);
}

// ============ Real filesystem ============

fn build_sample_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"a").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("b.txt"), b"b").unwrap();
    fs::write(dir.path().join("sub").join("c.md"), b"c").unwrap();
    dir
}

fn as_set(files: Vec<PathBuf>) -> HashSet<PathBuf> {
    files.into_iter().collect()
}

#[test]
fn test_local_scenario_sets() {
    let dir = build_sample_dir();
    let root = dir.path();
    let a = root.join("a.txt");
    let b = root.join("sub").join("b.txt");
    let c = root.join("sub").join("c.md");

    assert_eq!(as_set(find_files(root, "*.txt").unwrap()), as_set(vec![a.clone(), b.clone()]));
    assert_eq!(find_files(root, "b.*").unwrap(), vec![b.clone()]);
    assert_eq!(find_files(root, "a.txt").unwrap(), vec![a.clone()]);
    assert_eq!(as_set(find_files(root, "*.*").unwrap()), as_set(vec![a, b, c]));
}

#[test]
fn test_local_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let report = FileSearch::new(LocalLister::new(), Pattern::parse("*.*").unwrap()).search(dir.path());

    assert!(report.files.is_empty());
    assert!(report.errors.is_empty());
}

#[test]
fn test_local_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let report = FileSearch::new(LocalLister::new(), Pattern::parse("*.*").unwrap()).search(&missing);

    assert!(report.files.is_empty());
    assert!(report.errors.is_empty());
}

#[test]
fn test_local_invalid_pattern() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        find_files(dir.path(), "*"),
        Err(SearchError::InvalidPattern { .. })
    ));
}

#[test]
fn test_local_root_is_a_file() {
    let dir = build_sample_dir();
    let report = FileSearch::new(LocalLister::new(), Pattern::parse("*.*").unwrap())
        .search(&dir.path().join("a.txt"));

    assert!(report.files.is_empty());
    assert_eq!(report.errors.len(), 1);
}

#[cfg(unix)]
#[test]
fn test_local_permission_denied_continues() {
    use std::os::unix::fs::PermissionsExt;

    let dir = build_sample_dir();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("secret.txt"), b"s").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can list anything; nothing to check then
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let report = FileSearch::new(LocalLister::new(), Pattern::parse("*.txt").unwrap()).search(dir.path());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(report.files.len(), 2);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].os_code().is_some());
    assert!(report.errors[0].to_string().contains("locked"));
}

#[cfg(unix)]
#[test]
fn test_local_symlinks() {
    use std::os::unix::fs::symlink;

    let dir = build_sample_dir();
    let root = dir.path();
    symlink(root.join("a.txt"), root.join("link.txt")).unwrap();
    symlink(root.join("sub"), root.join("sublink")).unwrap();
    symlink(root.join("missing"), root.join("broken.txt")).unwrap();

    let found = as_set(find_files(root, "*.txt").unwrap());
    let expected = as_set(vec![
        root.join("a.txt"),
        root.join("link.txt"),
        root.join("sub").join("b.txt"),
    ]);
    assert_eq!(found, expected);
}

// ============ Name encoding ============

#[cfg(unix)]
#[test]
fn test_memory_non_utf8_names() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let bad_dir = Path::new("root").join(OsStr::from_bytes(b"bad\xffdir"));
    let bad_file = Path::new("root").join(OsStr::from_bytes(b"f\xfe.txt"));
    let tree = MemoryLister::new()
        .with_file(bad_dir.join("x.txt"))
        .with_file(&bad_file);

    // The subtree under the undecodable directory is still walked
    let report = FileSearch::new(&tree, Pattern::parse("*.txt").unwrap()).search(Path::new("root"));
    assert_eq!(report.files, vec![bad_dir.join("x.txt")]);
    assert!(report.errors.is_empty());
    assert_eq!(report.directories_scanned, 2);

    // Match-all needs no comparison, so the undecodable file is kept as-is
    let all = FileSearch::new(&tree, Pattern::parse("*.*").unwrap()).search(Path::new("root"));
    assert_eq!(all.files, vec![bad_dir.join("x.txt"), bad_file]);
}

#[cfg(unix)]
#[test]
fn test_local_non_utf8_names() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let bad_dir = root.join(OsStr::from_bytes(b"bad\xffdir"));
    let bad_file = root.join(OsStr::from_bytes(b"f\xfe.txt"));

    // Some filesystems refuse names that are not valid UTF-8
    if fs::create_dir(&bad_dir).is_err() {
        return;
    }
    fs::write(bad_dir.join("x.txt"), b"x").unwrap();
    fs::write(&bad_file, b"f").unwrap();

    let report = FileSearch::new(LocalLister::new(), Pattern::parse("*.txt").unwrap()).search(root);
    assert_eq!(report.files, vec![bad_dir.join("x.txt")]);
    assert!(report.errors.is_empty());

    let all = FileSearch::new(LocalLister::new(), Pattern::parse("*.*").unwrap()).search(root);
    assert_eq!(as_set(all.files.clone()), as_set(vec![bad_dir.join("x.txt"), bad_file]));
    assert!(all.files.iter().all(|p| p.exists()));
}
