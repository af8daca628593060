//! Recursive discovery of test files under a directory.

use std::io;
use std::path::{Path, PathBuf};

/// File extensions treated as test suites.
pub const EXTENSIONS: &[&str] = &["http", "httpspec"];

/// Whether a path has one of the suite extensions.
#[must_use]
pub fn is_suite_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXTENSIONS.contains(&ext))
}

/// Collect every suite file under `dir`, recursively, sorted for a
/// deterministic scheduling order.
pub fn discover(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    walk(dir, &mut found)?;
    found.sort();
    Ok(found)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            walk(&path, out)?;
        } else if is_suite_file(&path) {
            out.push(path);
        }
    }
    Ok(())
}
