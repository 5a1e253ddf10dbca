use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

/// Expand the command-line sources (files or directories) into the set of
/// `.py` files to process: directories are walked recursively, paths matching
/// the exclude pattern or the explicit exclude list are dropped, duplicates
/// collapse, and the result is sorted for a deterministic run order.
pub fn find_python_files(
    sources: &[PathBuf],
    exclude_files: &[PathBuf],
    exclude_pattern: &Regex,
) -> Vec<PathBuf> {
    let excluded: BTreeSet<PathBuf> = exclude_files.iter().map(|path| canonical(path)).collect();
    let mut found = BTreeSet::new();

    for source in sources {
        if source.is_dir() {
            for entry in WalkDir::new(canonical(source))
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
            {
                let path = entry.into_path();
                if !is_python_file(&path) {
                    continue;
                }
                if matches_at_start(exclude_pattern, &path) || excluded.contains(&path) {
                    continue;
                }
                found.insert(path);
            }
        } else if is_python_file(source) {
            found.insert(canonical(source));
        }
    }

    found.into_iter().collect()
}

fn is_python_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "py")
}

/// Anchored match against the path string, the semantics of Python's
/// `re.match`: the pattern must match starting at the first character.
fn matches_at_start(pattern: &Regex, path: &Path) -> bool {
    let text = path.to_string_lossy();
    pattern
        .find(text.as_ref())
        .is_some_and(|found| found.start() == 0)
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
