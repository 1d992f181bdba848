use crate::loader::dotted_extension;
use crate::sfc::SFC_EXTENSION;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Filter: Returns true if this is a folder to be IGNORED
fn should_skip(entry: &DirEntry, excluded_dirs: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_str().unwrap_or("");
    excluded_dirs.iter().any(|dir| dir == name)
}

/// Helper: Check if a path points to an SFC document
#[must_use]
pub fn is_sfc_path(path: &Path) -> bool {
    dotted_extension(path) == SFC_EXTENSION
}

/// Scan `root` for SFC documents, skipping excluded directory names.
/// Returns the paths sorted so runs are reproducible.
#[must_use]
pub fn scan_sfc_files(root: &Path, excluded_dirs: &[String]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !should_skip(e, excluded_dirs))
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file() && is_sfc_path(e.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();

    files.sort();
    files
}
