//! File processing utilities

use crate::loader::{Dispatcher, InputFile, LoadOutcome, OutputFile};
use crate::syntax::{LoaderError, LoaderResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// What happened to one source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessStatus {
    /// The document was rewritten; `written` files landed in the output tree
    Transformed { written: usize },
    /// No loader applied; the document was copied as-is
    Copied,
}

/// Where a file produced from `path` lands in `out_root`
#[must_use]
pub fn target_path(path: &Path, src_root: &Path, out_root: &Path) -> PathBuf {
    match path.strip_prefix(src_root) {
        Ok(relative) => out_root.join(relative),
        Err(_) => out_root.join(path.file_name().unwrap_or(path.as_os_str())),
    }
}

async fn write_output(file: &OutputFile, src_root: &Path, out_root: &Path) -> LoaderResult<()> {
    let target = target_path(&file.path, src_root, out_root);

    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| LoaderError::io(parent, e))?;
    }

    tokio::fs::write(&target, &file.contents)
        .await
        .map_err(|e| LoaderError::io(&target, e))
}

/// Run one document through `dispatcher` and write the result under `out_root`
///
/// # Errors
///
/// Returns error if reading, dispatching or writing fails
pub async fn process_file(
    path: &Path,
    src_root: &Path,
    out_root: &Path,
    dispatcher: &dyn Dispatcher,
) -> LoaderResult<ProcessStatus> {
    let input = InputFile::from_disk(path);

    match dispatcher.load_file(input).await? {
        LoadOutcome::Applied(files) => {
            for file in &files {
                write_output(file, src_root, out_root).await?;
            }
            debug!(path = %path.display(), written = files.len(), "document transformed");
            Ok(ProcessStatus::Transformed {
                written: files.len(),
            })
        }
        LoadOutcome::NotApplicable => {
            let target = target_path(path, src_root, out_root);
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| LoaderError::io(parent, e))?;
            }
            tokio::fs::copy(path, &target)
                .await
                .map_err(|e| LoaderError::io(path, e))?;
            Ok(ProcessStatus::Copied)
        }
    }
}
