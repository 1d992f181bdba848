//! Whole-tree build: scan, transform documents concurrently, report

use crate::config::LoaderConfig;
use crate::file_processor::{self, ProcessStatus};
use crate::registry::LoaderRegistry;
use crate::scanner::scan_sfc_files;
use crate::syntax::LoaderError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info};

/// Outcome of a build over a source tree
#[derive(Debug, Default)]
pub struct BuildReport {
    pub transformed: Vec<PathBuf>,
    pub copied: Vec<PathBuf>,
    /// Files written in total, ancillary outputs included
    pub written: usize,
    pub failed: Vec<(PathBuf, LoaderError)>,
}

impl BuildReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// One-line summary for the console
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} transformed, {} copied, {} files written, {} failed",
            self.transformed.len(),
            self.copied.len(),
            self.written,
            self.failed.len()
        )
    }

    fn fail(&mut self, path: PathBuf, e: LoaderError) {
        error!(path = %path.display(), "{e}");
        self.failed.push((path, e));
    }
}

/// Transform every SFC document under `src_root` into `out_root`.
///
/// Documents are independent and run as concurrent tasks; a failing
/// document is recorded in the report and does not stop the others.
pub async fn run_build(src_root: &Path, out_root: &Path, config: &LoaderConfig) -> BuildReport {
    match config.build_registry() {
        Ok(registry) => {
            build_with_registry(src_root, out_root, Arc::new(registry), &config.exclude).await
        }
        Err(e) => {
            let mut report = BuildReport::default();
            report.fail(src_root.to_path_buf(), e);
            report
        }
    }
}

/// Same as [`run_build`] with a prepared registry and excluded directory names
pub async fn build_with_registry(
    src_root: &Path,
    out_root: &Path,
    registry: Arc<LoaderRegistry>,
    excluded: &[String],
) -> BuildReport {
    let mut report = BuildReport::default();

    let src = src_root.to_path_buf();
    let excluded = excluded.to_vec();
    let scanned = tokio::task::spawn_blocking(move || scan_sfc_files(&src, &excluded)).await;
    let files = scanned_files(scanned, src_root, &mut report);

    info!(count = files.len(), root = %src_root.display(), "🚀 Starting build");

    let mut tasks = JoinSet::new();
    let mut pending = HashMap::new();
    for path in files {
        let registry = Arc::clone(&registry);
        let src_root = src_root.to_path_buf();
        let out_root = out_root.to_path_buf();
        let task_path = path.clone();

        let handle = tasks.spawn(async move {
            file_processor::process_file(&task_path, &src_root, &out_root, registry.as_ref()).await
        });
        pending.insert(handle.id(), path);
    }

    while let Some(joined) = tasks.join_next_with_id().await {
        let (id, status) = match joined {
            Ok((id, status)) => (id, status),
            Err(e) => {
                let path = pending.remove(&e.id()).unwrap_or_else(|| src_root.to_path_buf());
                report.fail(path, LoaderError::Aborted(e));
                continue;
            }
        };
        let Some(path) = pending.remove(&id) else {
            continue;
        };

        match status {
            Ok(ProcessStatus::Transformed { written }) => {
                info!(path = %path.display(), written, "transformed");
                report.written += written;
                report.transformed.push(path);
            }
            Ok(ProcessStatus::Copied) => {
                report.written += 1;
                report.copied.push(path);
            }
            Err(e) => report.fail(path, e),
        }
    }

    report.transformed.sort();
    report.copied.sort();
    info!("🏁 {}", report.summary());
    report
}

/// Files found by the scan task; a crashed scan is recorded against the source root
fn scanned_files(
    scanned: Result<Vec<PathBuf>, JoinError>,
    src_root: &Path,
    report: &mut BuildReport,
) -> Vec<PathBuf> {
    match scanned {
        Ok(files) => files,
        Err(e) => {
            report.fail(src_root.to_path_buf(), LoaderError::Aborted(e));
            Vec::new()
        }
    }
}
