//! Loader contract shared by the SFC core and every pluggable transformer

use crate::syntax::{LoaderError, LoaderResult};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Lazy, re-invokable accessor for the contents of an input file
#[async_trait]
pub trait Contents: Send + Sync {
    async fn read(&self) -> LoaderResult<String>;
}

#[async_trait]
impl Contents for String {
    async fn read(&self) -> LoaderResult<String> {
        Ok(self.clone())
    }
}

/// Contents backed by a file on disk, read again on every call
#[derive(Debug, Clone)]
pub struct FileContents {
    pub path: PathBuf,
}

impl FileContents {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Contents for FileContents {
    async fn read(&self) -> LoaderResult<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| LoaderError::io(&self.path, e))
    }
}

/// A file handed to a loader
#[derive(Clone)]
pub struct InputFile {
    pub path: PathBuf,
    pub src_path: PathBuf,
    /// Extension with its leading dot (".vue")
    pub extension: String,
    contents: Arc<dyn Contents>,
}

impl InputFile {
    /// Create an input whose contents are read lazily from `contents`
    pub fn new(
        path: impl Into<PathBuf>,
        src_path: impl Into<PathBuf>,
        contents: impl Contents + 'static,
    ) -> Self {
        let path = path.into();
        let extension = dotted_extension(&path);

        Self {
            path,
            src_path: src_path.into(),
            extension,
            contents: Arc::new(contents),
        }
    }

    /// Input backed by a file on disk, `path` doubling as `src_path`
    pub fn from_disk(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::new(path.clone(), path.clone(), FileContents::new(path))
    }

    /// Input held entirely in memory
    pub fn in_memory(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        let path = path.into();
        let contents: String = contents.into();
        Self::new(path.clone(), path, contents)
    }

    /// Same paths and extension, different contents
    #[must_use]
    pub fn with_contents(&self, contents: impl Contents + 'static) -> Self {
        Self {
            path: self.path.clone(),
            src_path: self.src_path.clone(),
            extension: self.extension.clone(),
            contents: Arc::new(contents),
        }
    }

    /// Synthetic sub-file: both paths suffixed with `extension`
    #[must_use]
    pub fn nested(&self, extension: &str, contents: impl Contents + 'static) -> Self {
        Self {
            path: append_extension(&self.path, extension),
            src_path: append_extension(&self.src_path, extension),
            extension: extension.to_string(),
            contents: Arc::new(contents),
        }
    }

    /// Read the contents
    ///
    /// # Errors
    ///
    /// Returns whatever the underlying content provider fails with
    pub async fn contents(&self) -> LoaderResult<String> {
        self.contents.read().await
    }
}

impl std::fmt::Debug for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputFile")
            .field("path", &self.path)
            .field("src_path", &self.src_path)
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}

/// A file produced by a loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: String,
    pub extension: Option<String>,
}

impl OutputFile {
    /// Output file whose extension is taken from its path
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        let path = path.into();
        let extension = Some(dotted_extension(&path)).filter(|e| !e.is_empty());

        Self {
            path,
            contents: contents.into(),
            extension,
        }
    }

    /// Output file with no extension metadata
    pub fn untyped(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
            extension: None,
        }
    }
}

/// Outcome of running a loader on one input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Ordered output files; element 0 is the primary output
    Applied(Vec<OutputFile>),
    /// No transformation happened, the input passes through unmodified
    NotApplicable,
}

impl LoadOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, LoadOutcome::Applied(_))
    }

    /// Output files, empty when not applicable
    #[must_use]
    pub fn into_files(self) -> Vec<OutputFile> {
        match self {
            LoadOutcome::Applied(files) => files,
            LoadOutcome::NotApplicable => Vec::new(),
        }
    }
}

/// A pluggable transformer
#[async_trait]
pub trait Loader: Send + Sync {
    /// Transform `input`, delegating nested files to `dispatcher`
    async fn load(&self, input: InputFile, dispatcher: &dyn Dispatcher)
        -> LoaderResult<LoadOutcome>;
}

/// The full set of registered loaders, dispatched by extension
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn load_file(&self, input: InputFile) -> LoaderResult<LoadOutcome>;
}

/// Extension of `path` with a leading dot, or an empty string
#[must_use]
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

/// `App.vue` + `.ts` -> `App.vue.ts`
#[must_use]
pub fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(extension);
    PathBuf::from(raw)
}
