//! Leaf loaders: pass-through for canonical languages and external compilers

use crate::loader::{Dispatcher, InputFile, LoadOutcome, Loader, OutputFile};
use crate::syntax::{LoaderError, LoaderResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Emits the input unchanged, tagged with its own extension
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughLoader;

#[async_trait]
impl Loader for PassThroughLoader {
    async fn load(
        &self,
        input: InputFile,
        _dispatcher: &dyn Dispatcher,
    ) -> LoaderResult<LoadOutcome> {
        let contents = input.contents().await?;

        Ok(LoadOutcome::Applied(vec![OutputFile {
            path: input.path,
            contents,
            extension: Some(input.extension),
        }]))
    }
}

/// Pipes the input through an external program and emits its stdout
#[derive(Debug, Clone)]
pub struct CommandLoader {
    pub program: String,
    pub args: Vec<String>,
    /// Extension of the emitted file (".css")
    pub output_extension: String,
}

impl CommandLoader {
    pub fn new(program: impl Into<String>, output_extension: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            output_extension: output_extension.into(),
        }
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// `App.vue.scss` -> `App.vue.css`
    #[must_use]
    pub fn output_path(&self, path: &Path, input_extension: &str) -> PathBuf {
        let raw = path.to_string_lossy();
        let stem = raw.strip_suffix(input_extension).unwrap_or(&raw);
        PathBuf::from(format!("{stem}{}", self.output_extension))
    }

    async fn run(&self, stdin: &str) -> LoaderResult<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| LoaderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // stdin is fed while stdout is drained
        let writer = child.stdin.take().map(|mut pipe| {
            let bytes = stdin.as_bytes().to_vec();
            tokio::spawn(async move { pipe.write_all(&bytes).await })
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| LoaderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(writer) = writer {
            match writer.await {
                // The child may exit without reading its input
                Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                    return Err(LoaderError::Spawn {
                        program: self.program.clone(),
                        source: e,
                    });
                }
                _ => {}
            }
        }

        if !output.status.success() {
            return Err(LoaderError::Command {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl Loader for CommandLoader {
    async fn load(
        &self,
        input: InputFile,
        _dispatcher: &dyn Dispatcher,
    ) -> LoaderResult<LoadOutcome> {
        let contents = input.contents().await?;
        debug!(program = %self.program, path = %input.path.display(), "running external loader");

        let compiled = self.run(&contents).await?;

        Ok(LoadOutcome::Applied(vec![OutputFile {
            path: self.output_path(&input.path, &input.extension),
            contents: compiled,
            extension: Some(self.output_extension.clone()),
        }]))
    }
}
