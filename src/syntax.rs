//! Core types for SFC blocks and loader failures.
//!
//! These types are used throughout the loader to identify
//! block kinds and to report real faults from dispatch or I/O.

use serde::Deserialize;
use std::path::PathBuf;
use std::process::ExitStatus;

/// Kind of a delimited block inside an SFC document
#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Hash, Copy)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    /// Markup (`<template>`)
    Template,
    /// Behavior (`<script>`)
    Script,
    /// Presentation (`<style>`)
    Style,
}

impl BlockKind {
    /// Tag name used to delimit the block
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            BlockKind::Template => "template",
            BlockKind::Script => "script",
            BlockKind::Style => "style",
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Failures raised by content providers and loaders.
///
/// The SFC core never constructs these itself; it only propagates them.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// Reading or writing a file failed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// External program could not be started
    #[error("Failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// External program exited unsuccessfully
    #[error("`{program}` exited with {status}: {stderr}")]
    Command {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),
    /// Malformed JSON configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A background task panicked or was cancelled
    #[error("Task aborted: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}

impl LoaderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoaderError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;
