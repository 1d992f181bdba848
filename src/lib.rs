//! SFC loader library - exports modules for the binary and for testing

#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod file_processor;
pub mod loader;
pub mod loaders;
pub mod pipeline;
pub mod registry;
pub mod scanner;
pub mod sfc;
pub mod syntax;

pub use loader::{Contents, Dispatcher, FileContents, InputFile, LoadOutcome, Loader, OutputFile};
pub use registry::LoaderRegistry;
pub use sfc::{BlockLoader, BlockOptions, SfcLoader};
pub use syntax::{BlockKind, LoaderError, LoaderResult};
