//! Single File Component (SFC) loader
//!
//! Normalizes every alternate-language block of a `.vue` document by handing its
//! body to the dispatcher and splicing the canonical result back into the text.
//! Blocks are processed one kind at a time; each kind sees the document as left
//! by the previous one.

mod block;
mod patterns;

pub use block::{find_blocks, BlockLoader, BlockMatch};
pub use patterns::BlockOptions;

use crate::loader::{Dispatcher, InputFile, LoadOutcome, Loader, OutputFile};
use crate::syntax::LoaderResult;
use async_trait::async_trait;
use tracing::debug;

/// Extension of documents handled by [`SfcLoader`]
pub const SFC_EXTENSION: &str = ".vue";

/// Orchestrates the block loaders over one SFC document
#[derive(Debug, Clone)]
pub struct SfcLoader {
    blocks: Vec<BlockLoader>,
}

impl Default for SfcLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SfcLoader {
    /// Style blocks first, then script blocks
    #[must_use]
    pub fn new() -> Self {
        Self::with_blocks(vec![
            BlockLoader::new(BlockOptions::style()),
            BlockLoader::new(BlockOptions::script()),
        ])
    }

    /// Custom ordered set of block loaders
    #[must_use]
    pub fn with_blocks(blocks: Vec<BlockLoader>) -> Self {
        Self { blocks }
    }

    /// Append a block loader, run after the existing ones
    #[must_use]
    pub fn push_block(mut self, options: BlockOptions) -> Self {
        self.blocks.push(BlockLoader::new(options));
        self
    }

    #[must_use]
    pub fn blocks(&self) -> &[BlockLoader] {
        &self.blocks
    }
}

#[async_trait]
impl Loader for SfcLoader {
    async fn load(
        &self,
        input: InputFile,
        dispatcher: &dyn Dispatcher,
    ) -> LoaderResult<LoadOutcome> {
        if input.extension != SFC_EXTENSION {
            return Ok(LoadOutcome::NotApplicable);
        }

        let contents = input.contents().await?;
        let mut output = vec![OutputFile::untyped(input.path.clone(), contents)];
        let mut changed = false;

        for block in &self.blocks {
            let view = input.with_contents(output[0].contents.clone());

            let LoadOutcome::Applied(files) = block.load(view, dispatcher).await? else {
                continue;
            };

            let mut files = files.into_iter();
            let Some(document) = files.next() else {
                continue;
            };

            changed = true;
            output[0] = document;
            output.extend(files);
        }

        if !changed {
            debug!(path = %input.path.display(), "no block transformed");
            return Ok(LoadOutcome::NotApplicable);
        }

        Ok(LoadOutcome::Applied(output))
    }
}
