//! Block transformer: extract one block, delegate its body, splice the result back

use super::patterns::{block_pattern, BlockOptions, LANG_ATTRIBUTE};
use crate::loader::{Dispatcher, InputFile, LoadOutcome, Loader, OutputFile};
use crate::syntax::{BlockKind, LoaderResult};
use async_trait::async_trait;
use std::ops::Range;
use tracing::debug;

/// One occurrence of a block inside the document text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMatch<'a> {
    /// Byte span of the whole block, tags included
    pub span: Range<usize>,
    /// Raw attribute run of the opening tag, leading whitespace included
    pub attributes: &'a str,
    /// Text between the opening and closing tags
    pub body: &'a str,
}

/// Find every occurrence of `kind` in `content`, in document order
#[must_use]
pub fn find_blocks(content: &str, kind: BlockKind) -> Vec<BlockMatch<'_>> {
    block_pattern(kind)
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(BlockMatch {
                span: whole.range(),
                attributes: caps.get(1).map_or("", |m| m.as_str()),
                body: caps.get(2).map_or("", |m| m.as_str()),
            })
        })
        .collect()
}

/// The `lang` attribute of a tag: (language, byte span of the attribute incl. one leading space)
fn find_lang(attributes: &str) -> Option<(&str, Range<usize>)> {
    let caps = LANG_ATTRIBUTE.captures(attributes)?;
    Some((caps.get(1)?.as_str(), caps.get(0)?.range()))
}

/// Transforms one block kind of an SFC document
#[derive(Debug, Clone)]
pub struct BlockLoader {
    options: BlockOptions,
}

impl BlockLoader {
    #[must_use]
    pub fn new(options: BlockOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &BlockOptions {
        &self.options
    }

    #[must_use]
    pub fn kind(&self) -> BlockKind {
        self.options.kind
    }

    /// Select the block to transform, or `None` when this kind does not apply
    fn select_block<'a>(&self, content: &'a str) -> Option<BlockMatch<'a>> {
        let kind = self.options.kind;
        let mut blocks = find_blocks(content, kind);

        if blocks.is_empty() {
            debug!(%kind, "no block found");
            return None;
        }

        // TODO: merge multiple <script> blocks instead of skipping them
        if kind == BlockKind::Script && blocks.len() > 1 {
            debug!(%kind, count = blocks.len(), "multiple blocks, skipping");
            return None;
        }

        let block = blocks.swap_remove(0);

        if block.body.is_empty() {
            debug!(%kind, "empty block body");
            return None;
        }

        if self.options.is_excluded(block.attributes) {
            debug!(%kind, attributes = block.attributes, "block excluded");
            return None;
        }

        Some(block)
    }
}

#[async_trait]
impl Loader for BlockLoader {
    async fn load(
        &self,
        input: InputFile,
        dispatcher: &dyn Dispatcher,
    ) -> LoaderResult<LoadOutcome> {
        let kind = self.options.kind;
        let content = input.contents().await?;

        let Some(block) = self.select_block(&content) else {
            return Ok(LoadOutcome::NotApplicable);
        };

        let lang_attr = find_lang(block.attributes);
        let lang = lang_attr.as_ref().map_or_else(
            || {
                self.options
                    .default_lang
                    .as_deref()
                    .unwrap_or(&self.options.output_lang)
            },
            |(lang, _)| *lang,
        );
        let extension = format!(".{lang}");

        let nested = input.nested(&extension, block.body.to_string());
        let LoadOutcome::Applied(mut files) = dispatcher.load_file(nested).await? else {
            debug!(%kind, %extension, "dispatcher did not transform block");
            return Ok(LoadOutcome::NotApplicable);
        };

        let Some(selected) = files
            .iter()
            .position(|f| self.options.accepts(f.extension.as_deref()))
        else {
            debug!(%kind, %extension, emitted = files.len(), "no usable block output");
            return Ok(LoadOutcome::NotApplicable);
        };
        let block_output = files.remove(selected);

        let attributes = match &lang_attr {
            Some((_, span)) => {
                let mut stripped = block.attributes.to_string();
                stripped.replace_range(span.clone(), "");
                stripped
            }
            None => block.attributes.to_string(),
        };

        let tag = kind.tag();
        let replacement = format!(
            "<{tag}{attributes}>\n{}\n</{tag}>",
            block_output.contents.trim()
        );

        let mut spliced = String::with_capacity(content.len() + replacement.len());
        spliced.push_str(&content[..block.span.start]);
        spliced.push_str(&replacement);
        spliced.push_str(&content[block.span.end..]);

        debug!(
            %kind,
            %extension,
            path = %input.path.display(),
            ancillary = files.len(),
            "block spliced"
        );

        let mut output = Vec::with_capacity(files.len() + 1);
        output.push(OutputFile::untyped(input.path, spliced));
        output.extend(files);

        Ok(LoadOutcome::Applied(output))
    }
}
