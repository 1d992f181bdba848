//! Block configurations and the text patterns used to find blocks
//!
//! This module centralizes what constitutes a `<style>`, `<script>` or `<template>`
//! block, which language each one is normalized to, and when a block opts out.

use crate::syntax::BlockKind;
use once_cell::sync::Lazy;
use regex::Regex;

/// Configuration of one block transformer
#[derive(Debug, Clone)]
pub struct BlockOptions {
    pub kind: BlockKind,
    /// Canonical language the block is normalized to ("css", "js")
    pub output_lang: String,
    /// Language assumed when the tag carries no `lang` attribute
    pub default_lang: Option<String>,
    /// Extra extensions accepted as the block's replacement
    pub valid_extensions: Vec<String>,
    /// A block whose attributes match any of these is left alone
    pub exclude: Vec<Regex>,
}

impl BlockOptions {
    pub fn new(kind: BlockKind, output_lang: impl Into<String>) -> Self {
        Self {
            kind,
            output_lang: output_lang.into(),
            default_lang: None,
            valid_extensions: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// `<style>` blocks normalized to CSS
    #[must_use]
    pub fn style() -> Self {
        Self::new(BlockKind::Style, "css")
    }

    /// `<script>` blocks normalized to JS, `<script setup>` excluded
    #[must_use]
    pub fn script() -> Self {
        Self::new(BlockKind::Script, "js")
            .valid_extensions([".js", ".mjs"])
            .exclude(Regex::clone(&SETUP_MARKER))
    }

    #[must_use]
    pub fn default_lang(mut self, lang: impl Into<String>) -> Self {
        self.default_lang = Some(lang.into());
        self
    }

    #[must_use]
    pub fn valid_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_extensions
            .extend(extensions.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn exclude(mut self, pattern: Regex) -> Self {
        self.exclude.push(pattern);
        self
    }

    /// Extension of the canonical output (".css")
    #[must_use]
    pub fn output_extension(&self) -> String {
        format!(".{}", self.output_lang)
    }

    /// Whether an emitted file can replace the block body
    #[must_use]
    pub fn accepts(&self, extension: Option<&str>) -> bool {
        let Some(ext) = extension else {
            return false;
        };

        ext == self.output_extension() || self.valid_extensions.iter().any(|v| v == ext)
    }

    /// Whether the block's attribute string opts it out
    #[must_use]
    pub fn is_excluded(&self, attributes: &str) -> bool {
        self.exclude.iter().any(|re| re.is_match(attributes))
    }
}

/// `<script setup>` is compiled by the framework itself
static SETUP_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bsetup\b").expect("valid setup marker pattern"));

/// `lang="ts"`, with at most one whitespace character before it. `lang=""` resolves to "".
pub(super) static LANG_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\s?lang="([a-z]*)""#).expect("valid lang pattern"));

fn block_regex(tag: &str) -> Regex {
    let tag = regex::escape(tag);
    Regex::new(&format!(r"<{tag}((?:\s[^>\s]*)*)>([\s\S]*?)</{tag}>"))
        .expect("valid block pattern")
}

static TEMPLATE_BLOCK: Lazy<Regex> = Lazy::new(|| block_regex("template"));
static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| block_regex("script"));
static STYLE_BLOCK: Lazy<Regex> = Lazy::new(|| block_regex("style"));

/// Pattern matching a whole block of `kind`: group 1 is the attribute run, group 2 the body
pub(super) fn block_pattern(kind: BlockKind) -> &'static Regex {
    match kind {
        BlockKind::Template => &*TEMPLATE_BLOCK,
        BlockKind::Script => &*SCRIPT_BLOCK,
        BlockKind::Style => &*STYLE_BLOCK,
    }
}
