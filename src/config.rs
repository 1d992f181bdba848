//! Configuration management for the loader pipeline

use crate::loaders::{CommandLoader, PassThroughLoader};
use crate::registry::LoaderRegistry;
use crate::sfc::{BlockOptions, SfcLoader, SFC_EXTENSION};
use crate::syntax::{BlockKind, LoaderError, LoaderResult};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Default configuration file name, looked up in the source root
pub const CONFIG_FILE_NAME: &str = "sfc-loader.json";

/// An external compiler bound to one or more extensions
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommandConfig {
    pub extensions: Vec<String>,
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub output_extension: String,
}

/// An additional block kind to normalize, run after style and script
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlockConfig {
    pub kind: BlockKind,
    pub output_lang: String,
    #[serde(default)]
    pub default_lang: Option<String>,
    #[serde(default)]
    pub valid_extensions: Vec<String>,
    /// Regexes over the tag attributes; a match leaves the block alone
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl BlockConfig {
    /// Block options with the exclusion patterns compiled
    ///
    /// # Errors
    ///
    /// Returns error if an exclusion pattern is not a valid regex
    pub fn options(&self) -> LoaderResult<BlockOptions> {
        let mut options = BlockOptions::new(self.kind, self.output_lang.clone())
            .valid_extensions(self.valid_extensions.iter().cloned());

        if let Some(lang) = &self.default_lang {
            options = options.default_lang(lang.clone());
        }

        for pattern in &self.exclude {
            let re = Regex::new(pattern).map_err(|e| {
                LoaderError::Config(format!(
                    "invalid exclude pattern {pattern:?} for {} block: {e}",
                    self.kind
                ))
            })?;
            options = options.exclude(re);
        }

        Ok(options)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct LoaderConfig {
    /// Extensions emitted verbatim (the canonical block languages)
    pub pass_through: Vec<String>,
    pub commands: Vec<CommandConfig>,
    /// Directory names skipped while scanning
    pub exclude: Vec<String>,
    pub blocks: Vec<BlockConfig>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            pass_through: vec![".css".into(), ".js".into(), ".mjs".into()],
            commands: Vec::new(),
            exclude: ["node_modules", ".git", "target", "dist", "build"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            blocks: Vec::new(),
        }
    }
}

impl LoaderConfig {
    /// Load from `path`, falling back to defaults when the file does not exist
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read, parsed or validated
    pub fn load(path: &Path) -> LoaderResult<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(LoaderError::io(path, e)),
        };

        let config = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            commands = config.commands.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Parse and validate a JSON configuration
    ///
    /// # Errors
    ///
    /// Returns error on malformed JSON or on extensions without a leading dot
    pub fn from_json(raw: &str) -> LoaderResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> LoaderResult<()> {
        let extensions = self
            .pass_through
            .iter()
            .chain(self.commands.iter().flat_map(|c| &c.extensions))
            .chain(self.commands.iter().map(|c| &c.output_extension));

        for ext in extensions {
            if !ext.starts_with('.') || ext.len() < 2 {
                return Err(LoaderError::Config(format!(
                    "extension {ext:?} must start with a dot"
                )));
            }
        }

        if let Some(cmd) = self.commands.iter().find(|c| c.program.trim().is_empty()) {
            return Err(LoaderError::Config(format!(
                "command for {:?} has an empty program",
                cmd.extensions
            )));
        }

        for block in &self.blocks {
            block.options()?;
        }

        Ok(())
    }

    /// The SFC loader with any configured extra blocks
    ///
    /// # Errors
    ///
    /// Returns error if a block's exclusion pattern does not compile
    pub fn sfc_loader(&self) -> LoaderResult<SfcLoader> {
        self.blocks
            .iter()
            .try_fold(SfcLoader::new(), |loader, block| {
                Ok(loader.push_block(block.options()?))
            })
    }

    /// Registry dispatching `.vue` documents, external compilers and pass-through languages
    ///
    /// # Errors
    ///
    /// Returns error if a block's exclusion pattern does not compile
    pub fn build_registry(&self) -> LoaderResult<LoaderRegistry> {
        let mut registry = LoaderRegistry::new().with(SFC_EXTENSION, self.sfc_loader()?);

        for cmd in &self.commands {
            let loader = CommandLoader::new(cmd.program.clone(), cmd.output_extension.clone())
                .args(cmd.args.iter().cloned());
            for ext in &cmd.extensions {
                registry = registry.with(ext.clone(), loader.clone());
            }
        }

        for ext in &self.pass_through {
            registry = registry.with(ext.clone(), PassThroughLoader);
        }

        Ok(registry)
    }
}
