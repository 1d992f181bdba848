//! Extension-keyed loader registry, the default [`Dispatcher`]

use crate::loader::{Dispatcher, InputFile, LoadOutcome, Loader};
use crate::syntax::LoaderResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Loaders grouped by the extension they handle
#[derive(Default, Clone)]
pub struct LoaderRegistry {
    loaders: HashMap<String, Vec<Arc<dyn Loader>>>,
}

impl LoaderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `loader` for `extension` (".scss"). Earlier registrations win.
    pub fn register(&mut self, extension: impl Into<String>, loader: Arc<dyn Loader>) {
        self.loaders
            .entry(extension.into())
            .or_default()
            .push(loader);
    }

    /// Builder form of [`LoaderRegistry::register`]
    #[must_use]
    pub fn with(mut self, extension: impl Into<String>, loader: impl Loader + 'static) -> Self {
        self.register(extension, Arc::new(loader));
        self
    }

    /// Whether any loader handles `extension`
    #[must_use]
    pub fn handles(&self, extension: &str) -> bool {
        self.loaders.contains_key(extension)
    }

    /// Registered extensions, sorted
    #[must_use]
    pub fn extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.loaders.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }
}

impl std::fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("extensions", &self.extensions())
            .finish()
    }
}

#[async_trait]
impl Dispatcher for LoaderRegistry {
    async fn load_file(&self, input: InputFile) -> LoaderResult<LoadOutcome> {
        let Some(loaders) = self.loaders.get(&input.extension) else {
            trace!(extension = %input.extension, "no loader registered");
            return Ok(LoadOutcome::NotApplicable);
        };

        for loader in loaders {
            let outcome = loader.load(input.clone(), self).await?;
            if outcome.is_applied() {
                return Ok(outcome);
            }
        }

        Ok(LoadOutcome::NotApplicable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::OutputFile;

    struct Fixed(Option<&'static str>);

    #[async_trait]
    impl Loader for Fixed {
        async fn load(
            &self,
            input: InputFile,
            _dispatcher: &dyn Dispatcher,
        ) -> LoaderResult<LoadOutcome> {
            Ok(match self.0 {
                Some(text) => LoadOutcome::Applied(vec![OutputFile::new(input.path, text)]),
                None => LoadOutcome::NotApplicable,
            })
        }
    }

    #[tokio::test]
    async fn test_unknown_extension_is_not_applicable() {
        let registry = LoaderRegistry::new().with(".css", Fixed(Some("a")));
        let outcome = registry
            .load_file(InputFile::in_memory("x.less", "a"))
            .await
            .unwrap();

        assert_eq!(outcome, LoadOutcome::NotApplicable);
    }

    #[tokio::test]
    async fn test_first_applied_loader_wins() {
        let registry = LoaderRegistry::new()
            .with(".css", Fixed(None))
            .with(".css", Fixed(Some("second")))
            .with(".css", Fixed(Some("third")));

        let files = registry
            .load_file(InputFile::in_memory("x.css", "a"))
            .await
            .unwrap()
            .into_files();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].contents, "second");
    }

    #[test]
    fn test_extensions_are_sorted() {
        let registry = LoaderRegistry::new()
            .with(".vue", Fixed(None))
            .with(".css", Fixed(None));

        assert_eq!(registry.extensions(), vec![".css", ".vue"]);
        assert!(registry.handles(".vue"));
        assert!(!registry.handles(".ts"));
    }
}
