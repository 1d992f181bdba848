//! Common test utilities: fixtures and stand-in compilers

use async_trait::async_trait;
use regex::Regex;
use sfc_loader::loaders::PassThroughLoader;
use sfc_loader::{
    Dispatcher, InputFile, LoadOutcome, Loader, LoaderRegistry, LoaderResult, OutputFile,
    SfcLoader,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Load a fixture file from the fixtures directory
#[allow(dead_code)]
pub fn load_fixture(relative_path: &str) -> String {
    std::fs::read_to_string(fixture_path(relative_path))
        .unwrap_or_else(|e| panic!("Failed to load fixture {relative_path:?}: {e}"))
}

#[allow(dead_code)]
pub fn fixture_path(relative_path: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/common/fixtures")
        .join(relative_path)
}

/// `App.vue.scss` -> `App.vue` + `ext`
fn sibling(input: &InputFile, ext: &str) -> PathBuf {
    let raw = input.path.to_string_lossy();
    let stem = raw.strip_suffix(&input.extension).unwrap_or(&raw);
    PathBuf::from(format!("{stem}{ext}"))
}

/// `.ts` stand-in: drops primitive type annotations, then hands the JS back to
/// the dispatcher so whatever is registered for `.js` gets the final say
pub struct StripTypes;

#[async_trait]
impl Loader for StripTypes {
    async fn load(
        &self,
        input: InputFile,
        dispatcher: &dyn Dispatcher,
    ) -> LoaderResult<LoadOutcome> {
        let annotation = Regex::new(r":\s*(?:number|string|boolean)\b").unwrap();
        let js = annotation.replace_all(&input.contents().await?, "").into_owned();
        let js_path = sibling(&input, ".js");

        match dispatcher
            .load_file(InputFile::in_memory(js_path.clone(), js.clone()))
            .await?
        {
            LoadOutcome::Applied(files) => Ok(LoadOutcome::Applied(files)),
            LoadOutcome::NotApplicable => {
                Ok(LoadOutcome::Applied(vec![OutputFile::new(js_path, js)]))
            }
        }
    }
}

/// `.scss` stand-in: inlines `$var: value;` declarations
pub struct FakeScss {
    pub emit_css: bool,
    pub emit_map: bool,
}

impl FakeScss {
    #[allow(dead_code)]
    pub fn with_map() -> Self {
        Self {
            emit_css: true,
            emit_map: true,
        }
    }

    #[allow(dead_code)]
    pub fn map_only() -> Self {
        Self {
            emit_css: false,
            emit_map: true,
        }
    }
}

impl Default for FakeScss {
    fn default() -> Self {
        Self {
            emit_css: true,
            emit_map: false,
        }
    }
}

#[async_trait]
impl Loader for FakeScss {
    async fn load(
        &self,
        input: InputFile,
        _dispatcher: &dyn Dispatcher,
    ) -> LoaderResult<LoadOutcome> {
        let declaration = Regex::new(r"(?m)^\s*\$([\w-]+):\s*([^;]+);\s*$\n?").unwrap();
        let source = input.contents().await?;

        let vars: HashMap<String, String> = declaration
            .captures_iter(&source)
            .map(|c| (c[1].to_string(), c[2].trim().to_string()))
            .collect();

        let mut css = declaration.replace_all(&source, "").into_owned();
        for (name, value) in &vars {
            css = css.replace(&format!("${name}"), value);
        }

        let mut files = Vec::new();
        if self.emit_css {
            files.push(OutputFile::new(sibling(&input, ".css"), css));
        }
        if self.emit_map {
            let map = format!(r#"{{"version":3,"sources":["{}"]}}"#, input.src_path.display());
            files.push(OutputFile::new(sibling(&input, ".css.map"), map));
        }
        Ok(LoadOutcome::Applied(files))
    }
}

/// Registry wired like a real build: SFC documents, stand-in compilers, canonical pass-through
#[allow(dead_code)]
pub fn registry_with(scss: FakeScss) -> LoaderRegistry {
    LoaderRegistry::new()
        .with(".vue", SfcLoader::new())
        .with(".ts", StripTypes)
        .with(".scss", scss)
        .with(".css", PassThroughLoader)
        .with(".js", PassThroughLoader)
}

/// Host document of an applied outcome
#[allow(dead_code)]
pub fn host_contents(outcome: &LoadOutcome) -> &str {
    match outcome {
        LoadOutcome::Applied(files) => &files[0].contents,
        LoadOutcome::NotApplicable => panic!("expected an applied outcome"),
    }
}
