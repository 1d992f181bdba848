//! End-to-end SFC transformation through a registry of stand-in compilers

mod common;

use common::{fixture_path, host_contents, load_fixture, registry_with, FakeScss};
use sfc_loader::{Dispatcher, InputFile, LoadOutcome};
use std::path::PathBuf;

#[tokio::test]
async fn test_fixture_is_fully_normalized() {
    let registry = registry_with(FakeScss::default());
    let path = fixture_path("vue/greeting.vue");

    let outcome = registry
        .load_file(InputFile::from_disk(&path))
        .await
        .unwrap();

    let files = outcome.into_files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, path);
    assert_eq!(files[0].contents, load_fixture("vue/greeting.expected.vue"));
}

#[tokio::test]
async fn test_source_map_is_forwarded_untouched() {
    let registry = registry_with(FakeScss::with_map());
    let source = load_fixture("vue/greeting.vue");

    let files = registry
        .load_file(InputFile::in_memory("src/Greeting.vue", source))
        .await
        .unwrap()
        .into_files();

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].path, PathBuf::from("src/Greeting.vue"));
    assert!(files[0].contents.contains("<style scoped>\n.greeting { color: red; }\n</style>"));
    assert_eq!(files[1].path, PathBuf::from("src/Greeting.vue.css.map"));
    assert_eq!(
        files[1].contents,
        r#"{"version":3,"sources":["src/Greeting.vue.scss"]}"#
    );
    assert_eq!(files[1].extension.as_deref(), Some(".map"));
}

#[tokio::test]
async fn test_map_only_output_leaves_style_untouched() {
    let registry = registry_with(FakeScss::map_only());
    let source = r#"<style lang="scss">$a: 1px; .x { margin: $a; }</style>"#;

    let outcome = registry
        .load_file(InputFile::in_memory("App.vue", source))
        .await
        .unwrap();

    assert_eq!(outcome, LoadOutcome::NotApplicable);
}

#[tokio::test]
async fn test_script_setup_is_byte_for_byte_unchanged() {
    let registry = registry_with(FakeScss::default());
    let source = load_fixture("vue/setup.vue");

    let outcome = registry
        .load_file(InputFile::in_memory("Setup.vue", source))
        .await
        .unwrap();

    assert_eq!(outcome, LoadOutcome::NotApplicable);
}

#[tokio::test]
async fn test_two_scripts_only_style_is_transformed() {
    let registry = registry_with(FakeScss::default());
    let source = load_fixture("vue/two_scripts.vue");

    let outcome = registry
        .load_file(InputFile::in_memory("Row.vue", source.clone()))
        .await
        .unwrap();
    let host = host_contents(&outcome);

    let scripts_end = source.find("<style").unwrap();
    assert_eq!(&host[..scripts_end], &source[..scripts_end]);
    assert!(host.ends_with("<style>\n.row { gap: 4px; }\n</style>\n"));
}

#[tokio::test]
async fn test_unregistered_language_passes_through() {
    let registry = registry_with(FakeScss::default());
    let source = r#"<template lang="pug">div</template><style lang="stylus">a</style>"#;

    let outcome = registry
        .load_file(InputFile::in_memory("App.vue", source))
        .await
        .unwrap();

    assert_eq!(outcome, LoadOutcome::NotApplicable);
}

#[tokio::test]
async fn test_non_vue_file_is_not_applicable() {
    let registry = registry_with(FakeScss::default());

    let outcome = registry
        .load_file(InputFile::in_memory("notes.txt", "<style lang=\"scss\">a</style>"))
        .await
        .unwrap();

    assert_eq!(outcome, LoadOutcome::NotApplicable);
}

#[tokio::test]
async fn test_second_run_is_byte_identical() {
    let registry = registry_with(FakeScss::with_map());
    let source = load_fixture("vue/greeting.vue");

    let first = registry
        .load_file(InputFile::in_memory("Greeting.vue", source))
        .await
        .unwrap();
    let first_host = host_contents(&first).to_string();

    let second = registry
        .load_file(InputFile::in_memory("Greeting.vue", first_host.clone()))
        .await
        .unwrap();

    assert_eq!(host_contents(&second), first_host);
    assert_eq!(second.into_files().len(), 1, "no ancillary files on re-run");
}

#[tokio::test]
async fn test_missing_file_error_propagates() {
    let registry = registry_with(FakeScss::default());

    let err = registry
        .load_file(InputFile::from_disk(fixture_path("vue/missing.vue")))
        .await
        .unwrap_err();

    assert!(matches!(err, sfc_loader::LoaderError::Io { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_empty_lang_leaves_script_untouched() {
    let registry = registry_with(FakeScss::default());

    let outcome = registry
        .load_file(InputFile::in_memory(
            "App.vue",
            r#"<script lang="">  let x = 1;  </script>"#,
        ))
        .await
        .unwrap();

    assert_eq!(outcome, LoadOutcome::NotApplicable);
}
