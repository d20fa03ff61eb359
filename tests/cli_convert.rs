//! Conversion subcommands end to end: input files on disk, fake backend, output directory.

mod common;

use std::io;
use std::path::Path;

use common::{spawn_backend, FakeBackend};
use md_utility::action::convert::{process_convert, process_health, process_sample_theme};
use md_utility::config::config::ConvertCommand;
use md_utility::config::ports::{AppConfig, ConfigPort};
use md_utility::service::config_service::DefaultConfigAdapter;
use md_utility::utils::zip::list_archive_entries;

fn config_for(root: &Path, api_url: String) -> AppConfig {
    let mut config = DefaultConfigAdapter::new(root.to_path_buf()).get_config().unwrap();
    config.api_url = api_url;
    config
}

#[tokio::test]
async fn to_md_writes_markdown_next_to_stem() {
    let backend = FakeBackend::default();
    let url = spawn_backend(backend.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Report.docx");
    std::fs::write(&input, [1u8, 2, 3, 4]).unwrap();
    let output = dir.path().join("out");

    let summary = process_convert(
        &config_for(dir.path(), url),
        ConvertCommand::ToMd { input, output: output.clone() },
    )
    .await
    .unwrap();

    let written = std::fs::read_to_string(output.join("Report.md")).unwrap();
    assert_eq!(written, "# Report.docx\n\n4 bytes");
    assert!(summary.contains("Report.md"));
    assert_eq!(backend.hits(), 1);
}

#[tokio::test]
async fn to_word_writes_each_document_and_archive() {
    let backend = FakeBackend::default();
    let url = spawn_backend(backend.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let intro = dir.path().join("intro.md");
    let guide = dir.path().join("guide.md");
    std::fs::write(&intro, "# Intro").unwrap();
    std::fs::write(&guide, "# Guide").unwrap();
    let output = dir.path().join("out");

    process_convert(
        &config_for(dir.path(), url),
        ConvertCommand::ToWord {
            inputs: vec![intro, guide],
            theme: None,
            output: output.clone(),
        },
    )
    .await
    .unwrap();

    assert_eq!(std::fs::read(output.join("intro.docx")).unwrap(), b"# Intro");
    assert_eq!(std::fs::read(output.join("guide.docx")).unwrap(), b"# Guide");
    let archive = std::fs::read(output.join("converted.zip")).unwrap();
    let mut entries = list_archive_entries(&archive).unwrap();
    entries.sort();
    assert_eq!(entries, vec!["guide.docx", "intro.docx"]);
}

#[tokio::test]
async fn missing_input_fails_before_any_request() {
    let backend = FakeBackend::default();
    let url = spawn_backend(backend.clone()).await;
    let dir = tempfile::tempdir().unwrap();

    let err = process_convert(
        &config_for(dir.path(), url),
        ConvertCommand::ToMd {
            input: dir.path().join("missing.docx"),
            output: dir.path().join("out"),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
    assert_eq!(backend.hits(), 0);
    assert!(!dir.path().join("out").exists());
}

#[tokio::test]
async fn empty_markdown_is_rejected_locally() {
    let backend = FakeBackend::default();
    let url = spawn_backend(backend.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let blank = dir.path().join("blank.md");
    std::fs::write(&blank, "").unwrap();

    let err = process_convert(
        &config_for(dir.path(), url),
        ConvertCommand::ToWord {
            inputs: vec![blank],
            theme: None,
            output: dir.path().join("out"),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    assert_eq!(backend.hits(), 0);
}

#[tokio::test]
async fn health_and_sample_theme_commands() {
    let backend = FakeBackend::default();
    let url = spawn_backend(backend.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), url);

    let status = process_health(&config).await.unwrap();
    assert!(status.contains("ok"));
    assert_eq!(backend.health_calls(), 1);

    let output = dir.path().join("themes");
    process_sample_theme(&config, &output).await.unwrap();
    assert_eq!(std::fs::read(output.join("custom-theme.docx")).unwrap(), b"PK-theme");
}
