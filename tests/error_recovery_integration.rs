//! Integration tests for failure handling and archive preservation

use anyhow::Result;
use asar_trim::pipeline::{PipelineConfig, PipelineError, Stage, TrimPipeline};
use std::fs;
use std::process::Command;

mod common;
use common::fixtures::ResourcesFixture;

fn get_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_asar-trim"))
}

#[test]
fn test_corrupt_archive_fails_at_extract_and_is_untouched() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let archive = temp_dir.path().join("app.asar");
    fs::write(&archive, b"definitely not an asar archive")?;

    let output = get_bin()
        .arg("--path")
        .arg(temp_dir.path())
        .arg("--backup")
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("extract"), "stderr: {stderr}");
    assert!(stderr.contains(".bak"), "suggestion should mention the backup");

    assert_eq!(fs::read(&archive)?, b"definitely not an asar archive");
    assert_eq!(
        fs::read(temp_dir.path().join("app.asar.bak"))?,
        b"definitely not an asar archive"
    );
    Ok(())
}

#[test]
fn test_invalid_package_json_aborts_before_repack() -> Result<()> {
    let fixture = ResourcesFixture::with_files(&[
        ("package.json", b"{ \"name\": "),
        ("README.md", b"docs"),
    ])?;
    let original = fs::read(fixture.archive())?;

    let err = TrimPipeline::new(PipelineConfig::new(fixture.resources_dir()))
        .run()
        .unwrap_err();

    assert!(matches!(err, PipelineError::DecisionFailed(_)));
    assert_eq!(err.stage(), Stage::WalkAndDecide);
    assert_eq!(fs::read(fixture.archive())?, original);
    Ok(())
}

#[test]
fn test_archive_path_that_is_a_directory_fails() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    fs::create_dir(temp_dir.path().join("app.asar"))?;

    let err = TrimPipeline::new(PipelineConfig::new(temp_dir.path()))
        .run()
        .unwrap_err();

    assert_eq!(err.stage(), Stage::Extract);
    assert!(temp_dir.path().join("app.asar").is_dir());
    Ok(())
}

#[test]
fn test_rerun_after_failure_replaces_stale_extraction() -> Result<()> {
    let fixture = ResourcesFixture::sample()?;
    let stale = fixture.resources_dir().join("app");
    fs::create_dir_all(stale.join("leftover"))?;
    fs::write(stale.join("leftover/old.js"), "stale")?;

    let report = TrimPipeline::new(PipelineConfig::new(fixture.resources_dir())).run()?;

    assert_eq!(report.files_deleted, 2);
    assert!(!stale.exists());
    common::assertions::assert_archive_lacks(&fixture.archive(), "leftover/old.js");
    Ok(())
}
