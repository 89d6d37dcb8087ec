//! Integration tests for the command-line front end.

mod common;

use std::process::Command;

use common::*;

#[test]
fn test_debug_directory_failure_skips_only_that_image() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let model = write_artifact(dir.path(), "model.ecosort", linear_model(DEFAULT_LEN), Provenance::Trained);

    let first = dir.path().join("first.png");
    let second = dir.path().join("second.png");
    textured_image(80, 120).save(&first)?;
    textured_image(120, 80).save(&second)?;

    // The first image's debug directory already holds output from an earlier run
    let debug_root = dir.path().join("debug");
    std::fs::create_dir_all(debug_root.join("01_first"))?;
    std::fs::write(debug_root.join("01_first/leftover.txt"), b"x")?;

    let output = Command::new(env!("CARGO_BIN_EXE_ecosort"))
        .arg(&first)
        .arg(&second)
        .arg("--model")
        .arg(&model)
        .arg("--debug-out")
        .arg(&debug_root)
        .output()?;

    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();

    assert!(!output.status.success());
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("second.png"));
    assert!(lines[0].contains("confidence"));
    assert!(debug_root.join("02_second/02_canonical_resize/01.png").is_file());
    Ok(())
}

#[test]
fn test_missing_model_is_fatal() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image = dir.path().join("item.png");
    textured_image(64, 64).save(&image)?;

    let output = Command::new(env!("CARGO_BIN_EXE_ecosort"))
        .arg(&image)
        .arg("--model")
        .arg(dir.path().join("absent.ecosort"))
        .output()?;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    Ok(())
}
