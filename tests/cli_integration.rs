//! Binary-level tests for the restauro CLI

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use std::path::Path;

/// Write a small damaged test photo: gray background with a white scratch
fn write_test_image(path: &Path) {
    let mut image = RgbImage::from_pixel(24, 24, Rgb([120, 110, 100]));
    for y in 8..11 {
        for x in 6..18 {
            image.put_pixel(x, y, Rgb([255, 255, 255]));
        }
    }
    image.save(path).unwrap();
}

fn restauro() -> Command {
    Command::cargo_bin("restauro").unwrap()
}

#[test]
fn info_prints_version_and_formats() {
    restauro()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("restauro v"))
        .stdout(predicate::str::contains("Supported Input Formats"))
        .stdout(predicate::str::contains("Config File Locations"));
}

#[test]
fn restore_single_image() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("foto.png");
    let output = dir.path().join("out");
    write_test_image(&input);

    restauro()
        .arg("restore")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--denoise-strength")
        .arg("0")
        .assert()
        .success()
        .stdout(predicate::str::contains("foto.png"))
        .stdout(predicate::str::contains("Restoration Summary"));

    assert!(output.join("foto_restored.jpg").exists());
}

#[test]
fn restore_writes_mask_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("foto.png");
    let output = dir.path().join("out");
    let report = dir.path().join("report.json");
    write_test_image(&input);

    restauro()
        .arg("restore")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--denoise-strength")
        .arg("0")
        .arg("--save-mask")
        .arg("--report")
        .arg(&report)
        .assert()
        .success();

    assert!(output.join("foto_mask.png").exists());

    let json = std::fs::read_to_string(&report).unwrap();
    assert!(json.contains("\"succeeded\": 1"));
    assert!(json.contains("\"mask_coverage\""));
    assert!(json.contains("\"threshold\""));
}

#[test]
fn restore_directory_batch() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("fotos");
    let output = dir.path().join("out");
    std::fs::create_dir(&input).unwrap();
    write_test_image(&input.join("a.png"));
    write_test_image(&input.join("b.png"));
    std::fs::write(input.join("notes.txt"), "not an image").unwrap();

    restauro()
        .arg("restore")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--denoise-strength")
        .arg("0")
        .arg("--quiet")
        .assert()
        .success();

    assert!(output.join("a_restored.jpg").exists());
    assert!(output.join("b_restored.jpg").exists());
    assert!(!output.join("notes_restored.jpg").exists());
}

#[test]
fn dry_run_prints_plan_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("foto.png");
    let output = dir.path().join("out");
    write_test_image(&input);

    restauro()
        .arg("restore")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Execution Plan"))
        .stdout(predicate::str::contains("Damage Mask"))
        .stdout(predicate::str::contains("Inpainting"));

    assert!(!output.exists());
}

#[test]
fn missing_input_exits_with_input_not_found() {
    restauro()
        .arg("restore")
        .arg("/nonexistent/foto.png")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn even_kernel_exits_with_invalid_parameter() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("foto.png");
    write_test_image(&input);

    restauro()
        .arg("restore")
        .arg(&input)
        .arg("--kernel-size")
        .arg("4")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("kernel_size"));
}

#[test]
fn config_file_supplies_defaults_and_cli_wins() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("foto.png");
    let output = dir.path().join("out");
    let config = dir.path().join("restauro.toml");
    let report = dir.path().join("report.json");
    write_test_image(&input);
    std::fs::write(
        &config,
        "[params]\nthreshold = 240\ndenoise_strength = 0\nalpha = 1.0\n",
    )
    .unwrap();

    restauro()
        .arg("restore")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--config")
        .arg(&config)
        .arg("--threshold")
        .arg("250")
        .arg("--report")
        .arg(&report)
        .assert()
        .success();

    let json = std::fs::read_to_string(&report).unwrap();
    // CLI threshold wins, config alpha survives
    assert!(json.contains("\"threshold\": 250"));
    assert!(json.contains("\"alpha\": 1.0"));
}

#[test]
fn skip_existing_leaves_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("foto.png");
    let output = dir.path().join("out");
    write_test_image(&input);
    std::fs::create_dir(&output).unwrap();
    std::fs::write(output.join("foto_restored.jpg"), b"sentinel").unwrap();

    restauro()
        .arg("restore")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--skip-existing")
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipping"));

    let contents = std::fs::read(output.join("foto_restored.jpg")).unwrap();
    assert_eq!(contents, b"sentinel");
}
