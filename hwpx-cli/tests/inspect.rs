use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn input(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.md");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn inspect_defaults_to_model_json() {
    let (dir, path) = input("# Hello\n\nSome *text*.\n");

    let mut cmd = cargo_bin_cmd!("md2hwpx");
    cmd.current_dir(dir.path()).arg("inspect").arg(&path);

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["blocks"][0]["style"], "Heading1");
    assert_eq!(value["blocks"][1]["kind"]["type"], "paragraph");
}

#[test]
fn inspect_preview_text() {
    let (dir, path) = input("# Hello\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");

    let mut cmd = cargo_bin_cmd!("md2hwpx");
    cmd.current_dir(dir.path())
        .arg("inspect")
        .arg(&path)
        .arg("preview-text");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Hello").and(predicate::str::contains("1\t2")));
}

#[test]
fn inspect_rejects_unknown_transform() {
    let (dir, path) = input("# Hello\n");

    let mut cmd = cargo_bin_cmd!("md2hwpx");
    cmd.current_dir(dir.path())
        .arg("inspect")
        .arg(&path)
        .arg("ast-tag");
    cmd.assert().failure();
}

#[test]
fn list_transforms() {
    let mut cmd = cargo_bin_cmd!("md2hwpx");
    cmd.arg("--list-transforms");
    cmd.assert().success().stdout(
        predicate::str::contains("model-json")
            .and(predicate::str::contains("catalog-json"))
            .and(predicate::str::contains("markdown-json")),
    );
}
