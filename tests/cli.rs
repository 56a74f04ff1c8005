//! Tests for the `linkspy` binary: output format, exit status and flags.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn linkspy() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("linkspy"));
    cmd.env("NO_COLOR", "1").arg("--no-progress");
    cmd
}

fn write(root: &Path, rel: &str, contents: impl AsRef<[u8]>) {
    let p = root.join(rel);
    fs::create_dir_all(p.parent().unwrap()).unwrap();
    fs::write(p, contents).unwrap();
}

#[test]
fn broken_link_line_and_total() {
    let vault = TempDir::new().unwrap();
    write(vault.path(), "notes/a.md", "See [[cat.png]]\n");

    let doc = vault.path().join("notes/a.md");
    let resolved = vault.path().join("Assets/Attachments/cat.png");
    let expected = format!(
        "Broken link found in file '{}' at line 1: {}\n\nTotal broken links found: 1\n",
        doc.display(),
        resolved.display()
    );

    linkspy()
        .arg(vault.path())
        .assert()
        .success()
        .stdout(predicate::str::diff(expected));
}

#[test]
fn clean_vault_exits_zero() {
    let vault = TempDir::new().unwrap();
    write(vault.path(), "figs/diagram.gif", b"GIF89a");
    write(vault.path(), "notes/b.md", "![[figs/diagram.gif]]\n");

    linkspy()
        .arg(vault.path())
        .assert()
        .success()
        .stdout("\nTotal broken links found: 0\n");
}

#[test]
fn unreadable_document_is_reported_and_run_completes() {
    let vault = TempDir::new().unwrap();
    write(vault.path(), "bad.md", [0xffu8, 0xfe, b'\n']);
    write(vault.path(), "ok.md", "[[x.png]]\n");

    linkspy()
        .arg(vault.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("An error occurred while processing file '"))
        .stdout(predicate::str::contains("bad.md"))
        .stdout(predicate::str::ends_with("Total broken links found: 1\n"));
}

#[test]
fn vault_from_environment() {
    let vault = TempDir::new().unwrap();
    write(vault.path(), "a.md", "[[x.png]]\n");

    linkspy()
        .env("LINKSPY_VAULT", vault.path())
        .assert()
        .success()
        .stdout(predicate::str::ends_with("Total broken links found: 1\n"));
}

#[test]
fn json_report() {
    let vault = TempDir::new().unwrap();
    write(vault.path(), "a.md", "[[x.png]]\n");

    let output = linkspy().arg(vault.path()).arg("--json").output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["stats"]["total_findings"], 1);
    assert_eq!(json["documents"][0]["findings"][0]["line"], 1);
    assert_eq!(json["documents"][0]["findings"][0]["reference"], "x.png");
}

#[test]
fn output_file_leaves_stdout_empty() {
    let vault = TempDir::new().unwrap();
    write(vault.path(), "a.md", "[[x.png]]\n");
    let out = vault.path().join("out/report.txt");

    linkspy()
        .arg(vault.path())
        .arg("-q")
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout("");

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.ends_with("Total broken links found: 1\n"));
}

#[test]
fn unused_attachments_check() {
    let vault = TempDir::new().unwrap();
    write(vault.path(), "Assets/Attachments/orphan.png", b"x");
    write(vault.path(), "a.md", "nothing\n");

    linkspy()
        .arg(vault.path())
        .args(["--check", "unused-attachments"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unused attachment: "))
        .stdout(predicate::str::contains("orphan.png"))
        .stdout(predicate::str::ends_with("Total unused attachments found: 1\n"));
}

#[test]
fn missing_notes_check() {
    let vault = TempDir::new().unwrap();
    write(vault.path(), "a.md", "[[Nowhere]]\n");

    linkspy()
        .arg(vault.path())
        .args(["--check", "missing-notes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Missing note 'Nowhere' linked from file '"))
        .stdout(predicate::str::ends_with("Total links to missing notes found: 1\n"));
}

#[test]
fn walk_failures_are_listed_on_stderr() {
    let vault = TempDir::new().unwrap();
    let missing = vault.path().join("no-such-vault");

    linkspy()
        .arg(&missing)
        .assert()
        .success()
        .stdout("\nTotal broken links found: 0\n")
        .stderr(predicate::str::contains("vault entries could not be walked"))
        .stderr(predicate::str::contains("no-such-vault"));
}

#[test]
fn quiet_hides_walk_failures() {
    let vault = TempDir::new().unwrap();

    linkspy()
        .arg(vault.path().join("no-such-vault"))
        .arg("-q")
        .assert()
        .success()
        .stderr(predicate::str::contains("could not be walked").not());
}

#[test]
fn absolute_attachment_folder_is_rejected() {
    let vault = TempDir::new().unwrap();

    linkspy()
        .arg(vault.path())
        .args(["--attachments", "/abs/path"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn missing_vault_argument_fails() {
    linkspy()
        .env_remove("LINKSPY_VAULT")
        .assert()
        .failure();
}
