use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn crowley_report() -> Command {
    Command::cargo_bin("crowley-report").expect("binary")
}

#[test]
fn assessment_report_is_written() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("assessment.pdf");
    crowley_report()
        .args(["--type", "assessment", "--company", "Acme Robotics", "--data"])
        .arg(fixture("assessment.json"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Report generated: "))
        .stdout(predicate::str::contains("assessment.pdf"));
    let bytes = std::fs::read(&output).expect("pdf");
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn investor_matches_with_verify() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("matches.pdf");
    crowley_report()
        .args([
            "--type",
            "investor-matches",
            "--company",
            "Acme Robotics",
            "--date",
            "February 2026",
            "--running-header",
            "--verify",
            "--data",
        ])
        .arg(fixture("investor_matches.json"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report generated: "))
        .stdout(predicate::str::contains("Verified: "));
    assert!(output.exists());
}

#[test]
fn unknown_report_type_is_rejected() {
    crowley_report()
        .args([
            "--type", "memo", "--company", "Acme", "--data", "d.json", "--output", "o.pdf",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'memo'"));
}

#[test]
fn missing_data_file_exits_with_one() {
    let dir = tempfile::tempdir().expect("tempdir");
    crowley_report()
        .args(["--type", "assessment", "--company", "Acme", "--data"])
        .arg(dir.path().join("missing.json"))
        .arg("--output")
        .arg(dir.path().join("out.pdf"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: io error"));
}

#[test]
fn blank_brand_is_a_configuration_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    crowley_report()
        .args(["--type", "assessment", "--company", "Acme", "--brand", " ", "--data"])
        .arg(fixture("assessment.json"))
        .arg("--output")
        .arg(dir.path().join("out.pdf"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid configuration"));
}
