use crowley_reports::data::{AssessmentData, InvestorMatchesData, load_json};
use crowley_reports::inspect::{inspect_pdf_path, require_valid_output};
use crowley_reports::{
    InvestmentAssessmentReport, InvestorMatchesReport, RenderConfig, ReportError, ReportKind,
    Size, render_report,
};
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn contains(bytes: &[u8], needle: &str) -> bool {
    bytes
        .windows(needle.len())
        .any(|window| window == needle.as_bytes())
}

#[test]
fn assessment_fixture_renders_and_reopens() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output_path = dir.path().join("acme_assessment.pdf");
    let output = render_report(
        ReportKind::Assessment,
        "Acme Robotics",
        &fixture("assessment.json"),
        &output_path,
        RenderConfig::default(),
    )
    .expect("render");

    assert_eq!(output.path, output_path);
    assert!(output.page_count >= 2);

    let report = inspect_pdf_path(&output_path).expect("inspect");
    require_valid_output(&report).expect("valid");
    assert_eq!(report.page_count, output.page_count);
    assert_eq!(report.file_size_bytes, output.bytes_written);
    assert_eq!(
        report.title.as_deref(),
        Some("Investment Assessment - Acme Robotics")
    );
    assert!(report.fonts.contains(&"Helvetica".to_string()));
    assert!(report.fonts.contains(&"Helvetica-Bold".to_string()));

    let bytes = std::fs::read(&output_path).expect("read");
    assert!(contains(&bytes, "(January 2026 | Crowley Capital) Tj"));
    assert!(contains(&bytes, "(Crowley Capital | Acme Robotics | Page 1) Tj"));
    assert!(contains(&bytes, "(Crowley Capital | Acme Robotics | Page 2) Tj"));
    assert!(contains(&bytes, "(INVEST WITH CONDITIONS) Tj"));
}

#[test]
fn investor_matches_fixture_renders_three_sections() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output_path = dir.path().join("acme_matches.pdf");
    let data: InvestorMatchesData = load_json(&fixture("investor_matches.json")).expect("fixture");
    assert_eq!(data.matches.len(), 7);

    let output = InvestorMatchesReport::new("Acme Robotics", data, &output_path, RenderConfig::default())
        .generate()
        .expect("render");
    assert!(output.page_count >= 3);

    let report = inspect_pdf_path(&output_path).expect("inspect");
    assert_eq!(report.page_count, output.page_count);

    let bytes = std::fs::read(&output_path).expect("read");
    assert!(contains(&bytes, "(January 2026 | Crowley Capital | 40/40/20 Algorithm) Tj"));
    assert!(contains(&bytes, "(0.91) Tj"));
    assert!(contains(&bytes, "(Top 5 Investor Profiles - Detailed) Tj"));
    assert!(contains(&bytes, "(TIER 2: Syndicate Participants) Tj"));
}

#[test]
fn branding_and_page_size_come_from_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output_path = dir.path().join("branded.pdf");
    let data: AssessmentData = load_json(&fixture("assessment.json")).expect("fixture");
    let config = RenderConfig::builder()
        .page_size(Size::a4())
        .brand("Crowley Ventures")
        .report_date("March 2026")
        .running_header(true)
        .build()
        .expect("config");

    InvestmentAssessmentReport::new("Acme Robotics", data, &output_path, config)
        .generate()
        .expect("render");

    let bytes = std::fs::read(&output_path).expect("read");
    assert!(contains(&bytes, "(March 2026 | Crowley Ventures) Tj"));
    assert!(contains(&bytes, "(Crowley Ventures | Acme Robotics | Page 1) Tj"));
    assert!(contains(&bytes, "(Investment Assessment - Acme Robotics) Tj"));
    assert!(contains(&bytes, "/MediaBox [0 0 595.28 841.89]"));
}

#[test]
fn malformed_data_is_a_json_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_path = dir.path().join("bad.json");
    std::fs::write(&data_path, r#"{"risks": [{"notes": "no category"}]}"#).expect("write");
    let err = render_report(
        ReportKind::Assessment,
        "Acme",
        &data_path,
        &dir.path().join("out.pdf"),
        RenderConfig::default(),
    )
    .expect_err("invalid record");
    assert!(matches!(err, ReportError::Json { .. }));
    assert!(!dir.path().join("out.pdf").exists());
}
