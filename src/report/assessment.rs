use super::{DEFAULT_SPACER_IN, ReportGenerator, ReportKind, ReportOutput};
use crate::components::{
    METRICS_ROW_BOX_WIDTH_IN, MetricTile, RISK_SCALE_MAX, RiskMeter, VERDICT_BANNER_WIDTH_IN,
    metrics_row, verdict_banner,
};
use crate::config::RenderConfig;
use crate::data::{AssessmentData, Recommendation, Risk, rows_to_text};
use crate::error::ReportError;
use crate::style::{GOLD, GREEN, NAVY, RED};
use crate::table::CellContent;
use crate::types::Color;
use std::path::PathBuf;

pub const OVERVIEW_WIDTHS_IN: [f32; 2] = [2.0, 4.5];
pub const PROJECTION_WIDTHS_IN: [f32; 6] = [1.4, 1.0, 1.0, 1.0, 1.0, 1.0];
pub const RISK_WIDTHS_IN: [f32; 4] = [1.3, 0.7, 1.5, 2.7];

/// Banner colour for the headline verdict; anything unrecognised is gold.
pub fn verdict_color(name: Option<&str>) -> Color {
    match name.map(str::to_ascii_lowercase).as_deref() {
        Some("green") => GREEN,
        Some("red") => RED,
        _ => GOLD,
    }
}

/// Red below 5, gold below 7, green otherwise.
pub fn overall_risk_color(score: f64) -> Color {
    if score < 5.0 {
        RED
    } else if score < 7.0 {
        GOLD
    } else {
        GREEN
    }
}

pub fn recommendation_color(status: Option<&str>) -> Color {
    match status.map(str::to_ascii_lowercase).as_deref() {
        Some("pass") => GREEN,
        Some("conditional") => GOLD,
        Some("decline") => RED,
        _ => GOLD,
    }
}

fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|text| !text.is_empty())
}

pub struct InvestmentAssessmentReport {
    report: ReportGenerator,
    data: AssessmentData,
}

impl InvestmentAssessmentReport {
    pub fn new(
        company: impl Into<String>,
        data: AssessmentData,
        output_path: impl Into<PathBuf>,
        config: RenderConfig,
    ) -> Self {
        Self {
            report: ReportGenerator::new(company, output_path, config),
            data,
        }
    }

    pub fn generate(mut self) -> Result<ReportOutput, ReportError> {
        self.compose();
        self.report.build()
    }

    fn compose(&mut self) {
        let config = self.report.config();
        let subtitle = format!("{} | {}", config.report_date, config.brand);
        self.report
            .add_title(ReportKind::Assessment.title(), Some(&subtitle));

        let verdict = self.data.verdict.as_deref().unwrap_or("UNDER REVIEW");
        let color = verdict_color(self.data.verdict_color.as_deref());
        self.report
            .push(verdict_banner(verdict, color, VERDICT_BANNER_WIDTH_IN));
        self.report.add_spacer(0.3);

        if !self.data.metrics.is_empty() {
            let tiles: Vec<MetricTile> = self
                .data
                .metrics
                .iter()
                .map(|metric| {
                    MetricTile::new(metric.value.as_str(), metric.label.as_str())
                        .with_color(metric.resolved_color(NAVY))
                })
                .collect();
            self.report
                .push(metrics_row(&tiles, METRICS_ROW_BOX_WIDTH_IN));
            self.report.add_spacer(0.3);
        }

        self.report.add_section("Company Overview");
        if !self.data.overview.is_empty() {
            self.report
                .add_text_table(rows_to_text(&self.data.overview), &OVERVIEW_WIDTHS_IN);
        }
        self.report.add_spacer(DEFAULT_SPACER_IN);

        if let Some(summary) = non_empty(&self.data.summary) {
            self.report.add_section("Executive Summary");
            self.report.add_body(summary);
            self.report.add_spacer(DEFAULT_SPACER_IN);
        }

        if !self.data.revenue_projections.is_empty() {
            self.report.add_section("Revenue Projections");
            self.report.add_text_table(
                rows_to_text(&self.data.revenue_projections),
                &PROJECTION_WIDTHS_IN,
            );
            self.report.add_spacer(DEFAULT_SPACER_IN);
        }

        self.report.add_page_break();

        if !self.data.risks.is_empty() {
            self.add_risks();
        }

        if !self.data.red_flags.is_empty() {
            self.report.add_section("Red Flags & Concerns");
            for flag in &self.data.red_flags {
                self.report.add_bullet(flag);
            }
            self.report.add_spacer(DEFAULT_SPACER_IN);
        }

        if let Some(recommendation) = self
            .data
            .recommendation
            .as_ref()
            .filter(|recommendation| !recommendation.is_empty())
        {
            add_recommendation(&mut self.report, recommendation);
        }
    }

    fn add_risks(&mut self) {
        self.report.add_section("Risk Assessment");
        let mut rows = vec![
            ["Category", "Score", "Bar", "Notes"]
                .into_iter()
                .map(CellContent::from)
                .collect::<Vec<_>>(),
        ];
        rows.extend(self.data.risks.iter().map(risk_row));
        self.report.add_table(rows, &RISK_WIDTHS_IN, NAVY);
        self.report.add_spacer(0.15);

        let overall = self.data.overall_risk_score.clone().unwrap_or_default();
        let level = self.data.risk_level.as_deref().unwrap_or("UNKNOWN");
        let text = format!("Overall Risk Score: {overall}/10 \u{2014} {level} RISK");
        self.report.push(verdict_banner(
            &text,
            overall_risk_color(overall.value()),
            VERDICT_BANNER_WIDTH_IN,
        ));
        self.report.add_spacer(0.25);
    }
}

fn risk_row(risk: &Risk) -> Vec<CellContent> {
    vec![
        CellContent::from(risk.category.as_str()),
        CellContent::from(format!("{}/{RISK_SCALE_MAX}", risk.score)),
        CellContent::flowable(RiskMeter::new(risk.score.value(), RISK_SCALE_MAX)),
        CellContent::from(risk.notes.clone().unwrap_or_default()),
    ]
}

fn add_recommendation(report: &mut ReportGenerator, recommendation: &Recommendation) {
    report.add_section("Investment Recommendation");
    let color = recommendation_color(recommendation.status.as_deref());
    let verdict = recommendation.verdict.as_deref().unwrap_or_default();
    report.push(verdict_banner(verdict, color, VERDICT_BANNER_WIDTH_IN));
    report.add_spacer(0.15);

    if let Some(rationale) = non_empty(&recommendation.rationale) {
        report.add_body(rationale);
    }
    if !recommendation.terms.is_empty() {
        report.add_body("<b>Recommended Terms:</b>");
        for term in &recommendation.terms {
            report.add_bullet(term);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::inspect_pdf_bytes;

    fn sample() -> AssessmentData {
        serde_json::from_str(
            r#"{
                "verdict": "CONDITIONAL PASS",
                "verdict_color": "Green",
                "metrics": [["$2.4M", "ARR"], ["3.2x", "LTV:CAC", "gold"]],
                "overview": [["Field", "Detail"], ["Stage", "Seed"], ["Employees", 18]],
                "summary": "Strong team with <b>early traction</b>.",
                "revenue_projections": [["Year", "2026", "2027", "2028", "2029", "2030"],
                                        ["Revenue", "$2M", "$5M", "$9M", "$15M", "$24M"]],
                "risks": [{"category": "Market", "score": 7, "notes": "Crowded"},
                          {"category": "Team", "score": 8.5}],
                "overall_risk_score": 6.5,
                "risk_level": "MODERATE",
                "red_flags": ["Customer concentration"],
                "recommendation": {"status": "conditional", "verdict": "INVEST WITH CONDITIONS",
                                   "rationale": "Terms below.", "terms": ["Board seat", "Pro-rata"]}
            }"#,
        )
        .expect("sample")
    }

    fn render(data: AssessmentData) -> (ReportOutput, Vec<u8>) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("assessment.pdf");
        let output = InvestmentAssessmentReport::new("Acme Robotics", data, &path, RenderConfig::default())
            .generate()
            .expect("generate");
        let bytes = std::fs::read(&path).expect("read");
        (output, bytes)
    }

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|window| window == needle.as_bytes())
    }

    #[test]
    fn colour_rules() {
        assert_eq!(verdict_color(Some("GREEN")), GREEN);
        assert_eq!(verdict_color(Some("red")), RED);
        assert_eq!(verdict_color(Some("blue")), GOLD);
        assert_eq!(verdict_color(None), GOLD);
        assert_eq!(overall_risk_color(4.9), RED);
        assert_eq!(overall_risk_color(5.0), GOLD);
        assert_eq!(overall_risk_color(7.0), GREEN);
        assert_eq!(recommendation_color(Some("Pass")), GREEN);
        assert_eq!(recommendation_color(Some("decline")), RED);
        assert_eq!(recommendation_color(Some("maybe")), GOLD);
    }

    #[test]
    fn full_record_renders_every_section() {
        let (output, bytes) = render(sample());
        assert!(output.page_count >= 2);
        assert_eq!(inspect_pdf_bytes(&bytes).expect("inspect").page_count, output.page_count);
        for text in [
            "(Investment Assessment) Tj",
            "(CONDITIONAL PASS) Tj",
            "(Company Overview) Tj",
            "(Executive Summary) Tj",
            "(Revenue Projections) Tj",
            "(Risk Assessment) Tj",
            "(7/10) Tj",
            "(8.5/10) Tj",
            "(Red Flags & Concerns) Tj",
            "(Investment Recommendation) Tj",
            "(Recommended Terms:) Tj",
        ] {
            assert!(contains(&bytes, text), "missing {text}");
        }
        assert!(contains(&bytes, "(Overall Risk Score: 6.5/10 \\227 MODERATE RISK) Tj"));
    }

    #[test]
    fn blank_summary_and_recommendation_are_skipped() {
        let data: AssessmentData = serde_json::from_str(
            r#"{"summary": "", "risks": [{"category": "Market", "score": 6}],
                "recommendation": {}}"#,
        )
        .expect("data");
        let (output, bytes) = render(data);
        assert_eq!(output.page_count, 2);
        assert!(contains(&bytes, "(Risk Assessment) Tj"));
        assert!(!contains(&bytes, "(Executive Summary) Tj"));
        assert!(!contains(&bytes, "(Investment Recommendation) Tj"));
    }

    #[test]
    fn blank_rationale_leaves_only_the_recommendation_banner() {
        let data: AssessmentData = serde_json::from_str(
            r#"{"recommendation": {"status": "pass", "verdict": "INVEST", "rationale": ""}}"#,
        )
        .expect("data");
        let (_, bytes) = render(data);
        assert!(contains(&bytes, "(Investment Recommendation) Tj"));
        assert!(contains(&bytes, "(INVEST) Tj"));
        assert!(!contains(&bytes, "() Tj"));
    }

    #[test]
    fn empty_record_still_renders_the_fixed_frame() {
        let (output, bytes) = render(AssessmentData::default());
        assert_eq!(output.page_count, 1);
        assert!(contains(&bytes, "(UNDER REVIEW) Tj"));
        assert!(contains(&bytes, "(Company Overview) Tj"));
        assert!(!contains(&bytes, "(Risk Assessment) Tj"));
        assert!(!contains(&bytes, "(Executive Summary) Tj"));
    }
}
