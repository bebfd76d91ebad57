use super::{DEFAULT_SPACER_IN, ReportGenerator, ReportKind, ReportOutput};
use crate::components::{CALLOUT_BOX_WIDTH_IN, TIER_HEADER_WIDTH_IN, callout_box, tier_header};
use crate::config::RenderConfig;
use crate::data::{InvestorMatch, InvestorMatchesData, rows_to_text};
use crate::error::ReportError;
use crate::style::{GREEN, NAVY};
use crate::table::CellContent;
use std::path::PathBuf;

pub const PROFILE_WIDTHS_IN: [f32; 2] = [1.8, 5.2];
pub const SUMMARY_WIDTHS_IN: [f32; 6] = [0.4, 1.6, 0.5, 0.6, 1.0, 1.3];
pub const DETAIL_WIDTHS_IN: [f32; 2] = [1.2, 5.5];
pub const SUMMARY_LIMIT: usize = 10;
pub const DETAIL_LIMIT: usize = 5;

const OUTREACH_TIERS: [(u8, &str, f32); 3] = [
    (1, "TIER 1: Lead Investor Candidates", 0.15),
    (2, "TIER 2: Syndicate Participants", 0.15),
    (3, "TIER 3: Strategic / Specialized", 0.25),
];

pub fn summary_row(rank: usize, investor: &InvestorMatch) -> Vec<String> {
    vec![
        rank.to_string(),
        investor.name.clone(),
        format!("{:.2}", investor.score),
        investor.tier.clone().unwrap_or_default(),
        investor.check_range.clone(),
        investor.fit.clone(),
    ]
}

pub fn detail_heading(rank: usize, investor: &InvestorMatch) -> String {
    format!(
        "{rank}. {} \u{2014} Score: {:.2} ({})",
        investor.name,
        investor.score,
        investor.tier.as_deref().unwrap_or("Good")
    )
}

pub struct InvestorMatchesReport {
    report: ReportGenerator,
    data: InvestorMatchesData,
}

impl InvestorMatchesReport {
    pub fn new(
        company: impl Into<String>,
        data: InvestorMatchesData,
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
        let subtitle = format!("{} | {} | 40/40/20 Algorithm", config.report_date, config.brand);
        self.report
            .add_title(ReportKind::InvestorMatches.title(), Some(&subtitle));

        self.report.add_section("Startup Profile");
        if !self.data.profile.is_empty() {
            self.report
                .add_text_table(rows_to_text(&self.data.profile), &PROFILE_WIDTHS_IN);
        }
        self.report.add_spacer(0.25);

        self.report.add_section("Top 10 Investor Matches - Summary");
        if !self.data.matches.is_empty() {
            let mut rows = vec![
                ["Rank", "Investor", "Score", "Tier", "Check Range", "Key Fit"]
                    .map(String::from)
                    .to_vec(),
            ];
            rows.extend(
                self.data
                    .matches
                    .iter()
                    .take(SUMMARY_LIMIT)
                    .enumerate()
                    .map(|(idx, investor)| summary_row(idx + 1, investor)),
            );
            self.report.add_text_table(rows, &SUMMARY_WIDTHS_IN);
        }
        self.report.add_spacer(DEFAULT_SPACER_IN);

        self.report.add_page_break();

        self.report.add_section("Top 5 Investor Profiles - Detailed");
        for (idx, investor) in self.data.matches.iter().take(DETAIL_LIMIT).enumerate() {
            add_detail(&mut self.report, idx + 1, investor);
        }

        self.report.add_page_break();

        self.report.add_section("Recommended Outreach Strategy");
        let tiers = &self.data.outreach_tiers;
        for ((tier, heading, spacer), items) in OUTREACH_TIERS
            .into_iter()
            .zip([&tiers.tier1, &tiers.tier2, &tiers.tier3])
        {
            if items.is_empty() {
                continue;
            }
            self.report
                .push(tier_header(heading, tier, TIER_HEADER_WIDTH_IN));
            for item in items {
                self.report.add_bullet(item);
            }
            self.report.add_spacer(spacer);
        }

        if let Some(insight) = self.data.insight.as_deref().filter(|text| !text.is_empty()) {
            self.report.push(callout_box(
                &format!("KEY INSIGHT: {insight}"),
                GREEN,
                CALLOUT_BOX_WIDTH_IN,
            ));
        }
    }
}

fn add_detail(report: &mut ReportGenerator, rank: usize, investor: &InvestorMatch) {
    report.add_subsection(&detail_heading(rank, investor));
    let rows = [
        ("Website", &investor.website),
        ("HQ", &investor.hq),
        ("Check Range", &investor.check_range),
        ("Thesis", &investor.thesis),
    ]
    .into_iter()
    .map(|(label, value)| vec![CellContent::from(label), CellContent::from(value.as_str())])
    .collect();
    report.add_table(rows, &DETAIL_WIDTHS_IN, NAVY);

    if let Some(notes) = investor.fit_notes.as_deref().filter(|text| !text.is_empty()) {
        report.add_body(&format!("<b>Fit Notes:</b> {notes}"));
    }
    report.add_spacer(0.15);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::inspect_pdf_bytes;

    fn investor(name: &str, score: f64, tier: Option<&str>) -> InvestorMatch {
        InvestorMatch {
            name: name.to_string(),
            score,
            tier: tier.map(str::to_string),
            check_range: "$500K-$2M".to_string(),
            fit: "Robotics".to_string(),
            ..InvestorMatch::default()
        }
    }

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|window| window == needle.as_bytes())
    }

    fn count(haystack: &[u8], needle: &str) -> usize {
        haystack
            .windows(needle.len())
            .filter(|window| *window == needle.as_bytes())
            .count()
    }

    #[test]
    fn rows_and_headings() {
        let excellent = investor("Fund A", 0.876, Some("Excellent"));
        assert_eq!(
            summary_row(1, &excellent),
            vec!["1", "Fund A", "0.88", "Excellent", "$500K-$2M", "Robotics"]
        );
        assert_eq!(
            detail_heading(2, &investor("Fund B", 0.5, None)),
            "2. Fund B \u{2014} Score: 0.50 (Good)"
        );
        assert_eq!(summary_row(3, &investor("Fund C", 0.0, None))[3], "");
    }

    #[test]
    fn summary_and_details_are_capped() {
        let data = InvestorMatchesData {
            matches: (1..=12)
                .map(|idx| investor(&format!("Fund {idx:02}"), 1.0 - idx as f64 / 100.0, Some("Good")))
                .collect(),
            outreach_tiers: crate::data::OutreachTiers {
                tier1: vec!["Fund 01".to_string()],
                tier2: Vec::new(),
                tier3: vec!["Fund 12".to_string()],
            },
            insight: Some("Lead with Fund 01.".to_string()),
            ..InvestorMatchesData::default()
        };
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("matches.pdf");
        let output = InvestorMatchesReport::new("Acme Robotics", data, &path, RenderConfig::default())
            .generate()
            .expect("generate");
        let bytes = std::fs::read(&path).expect("read");
        assert!(output.page_count >= 3);
        assert_eq!(inspect_pdf_bytes(&bytes).expect("inspect").page_count, output.page_count);

        assert!(contains(&bytes, "(10) Tj"));
        assert!(!contains(&bytes, "(11) Tj"));
        assert_eq!(count(&bytes, "(Thesis) Tj"), 5);
        assert!(contains(&bytes, "(TIER 1: Lead Investor Candidates) Tj"));
        assert!(!contains(&bytes, "(TIER 2: Syndicate Participants) Tj"));
        assert!(contains(&bytes, "(TIER 3: Strategic / Specialized) Tj"));
        assert!(contains(&bytes, "(KEY INSIGHT: Lead with Fund 01.) Tj"));
    }

    fn render(data: InvestorMatchesData) -> Vec<u8> {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("matches.pdf");
        InvestorMatchesReport::new("Acme Robotics", data, &path, RenderConfig::default())
            .generate()
            .expect("generate");
        std::fs::read(&path).expect("read")
    }

    #[test]
    fn detail_tables_use_the_navy_header_for_every_tier() {
        let data = InvestorMatchesData {
            matches: vec![InvestorMatch {
                website: "fund-a.vc".to_string(),
                hq: "Austin, TX".to_string(),
                thesis: "Industrial automation".to_string(),
                ..investor("Fund A", 0.93, Some("Excellent"))
            }],
            ..InvestorMatchesData::default()
        };
        let bytes = render(data);
        assert!(contains(&bytes, "(Website) Tj"));
        assert!(contains(&bytes, "0.102 0.212 0.365 rg"));
        assert!(!contains(&bytes, "0.22 0.631 0.412 rg"));
    }

    #[test]
    fn empty_notes_and_insight_are_skipped() {
        let data = InvestorMatchesData {
            matches: vec![InvestorMatch {
                fit_notes: Some(String::new()),
                ..investor("Fund A", 0.8, Some("Good"))
            }],
            insight: Some(String::new()),
            ..InvestorMatchesData::default()
        };
        let bytes = render(data);
        assert!(contains(&bytes, "(Thesis) Tj"));
        assert!(!contains(&bytes, "Fit Notes:"));
        assert!(!contains(&bytes, "KEY INSIGHT:"));
    }

    #[test]
    fn empty_record_keeps_section_frame() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.pdf");
        let output = InvestorMatchesReport::new(
            "Acme Robotics",
            InvestorMatchesData::default(),
            &path,
            RenderConfig::default(),
        )
        .generate()
        .expect("generate");
        assert_eq!(output.page_count, 3);
        let bytes = std::fs::read(&path).expect("read");
        assert!(contains(&bytes, "(Startup Profile) Tj"));
        assert!(contains(&bytes, "(Recommended Outreach Strategy) Tj"));
        assert!(!contains(&bytes, "(Rank) Tj"));
    }
}
