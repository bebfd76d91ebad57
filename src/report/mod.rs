//! Story assembly and PDF output shared by every report kind.

mod assessment;
mod investor_matches;

pub use assessment::InvestmentAssessmentReport;
pub use investor_matches::InvestorMatchesReport;

use crate::canvas::Canvas;
use crate::components::{page_footer, page_header};
use crate::config::RenderConfig;
use crate::data::{AssessmentData, InvestorMatchesData, load_json};
use crate::doc_context::DocContext;
use crate::doc_template::DocTemplate;
use crate::error::ReportError;
use crate::flowable::{Flowable, PageBreak, Paragraph, Spacer};
use crate::metrics::DocumentMetrics;
use crate::page_template::{OnPageCallback, PageTemplate};
use crate::pdf::{PdfOptions, document_to_pdf_path};
use crate::style::{NAVY, StyleSheet, standard_table_style};
use crate::table::{CellContent, Table};
use crate::types::{Color, Pt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_SPACER_IN: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Assessment,
    InvestorMatches,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Assessment => "assessment",
            ReportKind::InvestorMatches => "investor-matches",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Assessment => "Investment Assessment",
            ReportKind::InvestorMatches => "Investor Matches Report",
        }
    }
}

/// What a finished build wrote.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub path: PathBuf,
    pub page_count: usize,
    pub bytes_written: usize,
    pub metrics: DocumentMetrics,
}

/// Collects a story of flowables for one company and writes it as a PDF.
pub struct ReportGenerator {
    company: String,
    output_path: PathBuf,
    config: RenderConfig,
    styles: StyleSheet,
    title: Option<String>,
    story: Vec<Box<dyn Flowable>>,
}

impl ReportGenerator {
    pub fn new(
        company: impl Into<String>,
        output_path: impl Into<PathBuf>,
        config: RenderConfig,
    ) -> Self {
        Self {
            company: company.into(),
            output_path: output_path.into(),
            config,
            styles: StyleSheet::brand(),
            title: None,
            story: Vec::new(),
        }
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    pub fn story_len(&self) -> usize {
        self.story.len()
    }

    pub fn push(&mut self, flowable: impl Flowable + 'static) {
        self.story.push(Box::new(flowable));
    }

    /// Title and company name in the title style, then the optional subtitle.
    pub fn add_title(&mut self, title: &str, subtitle: Option<&str>) {
        if self.title.is_none() {
            self.title = Some(title.to_string());
        }
        let title_paragraph = Paragraph::new(title, &self.styles.title);
        let company_paragraph = Paragraph::new(&self.company, &self.styles.title);
        self.push(title_paragraph);
        self.push(company_paragraph);
        if let Some(subtitle) = subtitle {
            self.add_spacer(0.1);
            let subtitle_paragraph = Paragraph::new(subtitle, &self.styles.subtitle);
            self.push(subtitle_paragraph);
        }
        self.add_spacer(DEFAULT_SPACER_IN);
    }

    pub fn add_section(&mut self, title: &str) {
        let paragraph = Paragraph::new(title, &self.styles.h1);
        self.push(paragraph);
    }

    pub fn add_subsection(&mut self, title: &str) {
        let paragraph = Paragraph::new(title, &self.styles.h2);
        self.push(paragraph);
    }

    pub fn add_body(&mut self, text: &str) {
        let paragraph = Paragraph::new(text, &self.styles.body);
        self.push(paragraph);
    }

    pub fn add_bullet(&mut self, text: &str) {
        let paragraph = Paragraph::new(text, &self.styles.bullet);
        self.push(paragraph);
    }

    pub fn add_spacer(&mut self, inches: f32) {
        self.push(Spacer::new_pt(Pt::inches(inches)));
    }

    pub fn add_page_break(&mut self) {
        self.push(PageBreak::new());
    }

    /// Standard-styled table; the first row is the header and repeats on
    /// continuation pages.
    pub fn add_table(&mut self, rows: Vec<Vec<CellContent>>, col_widths_in: &[f32], header: Color) {
        let widths = col_widths_in.iter().map(|width| Pt::inches(*width)).collect();
        let table = Table::new(rows, widths)
            .with_style(&standard_table_style(header))
            .repeat_rows(1);
        self.push(table);
    }

    pub fn add_text_table(&mut self, rows: Vec<Vec<String>>, col_widths_in: &[f32]) {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(CellContent::from).collect())
            .collect();
        self.add_table(rows, col_widths_in, NAVY);
    }

    fn document_title(&self) -> String {
        match &self.title {
            Some(title) => format!("{title} - {}", self.company),
            None => self.company.clone(),
        }
    }

    /// Footer on every page, plus the running header when configured.
    fn default_decoration(&self) -> OnPageCallback {
        let brand = self.config.brand.clone();
        let company = self.company.clone();
        let header = self
            .config
            .running_header
            .then(|| self.document_title());
        Arc::new(move |canvas: &mut Canvas, ctx: &DocContext| {
            page_footer(canvas, ctx, &brand, &company, "");
            if let Some(title) = header.as_deref() {
                page_header(canvas, ctx, title);
            }
        })
    }

    pub fn build(self) -> Result<ReportOutput, ReportError> {
        self.build_with(None)
    }

    /// Lays out the story and writes the PDF; `decoration` replaces the
    /// default page chrome.
    pub fn build_with(self, decoration: Option<OnPageCallback>) -> Result<ReportOutput, ReportError> {
        let decoration = decoration.unwrap_or_else(|| self.default_decoration());
        let page_size = self.config.page_size;
        let margins = self.config.margins;
        let template = |name: &str| {
            let callback = decoration.clone();
            PageTemplate::new(name, page_size)
                .with_margins(margins)
                .set_on_page(move |canvas, ctx| callback(canvas, ctx))
        };
        let options = PdfOptions {
            title: Some(self.document_title()),
            author: Some(self.config.brand.clone()),
            subject: self.title.clone(),
        };

        let mut doc = DocTemplate::new(vec![template("first"), template("later")]);
        let flowables = self.story.len();
        for flowable in self.story {
            doc.add_flowable(flowable);
        }
        let (document, mut metrics) = doc.build_with_metrics()?;
        let bytes_written = document_to_pdf_path(&document, &options, &self.output_path)?;
        metrics.total_bytes = bytes_written;

        tracing::info!(
            company = %self.company,
            path = %self.output_path.display(),
            pages = metrics.page_count(),
            flowables,
            bytes = bytes_written,
            render_ms = metrics.total_render_ms,
            "report written"
        );
        Ok(ReportOutput {
            path: self.output_path,
            page_count: metrics.page_count(),
            bytes_written,
            metrics,
        })
    }
}

/// Loads the JSON record at `data_path` and renders the matching report.
pub fn render_report(
    kind: ReportKind,
    company: &str,
    data_path: &Path,
    output_path: &Path,
    config: RenderConfig,
) -> Result<ReportOutput, ReportError> {
    tracing::debug!(kind = kind.as_str(), data = %data_path.display(), "loading report data");
    match kind {
        ReportKind::Assessment => {
            let data: AssessmentData = load_json(data_path)?;
            InvestmentAssessmentReport::new(company, data, output_path, config).generate()
        }
        ReportKind::InvestorMatches => {
            let data: InvestorMatchesData = load_json(data_path)?;
            InvestorMatchesReport::new(company, data, output_path, config).generate()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::inspect_pdf_path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn generator(dir: &tempfile::TempDir) -> ReportGenerator {
        ReportGenerator::new("Acme Robotics", dir.path().join("out.pdf"), RenderConfig::default())
    }

    #[test]
    fn title_block_has_company_and_spacers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut report = generator(&dir);
        report.add_title("Investment Assessment", Some("January 2026 | Crowley Capital"));
        // title, company, spacer, subtitle, spacer
        assert_eq!(report.story_len(), 5);
        report.add_title("Second", None);
        assert_eq!(report.story_len(), 8);
        assert_eq!(report.document_title(), "Investment Assessment - Acme Robotics");
    }

    #[test]
    fn build_writes_a_readable_pdf() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut report = generator(&dir);
        report.add_title("Investment Assessment", None);
        report.add_section("Company Overview");
        report.add_text_table(
            vec![
                vec!["Stage".to_string(), "Seed".to_string()],
                vec!["HQ".to_string(), "Austin, TX".to_string()],
            ],
            &[2.0, 4.5],
        );
        report.add_page_break();
        report.add_body("<b>Second</b> page");
        let output = report.build().expect("build");
        assert_eq!(output.page_count, 2);
        assert!(output.bytes_written > 0);
        assert_eq!(output.metrics.total_bytes, output.bytes_written);

        let inspected = inspect_pdf_path(&output.path).expect("inspect");
        assert_eq!(inspected.page_count, 2);
        assert_eq!(inspected.file_size_bytes, output.bytes_written);
        assert_eq!(
            inspected.title.as_deref(),
            Some("Investment Assessment - Acme Robotics")
        );
    }

    #[test]
    fn custom_decoration_runs_once_per_page() {
        let dir = tempfile::tempdir().expect("tempdir");
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let mut report = generator(&dir);
        report.add_body("one");
        report.add_page_break();
        report.add_body("two");
        report.add_page_break();
        report.add_body("three");
        let output = report
            .build_with(Some(Arc::new(move |_canvas: &mut Canvas, _ctx: &DocContext| {
                seen.fetch_add(1, Ordering::SeqCst);
            })))
            .expect("build");
        assert_eq!(output.page_count, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn unwritable_output_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut report = ReportGenerator::new(
            "Acme",
            dir.path().join("missing").join("out.pdf"),
            RenderConfig::default(),
        );
        report.add_body("text");
        assert!(matches!(report.build(), Err(ReportError::Io(_))));
    }

    #[test]
    fn report_kind_names() {
        assert_eq!(ReportKind::Assessment.as_str(), "assessment");
        assert_eq!(ReportKind::InvestorMatches.as_str(), "investor-matches");
        assert_eq!(ReportKind::InvestorMatches.title(), "Investor Matches Report");
    }
}
