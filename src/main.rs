use clap::{Parser, ValueEnum};
use crowley_reports::config::{DEFAULT_BRAND, DEFAULT_REPORT_DATE};
use crowley_reports::inspect::{inspect_pdf_path, require_valid_output};
use crowley_reports::{RenderConfig, ReportError, ReportKind, render_report};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportType {
    Assessment,
    InvestorMatches,
}

impl From<ReportType> for ReportKind {
    fn from(value: ReportType) -> Self {
        match value {
            ReportType::Assessment => ReportKind::Assessment,
            ReportType::InvestorMatches => ReportKind::InvestorMatches,
        }
    }
}

/// Generate a branded PDF report from a JSON record.
#[derive(Debug, Parser)]
#[command(name = "crowley-report", version)]
struct Args {
    /// Report type.
    #[arg(long = "type", value_enum)]
    report_type: ReportType,
    /// Company name shown in the title and footer.
    #[arg(long)]
    company: String,
    /// JSON data file path.
    #[arg(long)]
    data: PathBuf,
    /// Output PDF path.
    #[arg(long)]
    output: PathBuf,
    /// Report date shown in the subtitle.
    #[arg(long, default_value = DEFAULT_REPORT_DATE)]
    date: String,
    /// Brand shown in the subtitle and footer.
    #[arg(long, default_value = DEFAULT_BRAND)]
    brand: String,
    /// Draw a running title and rule on every page after the first.
    #[arg(long)]
    running_header: bool,
    /// Re-open the written PDF and report its page count.
    #[arg(long)]
    verify: bool,
    /// Log layout decisions (same as RUST_LOG=debug).
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(args: Args) -> Result<(), ReportError> {
    let config = RenderConfig::builder()
        .brand(args.brand)
        .report_date(args.date)
        .running_header(args.running_header)
        .build()?;
    let output = render_report(
        args.report_type.into(),
        &args.company,
        &args.data,
        &args.output,
        config,
    )?;
    println!("Report generated: {}", output.path.display());

    if args.verify {
        let report = inspect_pdf_path(&output.path)?;
        require_valid_output(&report)?;
        println!(
            "Verified: {} page(s), {} bytes, PDF {}",
            report.page_count, report.file_size_bytes, report.pdf_version
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "report generation failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
