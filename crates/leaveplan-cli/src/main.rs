//! leaveplan CLI - Vacation Balance & Timeline Toolkit
//!
//! Command-line interface for ingesting leave rosters, printing balance
//! summaries, and rendering timeline charts and reports.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use leaveplan_core::{BalanceSheet, EmployeeSummary, Renderer, Roster};
use leaveplan_render::{
    ExcelReportRenderer, HtmlDashboardRenderer, MermaidRenderer, SvgTimelineRenderer, TextRenderer,
    REPORT_FILENAME,
};
use leaveplan_report::tally;

#[derive(Parser)]
#[command(name = "leaveplan")]
#[command(author, version, about = "Vacation balance and timeline toolkit", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a roster file
    Check {
        /// Input file path (.csv or .xlsx)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the per-employee balance summary
    Summary {
        /// Input file path (.csv or .xlsx)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = SummaryFormat::Text)]
        format: SummaryFormat,

        /// Also list each employee's individual periods
        #[arg(long)]
        periods: bool,
    },

    /// Render the timeline chart
    Chart {
        /// Input file path (.csv or .xlsx)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ChartFormat::Svg)]
        format: ChartFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the downloadable XLSX report
    Report {
        /// Input file path (.csv or .xlsx)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (vacation_report.xlsx if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SummaryFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ChartFormat {
    Svg,
    Html,
    Mermaid,
}

/// JSON document emitted by `summary --format json`
#[derive(Serialize)]
struct SummaryDoc<'a> {
    title: &'a str,
    employees: &'a [EmployeeSummary],
    warnings: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; -v overrides the default RUST_LOG filter
    let filter = match cli.verbose {
        0 => EnvFilter::from_default_env(),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Check { file } => check(&file),
        Commands::Summary {
            file,
            format,
            periods,
        } => summary(&file, format, periods),
        Commands::Chart {
            file,
            format,
            output,
        } => chart(&file, format, output.as_deref()),
        Commands::Report { file, output } => report(&file, output.as_deref()),
    }
}

/// Run the ingest + tally pipeline and surface warnings on stderr
fn load(file: &Path) -> Result<(Roster, BalanceSheet)> {
    let roster = leaveplan_ingest::read_file(file)
        .with_context(|| format!("cannot load roster from {}", file.display()))?;
    let sheet = tally(&roster);
    info!(
        records = roster.len(),
        employees = sheet.employees.len(),
        "pipeline complete"
    );

    for warning in &sheet.warnings {
        eprintln!("warning: {warning}");
    }

    Ok((roster, sheet))
}

fn check(file: &Path) -> Result<()> {
    let (roster, sheet) = load(file)?;

    println!(
        "{}: {} records, {} employees",
        roster.title,
        roster.len(),
        sheet.employees.len()
    );
    if let Some((first, last)) = sheet.span() {
        println!("Span: {first} .. {last}");
    }
    if sheet.warnings.is_empty() {
        println!("OK");
    } else {
        println!("OK with {} warning(s)", sheet.warnings.len());
    }

    Ok(())
}

fn summary(file: &Path, format: SummaryFormat, periods: bool) -> Result<()> {
    let (roster, sheet) = load(file)?;

    match format {
        SummaryFormat::Text => {
            let mut renderer = TextRenderer::new();
            if periods {
                renderer = renderer.with_periods();
            }
            let table = renderer.render(&roster, &sheet)?;
            print!("{table}");
        }
        SummaryFormat::Json => {
            let doc = SummaryDoc {
                title: &roster.title,
                employees: &sheet.employees,
                warnings: sheet.warnings.iter().map(ToString::to_string).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }

    Ok(())
}

fn chart(file: &Path, format: ChartFormat, output: Option<&Path>) -> Result<()> {
    let (roster, sheet) = load(file)?;

    let rendered = match format {
        ChartFormat::Svg => SvgTimelineRenderer::new().render(&roster, &sheet)?,
        ChartFormat::Html => HtmlDashboardRenderer::new().render(&roster, &sheet)?,
        ChartFormat::Mermaid => MermaidRenderer::new().render(&roster, &sheet)?,
    };

    write_text_output(output, &rendered)
}

fn report(file: &Path, output: Option<&Path>) -> Result<()> {
    let (roster, sheet) = load(file)?;

    let bytes = ExcelReportRenderer::new().render(&roster, &sheet)?;
    let path = output.unwrap_or_else(|| Path::new(REPORT_FILENAME));
    std::fs::write(path, bytes)
        .with_context(|| format!("cannot write report to {}", path.display()))?;
    println!("Report written to {}", path.display());

    Ok(())
}

/// Write rendered text to a file, or stdout when no path was given
fn write_text_output(output: Option<&Path>, contents: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, contents)
                .with_context(|| format!("cannot write output to {}", path.display()))?;
            eprintln!("Written to {}", path.display());
        }
        None => {
            std::io::stdout().write_all(contents.as_bytes())?;
        }
    }
    Ok(())
}
