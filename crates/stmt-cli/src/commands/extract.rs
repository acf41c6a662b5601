//! Extract command - pull transactions out of a single statement.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use stmt_core::export::{format_text, write_csv, write_json, write_xlsx};
use stmt_core::models::config::{OutputConfig, PageStorage, StmtConfig};
use stmt_core::models::transaction::TransactionRecord;
use stmt_core::PageExtractionOrchestrator;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input statement (PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Oracle model to use instead of the configured one
    #[arg(short, long)]
    model: Option<String>,

    /// Submit at most this many pages (0 = all)
    #[arg(long)]
    max_pages: Option<usize>,

    /// Keep split pages in memory instead of temp files
    #[arg(long)]
    in_memory: bool,

    /// Validate extracted transactions
    #[arg(long)]
    validate: bool,

    /// Show extraction statistics
    #[arg(long)]
    stats: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// CSV output
    Csv,
    /// JSON output
    Json,
    /// Plain text listing
    Text,
    /// Excel workbook (requires --output)
    Xlsx,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
            OutputFormat::Xlsx => "xlsx",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    apply_overrides(&args, &mut config);

    super::check_input(&args.input)?;
    if matches!(args.format, OutputFormat::Xlsx) && args.output.is_none() {
        anyhow::bail!("XLSX output needs a file: pass --output <path>");
    }
    let oracle = super::build_oracle(&config)?;

    info!("Processing file: {}", args.input.display());
    let data = fs::read(&args.input)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message("Splitting PDF...");

    let progress = pb.clone();
    let orchestrator = PageExtractionOrchestrator::from_config(oracle, &config)
        .with_progress(move |page, count| {
            progress.set_message(format!("Extracting page {}/{}", page, count));
        });

    let result = orchestrator.extract_document(&data).await;
    pb.finish_and_clear();
    let result = result?;

    if result.is_empty() {
        anyhow::bail!(
            "No transactions extracted from {} ({} pages, {} failed)",
            args.input.display(),
            result.page_count,
            result.failed_pages.len()
        );
    }

    if args.validate {
        report_validation(&result.transactions);
    }

    let output = render(&result.transactions, args.format, &config.output)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} {} transactions written to {}",
            style("✓").green(),
            result.len(),
            output_path.display()
        );
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&output)?;
        stdout.flush()?;
    }

    if !result.failed_pages.is_empty() {
        eprintln!(
            "{} Pages with no usable result: {:?}",
            style("⚠").yellow(),
            result.failed_pages
        );
    }

    if !result.skipped_pages.is_empty() {
        eprintln!(
            "{} Pages not submitted (page limit): {:?}",
            style("⚠").yellow(),
            result.skipped_pages
        );
    }

    if args.stats {
        eprintln!();
        eprintln!(
            "{} Pages: {} ({} failed, {} skipped)",
            style("ℹ").blue(),
            result.page_count,
            result.failed_pages.len(),
            result.skipped_pages.len()
        );
        eprintln!("{} Transactions: {}", style("ℹ").blue(), result.len());
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn apply_overrides(args: &ExtractArgs, config: &mut StmtConfig) {
    if let Some(model) = &args.model {
        config.oracle.model = model.clone();
    }
    if let Some(max_pages) = args.max_pages {
        config.extraction.max_pages = max_pages;
    }
    if args.in_memory {
        config.workspace.storage = PageStorage::Memory;
    }
}

/// Print validation issues for each record that has any.
pub(super) fn report_validation(records: &[TransactionRecord]) {
    let mut header_printed = false;

    for (i, record) in records.iter().enumerate() {
        let issues = record.validate();
        if issues.is_empty() {
            continue;
        }

        if !header_printed {
            eprintln!("{}", style("Validation issues:").yellow());
            header_printed = true;
        }

        for issue in &issues {
            eprintln!("  - row {} ({}): {}", i + 1, record.description, issue);
        }
    }
}

/// Render records in the requested format.
pub(super) fn render(
    records: &[TransactionRecord],
    format: OutputFormat,
    output: &OutputConfig,
) -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Csv => write_csv(records, &mut buf, output)?,
        OutputFormat::Json => {
            write_json(records, &mut buf)?;
            buf.push(b'\n');
        }
        OutputFormat::Text => buf = format_text(records)?.into_bytes(),
        OutputFormat::Xlsx => write_xlsx(records, &mut buf, output)?,
    }
    Ok(buf)
}
