//! Batch extraction command for multiple statements.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use stmt_core::{AggregatedResult, ExtractionOracle, PageExtractionOrchestrator};

use super::extract::{OutputFormat, render, report_validation};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching input statements
    #[arg(required = true)]
    input: String,

    /// Output directory (default: next to each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Validate extracted transactions
    #[arg(long)]
    validate: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    extraction: Option<AggregatedResult>,
    output: Option<PathBuf>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching PDF files found for pattern: {}", args.input);
    }

    let oracle = super::build_oracle(&config)?;

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    // One file at a time; pages within a file are sequential as well.
    let orchestrator = PageExtractionOrchestrator::from_config(oracle, &config);
    let mut results = Vec::with_capacity(files.len());
    let mut claimed = HashSet::new();

    for path in files {
        let file_start = Instant::now();
        let output_path = unique_output_path(
            output_path_for(&path, args.output_dir.as_deref(), args.format),
            &mut claimed,
        );
        let outcome =
            process_single_file(&path, &output_path, &orchestrator, &args, &config).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match outcome {
            Ok((extraction, output)) => {
                results.push(FileResult {
                    path,
                    extraction: Some(extraction),
                    output: Some(output),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        extraction: None,
                        output: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    let successful: Vec<_> = results.iter().filter(|r| r.extraction.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    for result in &successful {
        if let Some(output) = &result.output {
            debug!("{} -> {}", result.path.display(), output.display());
        }
    }

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

async fn process_single_file<O: ExtractionOracle>(
    path: &Path,
    output_path: &Path,
    orchestrator: &PageExtractionOrchestrator<O>,
    args: &BatchArgs,
    config: &stmt_core::StmtConfig,
) -> anyhow::Result<(AggregatedResult, PathBuf)> {
    let data = fs::read(path)?;
    let extraction = orchestrator.extract_document(&data).await?;

    if extraction.is_empty() {
        anyhow::bail!(
            "no transactions extracted ({} pages, {} failed)",
            extraction.page_count,
            extraction.failed_pages.len()
        );
    }

    if args.validate {
        report_validation(&extraction.transactions);
    }

    let content = render(&extraction.transactions, args.format, &config.output)?;
    fs::write(output_path, content)?;
    debug!("Wrote output to {}", output_path.display());

    Ok((extraction, output_path.to_path_buf()))
}

/// `<dir>/<stem>_transactions.<ext>`, where `dir` defaults to the input's directory.
fn output_path_for(input: &Path, output_dir: Option<&Path>, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("statement");

    let dir = output_dir
        .or_else(|| input.parent())
        .unwrap_or_else(|| Path::new("."));

    dir.join(format!("{}_transactions.{}", stem, format.extension()))
}

/// Claim `candidate` for this run, appending `_2`, `_3`, ... to the stem
/// when an earlier input already claimed it.
fn unique_output_path(candidate: PathBuf, claimed: &mut HashSet<PathBuf>) -> PathBuf {
    if claimed.insert(candidate.clone()) {
        return candidate;
    }

    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = candidate
        .extension()
        .map(|e| e.to_string_lossy().into_owned());

    let mut n = 2;
    loop {
        let name = match &ext {
            Some(ext) => format!("{}_{}.{}", stem, n, ext),
            None => format!("{}_{}", stem, n),
        };
        let next = candidate.with_file_name(name);
        if claimed.insert(next.clone()) {
            warn!(
                "Output {} already used in this run, writing {}",
                candidate.display(),
                next.display()
            );
            return next;
        }
        n += 1;
    }
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let processed_at = chrono::Local::now().to_rfc3339();

    wtr.write_record([
        "filename",
        "status",
        "pages",
        "failed_pages",
        "transactions",
        "output",
        "processing_time_ms",
        "processed_at",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time_ms = result.processing_time_ms.to_string();

        if let Some(extraction) = &result.extraction {
            let failed_pages = extraction
                .failed_pages
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            let output = result
                .output
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();

            wtr.write_record([
                filename,
                "success",
                &extraction.page_count.to_string(),
                &failed_pages,
                &extraction.len().to_string(),
                &output,
                &time_ms,
                &processed_at,
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                &time_ms,
                &processed_at,
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_defaults_next_to_input() {
        let path = output_path_for(Path::new("/data/march.pdf"), None, OutputFormat::Csv);
        assert_eq!(path, PathBuf::from("/data/march_transactions.csv"));
    }

    #[test]
    fn test_output_path_in_output_dir() {
        let path = output_path_for(
            Path::new("/data/march.pdf"),
            Some(Path::new("/out")),
            OutputFormat::Json,
        );
        assert_eq!(path, PathBuf::from("/out/march_transactions.json"));
    }

    #[test]
    fn test_same_stem_in_output_dir_gets_suffix() {
        let out = Some(Path::new("/out"));
        let mut claimed = HashSet::new();

        let first = unique_output_path(
            output_path_for(Path::new("/2024/march.pdf"), out, OutputFormat::Csv),
            &mut claimed,
        );
        let second = unique_output_path(
            output_path_for(Path::new("/2025/march.pdf"), out, OutputFormat::Csv),
            &mut claimed,
        );
        let third = unique_output_path(
            output_path_for(Path::new("/2026/march.PDF"), out, OutputFormat::Csv),
            &mut claimed,
        );

        assert_eq!(first, PathBuf::from("/out/march_transactions.csv"));
        assert_eq!(second, PathBuf::from("/out/march_transactions_2.csv"));
        assert_eq!(third, PathBuf::from("/out/march_transactions_3.csv"));
    }

    #[test]
    fn test_distinct_stems_keep_their_names() {
        let mut claimed = HashSet::new();
        let a = unique_output_path(PathBuf::from("/out/a_transactions.csv"), &mut claimed);
        let b = unique_output_path(PathBuf::from("/out/b_transactions.csv"), &mut claimed);
        assert_eq!(a, PathBuf::from("/out/a_transactions.csv"));
        assert_eq!(b, PathBuf::from("/out/b_transactions.csv"));
    }
}
