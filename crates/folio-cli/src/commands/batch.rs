//! Batch processing command for multiple invoice transcripts.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use folio_core::{ExtractionResult, InvoicePipeline, TranscriptFile};

use crate::export::write_export;

/// Combined line items across every processed document.
const MASTER_LINE_ITEMS_FILE: &str = "master_line_items.csv";

/// Combined header fields across every processed document.
const ALL_SUMMARIES_FILE: &str = "all_summaries.json";

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching transcript files (e.g. "scans/*.txt")
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Also write master_line_items.csv and all_summaries.json
    #[arg(long)]
    combine: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    /// Output folder name under the output directory.
    folder: String,
    extraction: Option<ExtractionResult>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::config::load(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            p.is_file() && ext.eq_ignore_ascii_case("txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    fs::create_dir_all(&args.output_dir)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let pipeline = Arc::new(InvoicePipeline::new(&config)?);
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    info!("Processing {} files with {} workers", files.len(), args.jobs.max(1));

    let folders = folder_names(&files);

    let mut handles = Vec::with_capacity(files.len());
    for (path, folder) in files.into_iter().zip(folders) {
        let pipeline = pipeline.clone();
        let semaphore = semaphore.clone();
        let doc_dir = args.output_dir.join(&folder);

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let task_path = path.clone();
            let result = tokio::task::spawn_blocking(move || {
                process_single_file(&task_path, &doc_dir, &pipeline)
            })
            .await?;
            anyhow::Ok((path, folder, result))
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let (path, folder, result) = handle.await??;

        match result {
            Ok(extraction) => {
                results.push(ProcessResult {
                    path,
                    folder,
                    extraction: Some(extraction),
                    error: None,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        folder,
                        extraction: None,
                        error: Some(error_msg),
                    });
                } else {
                    pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if args.combine {
        write_combined(&args.output_dir, &results)?;
        eprintln!(
            "{} Combined results written to {}",
            style("✓").green(),
            args.output_dir.display()
        );
    }

    let successful = results.iter().filter(|r| r.extraction.is_some()).count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let with_warnings = results
        .iter()
        .filter_map(|r| r.extraction.as_ref())
        .filter(|e| !e.is_consistent())
        .count();

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} with validation warnings, {} failed",
        style(successful).green(),
        style(with_warnings).yellow(),
        style(failed.len()).red()
    );

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

/// Process one transcript and export it into `doc_dir`.
///
/// An unreadable transcript is processed as empty text, as in `process`.
fn process_single_file(
    path: &Path,
    doc_dir: &Path,
    pipeline: &InvoicePipeline,
) -> anyhow::Result<ExtractionResult> {
    let extraction = pipeline.process_source(&TranscriptFile::new(path));
    write_export(doc_dir, &extraction)?;
    debug!("Wrote output to {}", doc_dir.display());
    Ok(extraction)
}

/// One output folder per input, named after the file stem.
///
/// Stems seen before get a numeric suffix (`invoice`, `invoice-2`, ...) so
/// same-named transcripts from different directories never share a folder.
fn folder_names(files: &[PathBuf]) -> Vec<String> {
    let mut taken = HashSet::new();
    let mut names = Vec::with_capacity(files.len());

    for path in files {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("invoice");

        let mut name = stem.to_string();
        let mut n = 1;
        while !taken.insert(name.clone()) {
            n += 1;
            name = format!("{}-{}", stem, n);
        }
        names.push(name);
    }

    names
}

fn write_combined(output_dir: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(output_dir.join(MASTER_LINE_ITEMS_FILE))?;
    wtr.write_record(["description", "category", "price", "source_image"])?;

    let mut summaries = Vec::new();

    for result in results {
        let Some(extraction) = &result.extraction else {
            continue;
        };
        let source = result.folder.as_str();

        for item in &extraction.items {
            let price = item.price.to_string();
            wtr.write_record([
                item.description.as_str(),
                item.category.as_str(),
                price.as_str(),
                source,
            ])?;
        }

        let mut summary = serde_json::to_value(&extraction.fields)?;
        if let Some(obj) = summary.as_object_mut() {
            obj.insert(
                "source_image".to_string(),
                serde_json::Value::String(source.to_string()),
            );
        }
        summaries.push(summary);
    }

    wtr.flush()?;

    fs::write(
        output_dir.join(ALL_SUMMARIES_FILE),
        serde_json::to_string_pretty(&summaries)?,
    )?;

    Ok(())
}
