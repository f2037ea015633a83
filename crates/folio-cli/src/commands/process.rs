//! Process command - extract data from a single invoice transcript.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use folio_core::models::config::OutputFormat;
use folio_core::{InvoicePipeline, TranscriptFile};

use crate::export::{format_result, write_export};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input transcript (recognized text of one invoice)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: json, csv or text (default from config)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Also write summary.json and the line item CSV and XLSX into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Exit with an error when validation reports warnings
    #[arg(long)]
    strict: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::config::load(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pipeline = InvoicePipeline::new(&config)?;
    let source = TranscriptFile::new(&args.input);
    let result = tokio::task::spawn_blocking(move || pipeline.process_source(&source)).await?;

    let warnings = result.warnings();
    if !warnings.is_empty() {
        eprintln!("{}", style("Validation warnings:").yellow());
        for warning in &warnings {
            eprintln!("  - {}", warning);
        }
    }

    let format = args.format.unwrap_or(config.output.default_format);
    let output = format_result(&result, format, config.output.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
        if !output.ends_with('\n') {
            println!();
        }
    }

    if let Some(dir) = &args.export_dir {
        write_export(dir, &result)?;
        eprintln!(
            "{} Exported summary and line items to {}",
            style("✓").green(),
            dir.display()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    if args.strict && !warnings.is_empty() {
        anyhow::bail!("{} validation warning(s)", warnings.len());
    }

    Ok(())
}
