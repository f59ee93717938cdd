use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tabcap_core::ProcessingMode;
use tabcap_ocr::{BatchPipeline, FileOutcome, TencentRecognizer};

mod config;

/// Recognize table photographs and export the combined result as a
/// single XLSX spreadsheet.
#[derive(Parser)]
#[command(name = "tabcap", version)]
struct Args {
    /// Table image files (JPEG/PNG), processed in the given order.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// raw: recognizer output verbatim; enhanced: crop/pad the image and
    /// drop fully-empty rows and columns from the result.
    #[arg(long, default_value = "raw")]
    mode: ProcessingMode,

    /// TOML file with secret_id, secret_key and optional region.
    /// Without it, credentials come from TENCENT_SECRET_* env vars.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output spreadsheet path.
    #[arg(long, default_value = "tables.xlsx")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let credentials = config::load(args.config.as_deref())?;

    // Unreadable files are reported up front; everything readable enters
    // the batch, where failures stay per-file.
    let mut files = Vec::new();
    for path in &args.files {
        match tokio::fs::read(path).await {
            Ok(bytes) => files.push((file_label(path), bytes)),
            Err(e) => eprintln!("{}: unreadable, skipped ({e})", path.display()),
        }
    }

    let pipeline = BatchPipeline::new(TencentRecognizer::new(credentials), args.mode);
    let outcome = pipeline.run(&files).await?;

    for status in &outcome.statuses {
        match &status.outcome {
            FileOutcome::Recognized { rows } => {
                println!("{}: {rows} row(s) recognized", status.file);
            }
            FileOutcome::Failed { reason } => {
                println!("{}: failed: {reason}", status.file);
            }
        }
    }

    match outcome.merged {
        Some(table) => {
            let bytes = tabcap_export::to_xlsx(&table)?;
            tokio::fs::write(&args.out, bytes)
                .await
                .with_context(|| format!("Failed to write {}", args.out.display()))?;
            println!("Wrote {} row(s) to {}", table.row_count(), args.out.display());
            Ok(())
        }
        None => anyhow::bail!("No valid table data recognized"),
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
