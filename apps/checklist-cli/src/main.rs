//! Export Checklist CLI
//!
//! Renders the shipping-bill checklist for a job record stored as JSON.

mod files;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use export_checklist::{generate_on, ChecklistConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::files::FileSource;

#[derive(Parser, Debug)]
#[command(name = "export-checklist")]
#[command(version, about = "Generate the Checklist for Shipping Bill PDF for an export job")]
struct Args {
    /// Job record (JSON)
    #[arg(short, long)]
    job: PathBuf,

    /// Exchange-rate notification (JSON); repeat for several notifications
    #[arg(short, long)]
    rates: Vec<PathBuf>,

    /// Layout and wording overrides (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Printed-on date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Print the artifact summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the summary; logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &args.config {
        Some(path) => ChecklistConfig::from_file(path)?,
        None => ChecklistConfig::default(),
    };

    let source = FileSource::load(&args.job, args.rates.as_slice())
        .with_context(|| format!("Failed to load job file: {}", args.job.display()))?;
    let job_no = source.job_no().to_string();
    let generated_on = args.date.unwrap_or_else(|| Local::now().date_naive());

    let artifact = generate_on(&source, &job_no, generated_on, &config)?;

    fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create output directory: {}", args.out.display()))?;
    let path = args.out.join(&artifact.file_name);
    fs::write(&path, &artifact.bytes)
        .with_context(|| format!("Failed to write checklist: {}", path.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&artifact)?);
    } else {
        println!("{} ({} pages)", path.display(), artifact.page_count);
        for degradation in &artifact.diagnostics {
            println!("  warning: {}", degradation);
        }
    }

    Ok(())
}
