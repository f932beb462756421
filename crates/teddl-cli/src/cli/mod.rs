//! CLI for teddl.

mod report;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use teddl_core::config;
use teddl_core::fetcher::CurlFetcher;
use teddl_core::pipeline::Pipeline;

pub use settings::Settings;

/// Download new episodes from a talks feed, skipping ones already fetched.
#[derive(Debug, Parser)]
#[command(name = "teddl", version)]
#[command(about = "teddl: download new feed episodes, skipping ones already fetched", long_about = None)]
pub struct Cli {
    /// Feed address (http/https URL or local file). Overrides config.toml.
    #[arg(long, value_name = "ADDRESS")]
    pub rss: Option<String>,

    /// Directory to save episodes in; created if missing. Defaults to the current directory.
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Variant to download: highres, desktopmp4, desktopmp3 or lowres.
    #[arg(long = "type", short = 't', value_name = "VARIANT")]
    pub variant: Option<String>,

    /// Download even if the ledger says the episode was already fetched.
    #[arg(long)]
    pub force: bool,

    /// Show what would be downloaded without fetching or recording anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Only look at the first N feed entries.
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Ledger file to use instead of ~/.config/teddl/downloaded.json.
    #[arg(long, value_name = "PATH")]
    pub ledger: Option<PathBuf>,

    /// Config file to use instead of ~/.config/teddl/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug-level logging for teddl (RUST_LOG still wins).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Runs one pipeline pass. `Ok(false)` means at least one entry failed.
    pub fn run(self) -> Result<bool> {
        let cfg = match &self.config {
            Some(path) => config::load_or_init_at(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        let cwd = std::env::current_dir().context("current directory")?;
        let settings = Settings::resolve(&self, cfg, &cwd)?;
        run_pipeline(&settings)
    }
}

fn run_pipeline(settings: &Settings) -> Result<bool> {
    tracing::info!(
        feed = %settings.feed_url,
        variant = %settings.pipeline.variant,
        save_dir = %settings.pipeline.save_dir.display(),
        ledger = %settings.store.path().display(),
        force = settings.pipeline.force,
        "starting run"
    );

    let fetcher = CurlFetcher::new(settings.http);
    let mut pipeline = Pipeline::open(settings.pipeline.clone(), settings.store.clone(), fetcher)
        .context("open download ledger")?;
    if let Some(warning) = pipeline.ledger_warning() {
        eprintln!("teddl warning: {warning}; continuing with an empty ledger (--force)");
    }

    let report = pipeline
        .run_feed(&settings.feed_url, &settings.http)
        .context("read feed")?;
    report::print_report(&report);
    Ok(report.success())
}
