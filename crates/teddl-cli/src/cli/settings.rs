//! Merge config.toml with command-line flags; flags win.

use anyhow::Result;
use std::path::Path;
use teddl_core::config::TeddlConfig;
use teddl_core::http::HttpOptions;
use teddl_core::ledger::LedgerStore;
use teddl_core::pipeline::PipelineConfig;

use super::Cli;

/// Everything a run needs, with defaults applied.
#[derive(Debug, Clone)]
pub struct Settings {
    pub feed_url: String,
    pub pipeline: PipelineConfig,
    pub store: LedgerStore,
    pub http: HttpOptions,
}

impl Settings {
    /// Relative save paths are taken from `cwd`.
    pub fn resolve(cli: &Cli, cfg: TeddlConfig, cwd: &Path) -> Result<Self> {
        let feed_url = cli.rss.clone().unwrap_or(cfg.feed_url);
        let variant = cli.variant.clone().unwrap_or(cfg.variant);

        let save_dir = match cli.save.clone().or(cfg.save_dir) {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => cwd.join(dir),
            None => cwd.to_path_buf(),
        };

        let store = match cli.ledger.clone().or(cfg.ledger_path) {
            Some(path) => LedgerStore::at(path),
            None => LedgerStore::open_default()?,
        };

        let mut pipeline = PipelineConfig::new(variant, save_dir);
        pipeline.force = cli.force;
        pipeline.dry_run = cli.dry_run;
        pipeline.limit = cli.limit;

        Ok(Self {
            feed_url,
            pipeline,
            store,
            http: cfg.http,
        })
    }
}
