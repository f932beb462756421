use crate::http::HttpOptions;
use crate::variant::Variant;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Feed used when neither config.toml nor `--rss` names one.
pub const DEFAULT_FEED_URL: &str = "http://feeds.feedburner.com/tedtalks_video";

/// Global configuration loaded from `~/.config/teddl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeddlConfig {
    /// RSS address to read episodes from.
    pub feed_url: String,
    /// Variant tag to download (`highres`, `desktopmp4`, `desktopmp3`, `lowres`).
    #[serde(default = "default_variant")]
    pub variant: String,
    /// Directory episodes are saved to; the current directory when unset.
    #[serde(default)]
    pub save_dir: Option<PathBuf>,
    /// Ledger file override; `~/.config/teddl/downloaded.json` when unset.
    #[serde(default)]
    pub ledger_path: Option<PathBuf>,
    /// Transport timeouts; built-in defaults when the section is missing.
    #[serde(default)]
    pub http: HttpOptions,
}

fn default_variant() -> String {
    Variant::default().tag().to_string()
}

impl Default for TeddlConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            variant: default_variant(),
            save_dir: None,
            ledger_path: None,
            http: HttpOptions::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("teddl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from the default location, creating a default file if none exists.
pub fn load_or_init() -> Result<TeddlConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<TeddlConfig> {
    if !path.exists() {
        let default_cfg = TeddlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: TeddlConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = TeddlConfig::default();
        assert_eq!(cfg.feed_url, DEFAULT_FEED_URL);
        assert_eq!(cfg.variant, "highres");
        assert!(cfg.save_dir.is_none());
        assert!(cfg.ledger_path.is_none());
        assert_eq!(cfg.http, HttpOptions::default());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = TeddlConfig {
            save_dir: Some(PathBuf::from("/srv/talks")),
            ..TeddlConfig::default()
        };
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: TeddlConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.feed_url, cfg.feed_url);
        assert_eq!(parsed.variant, cfg.variant);
        assert_eq!(parsed.save_dir, cfg.save_dir);
        assert_eq!(parsed.http, cfg.http);
    }

    #[test]
    fn config_toml_minimal() {
        let cfg: TeddlConfig = toml::from_str(r#"feed_url = "https://example.com/feed.xml""#).unwrap();
        assert_eq!(cfg.feed_url, "https://example.com/feed.xml");
        assert_eq!(cfg.variant, "highres");
        assert_eq!(cfg.http, HttpOptions::default());
    }

    #[test]
    fn config_toml_partial_http_section() {
        let toml = r#"
            feed_url = "https://example.com/feed.xml"
            variant = "desktopmp3"
            save_dir = "/home/me/talks"

            [http]
            connect_timeout_secs = 5
            timeout_secs = 600
        "#;
        let cfg: TeddlConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.variant, "desktopmp3");
        assert_eq!(cfg.save_dir, Some(PathBuf::from("/home/me/talks")));
        assert_eq!(cfg.http.connect_timeout_secs, 5);
        assert_eq!(cfg.http.timeout_secs, 600);
        assert_eq!(cfg.http.low_speed_time_secs, 60);
    }

    #[test]
    fn load_or_init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("teddl").join("config.toml");
        let first = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(first.feed_url, DEFAULT_FEED_URL);

        fs::write(&path, "feed_url = \"feed.xml\"\nvariant = \"lowres\"\n").unwrap();
        let second = load_or_init_at(&path).unwrap();
        assert_eq!(second.feed_url, "feed.xml");
        assert_eq!(second.variant, "lowres");
    }

    #[test]
    fn invalid_toml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "feed_url = [").unwrap();
        let err = load_or_init_at(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parse"));
    }
}
