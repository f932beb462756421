//! Shared libcurl transport settings.
//!
//! Both the feed fetch and the per-episode GET build their `Easy` handle here so
//! that every blocking network call is bounded by the same configurable timeouts.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("teddl/", env!("CARGO_PKG_VERSION"));

/// Transport limits (optional `[http]` section in config.toml).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpOptions {
    /// Seconds allowed for DNS + TCP/TLS connect.
    pub connect_timeout_secs: u64,
    /// Abort when the transfer stays below this many bytes/sec...
    pub low_speed_limit_bytes: u32,
    /// ...for this many seconds. 0 disables the stall check.
    pub low_speed_time_secs: u64,
    /// Hard limit for a whole transfer in seconds. 0 = unbounded.
    pub timeout_secs: u64,
    /// Maximum redirects to follow (feed proxies commonly redirect).
    pub max_redirections: u32,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            timeout_secs: 0,
            max_redirections: 10,
        }
    }
}

impl HttpOptions {
    /// Build a GET handle for `url` with these limits applied.
    pub(crate) fn easy_for(&self, url: &str) -> Result<curl::easy::Easy, curl::Error> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.useragent(USER_AGENT)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.max_redirections)?;
        easy.connect_timeout(Duration::from_secs(self.connect_timeout_secs))?;
        if self.low_speed_time_secs > 0 && self.low_speed_limit_bytes > 0 {
            easy.low_speed_limit(self.low_speed_limit_bytes)?;
            easy.low_speed_time(Duration::from_secs(self.low_speed_time_secs))?;
        }
        if self.timeout_secs > 0 {
            easy.timeout(Duration::from_secs(self.timeout_secs))?;
        }
        Ok(easy)
    }
}

/// True for 2xx responses.
pub(crate) fn is_success(code: u32) -> bool {
    (200..300).contains(&code)
}
