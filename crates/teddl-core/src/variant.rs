//! Quality/format variants and download URL resolution.
//!
//! A feed publishes one canonical `.mp4` URL per episode; the other renditions
//! live next to it under a suffixed name. Resolution is a pure suffix swap.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Extension every rewrite rule anchors on.
const MEDIA_EXT: &str = ".mp4";

/// One of the fixed renditions an episode can be downloaded as.
///
/// The serde names are the tags stored in the ledger file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Variant {
    /// 480p video.
    #[default]
    #[serde(rename = "highres")]
    HighRes,
    /// The canonical desktop video, URL untouched.
    #[serde(rename = "desktopmp4")]
    DesktopVideo,
    /// Audio only.
    #[serde(rename = "desktopmp3")]
    DesktopAudio,
    /// Low bitrate video.
    #[serde(rename = "lowres")]
    LowRes,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::HighRes,
        Variant::DesktopVideo,
        Variant::DesktopAudio,
        Variant::LowRes,
    ];

    /// Tag used on the command line, in config.toml and in the ledger.
    pub fn tag(self) -> &'static str {
        match self {
            Variant::HighRes => "highres",
            Variant::DesktopVideo => "desktopmp4",
            Variant::DesktopAudio => "desktopmp3",
            Variant::LowRes => "lowres",
        }
    }

    /// Replacement for the trailing `.mp4`, or `None` when the URL is used as-is.
    fn replacement(self) -> Option<&'static str> {
        match self {
            Variant::HighRes => Some("-480p.mp4"),
            Variant::DesktopVideo => None,
            Variant::DesktopAudio => Some(".mp3"),
            Variant::LowRes => Some("-light.mp4"),
        }
    }

    /// Concrete download URL for this variant of `url`.
    ///
    /// URLs that do not end in `.mp4` come back unchanged.
    pub fn resolve(self, url: &str) -> String {
        match (self.replacement(), url.strip_suffix(MEDIA_EXT)) {
            (Some(replacement), Some(stem)) => format!("{stem}{replacement}"),
            _ => url.to_string(),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A variant tag outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant {tag:?} (expected one of: highres, desktopmp4, desktopmp3, lowres)")]
pub struct UnknownVariant {
    pub tag: String,
}

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Variant::ALL
            .into_iter()
            .find(|v| v.tag().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant {
                tag: s.to_string(),
            })
    }
}

/// Resolve `url` for an already-parsed variant.
pub fn resolve(url: &str, variant: Variant) -> String {
    variant.resolve(url)
}

/// Resolve `url` for a free-text variant tag.
pub fn resolve_tag(url: &str, tag: &str) -> Result<String, UnknownVariant> {
    Ok(tag.parse::<Variant>()?.resolve(url))
}
