//! On-disk JSON shape of the ledger.
//!
//! ```json
//! { "download": [ {"url": "<resolved>", "type": "highres"} ],
//!   "orig":     [ {"url": "<original>", "type": "highres"} ],
//!   "lastdl":   "2024-05-01T10:00:00Z" }
//! ```
//!
//! `download[i]` and `orig[i]` describe the same entry. Older files wrap each
//! record in a one-element array and store `lastdl` as `YYYY-MM-DD HH:MM:SS +ZZZZ`;
//! both are accepted on read and never written.

use super::{Ledger, LedgerEntry};
use crate::variant::Variant;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct WireLedger {
    download: Vec<WireSlot>,
    orig: Vec<WireSlot>,
    #[serde(default, with = "lastdl")]
    lastdl: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct WireLedgerOut<'a> {
    download: Vec<WireRecordRef<'a>>,
    orig: Vec<WireRecordRef<'a>>,
    #[serde(with = "lastdl")]
    lastdl: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct WireRecord {
    url: String,
    #[serde(rename = "type")]
    variant: Variant,
}

#[derive(Serialize)]
struct WireRecordRef<'a> {
    url: &'a str,
    #[serde(rename = "type")]
    variant: Variant,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireSlot {
    Record(WireRecord),
    Wrapped(Vec<WireRecord>),
}

impl WireSlot {
    fn into_record(self, index: usize, array: &str) -> Result<WireRecord, String> {
        match self {
            WireSlot::Record(r) => Ok(r),
            WireSlot::Wrapped(mut v) if v.len() == 1 => Ok(v.remove(0)),
            WireSlot::Wrapped(v) => Err(format!(
                "{array}[{index}] wraps {} records, expected 1",
                v.len()
            )),
        }
    }
}

/// Parse ledger bytes. The error string says what is wrong with the file.
pub(super) fn decode(bytes: &[u8]) -> Result<Ledger, String> {
    let wire: WireLedger = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
    if wire.download.len() != wire.orig.len() {
        return Err(format!(
            "download has {} records but orig has {}",
            wire.download.len(),
            wire.orig.len()
        ));
    }

    let mut ledger = Ledger {
        entries: Vec::with_capacity(wire.orig.len()),
        last_updated: wire.lastdl,
    };
    for (index, (download, orig)) in wire.download.into_iter().zip(wire.orig).enumerate() {
        let download = download.into_record(index, "download")?;
        let orig = orig.into_record(index, "orig")?;
        if download.variant != orig.variant {
            return Err(format!(
                "record {index}: download type {} differs from orig type {}",
                download.variant, orig.variant
            ));
        }
        if ledger.contains(&orig.url, orig.variant) {
            tracing::debug!(url = %orig.url, variant = %orig.variant, "dropping duplicate ledger record");
            continue;
        }
        ledger.entries.push(LedgerEntry {
            original_url: orig.url,
            resolved_url: download.url,
            variant: orig.variant,
        });
    }
    Ok(ledger)
}

/// Serialize with the two arrays in lockstep.
pub(super) fn encode(ledger: &Ledger) -> Result<Vec<u8>, serde_json::Error> {
    let out = WireLedgerOut {
        download: ledger
            .entries
            .iter()
            .map(|e| WireRecordRef {
                url: &e.resolved_url,
                variant: e.variant,
            })
            .collect(),
        orig: ledger
            .entries
            .iter()
            .map(|e| WireRecordRef {
                url: &e.original_url,
                variant: e.variant,
            })
            .collect(),
        lastdl: ledger.last_updated,
    };
    serde_json::to_vec_pretty(&out)
}

mod lastdl {
    use super::*;
    use serde::{Deserializer, Serializer};

    const LEGACY_OFFSET: &str = "%Y-%m-%d %H:%M:%S %z";
    const LEGACY_UTC: &str = "%Y-%m-%d %H:%M:%S UTC";

    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => s.serialize_str(&ts.to_rfc3339()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|s| parse(&s).ok_or_else(|| serde::de::Error::custom(format!("bad lastdl timestamp {s:?}"))))
            .transpose()
    }

    pub(super) fn parse(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
            return Some(ts.with_timezone(&Utc));
        }
        if let Ok(ts) = DateTime::parse_from_str(s, LEGACY_OFFSET) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(s, LEGACY_UTC)
            .ok()
            .map(|naive| naive.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn encodes_parallel_arrays_in_lockstep() {
        let ledger = Ledger::new()
            .append("https://e.com/a.mp4", "https://e.com/a-480p.mp4", Variant::HighRes)
            .append("https://e.com/b.mp4", "https://e.com/b.mp3", Variant::DesktopAudio);
        let bytes = encode(&ledger).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["download"][0]["url"], "https://e.com/a-480p.mp4");
        assert_eq!(value["orig"][0]["url"], "https://e.com/a.mp4");
        assert_eq!(value["download"][1]["type"], "desktopmp3");
        assert_eq!(value["orig"][1]["type"], "desktopmp3");
        assert!(value["lastdl"].is_string());
    }

    #[test]
    fn decodes_wrapped_records_and_legacy_timestamp() {
        let json = br#"{
            "download": [[{"url": "https://e.com/a-480p.mp4", "type": "highres"}]],
            "orig":     [[{"url": "https://e.com/a.mp4", "type": "highres"}]],
            "lastdl": "2011-06-01 21:15:03 +0300"
        }"#;
        let ledger = decode(json).unwrap();
        assert_eq!(ledger.len(), 1);
        assert!(ledger.contains("https://e.com/a.mp4", Variant::HighRes));
        assert_eq!(ledger.entries()[0].resolved_url, "https://e.com/a-480p.mp4");
        assert_eq!(
            ledger.last_updated(),
            Some(Utc.with_ymd_and_hms(2011, 6, 1, 18, 15, 3).unwrap())
        );
    }

    #[test]
    fn missing_lastdl_is_allowed() {
        let ledger = decode(br#"{"download": [], "orig": []}"#).unwrap();
        assert!(ledger.is_empty());
        assert!(ledger.last_updated().is_none());
    }

    #[test]
    fn duplicate_records_collapse() {
        let json = br#"{
            "download": [{"url": "u-480p.mp4", "type": "highres"}, {"url": "u-480p.mp4", "type": "highres"}],
            "orig":     [{"url": "u.mp4", "type": "highres"}, {"url": "u.mp4", "type": "highres"}]
        }"#;
        assert_eq!(decode(json).unwrap().len(), 1);
    }

    #[test]
    fn rejects_misaligned_or_malformed_files() {
        let uneven = br#"{"download": [{"url": "a", "type": "highres"}], "orig": []}"#;
        assert!(decode(uneven).unwrap_err().contains("orig has 0"));

        let mixed = br#"{"download": [{"url": "a", "type": "lowres"}], "orig": [{"url": "a", "type": "highres"}]}"#;
        assert!(decode(mixed).is_err());

        let bad_tag = br#"{"download": [{"url": "a", "type": "itunes"}], "orig": [{"url": "a", "type": "itunes"}]}"#;
        assert!(decode(bad_tag).is_err());

        assert!(decode(b"{}").is_err());
        assert!(decode(b"not json").is_err());
        assert!(decode(br#"{"download": [], "orig": [], "lastdl": "yesterday"}"#).is_err());
    }

    #[test]
    fn timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(lastdl::parse("2024-05-01T10:00:00Z"), Some(expected));
        assert_eq!(lastdl::parse("2024-05-01T12:00:00+02:00"), Some(expected));
        assert_eq!(lastdl::parse("2024-05-01 10:00:00 UTC"), Some(expected));
        assert_eq!(lastdl::parse("2024-05-01 13:00:00 +0300"), Some(expected));
        assert_eq!(lastdl::parse("May 1st"), None);
    }
}
