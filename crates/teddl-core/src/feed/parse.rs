//! RSS document → ordered feed entries.

use super::FeedEntry;
use rss::extension::ExtensionMap;
use rss::Item;

use super::FeedError;

/// Parses an RSS 0.9x / 1.0 / 2.0 document. Items without a media URL are
/// skipped; an empty result is valid.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<FeedEntry>, FeedError> {
    let channel = rss::Channel::read_from(bytes)?;
    let entries: Vec<FeedEntry> = channel
        .items()
        .iter()
        .filter_map(|item| {
            let entry = entry_from_item(item);
            if entry.is_none() {
                tracing::debug!(title = item.title().unwrap_or(""), "feed item has no enclosure, skipping");
            }
            entry
        })
        .collect();
    tracing::debug!(channel = channel.title(), entries = entries.len(), "parsed feed");
    Ok(entries)
}

fn entry_from_item(item: &Item) -> Option<FeedEntry> {
    let url = item
        .enclosure()
        .map(|enc| enc.url().trim().to_string())
        .filter(|u| !u.is_empty())
        .or_else(|| extension_url(item.extensions()))?;
    Some(FeedEntry {
        url,
        title: item.title().map(|t| t.trim().to_string()),
    })
}

/// `<media:content url=..>` (Media RSS) or `<enc:enclosure rdf:resource=..>`
/// (RSS 1.0 mod_enclosure), in that order.
fn extension_url(extensions: &ExtensionMap) -> Option<String> {
    const CANDIDATES: [(&str, &str, &str); 2] = [
        ("media", "content", "url"),
        ("enc", "enclosure", "rdf:resource"),
    ];
    CANDIDATES.iter().find_map(|(prefix, name, attr)| {
        extensions
            .get(*prefix)?
            .get(*name)?
            .iter()
            .filter_map(|ext| ext.attrs().get(*attr))
            .map(|u| u.trim())
            .find(|u| !u.is_empty())
            .map(str::to_string)
    })
}
