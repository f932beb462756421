//! Local file naming for downloaded episodes.
//!
//! The saved name is the last path segment of the resolved URL, made safe for
//! a Linux filesystem so a hostile feed cannot write outside the save directory.

/// Name used when the URL yields nothing usable.
const DEFAULT_FILENAME: &str = "episode.bin";

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Derives the file name an episode is saved under.
///
/// - `https://example.com/talks/talk-480p.mp4?src=rss` → `talk-480p.mp4`
/// - `https://example.com/` → `episode.bin`
pub fn derive_filename(url: &str) -> String {
    let sanitized = last_path_segment(url)
        .map(|s| sanitize_filename(&s))
        .unwrap_or_default();
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}

/// Last non-empty path segment, ignoring query and fragment.
///
/// Falls back to plain string splitting for addresses `url` cannot parse.
pub fn last_path_segment(url: &str) -> Option<String> {
    let segment = match url::Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()?
            .filter(|s| !s.is_empty())
            .last()?
            .to_string(),
        Err(_) => {
            let path = url.split(['?', '#']).next().unwrap_or("");
            path.rsplit('/').find(|s| !s.is_empty())?.to_string()
        }
    };
    match segment.as_str() {
        "." | ".." => None,
        _ => Some(segment),
    }
}

/// Replaces separators, NUL and control characters with `_`, collapses runs of
/// `_`, trims dots/underscores at both ends and caps the length at NAME_MAX.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let unsafe_char = matches!(c, '/' | '\\' | '\0' | ' ' | '\t') || c.is_control();
        let c = if unsafe_char { '_' } else { c };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    let mut end = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_come_from_resolved_url() {
        assert_eq!(
            derive_filename("https://download.example.com/talks/SirKenRobinson_2006-480p.mp4"),
            "SirKenRobinson_2006-480p.mp4"
        );
        assert_eq!(derive_filename("https://example.com/talk.mp3?src=rss#t=1"), "talk.mp3");
    }

    #[test]
    fn empty_or_reserved_paths_fall_back() {
        assert_eq!(derive_filename("https://example.com/"), "episode.bin");
        assert_eq!(derive_filename("https://example.com"), "episode.bin");
        assert_eq!(derive_filename("https://example.com/.."), "episode.bin");
    }

    #[test]
    fn unparseable_urls_use_plain_split() {
        assert_eq!(last_path_segment("media/talks/a b.mp4?x=1").as_deref(), Some("a b.mp4"));
        assert_eq!(derive_filename("media/talks/a b.mp4"), "a_b.mp4");
    }

    #[test]
    fn sanitize_strips_traversal_and_controls() {
        assert_eq!(sanitize_filename("../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("a\\b\x00c.mp4"), "a_b_c.mp4");
        assert_eq!(sanitize_filename("__talk__.mp4.."), "talk_.mp4");
    }

    #[test]
    fn sanitize_collapses_existing_underscore_runs() {
        assert_eq!(sanitize_filename("file___name.mp4"), "file_name.mp4");
        assert_eq!(sanitize_filename("a_ _b.mp4"), "a_b.mp4");
        assert_eq!(derive_filename("https://example.com/Talk___2006-480p.mp4"), "Talk_2006-480p.mp4");
    }

    #[test]
    fn sanitize_caps_length_on_char_boundary() {
        let long = "é".repeat(200);
        let out = sanitize_filename(&long);
        assert!(out.len() <= NAME_MAX);
        assert!(out.chars().all(|c| c == 'é'));
    }
}
