//! Magnet link helpers

use std::collections::HashSet;

/// Extract the info hash from a magnet link
///
/// Magnet links carry the hash in an `xt=urn:btih:<hash>` query parameter.
/// The hash is returned lowercased; hex (40 char) and base32 (32 char)
/// encodings are both passed through untouched.
pub fn extract_info_hash(magnet: &str) -> Option<String> {
    let query = magnet.strip_prefix("magnet:?")?;

    for pair in query.split('&') {
        let (key, value) = match pair.split_once('=') {
            Some(kv) => kv,
            None => continue,
        };
        if key != "xt" {
            continue;
        }
        if let Some(hash) = value.strip_prefix("urn:btih:") {
            if !hash.is_empty() {
                return Some(hash.to_lowercase());
            }
        }
    }

    None
}

/// Return the info hashes from `urls` that already exist in the client
///
/// Comparison is case-insensitive; URLs that are not magnet links (plain
/// `.torrent` URLs) are skipped, since their hash is unknown until
/// qBittorrent fetches the metadata.
pub fn find_duplicates(urls: &[String], existing: &HashSet<String>) -> Vec<String> {
    let existing_lower: HashSet<String> = existing.iter().map(|h| h.to_lowercase()).collect();

    urls.iter()
        .filter_map(|url| extract_info_hash(url))
        .filter(|hash| existing_lower.contains(hash))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_plain_magnet() {
        let magnet = "magnet:?xt=urn:btih:abc123def456&dn=Test";
        assert_eq!(extract_info_hash(magnet), Some("abc123def456".to_string()));
    }

    #[test]
    fn test_extract_when_xt_is_not_first() {
        let magnet = "magnet:?dn=Test&xt=urn:btih:abc123def456&tr=http://tracker.example.com";
        assert_eq!(extract_info_hash(magnet), Some("abc123def456".to_string()));
    }

    #[test]
    fn test_extract_lowercases() {
        let magnet = "magnet:?xt=urn:btih:ABC123DEF456";
        assert_eq!(extract_info_hash(magnet), Some("abc123def456".to_string()));
    }

    #[test]
    fn test_extract_rejects_non_magnets() {
        assert_eq!(extract_info_hash("http://example.com/file.torrent"), None);
        assert_eq!(extract_info_hash("not a magnet link"), None);
        assert_eq!(extract_info_hash("magnet:?dn=NoHashHere"), None);
        assert_eq!(extract_info_hash("magnet:?xt=urn:btih:"), None);
    }

    #[test]
    fn test_find_duplicates() {
        let mut existing = HashSet::new();
        existing.insert("abc123".to_string());
        existing.insert("def456".to_string());

        let urls = vec![
            "magnet:?xt=urn:btih:abc123".to_string(),
            "magnet:?xt=urn:btih:xyz789".to_string(),
            "http://example.com/file.torrent".to_string(),
        ];

        let dupes = find_duplicates(&urls, &existing);
        assert_eq!(dupes, vec!["abc123".to_string()]);
    }

    #[test]
    fn test_find_duplicates_case_insensitive() {
        let mut existing = HashSet::new();
        existing.insert("ABC123".to_string());

        let urls = vec!["magnet:?xt=urn:btih:abc123".to_string()];
        assert_eq!(find_duplicates(&urls, &existing).len(), 1);
    }

    #[test]
    fn test_find_duplicates_empty_inputs() {
        assert!(find_duplicates(&[], &HashSet::new()).is_empty());

        let urls = vec!["magnet:?xt=urn:btih:abc123".to_string()];
        assert!(find_duplicates(&urls, &HashSet::new()).is_empty());
    }
}
