//! Destination selection for geo-routed links.

use crate::domain::entities::LinkRecord;

/// Picks the destination URL for a requester's country.
///
/// Returns the entry for `country` when the record has one, otherwise the
/// record's default. Matching is exact string equality: no case folding and no
/// regional fallback.
pub fn select_destination<'a>(record: &'a LinkRecord, country: Option<&str>) -> &'a str {
    let destinations = &record.destinations;

    country
        .and_then(|code| destinations.get(code))
        .unwrap_or_else(|| destinations.default_url())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CountryCode, DestinationMap};

    fn record(default: &str, entries: &[(&str, &str)]) -> LinkRecord {
        let by_country = entries
            .iter()
            .map(|(code, url)| (CountryCode::parse(code).unwrap(), url.to_string()));

        LinkRecord {
            link_id: "abc".to_string(),
            account_id: "acct".to_string(),
            name: "test".to_string(),
            destinations: DestinationMap::new(default, by_country).unwrap(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_no_country_uses_default() {
        let r = record("https://x.com", &[("US", "https://x.com/us")]);
        assert_eq!(select_destination(&r, None), "https://x.com");
    }

    #[test]
    fn test_matching_country_wins_over_default() {
        let r = record("https://x.com", &[("US", "https://x.com/us")]);
        assert_eq!(select_destination(&r, Some("US")), "https://x.com/us");
    }

    #[test]
    fn test_unknown_country_falls_back() {
        let r = record("https://x.com", &[("US", "https://x.com/us")]);
        assert_eq!(select_destination(&r, Some("JP")), "https://x.com");
    }

    #[test]
    fn test_default_only_record() {
        let r = record("https://x.com/only", &[]);
        for country in [None, Some("US"), Some("MY"), Some("XX")] {
            assert_eq!(select_destination(&r, country), "https://x.com/only");
        }
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let r = record("https://x.com", &[("US", "https://x.com/us")]);
        assert_eq!(select_destination(&r, Some("us")), "https://x.com");
        assert_eq!(select_destination(&r, Some("")), "https://x.com");
    }
}
