//! Link entity carrying geo-routing data for a short link.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

use super::geo::CountryCode;

/// Key of the mandatory fallback entry in a serialized destination map.
pub const DEFAULT_DESTINATION_KEY: &str = "default";

/// Errors raised when a destination map violates its invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DestinationError {
    #[error("destinations must contain a \"default\" entry")]
    MissingDefault,

    #[error("destination for {key:?} is empty")]
    EmptyUrl { key: String },

    #[error("destination for {key:?} is not an absolute http(s) URL: {url}")]
    InvalidUrl { key: String, url: String },

    #[error("destination key {0:?} is not a country code")]
    InvalidCountry(String),
}

/// Country-to-URL routing table with a mandatory default.
///
/// Serialized as a flat JSON object: `{"default": "...", "US": "...", ...}`.
/// Deserialization enforces the same invariants as [`DestinationMap::new`], so a
/// record without a usable default can never be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct DestinationMap {
    default: String,
    by_country: BTreeMap<CountryCode, String>,
}

impl DestinationMap {
    /// Builds a destination map from a default URL and per-country overrides.
    ///
    /// # Errors
    ///
    /// Returns [`DestinationError`] if any URL is empty, not an absolute
    /// `http`/`https` URL, or contains whitespace, control or non-ASCII
    /// characters (non-ASCII must be percent-encoded).
    pub fn new(
        default: impl Into<String>,
        by_country: impl IntoIterator<Item = (CountryCode, String)>,
    ) -> Result<Self, DestinationError> {
        let default = default.into();
        validate_url(DEFAULT_DESTINATION_KEY, &default)?;

        let by_country = by_country
            .into_iter()
            .map(|(country, url)| {
                validate_url(country.as_str(), &url)?;
                Ok((country, url))
            })
            .collect::<Result<BTreeMap<_, _>, DestinationError>>()?;

        Ok(Self {
            default,
            by_country,
        })
    }

    /// The fallback destination.
    pub fn default_url(&self) -> &str {
        &self.default
    }

    /// The explicit destination for `country`, if one is configured.
    pub fn get(&self, country: &str) -> Option<&str> {
        self.by_country.get(country).map(String::as_str)
    }

    /// Country-specific entries, ordered by country code.
    pub fn countries(&self) -> impl Iterator<Item = (&CountryCode, &str)> {
        self.by_country.iter().map(|(code, url)| (code, url.as_str()))
    }
}

fn validate_url(key: &str, url: &str) -> Result<(), DestinationError> {
    if url.trim().is_empty() {
        return Err(DestinationError::EmptyUrl {
            key: key.to_string(),
        });
    }

    let invalid = || DestinationError::InvalidUrl {
        key: key.to_string(),
        url: url.to_string(),
    };

    // Stored verbatim and sent as a Location header, so the parser's silent
    // whitespace stripping must not apply.
    if !url.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(invalid());
    }

    let parsed = Url::parse(url).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }

    Ok(())
}

impl TryFrom<BTreeMap<String, String>> for DestinationMap {
    type Error = DestinationError;

    fn try_from(mut raw: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let default = raw
            .remove(DEFAULT_DESTINATION_KEY)
            .ok_or(DestinationError::MissingDefault)?;

        let by_country = raw
            .into_iter()
            .map(|(key, url)| {
                let code = CountryCode::parse(&key)
                    .map_err(|_| DestinationError::InvalidCountry(key.clone()))?;
                Ok((code, url))
            })
            .collect::<Result<Vec<_>, DestinationError>>()?;

        Self::new(default, by_country)
    }
}

impl From<DestinationMap> for BTreeMap<String, String> {
    fn from(map: DestinationMap) -> Self {
        let mut raw: BTreeMap<String, String> = map
            .by_country
            .into_iter()
            .map(|(code, url)| (code.as_str().to_string(), url))
            .collect();
        raw.insert(DEFAULT_DESTINATION_KEY.to_string(), map.default);
        raw
    }
}

/// Routing data for a single short link.
///
/// Owned by the durable store; cached copies carry no authority.
/// Timestamps are Unix epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub link_id: String,
    pub account_id: String,
    pub name: String,
    pub destinations: DestinationMap,
    pub created_at: i64,
    pub updated_at: i64,
}

impl LinkRecord {
    /// Creation time, if the stored timestamp is representable.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }

    /// Last update time, if the stored timestamp is representable.
    pub fn updated(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.updated_at, 0)
    }
}
