//! Requester location derived from edge-supplied connection metadata.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt;
use std::sync::LazyLock;
use validator::Validate;

/// Two-character country code: ISO 3166-1 alpha-2 plus edge pseudo-codes like `T1`.
static COUNTRY_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9]$").unwrap());

/// Errors produced while validating untrusted geo metadata.
///
/// Every variant is a client fault. None of them may be read as "no country".
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    #[error("Malformed geo metadata: {0}")]
    Malformed(String),

    #[error("Invalid country code: {0:?}")]
    InvalidCountry(String),

    #[error("Invalid {field}: {reason}")]
    InvalidCoordinate { field: &'static str, reason: String },
}

/// A well-formed, upper-case two-character country code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    /// Validates and wraps a country code. Matching is exact, so `"us"` is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidCountry`] if the value is not two upper-case
    /// ASCII characters starting with a letter.
    pub fn parse(code: &str) -> Result<Self, GeoError> {
        if COUNTRY_CODE_REGEX.is_match(code) {
            Ok(Self(code.to_string()))
        } else {
            Err(GeoError::InvalidCountry(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CountryCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated requester location.
///
/// All fields are optional; an absent country is a normal case and routes to
/// the link's default destination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoContext {
    pub country: Option<CountryCode>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Wire shape of edge metadata before validation.
///
/// Unknown keys are ignored so that a full edge `cf` object can be forwarded as-is.
#[derive(Debug, Deserialize, Validate)]
struct RawGeoMetadata {
    #[serde(default)]
    country: Option<String>,

    #[serde(default, deserialize_with = "coordinate")]
    #[validate(range(min = -90.0, max = 90.0))]
    latitude: Option<f64>,

    #[serde(default, deserialize_with = "coordinate")]
    #[validate(range(min = -180.0, max = 180.0))]
    longitude: Option<f64>,
}

/// Edges send coordinates either as JSON numbers or as decimal strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

fn coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<Coordinate>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Coordinate::Number(n)) => n,
        Some(Coordinate::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("coordinate {s:?} is not a number")))?,
    };

    if !value.is_finite() {
        return Err(serde::de::Error::custom("coordinate must be finite"));
    }

    Ok(Some(value))
}

impl GeoContext {
    /// Validates raw edge metadata.
    ///
    /// Accepts `null` (no metadata at all) or a JSON object with optional
    /// `country`, `latitude` and `longitude` keys. An empty `country` string
    /// means no country.
    ///
    /// # Errors
    ///
    /// - [`GeoError::Malformed`] if the value is not an object or a field has the wrong type
    ///   (e.g. `country` is a number)
    /// - [`GeoError::InvalidCountry`] if `country` is not a well-formed code
    /// - [`GeoError::InvalidCoordinate`] if a coordinate is out of range
    pub fn from_metadata(metadata: Value) -> Result<Self, GeoError> {
        let raw: RawGeoMetadata = match metadata {
            Value::Null => return Ok(Self::default()),
            Value::Object(_) => serde_json::from_value(metadata)
                .map_err(|e| GeoError::Malformed(e.to_string()))?,
            other => {
                return Err(GeoError::Malformed(format!(
                    "expected an object, got {}",
                    json_type_name(&other)
                )));
            }
        };

        if let Err(errors) = raw.validate() {
            let field_errors = errors.field_errors();
            let field = if field_errors.contains_key("latitude") {
                "latitude"
            } else {
                "longitude"
            };
            return Err(GeoError::InvalidCoordinate {
                field,
                reason: "out of range".to_string(),
            });
        }

        let country = raw
            .country
            .as_deref()
            .filter(|code| !code.is_empty())
            .map(CountryCode::parse)
            .transpose()?;

        Ok(Self {
            country,
            latitude: raw.latitude,
            longitude: raw.longitude,
        })
    }

    /// Country code as a plain string, for the destination selector.
    pub fn country_code(&self) -> Option<&str> {
        self.country.as_ref().map(CountryCode::as_str)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
