//! Geo context extraction from edge-supplied request headers.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};

use crate::domain::entities::{GeoContext, GeoError};

/// Default header carrying edge metadata as a JSON object.
pub const DEFAULT_GEO_METADATA_HEADER: &str = "x-edge-geo";

/// Cloudflare visitor location headers, used when no metadata header is present.
pub const CF_COUNTRY_HEADER: &str = "cf-ipcountry";
pub const CF_LATITUDE_HEADER: &str = "cf-iplatitude";
pub const CF_LONGITUDE_HEADER: &str = "cf-iplongitude";

/// Extracts and validates the requester's geo context from request headers.
///
/// Sources, in priority order:
/// 1. `metadata_header` holding a JSON object such as
///    `{"country":"US","latitude":"37.77","longitude":"-122.41"}`
/// 2. Cloudflare visitor location headers (`CF-IPCountry`, `CF-IPLatitude`,
///    `CF-IPLongitude`)
///
/// No metadata at all yields an empty [`GeoContext`], which routes to the
/// default destination.
///
/// # Errors
///
/// Returns [`GeoError`] if a header is not valid UTF-8, the metadata header is
/// not a JSON object, or any field fails validation.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("cf-ipcountry", "US".parse().unwrap());
///
/// let geo = extract_geo_from_headers(&headers, &HeaderName::from_static("x-edge-geo")).unwrap();
/// assert_eq!(geo.country_code(), Some("US"));
/// ```
pub fn extract_geo_from_headers(
    headers: &HeaderMap,
    metadata_header: &HeaderName,
) -> Result<GeoContext, GeoError> {
    if let Some(value) = headers.get(metadata_header) {
        let text = header_str(metadata_header.as_str(), value)?;
        let metadata: Value = serde_json::from_str(text).map_err(|e| {
            GeoError::Malformed(format!("{} is not valid JSON: {}", metadata_header, e))
        })?;
        return GeoContext::from_metadata(metadata);
    }

    let mut metadata = Map::new();
    for (field, header) in [
        ("country", CF_COUNTRY_HEADER),
        ("latitude", CF_LATITUDE_HEADER),
        ("longitude", CF_LONGITUDE_HEADER),
    ] {
        if let Some(value) = headers.get(header) {
            let text = header_str(header, value)?.trim();
            // An empty header carries no location.
            if !text.is_empty() {
                metadata.insert(field.to_string(), Value::String(text.to_string()));
            }
        }
    }

    if metadata.is_empty() {
        return Ok(GeoContext::default());
    }

    GeoContext::from_metadata(Value::Object(metadata))
}

fn header_str<'a>(name: &str, value: &'a HeaderValue) -> Result<&'a str, GeoError> {
    value
        .to_str()
        .map_err(|_| GeoError::Malformed(format!("{} header is not valid UTF-8", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata_header() -> HeaderName {
        HeaderName::from_static(DEFAULT_GEO_METADATA_HEADER)
    }

    #[test]
    fn test_no_geo_headers() {
        let headers = HeaderMap::new();

        let geo = extract_geo_from_headers(&headers, &metadata_header()).unwrap();
        assert_eq!(geo, GeoContext::default());
    }

    #[test]
    fn test_cloudflare_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CF_COUNTRY_HEADER, HeaderValue::from_static("US"));
        headers.insert(CF_LATITUDE_HEADER, HeaderValue::from_static("37.7749"));
        headers.insert(CF_LONGITUDE_HEADER, HeaderValue::from_static("-122.4194"));

        let geo = extract_geo_from_headers(&headers, &metadata_header()).unwrap();
        assert_eq!(geo.country_code(), Some("US"));
        assert_eq!(geo.latitude, Some(37.7749));
        assert_eq!(geo.longitude, Some(-122.4194));
    }

    #[test]
    fn test_cloudflare_country_only() {
        let mut headers = HeaderMap::new();
        headers.insert(CF_COUNTRY_HEADER, HeaderValue::from_static("JP"));

        let geo = extract_geo_from_headers(&headers, &metadata_header()).unwrap();
        assert_eq!(geo.country_code(), Some("JP"));
        assert!(geo.latitude.is_none());
    }

    #[test]
    fn test_cloudflare_empty_country_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(CF_COUNTRY_HEADER, HeaderValue::from_static(""));
        headers.insert(CF_LATITUDE_HEADER, HeaderValue::from_static(" "));

        let geo = extract_geo_from_headers(&headers, &metadata_header()).unwrap();
        assert_eq!(geo, GeoContext::default());
    }

    #[test]
    fn test_cloudflare_invalid_country() {
        let mut headers = HeaderMap::new();
        headers.insert(CF_COUNTRY_HEADER, HeaderValue::from_static("united states"));

        let result = extract_geo_from_headers(&headers, &metadata_header());
        assert!(matches!(result, Err(GeoError::InvalidCountry(_))));
    }

    #[test]
    fn test_metadata_header_takes_priority() {
        let mut headers = HeaderMap::new();
        headers.insert(
            DEFAULT_GEO_METADATA_HEADER,
            HeaderValue::from_static(r#"{"country":"MY","latitude":3.139}"#),
        );
        headers.insert(CF_COUNTRY_HEADER, HeaderValue::from_static("US"));

        let geo = extract_geo_from_headers(&headers, &metadata_header()).unwrap();
        assert_eq!(geo.country_code(), Some("MY"));
        assert_eq!(geo.latitude, Some(3.139));
    }

    #[test]
    fn test_metadata_header_numeric_country() {
        let mut headers = HeaderMap::new();
        headers.insert(
            DEFAULT_GEO_METADATA_HEADER,
            HeaderValue::from_static(r#"{"country":840}"#),
        );

        let result = extract_geo_from_headers(&headers, &metadata_header());
        assert!(matches!(result, Err(GeoError::Malformed(_))));
    }

    #[test]
    fn test_metadata_header_not_json() {
        let mut headers = HeaderMap::new();
        headers.insert(
            DEFAULT_GEO_METADATA_HEADER,
            HeaderValue::from_static("country=US"),
        );

        let result = extract_geo_from_headers(&headers, &metadata_header());
        assert!(matches!(result, Err(GeoError::Malformed(_))));
    }

    #[test]
    fn test_custom_metadata_header_name() {
        let mut headers = HeaderMap::new();
        headers.insert("x-geo", HeaderValue::from_static(r#"{"country":"DE"}"#));

        let geo = extract_geo_from_headers(&headers, &HeaderName::from_static("x-geo")).unwrap();
        assert_eq!(geo.country_code(), Some("DE"));
    }

    #[test]
    fn test_invalid_utf8_header() {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_bytes(&[0xFF, 0xFE]) {
            headers.insert(CF_COUNTRY_HEADER, value);

            let result = extract_geo_from_headers(&headers, &metadata_header());
            assert!(matches!(result, Err(GeoError::Malformed(_))));
        }
    }
}
