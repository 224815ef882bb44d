//! DTOs for the geo diagnostic endpoint.

use serde::Serialize;

use crate::domain::entities::GeoContext;

/// Echo of the validated geo context.
#[derive(Debug, Serialize)]
pub struct GeoResponse {
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

impl From<GeoContext> for GeoResponse {
    fn from(geo: GeoContext) -> Self {
        Self {
            country: geo.country.map(|c| c.as_str().to_string()),
            lat: geo.latitude,
            long: geo.longitude,
        }
    }
}
