//! Diagnostic echo of the requester's geo context.

use axum::{Json, extract::State, http::HeaderMap};

use crate::api::dto::geo::GeoResponse;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::extract_geo::extract_geo_from_headers;

/// Returns the validated geo context derived from the request headers.
///
/// # Endpoint
///
/// `GET /geo`
///
/// # Response
///
/// ```json
/// { "country": "US", "lat": 37.7749, "long": -122.4194 }
/// ```
///
/// Absent fields are `null`. Malformed metadata returns 400, the same as the
/// redirect endpoint.
pub async fn geo_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<GeoResponse>, AppError> {
    let geo = extract_geo_from_headers(&headers, &state.geo_metadata_header)?;
    Ok(Json(GeoResponse::from(geo)))
}
