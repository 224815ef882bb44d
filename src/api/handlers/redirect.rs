//! Handler for geo-routed short link redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::domain::routing::select_destination;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::extract_geo::extract_geo_from_headers;

/// Redirects a link identifier to the destination for the requester's country.
///
/// # Endpoint
///
/// `GET /{link_id}`
///
/// # Request Flow
///
/// 1. Validate geo metadata from edge headers (rejects before any lookup)
/// 2. Resolve the link through the cache, falling back to the store
/// 3. Select the country destination, or the default
/// 4. Return 302 Found
///
/// # Errors
///
/// - 400 Bad Request if the geo metadata is malformed
/// - 404 Not Found if the link does not exist
/// - 503 Service Unavailable if the store cannot be queried
pub async fn redirect_handler(
    Path(link_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let geo = extract_geo_from_headers(&headers, &state.geo_metadata_header)?;

    let record = state.resolver.resolve(&link_id).await?;
    let destination = select_destination(&record, geo.country_code());

    debug!(
        link_id = %link_id,
        country = geo.country_code().unwrap_or("-"),
        destination,
        "Redirecting"
    );

    Ok((StatusCode::FOUND, [(header::LOCATION, destination.to_string())]).into_response())
}
