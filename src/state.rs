//! Shared application state injected into handlers.

use axum::http::HeaderName;
use std::sync::Arc;

use crate::application::services::LinkResolver;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<LinkResolver>,
    /// Header carrying edge geo metadata as JSON.
    pub geo_metadata_header: HeaderName,
}

impl AppState {
    pub fn new(resolver: Arc<LinkResolver>, geo_metadata_header: HeaderName) -> Self {
        Self {
            resolver,
            geo_metadata_header,
        }
    }
}
