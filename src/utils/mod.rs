//! Request handling helpers.
//!
//! - [`extract_geo`] - Geo context extraction from edge headers

pub mod extract_geo;
