//! HTTP request handlers for public endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod geo;
pub mod health;
pub mod redirect;

pub use geo::geo_handler;
pub use health::health_handler;
pub use redirect::redirect_handler;
