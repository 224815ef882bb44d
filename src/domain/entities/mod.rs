//! Core domain entities.
//!
//! - [`LinkRecord`] - A short link and its country-to-URL routing table
//! - [`DestinationMap`] - Routing table with a mandatory default destination
//! - [`GeoContext`] - Validated requester location from edge metadata
//!
//! Invariants are enforced at construction and deserialization time, so a value
//! of these types is always safe to route with.

pub mod geo;
pub mod link;

pub use geo::{CountryCode, GeoContext, GeoError};
pub use link::{DEFAULT_DESTINATION_KEY, DestinationError, DestinationMap, LinkRecord};
