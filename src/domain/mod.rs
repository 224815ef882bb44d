//! Domain layer containing routing entities and the store contract.
//!
//! # Architecture
//!
//! - [`entities`] - Link records, destination maps and geo context
//! - [`repositories`] - Store trait implemented by the infrastructure layer
//! - [`routing`] - Pure country-to-destination selection
//!
//! The domain layer has no dependencies on the cache, the HTTP layer or the
//! concrete database driver beyond the error type surfaced by the store.

pub mod entities;
pub mod repositories;
pub mod routing;
