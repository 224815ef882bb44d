//! Business logic services for the application layer.

pub mod link_resolver;

pub use link_resolver::{DEFAULT_CACHE_TTL_SECONDS, LinkResolver, ResolveError};
