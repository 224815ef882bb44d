//! Repository trait for reading link records from the durable store.

use crate::domain::entities::{DestinationError, LinkRecord};
use async_trait::async_trait;

/// Failures of the durable store.
///
/// Kept apart from "not found": a lookup that fails must never be read as a
/// missing link.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("stored record {link_id} has invalid destinations: {source}")]
    InvalidRecord {
        link_id: String,
        #[source]
        source: DestinationError,
    },

    #[error("stored record {link_id} has undecodable destinations: {reason}")]
    Undecodable { link_id: String, reason: String },
}

/// Read-only access to link records.
///
/// This service never writes to the store; records are created and edited
/// elsewhere.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by its identifier.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(LinkRecord))` if found
    /// - `Ok(None)` if no record has this identifier
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be queried or the stored row
    /// does not satisfy the [`LinkRecord`] invariants.
    async fn find_by_id(&self, link_id: &str) -> Result<Option<LinkRecord>, StoreError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] when the round trip fails.
    async fn ping(&self) -> Result<(), StoreError>;
}
