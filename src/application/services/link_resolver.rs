//! Cache-aside resolution of link records.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, error, warn};

use crate::domain::entities::LinkRecord;
use crate::domain::repositories::{LinkRepository, StoreError};
use crate::infrastructure::cache::CacheService;

/// Lifetime of a cached link record.
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

/// Outcomes of a resolution that did not yield a record.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No record exists for the identifier. Expected, not a fault.
    #[error("link {link_id} not found")]
    NotFound { link_id: String },

    /// The store could not answer. Never reported as [`ResolveError::NotFound`].
    #[error("link store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),
}

/// Resolves link identifiers through the cache, falling back to the store.
///
/// # Lookup order
///
/// 1. Cache `link:{id}`. A hit that decodes is returned without touching the store.
/// 2. On miss, cache error or undecodable value, query the store.
/// 3. Store has no record: [`ResolveError::NotFound`]. Negative results are not cached.
/// 4. Store returns a record: write it to the cache with the configured TTL, then return it.
///
/// Cache faults never fail a resolution. Store faults always do.
///
/// Concurrent resolutions of the same cold identifier each query the store;
/// there is no request coalescing. Their cache writes carry identical content.
pub struct LinkResolver {
    store: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    cache_ttl_seconds: u64,
}

impl LinkResolver {
    /// Creates a resolver with the default cache TTL of 300 seconds.
    pub fn new(store: Arc<dyn LinkRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self {
            store,
            cache,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }

    /// Overrides the TTL applied to cache writes.
    pub fn with_cache_ttl(mut self, ttl_seconds: u64) -> Self {
        self.cache_ttl_seconds = ttl_seconds;
        self
    }

    /// Cache key under which a link record is stored.
    pub fn cache_key(link_id: &str) -> String {
        format!("link:{}", link_id)
    }

    pub fn store(&self) -> &Arc<dyn LinkRepository> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<dyn CacheService> {
        &self.cache
    }

    /// Resolves a link identifier to its record.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] if neither cache nor store has the link.
    /// Returns [`ResolveError::StoreUnavailable`] if the store lookup fails.
    pub async fn resolve(&self, link_id: &str) -> Result<LinkRecord, ResolveError> {
        let key = Self::cache_key(link_id);

        if let Some(record) = self.read_cache(&key).await {
            return Ok(record);
        }

        let record = match self.store.find_by_id(link_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(link_id, "Link not found in store");
                return Err(ResolveError::NotFound {
                    link_id: link_id.to_string(),
                });
            }
            Err(e) => {
                counter!("resolver_store_errors_total").increment(1);
                error!(link_id, error = %e, "Store lookup failed");
                return Err(ResolveError::StoreUnavailable(e));
            }
        };

        self.write_cache(&key, &record).await;

        Ok(record)
    }

    /// Reads and decodes a cached record. Any failure counts as a miss.
    async fn read_cache(&self, key: &str) -> Option<LinkRecord> {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<LinkRecord>(&raw) {
                Ok(record) => {
                    counter!("resolver_cache_hits_total").increment(1);
                    debug!(key, "Cache HIT");
                    Some(record)
                }
                Err(e) => {
                    counter!("resolver_cache_decode_failures_total").increment(1);
                    warn!(key, error = %e, "Cached value is not a valid link record, falling back to store");
                    None
                }
            },
            Ok(None) => {
                counter!("resolver_cache_misses_total").increment(1);
                debug!(key, "Cache MISS");
                None
            }
            Err(e) => {
                counter!("resolver_cache_errors_total").increment(1);
                warn!(key, error = %e, "Cache read failed, falling back to store");
                None
            }
        }
    }

    /// Best-effort cache population. Failures are logged and dropped.
    async fn write_cache(&self, key: &str, record: &LinkRecord) {
        let payload = match serde_json::to_string(record) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key, error = %e, "Failed to encode link record for cache");
                return;
            }
        };

        if let Err(e) = self
            .cache
            .put(key, &payload, self.cache_ttl_seconds)
            .await
        {
            counter!("resolver_cache_errors_total").increment(1);
            warn!(key, error = %e, "Cache write failed");
        }
    }
}
