#![allow(dead_code)]

use async_trait::async_trait;
use axum::http::HeaderName;
use geo_redirect::infrastructure::cache::NullCache;
use geo_redirect::infrastructure::persistence::PgLinkRepository;
use geo_redirect::prelude::*;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const GEO_HEADER: &str = "x-edge-geo";

/// In-memory link store that counts lookups and can be switched to failing.
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<HashMap<String, LinkRecord>>,
    lookups: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryStore {
    pub fn with_records(records: impl IntoIterator<Item = LinkRecord>) -> Self {
        let store = Self::default();
        {
            let mut map = store.records.lock().unwrap();
            for record in records {
                map.insert(record.link_id.clone(), record);
            }
        }
        store
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl LinkRepository for InMemoryStore {
    async fn find_by_id(&self, link_id: &str) -> Result<Option<LinkRecord>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Query(sqlx::Error::PoolTimedOut));
        }
        Ok(self.records.lock().unwrap().get(link_id).cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Query(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

/// In-memory cache recording writes and their TTLs.
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, (String, u64)>>,
    puts: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryCache {
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn entry(&self, key: &str) -> Option<(String, u64)> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    /// Stores a raw value directly, bypassing the put counter.
    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), 300));
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheService for InMemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionError("connection refused".to_string()));
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(key)
            .map(|(value, _)| value.clone()))
    }

    async fn put(&self, key: &str, value: &str, ttl_seconds: u64) -> CacheResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::OperationError("READONLY".to_string()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), ttl_seconds));
        Ok(())
    }

    async fn health_check(&self) -> bool {
        !self.fail_reads.load(Ordering::SeqCst)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Builds a link record with a default URL and per-country overrides.
pub fn link_record(link_id: &str, default: &str, countries: &[(&str, &str)]) -> LinkRecord {
    let by_country = countries
        .iter()
        .map(|(code, url)| (CountryCode::parse(code).unwrap(), url.to_string()));

    LinkRecord {
        link_id: link_id.to_string(),
        account_id: "acct-1".to_string(),
        name: format!("Link {}", link_id),
        destinations: DestinationMap::new(default, by_country).unwrap(),
        created_at: 1_700_000_000,
        updated_at: 1_700_000_000,
    }
}

/// The `abc` link used throughout the redirect tests.
pub fn sample_link() -> LinkRecord {
    link_record(
        "abc",
        "https://x.com",
        &[("US", "https://x.com/us"), ("MY", "https://x.com/my")],
    )
}

pub fn create_test_state(store: Arc<InMemoryStore>, cache: Arc<InMemoryCache>) -> AppState {
    let resolver = Arc::new(LinkResolver::new(store, cache));
    AppState::new(resolver, HeaderName::from_static(GEO_HEADER))
}

/// State backed by PostgreSQL with caching disabled.
pub fn create_pg_state(pool: PgPool) -> AppState {
    let store = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    let resolver = Arc::new(LinkResolver::new(store, Arc::new(NullCache)));
    AppState::new(resolver, HeaderName::from_static(GEO_HEADER))
}

pub async fn insert_link(pool: &PgPool, link_id: &str, destinations: &str) {
    sqlx::query(
        "INSERT INTO links (link_id, account_id, name, destinations, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $5)",
    )
    .bind(link_id)
    .bind("acct-1")
    .bind(format!("Link {}", link_id))
    .bind(destinations)
    .bind(1_700_000_000_i64)
    .execute(pool)
    .await
    .unwrap();
}
