//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::entities::{DestinationMap, LinkRecord};
use crate::domain::repositories::{LinkRepository, StoreError};

/// Row shape of the `links` table. `destinations` is JSON text.
#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    link_id: String,
    account_id: String,
    name: String,
    destinations: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<LinkRow> for LinkRecord {
    type Error = StoreError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        let raw: BTreeMap<String, String> =
            serde_json::from_str(&row.destinations).map_err(|e| StoreError::Undecodable {
                link_id: row.link_id.clone(),
                reason: e.to_string(),
            })?;

        let destinations =
            DestinationMap::try_from(raw).map_err(|source| StoreError::InvalidRecord {
                link_id: row.link_id.clone(),
                source,
            })?;

        Ok(LinkRecord {
            link_id: row.link_id,
            account_id: row.account_id,
            name: row.name,
            destinations,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL repository for link lookups.
///
/// Uses bound parameters for SQL injection protection.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Counts stored links. Used by the admin tool.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] on database errors.
    pub async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn find_by_id(&self, link_id: &str) -> Result<Option<LinkRecord>, StoreError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT link_id, account_id, name, destinations, created_at, updated_at
            FROM links
            WHERE link_id = $1
            "#,
        )
        .bind(link_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(LinkRecord::try_from).transpose()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
