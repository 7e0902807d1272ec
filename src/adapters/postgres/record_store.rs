//! PostgreSQL implementation of RecordStore.
//!
//! Writes synthetic bids into the `bids` table. The cluster speaks the
//! PostgreSQL wire protocol, so a plain `PgPool` is all that is needed.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::workload::Bid;
use crate::ports::RecordStore;

const CREATE_BIDS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS bids (
        id UUID PRIMARY KEY,
        bidder TEXT NOT NULL,
        item TEXT NOT NULL,
        amount_cents INT8 NOT NULL,
        region TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )
"#;

/// PostgreSQL implementation of RecordStore.
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `bids` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(CREATE_BIDS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to create bids table: {}", e),
                )
            })?;

        tracing::info!("Ensured bids table exists");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn persist(&self, bid: &Bid) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO bids (
                id, bidder, item, amount_cents, region, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(bid.id.as_uuid())
        .bind(&bid.bidder)
        .bind(&bid.item)
        .bind(bid.amount_cents)
        .bind(&bid.region)
        .bind(bid.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::database(format!("Failed to insert bid: {}", e))
                .with_detail("record_id", bid.id.to_string())
        })?;

        Ok(())
    }
}
