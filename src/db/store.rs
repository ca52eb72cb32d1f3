use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::db::connection;
use crate::db::errors::Result;
use crate::db::{read_ops, write_ops};
use crate::models::{ReviewSummary, SellerRecord};

/// Reads and writes the level computation needs from persistence.
/// Counts are independent of each other and may be issued concurrently.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SellerStore: Send + Sync {
    async fn ping(&self) -> Result<()>;

    async fn load_seller(&self, seller_id: &str) -> Result<Option<SellerRecord>>;

    async fn count_uploads(&self, seller_id: &str) -> Result<i64>;

    async fn count_published_resources(&self, seller_id: &str) -> Result<i64>;

    async fn count_completed_sales(&self, seller_id: &str) -> Result<i64>;

    async fn count_free_downloads(&self, seller_id: &str) -> Result<i64>;

    async fn review_summary(&self, seller_id: &str) -> Result<ReviewSummary>;

    /// Returns true when the stored level was raised by this write
    async fn save_level_snapshot(&self, seller_id: &str, level: i32, xp: i64) -> Result<bool>;

    /// Applies only to unverified rows; returns whether the row changed
    async fn grant_auto_verification(&self, seller_id: &str, at: DateTime<Utc>) -> Result<bool>;

    /// Applies only to automatic grants; returns whether the row changed
    async fn revoke_auto_verification(&self, seller_id: &str) -> Result<bool>;
}

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgSellerStore {
    pool: PgPool,
}

impl PgSellerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SellerStore for PgSellerStore {
    async fn ping(&self) -> Result<()> {
        connection::health_check(&self.pool).await
    }

    async fn load_seller(&self, seller_id: &str) -> Result<Option<SellerRecord>> {
        read_ops::load_seller(&self.pool, seller_id).await
    }

    async fn count_uploads(&self, seller_id: &str) -> Result<i64> {
        read_ops::count_uploads(&self.pool, seller_id).await
    }

    async fn count_published_resources(&self, seller_id: &str) -> Result<i64> {
        read_ops::count_published_resources(&self.pool, seller_id).await
    }

    async fn count_completed_sales(&self, seller_id: &str) -> Result<i64> {
        read_ops::count_completed_sales(&self.pool, seller_id).await
    }

    async fn count_free_downloads(&self, seller_id: &str) -> Result<i64> {
        read_ops::count_free_downloads(&self.pool, seller_id).await
    }

    async fn review_summary(&self, seller_id: &str) -> Result<ReviewSummary> {
        read_ops::review_summary(&self.pool, seller_id).await
    }

    async fn save_level_snapshot(&self, seller_id: &str, level: i32, xp: i64) -> Result<bool> {
        write_ops::update_level_snapshot(&self.pool, seller_id, level, xp).await
    }

    async fn grant_auto_verification(&self, seller_id: &str, at: DateTime<Utc>) -> Result<bool> {
        write_ops::grant_auto_verification(&self.pool, seller_id, at).await
    }

    async fn revoke_auto_verification(&self, seller_id: &str) -> Result<bool> {
        write_ops::revoke_auto_verification(&self.pool, seller_id).await
    }
}
