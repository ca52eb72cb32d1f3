use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::debug;

use crate::db::errors::Result;
use crate::models::{ReviewSummary, SellerRecord};

/// Load the user record of a seller, if it exists
#[tracing::instrument(skip(pool))]
pub async fn load_seller(pool: &PgPool, seller_id: &str) -> Result<Option<SellerRecord>> {
    let record = sqlx::query_as::<_, SellerRecord>(
        r#"
        SELECT
            id,
            role,
            created_at,
            is_verified_seller,
            verified_seller_at,
            verified_seller_method,
            seller_level,
            seller_xp
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(seller_id)
    .fetch_optional(pool)
    .await?;

    debug!(found = record.is_some(), "Loaded seller record");
    Ok(record)
}

/// All resources owned by the seller, published or not
#[tracing::instrument(skip(pool))]
pub async fn count_uploads(pool: &PgPool, seller_id: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resources WHERE seller_id = $1")
        .bind(seller_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

#[tracing::instrument(skip(pool))]
pub async fn count_published_resources(pool: &PgPool, seller_id: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM resources WHERE seller_id = $1 AND is_published = TRUE",
    )
    .bind(seller_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Completed paid transactions on the seller's resources
#[tracing::instrument(skip(pool))]
pub async fn count_completed_sales(pool: &PgPool, seller_id: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM transactions t
        JOIN resources r ON r.id = t.resource_id
        WHERE r.seller_id = $1
            AND t.status = 'COMPLETED'
        "#,
    )
    .bind(seller_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Free download records on the seller's resources
#[tracing::instrument(skip(pool))]
pub async fn count_free_downloads(pool: &PgPool, seller_id: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM downloads d
        JOIN resources r ON r.id = d.resource_id
        WHERE r.seller_id = $1
        "#,
    )
    .bind(seller_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Review count and mean rating over the seller's resources
#[tracing::instrument(skip(pool))]
pub async fn review_summary(pool: &PgPool, seller_id: &str) -> Result<ReviewSummary> {
    let (count, avg): (i64, Option<Decimal>) = sqlx::query_as(
        r#"
        SELECT COUNT(rv.id), AVG(rv.rating)::NUMERIC
        FROM reviews rv
        JOIN resources r ON r.id = rv.resource_id
        WHERE r.seller_id = $1
        "#,
    )
    .bind(seller_id)
    .fetch_one(pool)
    .await?;

    Ok(ReviewSummary {
        count,
        avg_rating: average_rating(count, avg),
    })
}

/// AVG over zero rows is NULL; keep it absent rather than zero
fn average_rating(count: i64, avg: Option<Decimal>) -> Option<f64> {
    if count == 0 {
        return None;
    }
    avg.and_then(|value| value.round_dp(4).to_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(2, Some(dec!(4.5))), Some(4.5));
        let thirds = average_rating(3, Some(dec!(4.3333333333333333))).unwrap();
        assert!((thirds - 4.3333).abs() < 1e-9);
        assert_eq!(average_rating(0, None), None);
        assert_eq!(average_rating(0, Some(dec!(0))), None);
    }
}
