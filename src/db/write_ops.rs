use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, info};

use crate::db::errors::{DatabaseError, Result};
use crate::models::VerificationMethod;
use crate::notify::SellerNotification;

/// Overwrite the cached level snapshot. Not authoritative; every read recomputes.
///
/// Returns true when this write raised the stored level. The raise is a
/// guarded statement, so among concurrent writers of the same level only one
/// observes the increase.
#[tracing::instrument(skip(pool))]
pub async fn update_level_snapshot(pool: &PgPool, seller_id: &str, level: i32, xp: i64) -> Result<bool> {
    let raised = sqlx::query(
        r#"
        UPDATE users
        SET seller_level = $2, seller_xp = $3
        WHERE id = $1 AND seller_level < $2
        "#,
    )
    .bind(seller_id)
    .bind(level)
    .bind(xp)
    .execute(pool)
    .await?;

    if raised.rows_affected() > 0 {
        info!(level, "Raised seller level snapshot");
        return Ok(true);
    }

    let result = sqlx::query(
        r#"
        UPDATE users
        SET seller_level = $2, seller_xp = $3
        WHERE id = $1
        "#,
    )
    .bind(seller_id)
    .bind(level)
    .bind(xp)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound(format!("user {}", seller_id)));
    }

    debug!("Updated seller level snapshot");
    Ok(false)
}

/// Mark an unverified seller as automatically verified.
/// Returns false when the row was already verified by any method.
#[tracing::instrument(skip(pool))]
pub async fn grant_auto_verification(pool: &PgPool, seller_id: &str, at: DateTime<Utc>) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET is_verified_seller = TRUE,
            verified_seller_at = $2,
            verified_seller_method = $3
        WHERE id = $1 AND is_verified_seller = FALSE
        "#,
    )
    .bind(seller_id)
    .bind(at)
    .bind(VerificationMethod::Auto.as_str())
    .execute(pool)
    .await?;

    let granted = result.rows_affected() > 0;
    info!(granted, "Applied automatic verification grant");
    Ok(granted)
}

/// Clear an automatic verification. Manual grants and rows without a
/// recognised method are left alone; returns false in that case.
#[tracing::instrument(skip(pool))]
pub async fn revoke_auto_verification(pool: &PgPool, seller_id: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET is_verified_seller = FALSE,
            verified_seller_at = NULL,
            verified_seller_method = NULL
        WHERE id = $1
            AND is_verified_seller = TRUE
            AND verified_seller_method = $2
        "#,
    )
    .bind(seller_id)
    .bind(VerificationMethod::Auto.as_str())
    .execute(pool)
    .await?;

    let revoked = result.rows_affected() > 0;
    info!(revoked, "Applied automatic verification revocation");
    Ok(revoked)
}

/// Insert an in-app notification
#[tracing::instrument(skip(pool, notification), fields(user_id = %notification.user_id, kind = notification.kind.as_str()))]
pub async fn insert_notification(pool: &PgPool, notification: &SellerNotification) -> Result<i64> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO notifications (user_id, type, title, body, link, read, created_at)
        VALUES ($1, $2, $3, $4, $5, FALSE, NOW())
        RETURNING id
        "#,
    )
    .bind(&notification.user_id)
    .bind(notification.kind.as_str())
    .bind(&notification.title)
    .bind(&notification.body)
    .bind(&notification.link)
    .fetch_one(pool)
    .await?;

    info!(notification_id = id, "Inserted notification");
    Ok(id)
}
