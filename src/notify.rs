use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use crate::db::{write_ops, DatabaseError};
use crate::seller_levels::LevelDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationKind {
    LevelUp,
    Verified,
}

impl NotificationKind {
    /// Value stored in `notifications.type`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LevelUp => "SELLER_LEVEL_UP",
            Self::Verified => "SELLER_VERIFIED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellerNotification {
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub link: String,
}

impl SellerNotification {
    pub fn level_up(user_id: &str, level: &LevelDefinition) -> Self {
        Self {
            user_id: user_id.to_string(),
            kind: NotificationKind::LevelUp,
            title: format!("New seller level: {}", level.name),
            body: format!(
                "Congratulations! You reached level {} ({}). Keep sharing materials to climb further.",
                level.level, level.name
            ),
            link: "/account/seller/level".to_string(),
        }
    }

    pub fn verified(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            kind: NotificationKind::Verified,
            title: "You are now a verified seller".to_string(),
            body: "Your sales, ratings and published materials qualify you for the verified seller badge."
                .to_string(),
            link: "/account/seller/level".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification storage failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Notification rejected: {0}")]
    Rejected(String),
}

/// Enqueues in-app notifications. Callers treat failures as non-fatal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: SellerNotification) -> Result<(), NotifyError>;
}

/// Stores notifications in the `notifications` table
#[derive(Debug, Clone)]
pub struct PgNotifier {
    pool: PgPool,
}

impl PgNotifier {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Notifier for PgNotifier {
    async fn notify(&self, notification: SellerNotification) -> Result<(), NotifyError> {
        if notification.user_id.is_empty() {
            return Err(NotifyError::Rejected("missing user id".to_string()));
        }

        write_ops::insert_notification(&self.pool, &notification).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seller_levels::SELLER_LEVELS;

    #[test]
    fn test_level_up_names_the_level() {
        let notification = SellerNotification::level_up("seller-1", &SELLER_LEVELS[2]);
        assert_eq!(notification.kind, NotificationKind::LevelUp);
        assert!(notification.title.contains("Gold"));
        assert!(notification.body.contains("Gold"));
        assert_eq!(notification.user_id, "seller-1");
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(NotificationKind::LevelUp.as_str(), "SELLER_LEVEL_UP");
        assert_eq!(NotificationKind::Verified.as_str(), "SELLER_VERIFIED");
    }
}
