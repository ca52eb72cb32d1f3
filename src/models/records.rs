use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::models::internal::{UserRole, VerificationMethod, VerificationState};

/// `users` table, restricted to the columns the level computation reads
#[derive(Debug, Clone, FromRow)]
pub struct SellerRecord {
    pub id: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub is_verified_seller: bool,
    pub verified_seller_at: Option<DateTime<Utc>>,
    pub verified_seller_method: Option<String>,
    pub seller_level: i32,
    pub seller_xp: i64,
}

impl SellerRecord {
    pub fn role(&self) -> Option<UserRole> {
        self.role.parse().ok()
    }

    pub fn is_seller(&self) -> bool {
        self.role() == Some(UserRole::Seller)
    }

    /// Verified rows without a recognised method are treated as manual grants,
    /// so they are never revoked automatically.
    pub fn verification_state(&self) -> VerificationState {
        if !self.is_verified_seller {
            return VerificationState::Unverified;
        }

        match self.verified_seller_method.as_deref().map(str::parse) {
            Some(Ok(VerificationMethod::Auto)) => VerificationState::VerifiedAuto,
            _ => VerificationState::VerifiedManual,
        }
    }
}
