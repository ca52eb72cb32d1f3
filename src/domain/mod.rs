// Domain layer - seller level and verification rules with no HTTP concerns.
// Calculators are pure; only `stats` and `seller_level` touch collaborators.

pub mod levels;
pub mod points;
pub mod seller_level;
pub mod side_effects;
pub mod stats;
pub mod verification;

use crate::db::DatabaseError;

// Domain error type - no HTTP concerns
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DatabaseError> for DomainError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound(msg) => DomainError::NotFound(msg),
            DatabaseError::InvalidData(msg) => DomainError::Internal(msg),
            other => DomainError::Database(other.to_string()),
        }
    }
}

// Re-export commonly used types and functions
pub use levels::{get_current_level, get_progress_to_next_level};
pub use points::{calculate_points, download_multiplier, download_multiplier_percent};
pub use seller_level::{compute_seller_level, SellerLevelContext};
pub use side_effects::{SettledEffects, SideEffects};
pub use stats::aggregate_seller_activity;
pub use verification::{
    check_verification_eligibility, is_level_up, plan_verification_transition, VerificationTransition,
};
