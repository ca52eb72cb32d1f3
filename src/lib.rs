pub mod api;
pub mod auth;
pub mod db;
pub mod domain;
pub mod models;
pub mod notify;
pub mod seller_levels;

// Re-export commonly used types
pub use models::{SellerLevelReport, SellerLevelResponse, SellerStats, VerificationState};

pub use db::{create_pool, health_check, with_retry, DatabaseError, PgSellerStore, SellerStore};

pub use domain::{
    calculate_points, check_verification_eligibility, compute_seller_level, get_current_level,
    get_progress_to_next_level, DomainError, SellerLevelContext,
};

pub use notify::{Notifier, PgNotifier, SellerNotification};

pub use seller_levels::{SellerLevelConfig, SELLER_LEVELS};
