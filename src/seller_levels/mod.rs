pub mod config;
pub mod models;

pub use config::{PointsWeights, SellerLevelConfig};
pub use models::{
    validate_levels, LevelDefinition, MultiplierTier, VerificationCriteria,
    DOWNLOAD_MULTIPLIER_TIERS, MIN_DOWNLOAD_MULTIPLIER_PERCENT, SELLER_LEVELS,
};
