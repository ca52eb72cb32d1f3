use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

use super::models::{LevelDefinition, VerificationCriteria, SELLER_LEVELS};

/// Points awarded per unit of activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsWeights {
    pub per_upload: i64,
    pub per_download: i64,
    pub per_review: i64,
}

impl Default for PointsWeights {
    fn default() -> Self {
        Self {
            per_upload: 10,
            per_download: 2,
            per_review: 5,
        }
    }
}

/// Configuration for seller levels and automatic verification.
/// Built once at start-up and shared through the application state.
#[derive(Debug, Clone, PartialEq)]
pub struct SellerLevelConfig {
    pub weights: PointsWeights,
    pub verified_bonus_percent: i64,
    pub levels: Vec<LevelDefinition>,
    pub verification: VerificationCriteria,
}

impl Default for SellerLevelConfig {
    fn default() -> Self {
        Self {
            weights: PointsWeights::default(),
            verified_bonus_percent: 10,
            levels: SELLER_LEVELS.clone(),
            verification: VerificationCriteria::default(),
        }
    }
}

impl SellerLevelConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup, falling back to defaults for
    /// missing or unparsable values. Negative weights are clamped to zero.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str, default| parse_or(&lookup, key, default);

        let weights = PointsWeights {
            per_upload: get("SELLER_POINTS_PER_UPLOAD", defaults.weights.per_upload).max(0),
            per_download: get("SELLER_POINTS_PER_DOWNLOAD", defaults.weights.per_download).max(0),
            per_review: get("SELLER_POINTS_PER_REVIEW", defaults.weights.per_review).max(0),
        };

        let min_rating = parse_or(&lookup, "VERIFIED_SELLER_MIN_RATING", defaults.verification.min_rating);
        let min_rating = if min_rating.is_finite() {
            min_rating.clamp(0.0, 5.0)
        } else {
            defaults.verification.min_rating
        };

        let verification = VerificationCriteria {
            min_sales: get("VERIFIED_SELLER_MIN_SALES", defaults.verification.min_sales).max(0),
            min_rating,
            min_resources: get("VERIFIED_SELLER_MIN_RESOURCES", defaults.verification.min_resources).max(0),
            account_age_days: get("VERIFIED_SELLER_ACCOUNT_AGE_DAYS", defaults.verification.account_age_days).max(0),
        };

        Self {
            weights,
            verified_bonus_percent: get("SELLER_VERIFIED_BONUS_PERCENT", defaults.verified_bonus_percent).max(0),
            levels: defaults.levels,
            verification,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!(key = key, value = %raw, default = %default, "Invalid configuration value, using default");
            default
        }),
        None => default,
    }
}
