use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// One rung of the seller level ladder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDefinition {
    pub level: i32,
    pub name: String,
    pub points_threshold: i64,
    pub min_uploads: i64,
    pub min_downloads: i64,
}

impl LevelDefinition {
    fn new(level: i32, name: &str, points_threshold: i64, min_uploads: i64, min_downloads: i64) -> Self {
        Self {
            level,
            name: name.to_string(),
            points_threshold,
            min_uploads,
            min_downloads,
        }
    }
}

/// Level ladder, ascending. Level 0 is the baseline every seller starts at.
pub static SELLER_LEVELS: Lazy<Vec<LevelDefinition>> = Lazy::new(|| {
    vec![
        LevelDefinition::new(0, "Bronze", 0, 0, 0),
        LevelDefinition::new(1, "Silber", 50, 3, 5),
        LevelDefinition::new(2, "Gold", 200, 10, 25),
        LevelDefinition::new(3, "Platin", 500, 25, 100),
        LevelDefinition::new(4, "Diamant", 1200, 50, 300),
    ]
});

/// Check that a level table is usable by the resolver: it starts at an
/// unconditional level 0, levels are consecutive and thresholds strictly increase.
pub fn validate_levels(levels: &[LevelDefinition]) -> Result<(), String> {
    let first = levels.first().ok_or_else(|| "level table is empty".to_string())?;

    if first.level != 0 || first.points_threshold != 0 || first.min_uploads != 0 || first.min_downloads != 0 {
        return Err("level 0 must exist and have no requirements".to_string());
    }

    for pair in levels.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        if upper.level != lower.level + 1 {
            return Err(format!("level {} is followed by level {}", lower.level, upper.level));
        }
        if upper.points_threshold <= lower.points_threshold {
            return Err(format!(
                "threshold of level {} ({}) does not exceed level {} ({})",
                upper.level, upper.points_threshold, lower.level, lower.points_threshold
            ));
        }
    }

    Ok(())
}

/// Minimum average rating that earns a download multiplier, in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiplierTier {
    pub min_rating: f64,
    pub percent: i64,
}

/// Multiplier applied when there is no rating or the rating is below every tier
pub const MIN_DOWNLOAD_MULTIPLIER_PERCENT: i64 = 100;

/// Ordered from the highest tier down
pub const DOWNLOAD_MULTIPLIER_TIERS: [MultiplierTier; 2] = [
    MultiplierTier { min_rating: 4.5, percent: 150 },
    MultiplierTier { min_rating: 4.0, percent: 120 },
];

/// Thresholds a seller must meet simultaneously to be verified automatically
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationCriteria {
    pub min_sales: i64,
    pub min_rating: f64,
    pub min_resources: i64,
    pub account_age_days: i64,
}

impl Default for VerificationCriteria {
    fn default() -> Self {
        Self {
            min_sales: 10,
            min_rating: 4.0,
            min_resources: 5,
            account_age_days: 30,
        }
    }
}
