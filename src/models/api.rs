use serde::{Deserialize, Serialize};

use crate::models::internal::{
    LevelBlocker, LevelRequirements, SellerStats, VerificationCriterion, VerificationMethod,
};
use crate::seller_levels::{LevelDefinition, VerificationCriteria};

/// Body of `GET /api/seller/level`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerLevelResponse {
    pub points: i64,
    pub level: i32,
    pub level_name: String,
    pub stats: SellerStats,
    pub download_multiplier: f64,
    pub progress_percent: u8,
    pub points_needed: i64,
    pub next_level_name: Option<String>,
    pub blockers: Vec<LevelBlocker>,
    pub requirements: LevelRequirements,
    pub is_verified_seller: bool,
    pub verification_method: Option<VerificationMethod>,
    pub verification_progress: VerificationProgress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationProgress {
    pub met_count: u8,
    pub total: u8,
    pub failed_criteria: Vec<VerificationCriterion>,
}

/// Body of `GET /api/seller/levels`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelTableResponse {
    pub levels: Vec<LevelDefinition>,
    pub verification_criteria: VerificationCriteria,
}
