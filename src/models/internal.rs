use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::seller_levels::LevelDefinition;

/// Raw activity counters of a seller, recomputed on every request
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerStats {
    pub uploads: i64,
    /// Completed paid transactions plus free downloads
    pub downloads: i64,
    pub reviews: i64,
    pub avg_rating: Option<f64>,
}

/// Review count and arithmetic mean rating over a seller's resources
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReviewSummary {
    pub count: i64,
    pub avg_rating: Option<f64>,
}

/// Everything the aggregator gathers for one seller
#[derive(Debug, Clone, PartialEq)]
pub struct SellerActivity {
    pub stats: SellerStats,
    pub total_sales: i64,
    pub published_resources: i64,
}

/// User roles as stored in `users.role`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Buyer,
    Seller,
    Admin,
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUYER" => Ok(Self::Buyer),
            "SELLER" => Ok(Self::Seller),
            "ADMIN" => Ok(Self::Admin),
            other => Err(format!("unknown user role: {}", other)),
        }
    }
}

/// How a verified-seller badge was granted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMethod {
    Auto,
    Manual,
}

impl VerificationMethod {
    /// Database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
        }
    }
}

impl FromStr for VerificationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "manual" => Ok(Self::Manual),
            other => Err(format!("unknown verification method: {}", other)),
        }
    }
}

impl fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verified-seller state derived from the persisted user record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationState {
    Unverified,
    VerifiedAuto,
    VerifiedManual,
}

impl VerificationState {
    pub fn is_verified(&self) -> bool {
        !matches!(self, Self::Unverified)
    }

    pub fn method(&self) -> Option<VerificationMethod> {
        match self {
            Self::Unverified => None,
            Self::VerifiedAuto => Some(VerificationMethod::Auto),
            Self::VerifiedManual => Some(VerificationMethod::Manual),
        }
    }
}

/// A named verification criterion, in the order they are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationCriterion {
    #[serde(rename = "minSales")]
    MinSales,
    #[serde(rename = "minRating")]
    MinRating,
    #[serde(rename = "minResources")]
    MinResources,
    #[serde(rename = "accountAgeDays")]
    AccountAgeDays,
}

impl VerificationCriterion {
    pub const ALL: [VerificationCriterion; 4] = [
        Self::MinSales,
        Self::MinRating,
        Self::MinResources,
        Self::AccountAgeDays,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MinSales => "minSales",
            Self::MinRating => "minRating",
            Self::MinResources => "minResources",
            Self::AccountAgeDays => "accountAgeDays",
        }
    }
}

/// Inputs of the verification eligibility check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EligibilityInput {
    pub total_sales: i64,
    pub avg_rating: Option<f64>,
    pub published_resource_count: i64,
    pub account_created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityResult {
    pub eligible: bool,
    pub failed_criteria: Vec<VerificationCriterion>,
    pub met_count: u8,
}

/// Minimum of the next level that the seller does not yet satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelBlocker {
    Uploads,
    Downloads,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementStatus {
    pub current: i64,
    pub required: i64,
}

/// Where the seller stands against each requirement of the next level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRequirements {
    pub points: RequirementStatus,
    pub uploads: RequirementStatus,
    pub downloads: RequirementStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelProgress {
    pub progress_percent: u8,
    pub points_needed: i64,
    pub next: Option<LevelDefinition>,
    pub blockers: Vec<LevelBlocker>,
    pub requirements: LevelRequirements,
}

/// Complete result of one level/verification computation
#[derive(Debug, Clone)]
pub struct SellerLevelReport {
    pub seller_id: String,
    pub points: i64,
    pub level: LevelDefinition,
    pub stats: SellerStats,
    pub download_multiplier: f64,
    pub progress: LevelProgress,
    /// State after this computation's transition was applied
    pub verification: VerificationState,
    pub eligibility: EligibilityResult,
    pub computed_at: DateTime<Utc>,
}
