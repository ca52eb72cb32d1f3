use chrono::{DateTime, Utc};

use crate::models::{EligibilityInput, EligibilityResult, VerificationCriterion, VerificationState};
use crate::seller_levels::VerificationCriteria;

/// Evaluate the four verification criteria independently.
/// A missing average rating always fails the rating check.
pub fn check_verification_eligibility(
    input: &EligibilityInput,
    criteria: &VerificationCriteria,
    now: DateTime<Utc>,
) -> EligibilityResult {
    let account_age_days = now.signed_duration_since(input.account_created_at).num_days();

    let failed_criteria: Vec<VerificationCriterion> = VerificationCriterion::ALL
        .into_iter()
        .filter(|criterion| {
            let met = match criterion {
                VerificationCriterion::MinSales => input.total_sales >= criteria.min_sales,
                VerificationCriterion::MinRating => input
                    .avg_rating
                    .is_some_and(|rating| rating >= criteria.min_rating),
                VerificationCriterion::MinResources => {
                    input.published_resource_count >= criteria.min_resources
                }
                VerificationCriterion::AccountAgeDays => account_age_days >= criteria.account_age_days,
            };
            !met
        })
        .collect();

    EligibilityResult {
        eligible: failed_criteria.is_empty(),
        met_count: (VerificationCriterion::ALL.len() - failed_criteria.len()) as u8,
        failed_criteria,
    }
}

/// Automatic change to a seller's verification state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationTransition {
    GrantAuto,
    RevokeAuto,
}

impl VerificationTransition {
    pub fn target_state(&self) -> VerificationState {
        match self {
            Self::GrantAuto => VerificationState::VerifiedAuto,
            Self::RevokeAuto => VerificationState::Unverified,
        }
    }
}

/// Decide the transition for the observed state and eligibility.
/// Manual grants are never touched.
pub fn plan_verification_transition(
    state: VerificationState,
    eligible: bool,
) -> Option<VerificationTransition> {
    match (state, eligible) {
        (VerificationState::Unverified, true) => Some(VerificationTransition::GrantAuto),
        (VerificationState::VerifiedAuto, false) => Some(VerificationTransition::RevokeAuto),
        _ => None,
    }
}

/// Whether the freshly computed level exceeds the cached one
pub fn is_level_up(cached_level: i32, current_level: i32) -> bool {
    current_level > cached_level
}
