use super::{SellerLevelReport, SellerLevelResponse, VerificationCriterion, VerificationProgress};

impl SellerLevelReport {
    /// Convert to the JSON shape returned by the level endpoint
    pub fn to_response(&self) -> SellerLevelResponse {
        SellerLevelResponse {
            points: self.points,
            level: self.level.level,
            level_name: self.level.name.clone(),
            stats: self.stats,
            // Two decimals are enough for display and keep the JSON stable
            download_multiplier: (self.download_multiplier * 100.0).round() / 100.0,
            progress_percent: self.progress.progress_percent,
            points_needed: self.progress.points_needed,
            next_level_name: self.progress.next.as_ref().map(|next| next.name.clone()),
            blockers: self.progress.blockers.clone(),
            requirements: self.progress.requirements,
            is_verified_seller: self.verification.is_verified(),
            verification_method: self.verification.method(),
            verification_progress: VerificationProgress {
                met_count: self.eligibility.met_count,
                total: VerificationCriterion::ALL.len() as u8,
                failed_criteria: self.eligibility.failed_criteria.clone(),
            },
        }
    }
}
