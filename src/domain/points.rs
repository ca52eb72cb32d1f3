use crate::models::SellerStats;
use crate::seller_levels::{SellerLevelConfig, DOWNLOAD_MULTIPLIER_TIERS, MIN_DOWNLOAD_MULTIPLIER_PERCENT};

/// Download multiplier in percent for an average rating.
/// No rating, a non-finite rating or a rating below every tier gets the minimum.
pub fn download_multiplier_percent(avg_rating: Option<f64>) -> i64 {
    let Some(rating) = avg_rating.filter(|r| r.is_finite()) else {
        return MIN_DOWNLOAD_MULTIPLIER_PERCENT;
    };

    DOWNLOAD_MULTIPLIER_TIERS
        .iter()
        .find(|tier| rating >= tier.min_rating)
        .map(|tier| tier.percent)
        .unwrap_or(MIN_DOWNLOAD_MULTIPLIER_PERCENT)
}

pub fn download_multiplier(avg_rating: Option<f64>) -> f64 {
    download_multiplier_percent(avg_rating) as f64 / 100.0
}

/// Map raw activity to a points score.
///
/// Downloads are weighted by the rating multiplier; verified sellers get a
/// percentage bonus on the total. Integer arithmetic with floor division keeps
/// the result deterministic and monotone in every counter.
pub fn calculate_points(stats: &SellerStats, is_verified_seller: bool, config: &SellerLevelConfig) -> i64 {
    let weights = &config.weights;
    let uploads = stats.uploads.max(0);
    let downloads = stats.downloads.max(0);
    let reviews = stats.reviews.max(0);

    let download_points = downloads
        .saturating_mul(weights.per_download)
        .saturating_mul(download_multiplier_percent(stats.avg_rating))
        / 100;

    let base = uploads
        .saturating_mul(weights.per_upload)
        .saturating_add(download_points)
        .saturating_add(reviews.saturating_mul(weights.per_review));

    if is_verified_seller {
        base.saturating_mul(100 + config.verified_bonus_percent) / 100
    } else {
        base
    }
}
