use crate::models::{LevelBlocker, LevelProgress, LevelRequirements, RequirementStatus, SellerStats};
use crate::seller_levels::{LevelDefinition, SELLER_LEVELS};

fn qualifies(level: &LevelDefinition, points: i64, stats: &SellerStats) -> bool {
    points >= level.points_threshold
        && stats.uploads >= level.min_uploads
        && stats.downloads >= level.min_downloads
}

/// Highest level whose points threshold and activity minimums are all met.
/// Points alone never lift a seller past an unmet upload or download minimum.
pub fn get_current_level<'a>(
    levels: &'a [LevelDefinition],
    points: i64,
    stats: &SellerStats,
) -> &'a LevelDefinition {
    levels
        .iter()
        .rev()
        .find(|level| qualifies(level, points, stats))
        .or_else(|| levels.first())
        .unwrap_or(&SELLER_LEVELS[0])
}

/// Progress from the current level towards the next one
pub fn get_progress_to_next_level(
    levels: &[LevelDefinition],
    points: i64,
    stats: &SellerStats,
) -> LevelProgress {
    let current = get_current_level(levels, points, stats);
    let next = levels.iter().find(|level| level.level == current.level + 1);

    let Some(next) = next else {
        return LevelProgress {
            progress_percent: 100,
            points_needed: 0,
            next: None,
            blockers: Vec::new(),
            requirements: requirements_for(current, points, stats),
        };
    };

    let span = (next.points_threshold - current.points_threshold).max(1);
    let gained = (points - current.points_threshold).clamp(0, span);
    let progress_percent = u8::try_from(gained * 100 / span).unwrap_or(100);

    let mut blockers = Vec::new();
    if stats.uploads < next.min_uploads {
        blockers.push(LevelBlocker::Uploads);
    }
    if stats.downloads < next.min_downloads {
        blockers.push(LevelBlocker::Downloads);
    }

    LevelProgress {
        progress_percent,
        points_needed: (next.points_threshold - points).max(0),
        next: Some(next.clone()),
        blockers,
        requirements: requirements_for(next, points, stats),
    }
}

fn requirements_for(target: &LevelDefinition, points: i64, stats: &SellerStats) -> LevelRequirements {
    LevelRequirements {
        points: RequirementStatus { current: points, required: target.points_threshold },
        uploads: RequirementStatus { current: stats.uploads, required: target.min_uploads },
        downloads: RequirementStatus { current: stats.downloads, required: target.min_downloads },
    }
}
