use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use crate::db::{with_retry, DatabaseError, SellerStore};
use crate::models::{EligibilityInput, SellerLevelReport};
use crate::notify::{Notifier, SellerNotification};
use crate::seller_levels::SellerLevelConfig;

use super::levels::{get_current_level, get_progress_to_next_level};
use super::points::{calculate_points, download_multiplier};
use super::side_effects::SideEffects;
use super::stats::aggregate_seller_activity;
use super::verification::{
    check_verification_eligibility, is_level_up, plan_verification_transition, VerificationTransition,
};
use super::DomainError;

/// Attempts per best-effort write, including the first
const SIDE_EFFECT_ATTEMPTS: u8 = 2;

/// Collaborators of the level computation, constructed once at start-up
#[derive(Clone)]
pub struct SellerLevelContext {
    pub store: Arc<dyn SellerStore>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<SellerLevelConfig>,
}

impl SellerLevelContext {
    pub fn new(store: Arc<dyn SellerStore>, notifier: Arc<dyn Notifier>, config: SellerLevelConfig) -> Self {
        Self {
            store,
            notifier,
            config: Arc::new(config),
        }
    }
}

/// Compute a seller's points, level and verification status from live counts.
///
/// The returned report is authoritative. The cached level snapshot and any
/// verification transition are written by the returned `SideEffects`, whose
/// failures never reach the caller. Notifications are sent only after the write
/// that prevents them from repeating has succeeded.
#[tracing::instrument(skip(ctx, now))]
pub async fn compute_seller_level(
    ctx: &SellerLevelContext,
    seller_id: &str,
    now: DateTime<Utc>,
) -> Result<(SellerLevelReport, SideEffects), DomainError> {
    let seller = ctx
        .store
        .load_seller(seller_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Seller {} not found", seller_id)))?;

    if !seller.is_seller() {
        return Err(DomainError::Forbidden("User is not a seller".to_string()));
    }

    let activity = aggregate_seller_activity(ctx.store.as_ref(), seller_id).await?;
    let config = ctx.config.as_ref();

    let eligibility = check_verification_eligibility(
        &EligibilityInput {
            total_sales: activity.total_sales,
            avg_rating: activity.stats.avg_rating,
            published_resource_count: activity.published_resources,
            account_created_at: seller.created_at,
        },
        &config.verification,
        now,
    );

    let previous_state = seller.verification_state();
    let transition = plan_verification_transition(previous_state, eligibility.eligible);
    let verification = transition.map_or(previous_state, |t| t.target_state());

    // Points use the state this computation settles on, so an immediate
    // re-read yields the same result.
    let points = calculate_points(&activity.stats, verification.is_verified(), config);
    let level = get_current_level(&config.levels, points, &activity.stats).clone();
    let progress = get_progress_to_next_level(&config.levels, points, &activity.stats);

    let mut effects = SideEffects::new(seller_id);

    if is_level_up(seller.seller_level, level.level) {
        info!(from = seller.seller_level, to = level.level, "Seller reached a new level");
    }
    {
        let store = Arc::clone(&ctx.store);
        let notifier = Arc::clone(&ctx.notifier);
        let id = seller_id.to_string();
        let level = level.clone();
        effects.spawn("level_snapshot", async move {
            // Only the write that actually raised the stored level announces it
            let raised = with_retry(SIDE_EFFECT_ATTEMPTS, || store.save_level_snapshot(&id, level.level, points))
                .await
                .map_err(|e| e.to_string())?;
            if raised {
                notifier
                    .notify(SellerNotification::level_up(&id, &level))
                    .await
                    .map_err(|e| e.to_string())?;
            }
            Ok::<(), String>(())
        });
    }

    if let Some(transition) = transition {
        info!(?transition, ?previous_state, "Applying verification transition");

        let store = Arc::clone(&ctx.store);
        let notifier = Arc::clone(&ctx.notifier);
        let id = seller_id.to_string();
        effects.spawn("verification", async move {
            let applied = with_retry(SIDE_EFFECT_ATTEMPTS, || {
                apply_transition(store.as_ref(), &id, transition, now)
            })
            .await
            .map_err(|e| e.to_string())?;

            if !applied {
                info!(?transition, "Verification changed concurrently, transition skipped");
            } else if transition == VerificationTransition::GrantAuto {
                notifier
                    .notify(SellerNotification::verified(&id))
                    .await
                    .map_err(|e| e.to_string())?;
            }
            Ok::<(), String>(())
        });
    }

    let report = SellerLevelReport {
        seller_id: seller_id.to_string(),
        points,
        download_multiplier: download_multiplier(activity.stats.avg_rating),
        level,
        stats: activity.stats,
        progress,
        verification,
        eligibility,
        computed_at: now,
    };

    info!(
        points = report.points,
        level = report.level.level,
        eligible = report.eligibility.eligible,
        "Computed seller level"
    );

    Ok((report, effects))
}

/// Persist a transition with the guard that keeps it from overriding a
/// concurrent change. Returns whether the row changed.
async fn apply_transition(
    store: &dyn SellerStore,
    seller_id: &str,
    transition: VerificationTransition,
    now: DateTime<Utc>,
) -> Result<bool, DatabaseError> {
    match transition {
        VerificationTransition::GrantAuto => store.grant_auto_verification(seller_id, now).await,
        VerificationTransition::RevokeAuto => store.revoke_auto_verification(seller_id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::MockSellerStore;
    use crate::models::{ReviewSummary, SellerRecord, VerificationState};
    use crate::notify::{MockNotifier, NotificationKind};
    use chrono::Duration;

    fn seller(role: &str, level: i32, verified: Option<&str>) -> SellerRecord {
        SellerRecord {
            id: "seller-1".to_string(),
            role: role.to_string(),
            created_at: Utc::now() - Duration::days(40),
            is_verified_seller: verified.is_some(),
            verified_seller_at: verified.map(|_| Utc::now() - Duration::days(5)),
            verified_seller_method: verified.map(str::to_string),
            seller_level: level,
            seller_xp: 0,
        }
    }

    fn store_for(record: SellerRecord) -> MockSellerStore {
        let mut store = MockSellerStore::new();
        store.expect_load_seller().returning(move |_| Ok(Some(record.clone())));
        store.expect_count_uploads().returning(|_| Ok(15));
        store.expect_count_published_resources().returning(|_| Ok(12));
        store.expect_count_completed_sales().returning(|_| Ok(30));
        store.expect_count_free_downloads().returning(|_| Ok(20));
        store
            .expect_review_summary()
            .returning(|_| Ok(ReviewSummary { count: 12, avg_rating: Some(4.8) }));
        store
    }

    fn context(store: MockSellerStore, notifier: MockNotifier) -> SellerLevelContext {
        SellerLevelContext::new(Arc::new(store), Arc::new(notifier), SellerLevelConfig::default())
    }

    #[tokio::test]
    async fn test_missing_seller_is_not_found() {
        let mut store = MockSellerStore::new();
        store.expect_load_seller().returning(|_| Ok(None));
        store.expect_count_uploads().never();

        let result = compute_seller_level(&context(store, MockNotifier::new()), "ghost", Utc::now()).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_buyer_is_forbidden() {
        let mut store = MockSellerStore::new();
        store.expect_load_seller().returning(|_| Ok(Some(seller("BUYER", 0, None))));
        store.expect_count_uploads().never();

        let result = compute_seller_level(&context(store, MockNotifier::new()), "seller-1", Utc::now()).await;
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_aggregation_failure_is_a_database_error() {
        let mut store = MockSellerStore::new();
        store.expect_load_seller().returning(|_| Ok(Some(seller("SELLER", 0, None))));
        store.expect_count_uploads().returning(|_| Ok(1));
        store.expect_count_published_resources().returning(|_| Ok(1));
        store.expect_count_completed_sales().returning(|_| Ok(1));
        store.expect_count_free_downloads().returning(|_| Ok(1));
        store
            .expect_review_summary()
            .returning(|_| Err(DatabaseError::ConnectionError("down".to_string())));

        let result = compute_seller_level(&context(store, MockNotifier::new()), "seller-1", Utc::now()).await;
        assert!(matches!(result, Err(DomainError::Database(_))));
    }

    #[tokio::test]
    async fn test_grant_persists_then_notifies_once() {
        let mut store = store_for(seller("SELLER", 2, None));
        store.expect_save_level_snapshot().times(1).returning(|_, _, _| Ok(false));
        store
            .expect_grant_auto_verification()
            .withf(|id, _| id == "seller-1")
            .times(1)
            .returning(|_, _| Ok(true));
        store.expect_revoke_auto_verification().never();

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.kind == NotificationKind::Verified)
            .times(1)
            .returning(|_| Ok(()));

        let (report, effects) =
            compute_seller_level(&context(store, notifier), "seller-1", Utc::now()).await.unwrap();

        assert_eq!(report.verification, VerificationState::VerifiedAuto);
        assert!(report.eligibility.eligible);
        // 360 base points plus the verified bonus
        assert_eq!(report.points, 396);
        assert_eq!(report.level.level, 2);

        let settled = effects.settle().await;
        assert_eq!(settled.failed, 0);
        assert_eq!(settled.succeeded, 2);
    }

    #[tokio::test]
    async fn test_write_failures_do_not_fail_the_read() {
        let mut store = store_for(seller("SELLER", 0, None));
        store
            .expect_save_level_snapshot()
            .returning(|_, _, _| Err(DatabaseError::ConnectionError("down".to_string())));
        store
            .expect_grant_auto_verification()
            .returning(|_, _| Err(DatabaseError::ConnectionError("down".to_string())));

        // Nothing is announced when the state write did not land
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();

        let (report, effects) =
            compute_seller_level(&context(store, notifier), "seller-1", Utc::now()).await.unwrap();

        assert_eq!(report.level.level, 2);
        let settled = effects.settle().await;
        assert_eq!(settled.succeeded, 0);
        assert_eq!(settled.failed, 2);
    }

    #[tokio::test]
    async fn test_notification_failure_is_swallowed() {
        let mut store = store_for(seller("SELLER", 0, Some("manual")));
        store.expect_save_level_snapshot().returning(|_, _, _| Ok(true));
        store.expect_grant_auto_verification().never();
        store.expect_revoke_auto_verification().never();

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.kind == NotificationKind::LevelUp && n.title.contains("Gold"))
            .times(1)
            .returning(|_| Err(crate::notify::NotifyError::Rejected("queue full".to_string())));

        let (report, effects) =
            compute_seller_level(&context(store, notifier), "seller-1", Utc::now()).await.unwrap();

        assert_eq!(report.verification, VerificationState::VerifiedManual);
        assert_eq!(effects.settle().await.failed, 1);
    }

    #[tokio::test]
    async fn test_grant_lost_to_concurrent_write_is_not_announced() {
        let mut store = store_for(seller("SELLER", 0, None));
        // Another read already raised the level and granted verification
        store.expect_save_level_snapshot().returning(|_, _, _| Ok(false));
        store.expect_grant_auto_verification().times(1).returning(|_, _| Ok(false));

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();

        let (report, effects) =
            compute_seller_level(&context(store, notifier), "seller-1", Utc::now()).await.unwrap();

        assert_eq!(report.verification, VerificationState::VerifiedAuto);
        assert_eq!(effects.settle().await.succeeded, 2);
    }

    #[tokio::test]
    async fn test_revocation_uses_guarded_write() {
        let mut record = seller("SELLER", 2, Some("auto"));
        record.created_at = Utc::now() - Duration::days(3);
        let mut store = store_for(record);
        store.expect_save_level_snapshot().returning(|_, _, _| Ok(false));
        store.expect_grant_auto_verification().never();
        // The row was switched to a manual grant in the meantime
        store.expect_revoke_auto_verification().times(1).returning(|_| Ok(false));

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();

        let (report, effects) =
            compute_seller_level(&context(store, notifier), "seller-1", Utc::now()).await.unwrap();

        assert_eq!(report.verification, VerificationState::Unverified);
        assert_eq!(effects.settle().await.failed, 0);
    }
}
