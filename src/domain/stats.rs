use tracing::debug;

use crate::db::{DatabaseError, SellerStore};
use crate::models::{SellerActivity, SellerStats};

/// Gather a seller's activity counters. The reads are independent and are
/// awaited jointly; the first failure aborts the aggregation.
#[tracing::instrument(skip(store))]
pub async fn aggregate_seller_activity(
    store: &dyn SellerStore,
    seller_id: &str,
) -> Result<SellerActivity, DatabaseError> {
    let (uploads, published_resources, total_sales, free_downloads, reviews) = tokio::try_join!(
        store.count_uploads(seller_id),
        store.count_published_resources(seller_id),
        store.count_completed_sales(seller_id),
        store.count_free_downloads(seller_id),
        store.review_summary(seller_id),
    )?;

    let stats = SellerStats {
        uploads,
        downloads: total_sales + free_downloads,
        reviews: reviews.count,
        avg_rating: if reviews.count > 0 { reviews.avg_rating } else { None },
    };

    debug!(?stats, total_sales, published_resources, "Aggregated seller activity");

    Ok(SellerActivity {
        stats,
        total_sales,
        published_resources,
    })
}
