// Shared fixtures for integration tests: in-memory collaborators that behave
// like the PostgreSQL ones without needing a database.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use currico_seller::db::DatabaseError;
use currico_seller::models::{ReviewSummary, SellerRecord, VerificationMethod};
use currico_seller::notify::{NotificationKind, Notifier, NotifyError, SellerNotification};
use currico_seller::{SellerLevelConfig, SellerLevelContext, SellerStore};

/// One seller's row plus the activity counted from the other tables
#[derive(Debug, Clone)]
pub struct SellerFixture {
    pub record: SellerRecord,
    pub uploads: i64,
    pub published: i64,
    pub sales: i64,
    pub free_downloads: i64,
    pub reviews: ReviewSummary,
}

impl SellerFixture {
    pub fn new(id: &str, account_age_days: i64) -> Self {
        Self {
            record: SellerRecord {
                id: id.to_string(),
                role: "SELLER".to_string(),
                created_at: Utc::now() - Duration::days(account_age_days),
                is_verified_seller: false,
                verified_seller_at: None,
                verified_seller_method: None,
                seller_level: 0,
                seller_xp: 0,
            },
            uploads: 0,
            published: 0,
            sales: 0,
            free_downloads: 0,
            reviews: ReviewSummary { count: 0, avg_rating: None },
        }
    }

    pub fn role(mut self, role: &str) -> Self {
        self.record.role = role.to_string();
        self
    }

    pub fn uploads(mut self, uploads: i64, published: i64) -> Self {
        self.uploads = uploads;
        self.published = published;
        self
    }

    pub fn downloads(mut self, sales: i64, free: i64) -> Self {
        self.sales = sales;
        self.free_downloads = free;
        self
    }

    pub fn reviews(mut self, count: i64, avg_rating: f64) -> Self {
        self.reviews = ReviewSummary { count, avg_rating: Some(avg_rating) };
        self
    }

    pub fn verified(mut self, method: &str, at: DateTime<Utc>) -> Self {
        self.record.is_verified_seller = true;
        self.record.verified_seller_at = Some(at);
        self.record.verified_seller_method = Some(method.to_string());
        self
    }

    pub fn cached_level(mut self, level: i32) -> Self {
        self.record.seller_level = level;
        self
    }
}

#[derive(Default)]
pub struct InMemorySellerStore {
    sellers: Mutex<HashMap<String, SellerFixture>>,
    fail_writes: AtomicBool,
}

impl InMemorySellerStore {
    pub fn with(fixture: SellerFixture) -> Self {
        let store = Self::default();
        store.put(fixture);
        store
    }

    pub fn put(&self, fixture: SellerFixture) {
        self.sellers
            .lock()
            .unwrap()
            .insert(fixture.record.id.clone(), fixture);
    }

    pub fn update<F: FnOnce(&mut SellerFixture)>(&self, seller_id: &str, f: F) {
        let mut sellers = self.sellers.lock().unwrap();
        f(sellers.get_mut(seller_id).expect("unknown seller"));
    }

    pub fn record(&self, seller_id: &str) -> SellerRecord {
        self.sellers.lock().unwrap()[seller_id].record.clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn read<T>(&self, seller_id: &str, f: impl FnOnce(&SellerFixture) -> T) -> Result<T, DatabaseError> {
        let sellers = self.sellers.lock().unwrap();
        sellers
            .get(seller_id)
            .map(f)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", seller_id)))
    }

    /// Apply `f` to the row under the lock; `f` reports whether it changed anything
    fn write(&self, seller_id: &str, f: impl FnOnce(&mut SellerRecord) -> bool) -> Result<bool, DatabaseError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DatabaseError::ConnectionError("write rejected".to_string()));
        }
        let mut sellers = self.sellers.lock().unwrap();
        let fixture = sellers
            .get_mut(seller_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", seller_id)))?;
        Ok(f(&mut fixture.record))
    }
}

#[async_trait]
impl SellerStore for InMemorySellerStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn load_seller(&self, seller_id: &str) -> Result<Option<SellerRecord>, DatabaseError> {
        Ok(self.sellers.lock().unwrap().get(seller_id).map(|f| f.record.clone()))
    }

    async fn count_uploads(&self, seller_id: &str) -> Result<i64, DatabaseError> {
        self.read(seller_id, |f| f.uploads)
    }

    async fn count_published_resources(&self, seller_id: &str) -> Result<i64, DatabaseError> {
        self.read(seller_id, |f| f.published)
    }

    async fn count_completed_sales(&self, seller_id: &str) -> Result<i64, DatabaseError> {
        self.read(seller_id, |f| f.sales)
    }

    async fn count_free_downloads(&self, seller_id: &str) -> Result<i64, DatabaseError> {
        self.read(seller_id, |f| f.free_downloads)
    }

    async fn review_summary(&self, seller_id: &str) -> Result<ReviewSummary, DatabaseError> {
        self.read(seller_id, |f| f.reviews)
    }

    async fn save_level_snapshot(&self, seller_id: &str, level: i32, xp: i64) -> Result<bool, DatabaseError> {
        self.write(seller_id, |r| {
            let raised = r.seller_level < level;
            r.seller_level = level;
            r.seller_xp = xp;
            raised
        })
    }

    async fn grant_auto_verification(&self, seller_id: &str, at: DateTime<Utc>) -> Result<bool, DatabaseError> {
        self.write(seller_id, |r| {
            if r.is_verified_seller {
                return false;
            }
            r.is_verified_seller = true;
            r.verified_seller_at = Some(at);
            r.verified_seller_method = Some(VerificationMethod::Auto.as_str().to_string());
            true
        })
    }

    async fn revoke_auto_verification(&self, seller_id: &str) -> Result<bool, DatabaseError> {
        self.write(seller_id, |r| {
            let auto = r.is_verified_seller
                && r.verified_seller_method.as_deref() == Some(VerificationMethod::Auto.as_str());
            if !auto {
                return false;
            }
            r.is_verified_seller = false;
            r.verified_seller_at = None;
            r.verified_seller_method = None;
            true
        })
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SellerNotification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SellerNotification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.sent.lock().unwrap().iter().filter(|n| n.kind == kind).count()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: SellerNotification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

/// Context over the given collaborators with default configuration
pub fn context(store: Arc<InMemorySellerStore>, notifier: Arc<RecordingNotifier>) -> SellerLevelContext {
    SellerLevelContext::new(store, notifier, SellerLevelConfig::default())
}
