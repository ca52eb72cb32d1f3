use std::sync::Arc;

use crate::auth::AuthConfig;
use crate::domain::SellerLevelContext;

/// Shared application state, built once at start-up
#[derive(Clone)]
pub struct AppState {
    pub levels: SellerLevelContext,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(levels: SellerLevelContext, auth: AuthConfig) -> Self {
        Self {
            levels,
            auth: Arc::new(auth),
        }
    }
}
