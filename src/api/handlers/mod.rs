// API handlers - thin HTTP orchestration layer
// Handlers only deal with HTTP concerns:
// 1. Extract parameters from request
// 2. Perform authentication/authorization
// 3. Call domain logic
// 4. Transform domain result to HTTP response

pub mod health;
pub mod seller;

pub use health::{db_health_handler, health_handler};
pub use seller::{level_table_handler, seller_level_handler};
