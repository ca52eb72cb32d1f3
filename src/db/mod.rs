pub mod connection;
pub mod errors;
pub mod read_ops;
pub mod store;
pub mod write_ops;


pub use connection::{create_pool, health_check, with_retry, DatabaseConfig};
pub use errors::*;
pub use store::{PgSellerStore, SellerStore};
