pub mod jwt;

pub use jwt::{extract_jwt_from_header, validate_jwt_and_extract_user_id, AuthConfig, Claims};
