use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

use crate::api::error::ApiError;

/// JWT claims issued by the web application's session layer.
/// `sub` carries the user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Signing secret for session tokens
#[derive(Clone)]
pub struct AuthConfig {
    jwt_secret: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig").field("jwt_secret", &"<redacted>").finish()
    }
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self { jwt_secret: jwt_secret.into() }
    }

    /// Read JWT_SECRET, falling back to SECRET_KEY
    pub fn from_env() -> Result<Self, ApiError> {
        let secret = env::var("JWT_SECRET")
            .or_else(|_| env::var("SECRET_KEY"))
            .map_err(|_| ApiError::Internal("JWT_SECRET or SECRET_KEY environment variable not set".to_string()))?
            .trim_matches('"')
            .to_string();

        if secret.is_empty() {
            return Err(ApiError::Internal("JWT secret is empty".to_string()));
        }

        Ok(Self::new(secret))
    }
}

/// Validate a JWT token and return the user id from its `sub` claim
pub fn validate_jwt_and_extract_user_id(token: &str, config: &AuthConfig) -> Result<String, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Session tokens carry no audience
    validation.validate_aud = false;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::warn!("JWT validation failed: {}", e);
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })?;

    let user_id = token_data.claims.sub.trim();
    if user_id.is_empty() {
        return Err(ApiError::Unauthorized("Token has no subject".to_string()));
    }

    Ok(user_id.to_string())
}

/// Extract JWT token from Authorization header
/// Expected format: "Bearer <token>"
pub fn extract_jwt_from_header(auth_header: Option<&str>) -> Result<&str, ApiError> {
    let auth_value = auth_header.ok_or_else(|| {
        ApiError::Unauthorized("Missing Authorization header".to_string())
    })?;

    auth_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format, expected 'Bearer <token>'".to_string())
        })
}
