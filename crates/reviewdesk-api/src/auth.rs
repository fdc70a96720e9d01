//! Bearer token extraction.
//!
//! The gateway does not verify tokens itself: the token is forwarded to the
//! upstream API, which scopes every list to the token's tenant and rejects
//! invalid credentials.

use axum::{extract::FromRequestParts, http::request::Parts};
use reviewdesk_core::AppError;

use crate::error::HttpAppError;

/// Bearer token of the calling tenant.
#[derive(Debug, Clone)]
pub struct TenantToken(pub String);

impl TenantToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for TenantToken
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AppError::Unauthorized("Authorization header must be a Bearer token".to_string())
            })?;

        Ok(TenantToken(token.to_string()))
    }
}
