//! Resolving the calling [`Viewer`] from a bearer token.
//!
//! Token issuance belongs to the identity service. This module only verifies
//! tokens and maps their claims onto a viewer. Every failure resolves to
//! [`Viewer::anonymous`], which is denied everything.

use hyper::http::HeaderMap;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::config::Auth as AuthConfig;
use crate::error::{Error, Result};
use crate::filter::Viewer;
use crate::vocabulary::Role;

const MIN_SECRET_LENGTH: usize = 32;

fn validate_secret(config: &AuthConfig) -> Result<()> {
    if config.jwt_secret.len() < MIN_SECRET_LENGTH {
        return Err(Error::Config(format!(
            "JWT secret must be at least {MIN_SECRET_LENGTH} bytes"
        )));
    }
    Ok(())
}

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Account role as stored by the user service
    pub role: String,
    #[serde(default)]
    pub department_id: Option<String>,
    #[serde(default)]
    pub sector_ids: Vec<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Verify and decode a JWT token.
///
/// # Returns
/// - `Ok(Claims)` if the token is valid
/// - `Err(Error::TokenExpired)` if the token has expired
/// - `Err(Error::Unauthorized)` for any other validation failure
pub fn verify_token(config: &AuthConfig, token: &str) -> Result<Claims> {
    validate_secret(config)?;
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => Error::TokenExpired,
        _ => Error::Unauthorized,
    })?;

    Ok(token_data.claims)
}

/// Build a viewer from verified claims.
///
/// Roles without a rule set (operator, viewer) and unrecognized role strings
/// produce a viewer with no role.
pub fn viewer_from_claims(claims: Claims) -> Viewer {
    let role = match claims.role.parse::<Role>() {
        Ok(role) => Some(role),
        Err(_) => {
            tracing::warn!(
                sub = %claims.sub,
                role = %claims.role,
                "token role has no permission rules"
            );
            None
        }
    };
    Viewer {
        id: claims.sub,
        role,
        department_id: claims.department_id,
        sector_ids: claims.sector_ids,
    }
}

/// Extract the bearer token from the Authorization header.
///
/// The auth scheme is matched case-insensitively (RFC 7235).
pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(Error::Unauthorized)?;

    auth_header
        .get(..7)
        .filter(|p| p.eq_ignore_ascii_case("bearer "))
        .map(|_| &auth_header[7..])
        .ok_or(Error::Unauthorized)
}

/// Resolve the caller from request headers.
///
/// Never fails: a missing, malformed, expired or forged token yields the
/// anonymous viewer.
pub fn viewer_from_headers(headers: &HeaderMap, config: &AuthConfig) -> Viewer {
    match bearer_token(headers).and_then(|token| verify_token(config, token)) {
        Ok(claims) => viewer_from_claims(claims),
        Err(e) => {
            tracing::debug!("treating caller as anonymous: {e}");
            Viewer::anonymous()
        }
    }
}
