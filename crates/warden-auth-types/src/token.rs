//! JWT access/refresh token claims and validation.
//!
//! Access and refresh tokens are signed with HS256 under *separate* secrets.
//! Every token embeds a random `uuid` claim so two tokens minted for the same
//! subject within the same second never serialize identically.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
use serde::Serialize;
use uuid::Uuid;

/// Errors returned by token validation and signing.
///
/// The variants exist for diagnostics only. Anything that reaches a client must
/// collapse them into one "invalid token" outcome so expiry cannot be told apart
/// from forgery.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("failed to sign token")]
    Signing,
}

/// Claims carried by an access token.
///
/// | Field | Claim | Meaning |
/// |-------|-------|---------|
/// | `user_id` | `userId` | subject |
/// | `device_id` | `deviceId` | session the token was minted for |
/// | `role_id` | `roleId` | role used for permission resolution |
/// | `role_name` | `roleName` | informational |
/// | `uuid` | `uuid` | per-token nonce |
/// | `iat` / `exp` | `iat` / `exp` | seconds since epoch |
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub user_id: Uuid,
    pub device_id: Uuid,
    pub role_id: Uuid,
    pub role_name: String,
    pub uuid: Uuid,
    pub iat: u64,
    pub exp: u64,
}

/// Claims carried by a refresh token.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
#[serde(rename_all = "camelCase")]
pub struct RefreshClaims {
    pub user_id: Uuid,
    pub uuid: Uuid,
    pub iat: u64,
    pub exp: u64,
}

// ── Core decode (private) ────────────────────────────────────────────────

/// HS256, `exp` required and checked, no leeway: a token is dead the second it
/// expires.
fn decode_jwt<C: DeserializeOwned>(token: &str, secret: &str) -> Result<C, TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp"]);

    let data = decode::<C>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature
        | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    Ok(data.claims)
}

// ── Public: all consumers ────────────────────────────────────────────────

/// Validate an access token taken from an `Authorization: Bearer` header.
pub fn verify_access_token(token: &str, secret: &str) -> Result<AccessClaims, TokenError> {
    decode_jwt(token, secret)
}

// ── Feature-gated: auth service only ─────────────────────────────────────

/// Validate a refresh token. Only the auth service rotates refresh tokens.
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
pub fn verify_refresh_token(token: &str, secret: &str) -> Result<RefreshClaims, TokenError> {
    decode_jwt(token, secret)
}

/// Sign any claim set with HS256.
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
pub fn sign<C: Serialize>(claims: &C, secret: &str) -> Result<String, TokenError> {
    use jsonwebtoken::{EncodingKey, Header, encode};

    encode(
        &Header::new(jsonwebtoken::Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!(error = %e, "jwt encode failed");
        TokenError::Signing
    })
}
