use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use warden_auth_types::identity::AuthContext;
use warden_auth_types::token::{
    AccessClaims, RefreshClaims, sign, verify_access_token, verify_refresh_token,
};

use crate::domain::repository::RefreshTokenRepository;
use crate::domain::types::{RefreshTokenRecord, TokenPair};
use crate::error::AuthServiceError;

fn now_secs() -> Result<u64, AuthServiceError> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock before UNIX epoch")?
        .as_secs())
}

/// Signs and verifies access and refresh tokens.
///
/// Each token class has its own secret and TTL. Verification never tells the
/// caller why a token was rejected.
#[derive(Clone)]
pub struct TokenService {
    access_secret: String,
    refresh_secret: String,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
}

impl TokenService {
    pub fn new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
        access_ttl_secs: u64,
        refresh_ttl_secs: u64,
    ) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    pub fn sign_access(&self, ctx: &AuthContext) -> Result<String, AuthServiceError> {
        let iat = now_secs()?;
        let claims = AccessClaims {
            user_id: ctx.user_id,
            device_id: ctx.device_id,
            role_id: ctx.role_id,
            role_name: ctx.role_name.clone(),
            uuid: Uuid::new_v4(),
            iat,
            exp: iat + self.access_ttl_secs,
        };
        sign(&claims, &self.access_secret).map_err(|e| AuthServiceError::Internal(e.into()))
    }

    pub fn sign_refresh(&self, user_id: Uuid) -> Result<String, AuthServiceError> {
        let iat = now_secs()?;
        let claims = RefreshClaims {
            user_id,
            uuid: Uuid::new_v4(),
            iat,
            exp: iat + self.refresh_ttl_secs,
        };
        sign(&claims, &self.refresh_secret).map_err(|e| AuthServiceError::Internal(e.into()))
    }

    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, AuthServiceError> {
        verify_access_token(token, &self.access_secret).map_err(|e| {
            tracing::debug!(error = %e, "access token rejected");
            AuthServiceError::InvalidToken
        })
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, AuthServiceError> {
        verify_refresh_token(token, &self.refresh_secret).map_err(|e| {
            tracing::debug!(error = %e, "refresh token rejected");
            AuthServiceError::InvalidToken
        })
    }
}

// ── Token issuance ───────────────────────────────────────────────────────────

/// Sign a new access/refresh pair for `ctx` and persist the refresh token
/// against `ctx.device_id`.
///
/// The refresh token is verified right after signing to recover its `exp`;
/// it is only persisted once both tokens are signed and the expiry is known.
/// Signing is CPU-bound HMAC work and runs sequentially on the caller's task.
pub async fn issue_token_pair<R: RefreshTokenRepository>(
    tokens: &TokenService,
    refresh_tokens: &R,
    ctx: &AuthContext,
) -> Result<TokenPair, AuthServiceError> {
    let access_token = tokens.sign_access(ctx)?;
    let refresh_token = tokens.sign_refresh(ctx.user_id)?;

    let claims = verify_refresh_token(&refresh_token, &tokens.refresh_secret)
        .context("verify freshly signed refresh token")?;
    let expires_at = i64::try_from(claims.exp)
        .ok()
        .and_then(|exp| DateTime::from_timestamp(exp, 0))
        .ok_or_else(|| anyhow!("refresh token exp out of range: {}", claims.exp))?;

    refresh_tokens
        .create(&RefreshTokenRecord {
            token: refresh_token.clone(),
            user_id: ctx.user_id,
            device_id: ctx.device_id,
            expires_at,
            created_at: Utc::now(),
        })
        .await?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}
