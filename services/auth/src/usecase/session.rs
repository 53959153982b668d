use warden_auth_types::identity::AuthContext;

use crate::domain::repository::{DeviceRepository, RefreshTokenRepository};
use crate::domain::types::{ClientInfo, DeviceUpdate, TokenPair};
use crate::error::AuthServiceError;
use crate::usecase::token::{TokenService, issue_token_pair};

/// Refresh and logout answer every failure other than token reuse with one
/// opaque `UnauthorizedAccess`, so "expired" and "stolen" look the same.
fn collapse(e: AuthServiceError) -> AuthServiceError {
    match e {
        AuthServiceError::RefreshTokenAlreadyUsed => e,
        AuthServiceError::Internal(ref cause) => {
            tracing::error!(error = ?cause, "session operation failed");
            AuthServiceError::UnauthorizedAccess
        }
        _ => AuthServiceError::UnauthorizedAccess,
    }
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

pub struct RefreshInput {
    pub refresh_token: String,
    pub client: ClientInfo,
}

pub struct RefreshTokenUseCase<D, R>
where
    D: DeviceRepository,
    R: RefreshTokenRepository,
{
    pub devices: D,
    pub refresh_tokens: R,
    pub tokens: TokenService,
}

impl<D, R> RefreshTokenUseCase<D, R>
where
    D: DeviceRepository,
    R: RefreshTokenRepository,
{
    pub async fn execute(&self, input: RefreshInput) -> Result<TokenPair, AuthServiceError> {
        self.rotate(input).await.map_err(collapse)
    }

    async fn rotate(&self, input: RefreshInput) -> Result<TokenPair, AuthServiceError> {
        // 1. Signature + expiry
        let claims = self.tokens.verify_refresh(&input.refresh_token)?;

        // 2. A valid signature without a live row means the token was already rotated
        let Some(found) = self
            .refresh_tokens
            .find_with_owner(&input.refresh_token)
            .await?
        else {
            tracing::warn!(user_id = %claims.user_id, "refresh token reuse detected");
            return Err(AuthServiceError::RefreshTokenAlreadyUsed);
        };

        let ctx = AuthContext {
            user_id: found.record.user_id,
            device_id: found.record.device_id,
            role_id: found.owner.role.id,
            role_name: found.owner.role.name,
        };
        let touch = DeviceUpdate {
            ip: Some(input.client.ip),
            user_agent: Some(input.client.user_agent),
            is_active: None,
        };

        // 3. Touch device, retire old token, issue new pair
        let (_, retired, pair) = tokio::try_join!(
            self.devices.update(ctx.device_id, &touch),
            self.refresh_tokens.delete(&input.refresh_token),
            issue_token_pair(&self.tokens, &self.refresh_tokens, &ctx),
        )?;

        // 4. A concurrent refresh deleted the row first; withdraw what we issued
        if retired.is_none() {
            tracing::warn!(
                user_id = %ctx.user_id,
                device_id = %ctx.device_id,
                "lost refresh race, revoking newly issued token"
            );
            if let Err(e) = self.refresh_tokens.delete(&pair.refresh_token).await {
                tracing::warn!(error = %e, device_id = %ctx.device_id, "failed to revoke token");
            }
            return Err(AuthServiceError::RefreshTokenAlreadyUsed);
        }

        Ok(pair)
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<D, R>
where
    D: DeviceRepository,
    R: RefreshTokenRepository,
{
    pub devices: D,
    pub refresh_tokens: R,
    pub tokens: TokenService,
}

impl<D, R> LogoutUseCase<D, R>
where
    D: DeviceRepository,
    R: RefreshTokenRepository,
{
    pub async fn execute(&self, refresh_token: &str) -> Result<(), AuthServiceError> {
        self.revoke(refresh_token).await.map_err(collapse)
    }

    async fn revoke(&self, refresh_token: &str) -> Result<(), AuthServiceError> {
        let claims = self.tokens.verify_refresh(refresh_token)?;

        let Some(record) = self.refresh_tokens.delete(refresh_token).await? else {
            tracing::warn!(user_id = %claims.user_id, "logout with revoked refresh token");
            return Err(AuthServiceError::RefreshTokenAlreadyUsed);
        };

        let deactivate = DeviceUpdate {
            is_active: Some(false),
            ..DeviceUpdate::default()
        };
        self.devices.update(record.device_id, &deactivate).await?;

        tracing::info!(user_id = %record.user_id, device_id = %record.device_id, "logout");
        Ok(())
    }
}
