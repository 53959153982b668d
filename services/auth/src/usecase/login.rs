use warden_auth_types::identity::AuthContext;

use crate::crypto::password::verify_password;
use crate::domain::repository::{
    DeviceRepository, RefreshTokenRepository, UserRepository, ValidationCodeRepository,
};
use crate::domain::types::{ClientInfo, NewDevice, TokenPair, ValidationCodeType};
use crate::error::AuthServiceError;
use crate::usecase::token::{TokenService, issue_token_pair};
use crate::usecase::two_factor::SecondFactor;

pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub totp_code: Option<String>,
    pub code: Option<String>,
    pub client: ClientInfo,
}

pub struct LoginUseCase<U, V, D, R>
where
    U: UserRepository,
    V: ValidationCodeRepository,
    D: DeviceRepository,
    R: RefreshTokenRepository,
{
    pub users: U,
    pub codes: V,
    pub devices: D,
    pub refresh_tokens: R,
    pub tokens: TokenService,
}

impl<U, V, D, R> LoginUseCase<U, V, D, R>
where
    U: UserRepository,
    V: ValidationCodeRepository,
    D: DeviceRepository,
    R: RefreshTokenRepository,
{
    pub async fn execute(&self, input: LoginInput) -> Result<TokenPair, AuthServiceError> {
        let factor = SecondFactor::from_parts(input.totp_code, input.code)?;

        // 1. Credentials
        let found = self
            .users
            .find_with_role_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::EmailNotFound)?;
        if !verify_password(&input.password, &found.user.password_hash)? {
            return Err(AuthServiceError::InvalidPassword);
        }

        // 2. Second factor, only when the account has 2FA enabled
        if let Some(secret) = found.user.totp_secret.as_deref() {
            let factor = factor.ok_or(AuthServiceError::InvalidTotpAndCode)?;
            factor
                .verify(&self.codes, &input.email, secret, ValidationCodeType::Login)
                .await?;
        }

        // 3. New session
        let device = self
            .devices
            .create(&NewDevice {
                user_id: found.user.id,
                user_agent: input.client.user_agent,
                ip: input.client.ip,
            })
            .await?;

        let ctx = AuthContext {
            user_id: found.user.id,
            device_id: device.id,
            role_id: found.role.id,
            role_name: found.role.name,
        };
        let pair = issue_token_pair(&self.tokens, &self.refresh_tokens, &ctx).await?;

        tracing::info!(user_id = %ctx.user_id, device_id = %ctx.device_id, "login");
        Ok(pair)
    }
}
