use uuid::Uuid;

use crate::crypto::totp;
use crate::domain::repository::{UserRepository, ValidationCodeRepository};
use crate::domain::types::{TotpSetup, ValidationCodeType};
use crate::error::AuthServiceError;
use crate::usecase::otp::validate_code;

/// Second factor presented alongside a password or on 2FA disable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecondFactor {
    /// Code from the user's authenticator app.
    Totp(String),
    /// Code emailed via send-OTP.
    Code(String),
}

impl SecondFactor {
    /// `None` when neither field is supplied. Supplying both is rejected.
    pub fn from_parts(
        totp_code: Option<String>,
        code: Option<String>,
    ) -> Result<Option<Self>, AuthServiceError> {
        match (totp_code, code) {
            (Some(_), Some(_)) => Err(AuthServiceError::InvalidTotpAndCode),
            (Some(t), None) => Ok(Some(Self::Totp(t))),
            (None, Some(c)) => Ok(Some(Self::Code(c))),
            (None, None) => Ok(None),
        }
    }

    /// Check against the user's TOTP secret or an emailed code of `kind`.
    pub async fn verify<V: ValidationCodeRepository>(
        &self,
        codes: &V,
        email: &str,
        totp_secret: &str,
        kind: ValidationCodeType,
    ) -> Result<(), AuthServiceError> {
        match self {
            Self::Totp(code) => {
                if !totp::verify(totp_secret, code)? {
                    return Err(AuthServiceError::InvalidTotpCode);
                }
            }
            Self::Code(code) => {
                validate_code(codes, email, code, kind).await?;
            }
        }
        Ok(())
    }
}

// ── SetupTwoFactor ───────────────────────────────────────────────────────────

pub struct SetupTwoFactorUseCase<U: UserRepository> {
    pub users: U,
    pub issuer: String,
}

impl<U: UserRepository> SetupTwoFactorUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<TotpSetup, AuthServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;
        if user.two_factor_enabled() {
            return Err(AuthServiceError::TotpAlreadyEnabled);
        }

        let setup = totp::generate(&self.issuer, &user.email)?;
        self.users
            .set_totp_secret(user.id, Some(&setup.secret))
            .await?;

        tracing::info!(user_id = %user.id, "two-factor enabled");
        Ok(setup)
    }
}

// ── DisableTwoFactor ─────────────────────────────────────────────────────────

pub struct DisableTwoFactorInput {
    pub user_id: Uuid,
    pub totp_code: Option<String>,
    pub code: Option<String>,
}

pub struct DisableTwoFactorUseCase<U, V>
where
    U: UserRepository,
    V: ValidationCodeRepository,
{
    pub users: U,
    pub codes: V,
}

impl<U, V> DisableTwoFactorUseCase<U, V>
where
    U: UserRepository,
    V: ValidationCodeRepository,
{
    pub async fn execute(&self, input: DisableTwoFactorInput) -> Result<(), AuthServiceError> {
        // Exactly one factor is required here, regardless of account state
        let factor = SecondFactor::from_parts(input.totp_code, input.code)?
            .ok_or(AuthServiceError::InvalidTotpAndCode)?;

        let user = self
            .users
            .find_by_id(input.user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;
        let Some(secret) = user.totp_secret.as_deref() else {
            return Err(AuthServiceError::TotpNotEnabled);
        };

        factor
            .verify(&self.codes, &user.email, secret, ValidationCodeType::Disable2fa)
            .await?;

        self.users.set_totp_secret(user.id, None).await?;
        tracing::info!(user_id = %user.id, "two-factor disabled");
        Ok(())
    }
}
