use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::crypto::generate_otp_code;
use crate::domain::repository::{OtpMailer, UserRepository, ValidationCodeRepository};
use crate::domain::types::{ValidationCode, ValidationCodeType};
use crate::error::AuthServiceError;

/// Look up an emailed code for `(email, code, kind)` and reject it if expired.
///
/// Does not consume the code; callers that need single use delete it.
pub async fn validate_code<V: ValidationCodeRepository>(
    codes: &V,
    email: &str,
    code: &str,
    kind: ValidationCodeType,
) -> Result<ValidationCode, AuthServiceError> {
    let found = codes
        .find(email, code, kind)
        .await?
        .ok_or(AuthServiceError::InvalidOtp)?;

    if found.is_expired(Utc::now()) {
        return Err(AuthServiceError::OtpExpired);
    }
    Ok(found)
}

// ── SendOtp ──────────────────────────────────────────────────────────────────

pub struct SendOtpInput {
    pub email: String,
    pub kind: ValidationCodeType,
}

pub struct SendOtpUseCase<U, V, M>
where
    U: UserRepository,
    V: ValidationCodeRepository,
    M: OtpMailer,
{
    pub users: U,
    pub codes: V,
    pub mailer: M,
    pub ttl_secs: i64,
}

impl<U, V, M> SendOtpUseCase<U, V, M>
where
    U: UserRepository,
    V: ValidationCodeRepository,
    M: OtpMailer,
{
    pub async fn execute(&self, input: SendOtpInput) -> Result<(), AuthServiceError> {
        // 1. Registration needs a fresh email; password reset needs a known one
        let user = self.users.find_by_email(&input.email).await?;
        match (input.kind, user.is_some()) {
            (ValidationCodeType::Register, true) => {
                return Err(AuthServiceError::EmailAlreadyExists);
            }
            (ValidationCodeType::ForgotPassword, false) => {
                return Err(AuthServiceError::EmailNotFound);
            }
            _ => {}
        }

        // 2. Replace any outstanding code for (email, kind)
        let now = Utc::now();
        let code = ValidationCode {
            id: Uuid::new_v4(),
            email: input.email.clone(),
            code: generate_otp_code(),
            kind: input.kind,
            expires_at: now + Duration::seconds(self.ttl_secs),
            created_at: now,
        };
        self.codes.upsert(&code).await?;

        // 3. Deliver. An undelivered code is withdrawn
        if let Err(e) = self.mailer.send_otp(&code.email, &code.code).await {
            if let Err(cleanup) = self.codes.delete(&code.email, &code.code, code.kind).await {
                tracing::warn!(
                    error = %cleanup,
                    kind = code.kind.as_str(),
                    "failed to withdraw undelivered otp"
                );
            }
            return Err(e);
        }

        tracing::info!(kind = code.kind.as_str(), "otp sent");
        Ok(())
    }
}
