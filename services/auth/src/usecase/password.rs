use crate::crypto::password::hash_password;
use crate::domain::repository::{UserRepository, ValidationCodeRepository};
use crate::domain::types::ValidationCodeType;
use crate::error::AuthServiceError;
use crate::usecase::otp::validate_code;

pub struct ForgotPasswordInput {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

pub struct ForgotPasswordUseCase<U, V>
where
    U: UserRepository,
    V: ValidationCodeRepository,
{
    pub users: U,
    pub codes: V,
}

impl<U, V> ForgotPasswordUseCase<U, V>
where
    U: UserRepository,
    V: ValidationCodeRepository,
{
    pub async fn execute(&self, input: ForgotPasswordInput) -> Result<(), AuthServiceError> {
        let kind = ValidationCodeType::ForgotPassword;

        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::EmailNotFound)?;
        validate_code(&self.codes, &input.email, &input.code, kind).await?;

        // Claim the code before writing: of two concurrent resets with the
        // same code, only the one whose delete removed the row proceeds.
        if !self.codes.delete(&input.email, &input.code, kind).await? {
            return Err(AuthServiceError::InvalidOtp);
        }

        let password_hash = hash_password(&input.new_password)?;
        self.users
            .update_password(&input.email, &password_hash)
            .await?;

        tracing::info!(user_id = %user.id, "password reset");
        Ok(())
    }
}
