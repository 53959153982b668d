use crate::crypto::password::hash_password;
use crate::domain::repository::{RoleRepository, UserRepository, ValidationCodeRepository};
use crate::domain::types::{NewUser, User, ValidationCodeType};
use crate::error::AuthServiceError;
use crate::usecase::otp::validate_code;
use crate::usecase::role::ClientRoleCache;

pub struct RegisterInput {
    pub email: String,
    pub name: String,
    pub phone_number: String,
    pub password: String,
    pub code: String,
}

pub struct RegisterUseCase<U, R, V>
where
    U: UserRepository,
    R: RoleRepository,
    V: ValidationCodeRepository,
{
    pub users: U,
    pub roles: R,
    pub codes: V,
    pub client_role: ClientRoleCache,
}

impl<U, R, V> RegisterUseCase<U, R, V>
where
    U: UserRepository,
    R: RoleRepository,
    V: ValidationCodeRepository,
{
    pub async fn execute(&self, input: RegisterInput) -> Result<User, AuthServiceError> {
        validate_code(
            &self.codes,
            &input.email,
            &input.code,
            ValidationCodeType::Register,
        )
        .await?;

        let role_id = self.client_role.get(&self.roles).await?;
        let password_hash = hash_password(&input.password)?;

        // Duplicate email surfaces as EmailAlreadyExists from the repository
        let user = self
            .users
            .create(&NewUser {
                email: input.email,
                name: input.name,
                phone_number: input.phone_number,
                password_hash,
                role_id,
                avatar: None,
            })
            .await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }
}
