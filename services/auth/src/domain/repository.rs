#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{
    Device, DeviceUpdate, HttpMethod, NewDevice, NewUser, OAuthProfile, OAuthTokens,
    RefreshTokenRecord, RefreshTokenWithOwner, Role, RoleGrant, RoleUpdate, User, UserWithRole,
    ValidationCode, ValidationCodeType,
};
use crate::error::AuthServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError>;

    async fn find_with_role_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserWithRole>, AuthServiceError>;

    /// Insert a user. A duplicate email yields `EmailAlreadyExists`.
    async fn create(&self, user: &NewUser) -> Result<User, AuthServiceError>;

    async fn update_password(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<(), AuthServiceError>;

    /// Set (`Some`) or clear (`None`) the TOTP secret.
    async fn set_totp_secret(
        &self,
        id: Uuid,
        secret: Option<&str>,
    ) -> Result<(), AuthServiceError>;
}

/// Repository for roles and their permission sets.
pub trait RoleRepository: Send + Sync {
    /// Find a non-deleted role by exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AuthServiceError>;

    /// Find a non-deleted role by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, AuthServiceError>;

    /// Load an active, non-deleted role with its non-deleted permissions
    /// filtered to exactly `(method, path)`.
    ///
    /// `None` when the role is missing, inactive or deleted. An empty
    /// permission list means the role exists but lacks the permission.
    async fn find_active_grant(
        &self,
        role_id: Uuid,
        method: HttpMethod,
        path: &str,
    ) -> Result<Option<RoleGrant>, AuthServiceError>;

    /// Apply a partial update. A duplicate name yields `RoleAlreadyExists`.
    async fn update(&self, id: Uuid, update: &RoleUpdate) -> Result<Role, AuthServiceError>;

    async fn soft_delete(&self, id: Uuid) -> Result<(), AuthServiceError>;
}

/// Registry of login sessions.
pub trait DeviceRepository: Send + Sync {
    /// Always inserts; a user may hold many devices.
    async fn create(&self, device: &NewDevice) -> Result<Device, AuthServiceError>;

    /// Apply a partial update and bump `last_active`.
    async fn update(&self, id: Uuid, update: &DeviceUpdate) -> Result<Device, AuthServiceError>;
}

/// Repository for live refresh tokens.
pub trait RefreshTokenRepository: Send + Sync {
    async fn create(&self, record: &RefreshTokenRecord) -> Result<(), AuthServiceError>;

    async fn find_with_owner(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenWithOwner>, AuthServiceError>;

    /// Delete a token. Returns the deleted row, or `None` when no row was
    /// deleted (already rotated or revoked, possibly by a concurrent caller).
    async fn delete(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AuthServiceError>;
}

/// Repository for emailed one-time codes.
pub trait ValidationCodeRepository: Send + Sync {
    /// Store a code, replacing any previous code for the same `(email, kind)`.
    async fn upsert(&self, code: &ValidationCode) -> Result<(), AuthServiceError>;

    /// Exact lookup on `(email, code, kind)`. Expiry is the caller's concern.
    async fn find(
        &self,
        email: &str,
        code: &str,
        kind: ValidationCodeType,
    ) -> Result<Option<ValidationCode>, AuthServiceError>;

    /// Delete a code. Returns `true` if this call removed it.
    async fn delete(
        &self,
        email: &str,
        code: &str,
        kind: ValidationCodeType,
    ) -> Result<bool, AuthServiceError>;
}

/// Outbound email for one-time codes.
pub trait OtpMailer: Send + Sync {
    /// Deliver `code` to `email`. Any failure is reported as `FailedToSendOtp`.
    async fn send_otp(&self, email: &str, code: &str) -> Result<(), AuthServiceError>;
}

/// OAuth-style identity provider.
pub trait IdentityProvider: Send + Sync {
    /// Consent-screen URL carrying the opaque `state`.
    fn authorization_url(&self, state: &str) -> Result<String, AuthServiceError>;

    async fn exchange_code(&self, code: &str) -> Result<OAuthTokens, AuthServiceError>;

    async fn fetch_profile(&self, tokens: &OAuthTokens) -> Result<OAuthProfile, AuthServiceError>;
}
