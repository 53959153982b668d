use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of emailed one-time codes.
pub const OTP_LEN: usize = 6;

pub const ROLE_ADMIN: &str = "Admin";
pub const ROLE_CLIENT: &str = "Client";
pub const ROLE_SELLER: &str = "Seller";

/// Built-in roles whose identity cannot be changed through role admin.
pub const PROTECTED_ROLES: [&str; 3] = [ROLE_ADMIN, ROLE_CLIENT, ROLE_SELLER];

/// Purpose a one-time code was issued for. A code only validates for the
/// purpose it was issued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationCodeType {
    #[serde(rename = "REGISTER")]
    Register,
    #[serde(rename = "FORGOT_PASSWORD")]
    ForgotPassword,
    #[serde(rename = "LOGIN")]
    Login,
    #[serde(rename = "DISABLE_2FA")]
    Disable2fa,
}

impl ValidationCodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Register => "REGISTER",
            Self::ForgotPassword => "FORGOT_PASSWORD",
            Self::Login => "LOGIN",
            Self::Disable2fa => "DISABLE_2FA",
        }
    }
}

impl FromStr for ValidationCodeType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REGISTER" => Ok(Self::Register),
            "FORGOT_PASSWORD" => Ok(Self::ForgotPassword),
            "LOGIN" => Ok(Self::Login),
            "DISABLE_2FA" => Ok(Self::Disable2fa),
            other => Err(anyhow::anyhow!("unknown validation code type: {other}")),
        }
    }
}

/// HTTP verbs a permission can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            other => Err(anyhow::anyhow!("unsupported http method: {other}")),
        }
    }
}

impl TryFrom<&http::Method> for HttpMethod {
    type Error = anyhow::Error;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

/// Account record. `password_hash` and `totp_secret` never leave the service.
#[derive(Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone_number: String,
    pub password_hash: String,
    pub role_id: Uuid,
    pub totp_secret: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn two_factor_enabled(&self) -> bool {
        self.totp_secret.is_some()
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role_id", &self.role_id)
            .field("two_factor_enabled", &self.two_factor_enabled())
            .finish_non_exhaustive()
    }
}

/// Fields needed to insert a user.
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub phone_number: String,
    pub password_hash: String,
    pub role_id: Uuid,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_active: bool,
}

impl Role {
    pub fn is_protected(&self) -> bool {
        PROTECTED_ROLES.contains(&self.name.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct UserWithRole {
    pub user: User,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub path: String,
    pub method: HttpMethod,
    pub module: String,
}

/// An active role together with the subset of its permissions a lookup matched.
#[derive(Debug, Clone)]
pub struct RoleGrant {
    pub role: Role,
    pub permissions: Vec<Permission>,
}

/// Partial role update. `None` leaves a field untouched; `permission_ids`
/// replaces the full permission set when present.
#[derive(Debug, Clone, Default)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub permission_ids: Option<Vec<Uuid>>,
}

/// Tracked login session.
#[derive(Debug, Clone)]
pub struct Device {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_agent: String,
    pub ip: String,
    pub last_active: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDevice {
    pub user_id: Uuid,
    pub user_agent: String,
    pub ip: String,
}

/// Partial device update. Every update also bumps `last_active`.
#[derive(Debug, Clone, Default)]
pub struct DeviceUpdate {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub is_active: Option<bool>,
}

/// Persisted refresh token, one live row per device.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: Uuid,
    pub device_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RefreshTokenWithOwner {
    pub record: RefreshTokenRecord,
    pub owner: UserWithRole,
}

/// Emailed one-time code.
#[derive(Debug, Clone)]
pub struct ValidationCode {
    pub id: Uuid,
    pub email: String,
    pub code: String,
    pub kind: ValidationCodeType,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ValidationCode {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenPair { .. }")
    }
}

/// Device fingerprint of the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub user_agent: String,
    pub ip: String,
}

impl ClientInfo {
    pub fn unknown() -> Self {
        Self {
            user_agent: "unknown".to_owned(),
            ip: "unknown".to_owned(),
        }
    }
}

/// Tokens returned by an identity provider's code exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
}

/// Profile returned by an identity provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthProfile {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Fresh TOTP enrolment: base32 secret plus `otpauth://` provisioning URI.
#[derive(Debug, Clone)]
pub struct TotpSetup {
    pub secret: String,
    pub uri: String,
}
