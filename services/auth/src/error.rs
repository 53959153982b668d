use axum::response::{IntoResponse, Response};

use warden_core::error::{ErrorClass, error_response};

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("provide exactly one of totpCode or code")]
    InvalidTotpAndCode,
    #[error("email not found")]
    EmailNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("role not found")]
    RoleNotFound,
    #[error("email already exists")]
    EmailAlreadyExists,
    #[error("role already exists")]
    RoleAlreadyExists,
    #[error("two-factor authentication already enabled")]
    TotpAlreadyEnabled,
    #[error("two-factor authentication not enabled")]
    TotpNotEnabled,
    #[error("invalid password")]
    InvalidPassword,
    #[error("invalid otp")]
    InvalidOtp,
    #[error("invalid totp code")]
    InvalidTotpCode,
    #[error("invalid token")]
    InvalidToken,
    #[error("refresh token already used")]
    RefreshTokenAlreadyUsed,
    #[error("unauthorized access")]
    UnauthorizedAccess,
    #[error("unauthorized")]
    Unauthorized,
    #[error("permission denied")]
    PermissionDenied,
    #[error("role is protected")]
    RoleIsProtected,
    #[error("otp expired")]
    OtpExpired,
    #[error("failed to send otp")]
    FailedToSendOtp,
    #[error("identity provider failed")]
    IdentityProviderFailed,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidTotpAndCode => "INVALID_TOTP_AND_CODE",
            Self::EmailNotFound => "EMAIL_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::RoleNotFound => "ROLE_NOT_FOUND",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::RoleAlreadyExists => "ROLE_ALREADY_EXISTS",
            Self::TotpAlreadyEnabled => "TOTP_ALREADY_ENABLED",
            Self::TotpNotEnabled => "TOTP_NOT_ENABLED",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::InvalidOtp => "INVALID_OTP",
            Self::InvalidTotpCode => "INVALID_TOTP_CODE",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::RefreshTokenAlreadyUsed => "REFRESH_TOKEN_ALREADY_USED",
            Self::UnauthorizedAccess => "UNAUTHORIZED_ACCESS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::RoleIsProtected => "ROLE_IS_PROTECTED",
            Self::OtpExpired => "OTP_EXPIRED",
            Self::FailedToSendOtp => "FAILED_TO_SEND_OTP",
            Self::IdentityProviderFailed => "IDENTITY_PROVIDER_FAILED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidInput(_) | Self::InvalidTotpAndCode => ErrorClass::Validation,
            Self::EmailNotFound | Self::UserNotFound | Self::RoleNotFound => ErrorClass::NotFound,
            Self::EmailAlreadyExists
            | Self::RoleAlreadyExists
            | Self::TotpAlreadyEnabled
            | Self::TotpNotEnabled => ErrorClass::Conflict,
            Self::InvalidPassword
            | Self::InvalidOtp
            | Self::InvalidTotpCode
            | Self::InvalidToken
            | Self::RefreshTokenAlreadyUsed
            | Self::UnauthorizedAccess
            | Self::Unauthorized => ErrorClass::Unauthorized,
            Self::PermissionDenied | Self::RoleIsProtected => ErrorClass::Forbidden,
            Self::OtpExpired => ErrorClass::Expired,
            Self::FailedToSendOtp | Self::IdentityProviderFailed => ErrorClass::Upstream,
            Self::Internal(_) => ErrorClass::Internal,
        }
    }
}

impl From<validator::ValidationErrors> for AuthServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::InvalidInput(errors.to_string())
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        // TraceLayer records status for every request; only the anyhow chain is added here.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        error_response(self.class(), self.kind(), self.to_string())
    }
}
