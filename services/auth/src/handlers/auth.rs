use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::types::{ClientInfo, TokenPair, User, ValidationCodeType};
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::login::{LoginInput, LoginUseCase};
use crate::usecase::otp::{SendOtpInput, SendOtpUseCase};
use crate::usecase::password::{ForgotPasswordInput, ForgotPasswordUseCase};
use crate::usecase::register::{RegisterInput, RegisterUseCase};
use crate::usecase::session::{LogoutUseCase, RefreshInput, RefreshTokenUseCase};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Public view of a user; never carries the password hash or TOTP secret.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone_number: String,
    pub role_id: Uuid,
    pub avatar: Option<String>,
    pub two_factor_enabled: bool,
    #[serde(serialize_with = "warden_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "warden_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            two_factor_enabled: user.two_factor_enabled(),
            id: user.id,
            email: user.email,
            name: user.name,
            phone_number: user.phone_number,
            role_id: user.role_id,
            avatar: user.avatar,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── POST /auth/register ──────────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "email is not a valid address"))]
    pub email: String,
    #[validate(length(min = 6, max = 100, message = "password must be 6-100 characters"))]
    pub password: String,
    #[validate(must_match(
        other = "password",
        message = "password and its confirmation must match"
    ))]
    pub confirm_password: String,
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    pub phone_number: String,
    #[validate(length(equal = 6, message = "code must be 6 characters"))]
    pub code: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    body.validate()?;

    let usecase = RegisterUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
        codes: state.validation_code_repo(),
        client_role: state.client_role.clone(),
    };

    let user = usecase
        .execute(RegisterInput {
            email: body.email,
            name: body.name,
            phone_number: body.phone_number,
            password: body.password,
            code: body.code,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

// ── POST /auth/otp ───────────────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct SendOtpRequest {
    #[validate(email(message = "email is not a valid address"))]
    pub email: String,
    #[serde(rename = "type")]
    pub kind: ValidationCodeType,
}

pub async fn send_otp(
    State(state): State<AppState>,
    Json(body): Json<SendOtpRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    body.validate()?;

    let usecase = SendOtpUseCase {
        users: state.user_repo(),
        codes: state.validation_code_repo(),
        mailer: state.mailer(),
        ttl_secs: state.config.otp_ttl_secs,
    };

    usecase
        .execute(SendOtpInput {
            email: body.email,
            kind: body.kind,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: "verification code sent",
    }))
}

// ── POST /auth/login ─────────────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "email is not a valid address"))]
    pub email: String,
    pub password: String,
    #[validate(length(equal = 6, message = "totpCode must be 6 characters"))]
    pub totp_code: Option<String>,
    #[validate(length(equal = 6, message = "code must be 6 characters"))]
    pub code: Option<String>,
}

pub async fn login(
    State(state): State<AppState>,
    client: ClientInfo,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    body.validate()?;

    let usecase = LoginUseCase {
        users: state.user_repo(),
        codes: state.validation_code_repo(),
        devices: state.device_repo(),
        refresh_tokens: state.refresh_token_repo(),
        tokens: state.tokens.clone(),
    };

    let pair = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
            totp_code: body.totp_code,
            code: body.code,
            client,
        })
        .await?;

    Ok(Json(TokenPairResponse::from(pair)))
}

// ── POST /auth/refresh-token ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

pub async fn refresh_token(
    State(state): State<AppState>,
    client: ClientInfo,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = RefreshTokenUseCase {
        devices: state.device_repo(),
        refresh_tokens: state.refresh_token_repo(),
        tokens: state.tokens.clone(),
    };

    let pair = usecase
        .execute(RefreshInput {
            refresh_token: body.refresh_token,
            client,
        })
        .await?;

    Ok(Json(TokenPairResponse::from(pair)))
}

// ── POST /auth/logout ────────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = LogoutUseCase {
        devices: state.device_repo(),
        refresh_tokens: state.refresh_token_repo(),
        tokens: state.tokens.clone(),
    };

    usecase.execute(&body.refresh_token).await?;

    Ok(Json(MessageResponse {
        message: "logged out",
    }))
}

// ── POST /auth/forgot-password ───────────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "email is not a valid address"))]
    pub email: String,
    #[validate(length(equal = 6, message = "code must be 6 characters"))]
    pub code: String,
    #[validate(length(min = 6, max = 100, message = "newPassword must be 6-100 characters"))]
    pub new_password: String,
    #[validate(must_match(
        other = "new_password",
        message = "newPassword and its confirmation must match"
    ))]
    pub confirm_new_password: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    body.validate()?;

    let usecase = ForgotPasswordUseCase {
        users: state.user_repo(),
        codes: state.validation_code_repo(),
    };

    usecase
        .execute(ForgotPasswordInput {
            email: body.email,
            code: body.code,
            new_password: body.new_password,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: "password updated",
    }))
}
