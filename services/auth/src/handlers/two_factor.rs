use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use warden_auth_types::identity::AuthContext;

use crate::error::AuthServiceError;
use crate::handlers::auth::MessageResponse;
use crate::state::AppState;
use crate::usecase::two_factor::{
    DisableTwoFactorInput, DisableTwoFactorUseCase, SetupTwoFactorUseCase,
};

// ── POST /auth/2fa/setup ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TwoFactorSetupResponse {
    pub secret: String,
    pub uri: String,
}

pub async fn setup_two_factor(
    State(state): State<AppState>,
    caller: AuthContext,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = SetupTwoFactorUseCase {
        users: state.user_repo(),
        issuer: state.config.app_name.clone(),
    };

    let setup = usecase.execute(caller.user_id).await?;

    Ok(Json(TwoFactorSetupResponse {
        secret: setup.secret,
        uri: setup.uri,
    }))
}

// ── POST /auth/2fa/disable ───────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DisableTwoFactorRequest {
    #[validate(length(equal = 6, message = "totpCode must be 6 characters"))]
    pub totp_code: Option<String>,
    #[validate(length(equal = 6, message = "code must be 6 characters"))]
    pub code: Option<String>,
}

pub async fn disable_two_factor(
    State(state): State<AppState>,
    caller: AuthContext,
    Json(body): Json<DisableTwoFactorRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    body.validate()?;

    let usecase = DisableTwoFactorUseCase {
        users: state.user_repo(),
        codes: state.validation_code_repo(),
    };

    usecase
        .execute(DisableTwoFactorInput {
            user_id: caller.user_id,
            totp_code: body.totp_code,
            code: body.code,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: "two-factor authentication disabled",
    }))
}
