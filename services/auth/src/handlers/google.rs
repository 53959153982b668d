use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::types::ClientInfo;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::google::{GoogleCallbackInput, GoogleCallbackUseCase, GoogleLinkUseCase};

// ── GET /auth/google-link ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AuthorizationUrlResponse {
    pub url: String,
}

pub async fn google_link(
    State(state): State<AppState>,
    client: ClientInfo,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = GoogleLinkUseCase {
        provider: state.google(),
    };
    let url = usecase.execute(&client)?;
    Ok(Json(AuthorizationUrlResponse { url }))
}

// ── GET /auth/google-callback ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GoogleCallbackQuery {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub state: String,
}

/// Always redirects to the frontend: with tokens on success, with an
/// `errorMessage` otherwise.
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<GoogleCallbackQuery>,
) -> Result<Redirect, AuthServiceError> {
    let usecase = GoogleCallbackUseCase {
        provider: state.google(),
        users: state.user_repo(),
        roles: state.role_repo(),
        devices: state.device_repo(),
        refresh_tokens: state.refresh_token_repo(),
        tokens: state.tokens.clone(),
        client_role: state.client_role.clone(),
    };

    let outcome = usecase
        .execute(GoogleCallbackInput {
            code: query.code,
            state: query.state,
        })
        .await;

    let params = match outcome {
        Ok(pair) => vec![
            ("accessToken", pair.access_token),
            ("refreshToken", pair.refresh_token),
        ],
        Err(e) => {
            if let AuthServiceError::Internal(ref cause) = e {
                tracing::error!(error = ?cause, "google callback failed");
            }
            vec![("errorMessage", e.to_string())]
        }
    };

    let target = Url::parse_with_params(&state.config.google_client_redirect_uri, &params)
        .map_err(|e| AuthServiceError::Internal(e.into()))?;
    Ok(Redirect::to(target.as_str()))
}
