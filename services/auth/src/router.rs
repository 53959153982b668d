use axum::{
    Router,
    extract::State,
    http::{Method, StatusCode},
    middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use warden_core::health::{healthz, readiness};
use warden_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::guard::middleware::auth_guard;
use crate::guard::route::{AuthRequirement, AuthType, RouteTable};
use crate::handlers::{
    auth::{forgot_password, login, logout, refresh_token, register, send_otp},
    google::{google_callback, google_link},
    role::{delete_role, update_role},
    two_factor::{disable_two_factor, setup_two_factor},
};
use crate::state::AppState;

/// Auth requirement per route. Anything not listed is public.
pub fn route_table() -> RouteTable {
    let admin = AuthRequirement::any_of([AuthType::Bearer, AuthType::ApiKey]);
    RouteTable::new()
        .route(Method::POST, "/auth/2fa/setup", AuthRequirement::bearer())
        .route(Method::POST, "/auth/2fa/disable", AuthRequirement::bearer())
        .route(Method::PUT, "/roles/{role_id}", admin.clone())
        .route(Method::DELETE, "/roles/{role_id}", admin)
}

async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness(state.db.ping().await)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Auth
        .route("/auth/register", post(register))
        .route("/auth/otp", post(send_otp))
        .route("/auth/login", post(login))
        .route("/auth/refresh-token", post(refresh_token))
        .route("/auth/logout", post(logout))
        .route("/auth/forgot-password", post(forgot_password))
        // Two-factor
        .route("/auth/2fa/setup", post(setup_two_factor))
        .route("/auth/2fa/disable", post(disable_two_factor))
        // Google
        .route("/auth/google-link", get(google_link))
        .route("/auth/google-callback", get(google_callback))
        // Roles
        .route("/roles/{role_id}", put(update_role).delete(delete_role))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
