use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use sea_orm::Database;
use tracing::info;

use warden_auth::config::AuthConfig;
use warden_auth::router::{build_router, route_table};
use warden_auth::state::AppState;
use warden_auth::usecase::role::ClientRoleCache;
use warden_auth::usecase::token::TokenService;
use warden_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.outbound_timeout_secs))
        .build()
        .expect("failed to build HTTP client");

    let tokens = TokenService::new(
        config.access_token_secret.clone(),
        config.refresh_token_secret.clone(),
        config.access_token_ttl_secs,
        config.refresh_token_ttl_secs,
    );

    let addr = format!("0.0.0.0:{}", config.auth_port);
    let state = AppState {
        db,
        http,
        config: Arc::new(config),
        tokens,
        client_role: ClientRoleCache::new(),
        routes: Arc::new(route_table()),
    };

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server error");
}
