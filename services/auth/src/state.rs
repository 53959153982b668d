use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AuthConfig;
use crate::guard::GuardSet;
use crate::guard::permission::PermissionResolver;
use crate::guard::route::RouteTable;
use crate::infra::db::{
    DbDeviceRepository, DbRefreshTokenRepository, DbRoleRepository, DbUserRepository,
    DbValidationCodeRepository,
};
use crate::infra::google::GoogleIdentityProvider;
use crate::infra::mail::ResendMailer;
use crate::usecase::role::ClientRoleCache;
use crate::usecase::token::TokenService;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub http: reqwest::Client,
    pub config: Arc<AuthConfig>,
    pub tokens: TokenService,
    pub client_role: ClientRoleCache,
    pub routes: Arc<RouteTable>,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn role_repo(&self) -> DbRoleRepository {
        DbRoleRepository {
            db: self.db.clone(),
        }
    }

    pub fn device_repo(&self) -> DbDeviceRepository {
        DbDeviceRepository {
            db: self.db.clone(),
        }
    }

    pub fn refresh_token_repo(&self) -> DbRefreshTokenRepository {
        DbRefreshTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn validation_code_repo(&self) -> DbValidationCodeRepository {
        DbValidationCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn mailer(&self) -> ResendMailer {
        ResendMailer::new(
            self.http.clone(),
            self.config.resend_api_key.clone(),
            self.config.mail_from.clone(),
        )
    }

    pub fn google(&self) -> GoogleIdentityProvider {
        GoogleIdentityProvider::new(
            self.http.clone(),
            self.config.google_client_id.clone(),
            self.config.google_client_secret.clone(),
            self.config.google_redirect_uri.clone(),
        )
    }

    pub fn guards(&self) -> GuardSet<DbRoleRepository> {
        GuardSet {
            tokens: self.tokens.clone(),
            permissions: PermissionResolver {
                roles: self.role_repo(),
            },
            api_key: self.config.secret_api_key.clone(),
        }
    }
}
