//! Request authentication: route requirements, the guard combinator and the
//! concrete Bearer / API-key / public guards.

pub mod chain;
pub mod middleware;
pub mod permission;
pub mod route;

use http::{HeaderMap, Method};

use warden_auth_types::bearer::{api_key, bearer_token};
use warden_auth_types::identity::AuthContext;

use crate::domain::repository::RoleRepository;
use crate::error::AuthServiceError;
use crate::usecase::token::TokenService;

use chain::run_guards;
use permission::PermissionResolver;
use route::{AuthRequirement, AuthType};

/// The parts of an inbound request the guards look at. `path` is the route
/// template, which is what permissions are keyed on.
pub struct RequestTarget<'a> {
    pub headers: &'a HeaderMap,
    pub method: &'a Method,
    pub path: &'a str,
}

pub struct GuardSet<R: RoleRepository> {
    pub tokens: TokenService,
    pub permissions: PermissionResolver<R>,
    pub api_key: String,
}

impl<R: RoleRepository> GuardSet<R> {
    /// Run `requirement` against the request. Returns the caller identity when
    /// a Bearer guard passed.
    pub async fn authenticate(
        &self,
        requirement: &AuthRequirement,
        target: &RequestTarget<'_>,
    ) -> Result<Option<AuthContext>, AuthServiceError> {
        let outcomes = run_guards(&requirement.auth_types, requirement.condition, |auth_type| {
            self.check(auth_type, target)
        })
        .await?;
        Ok(outcomes.into_iter().flatten().next())
    }

    pub async fn check(
        &self,
        auth_type: AuthType,
        target: &RequestTarget<'_>,
    ) -> Result<Option<AuthContext>, AuthServiceError> {
        match auth_type {
            AuthType::None => Ok(None),
            AuthType::ApiKey => match api_key(target.headers) {
                Some(key) if key == self.api_key => Ok(None),
                _ => Err(AuthServiceError::Unauthorized),
            },
            AuthType::Bearer => self.bearer(target).await.map(Some),
        }
    }

    async fn bearer(&self, target: &RequestTarget<'_>) -> Result<AuthContext, AuthServiceError> {
        let token = bearer_token(target.headers).ok_or(AuthServiceError::Unauthorized)?;
        let ctx = AuthContext::from(self.tokens.verify_access(&token)?);

        self.permissions
            .check(ctx.role_id, target.method, target.path)
            .await?;
        Ok(ctx)
    }
}
