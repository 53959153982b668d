//! Per-route authentication requirements, declared once at startup.

use std::collections::HashMap;

use http::Method;

/// Credential a route accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthType {
    /// `Authorization: Bearer <access token>` plus a permission check.
    Bearer,
    /// Shared service key in `x-api-key`.
    ApiKey,
    /// Always passes.
    None,
}

/// How the declared auth types combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Condition {
    /// Every guard must pass; the first failure is returned.
    #[default]
    And,
    /// The first passing guard wins; if none pass the last failure is returned.
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthRequirement {
    pub auth_types: Vec<AuthType>,
    pub condition: Condition,
}

impl Default for AuthRequirement {
    /// Undeclared routes are public.
    fn default() -> Self {
        Self::public()
    }
}

impl AuthRequirement {
    pub fn public() -> Self {
        Self::all_of([AuthType::None])
    }

    pub fn bearer() -> Self {
        Self::all_of([AuthType::Bearer])
    }

    pub fn api_key() -> Self {
        Self::all_of([AuthType::ApiKey])
    }

    pub fn all_of(auth_types: impl IntoIterator<Item = AuthType>) -> Self {
        Self {
            auth_types: auth_types.into_iter().collect(),
            condition: Condition::And,
        }
    }

    pub fn any_of(auth_types: impl IntoIterator<Item = AuthType>) -> Self {
        Self {
            auth_types: auth_types.into_iter().collect(),
            condition: Condition::Or,
        }
    }
}

/// Route template + method → requirement.
///
/// Keys are axum route templates (`/roles/{role_id}`), not concrete paths.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<(Method, String), AuthRequirement>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, method: Method, path: &str, requirement: AuthRequirement) -> Self {
        self.routes.insert((method, path.to_owned()), requirement);
        self
    }

    pub fn requirement(&self, method: &Method, path: &str) -> AuthRequirement {
        self.routes
            .get(&(method.clone(), path.to_owned()))
            .cloned()
            .unwrap_or_default()
    }
}
