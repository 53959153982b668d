//! Authenticated caller identity attached to requests by the guard chain.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use crate::token::AccessClaims;

/// Caller identity inserted into request extensions after a successful Bearer
/// check. Handlers take it as an extractor.
///
/// Extraction returns 401 when no guard attached an identity, which happens if
/// a handler asks for it on a route declared public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub device_id: Uuid,
    pub role_id: Uuid,
    pub role_name: String,
}

impl From<AccessClaims> for AuthContext {
    fn from(claims: AccessClaims) -> Self {
        Self {
            user_id: claims.user_id,
            device_id: claims.device_id,
            role_id: claims.role_id,
            role_name: claims.role_name,
        }
    }
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // Read synchronously and hand back a 'static future; see axum-core's
    // `fn -> impl Future + Send` signature.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let ctx = parts.extensions.get::<AuthContext>().cloned();
        async move { ctx.ok_or(StatusCode::UNAUTHORIZED) }
    }
}
