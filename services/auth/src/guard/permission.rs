use http::Method;
use uuid::Uuid;

use crate::domain::repository::RoleRepository;
use crate::domain::types::HttpMethod;
use crate::error::AuthServiceError;

/// Decides whether a role may call `(method, path)`.
///
/// Reads the store on every call; permission changes apply to the next request.
pub struct PermissionResolver<R: RoleRepository> {
    pub roles: R,
}

impl<R: RoleRepository> PermissionResolver<R> {
    /// A missing, inactive or deleted role is reported as `PermissionDenied`,
    /// the same as a role without the permission.
    pub async fn check(
        &self,
        role_id: Uuid,
        method: &Method,
        path: &str,
    ) -> Result<(), AuthServiceError> {
        let Ok(method) = HttpMethod::try_from(method) else {
            return Err(AuthServiceError::PermissionDenied);
        };

        let grant = self
            .roles
            .find_active_grant(role_id, method, path)
            .await?
            .ok_or(AuthServiceError::PermissionDenied)?;

        let allowed = grant
            .permissions
            .iter()
            .any(|p| p.method == method && p.path == path);
        if !allowed {
            tracing::debug!(%role_id, method = method.as_str(), path, "permission denied");
            return Err(AuthServiceError::PermissionDenied);
        }
        Ok(())
    }
}
