use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::domain::repository::RoleRepository;
use crate::domain::types::{ROLE_CLIENT, Role, RoleUpdate};
use crate::error::AuthServiceError;

/// Process-wide memo of the `Client` role id assigned to new accounts.
///
/// Concurrent first callers share a single lookup; a failed lookup leaves the
/// cell empty so the next caller retries.
#[derive(Clone, Default)]
pub struct ClientRoleCache {
    cell: Arc<OnceCell<Uuid>>,
}

impl ClientRoleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get<R: RoleRepository>(&self, roles: &R) -> Result<Uuid, AuthServiceError> {
        self.cell
            .get_or_try_init(|| async {
                let role = roles
                    .find_by_name(ROLE_CLIENT)
                    .await?
                    .ok_or_else(|| anyhow!("role {ROLE_CLIENT} is not seeded"))?;
                tracing::debug!(role_id = %role.id, "client role id cached");
                Ok::<_, AuthServiceError>(role.id)
            })
            .await
            .copied()
    }
}

// ── UpdateRole ───────────────────────────────────────────────────────────────

pub struct UpdateRoleUseCase<R: RoleRepository> {
    pub roles: R,
}

impl<R: RoleRepository> UpdateRoleUseCase<R> {
    /// Built-in roles (Admin, Client, Seller) are read-only: any update to one
    /// of them is refused.
    pub async fn execute(&self, id: Uuid, update: RoleUpdate) -> Result<Role, AuthServiceError> {
        let role = self
            .roles
            .find_by_id(id)
            .await?
            .ok_or(AuthServiceError::RoleNotFound)?;

        if role.is_protected() {
            return Err(AuthServiceError::RoleIsProtected);
        }

        self.roles.update(id, &update).await
    }
}

// ── DeleteRole ───────────────────────────────────────────────────────────────

pub struct DeleteRoleUseCase<R: RoleRepository> {
    pub roles: R,
}

impl<R: RoleRepository> DeleteRoleUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<(), AuthServiceError> {
        let role = self
            .roles
            .find_by_id(id)
            .await?
            .ok_or(AuthServiceError::RoleNotFound)?;

        if role.is_protected() {
            return Err(AuthServiceError::RoleIsProtected);
        }

        self.roles.soft_delete(id).await?;
        tracing::info!(role_id = %id, name = %role.name, "role deleted");
        Ok(())
    }
}
