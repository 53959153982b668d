use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::{Role, RoleUpdate};
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::role::{DeleteRoleUseCase, UpdateRoleUseCase};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_active: bool,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
            description: role.description,
            is_active: role.is_active,
        }
    }
}

// ── PUT /roles/{role_id} ─────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub permission_ids: Option<Vec<Uuid>>,
}

pub async fn update_role(
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
    Json(body): Json<UpdateRoleRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    if body.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AuthServiceError::InvalidInput(
            "name must not be empty".to_owned(),
        ));
    }

    let usecase = UpdateRoleUseCase {
        roles: state.role_repo(),
    };

    let role = usecase
        .execute(
            role_id,
            RoleUpdate {
                name: body.name,
                description: body.description,
                is_active: body.is_active,
                permission_ids: body.permission_ids,
            },
        )
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

// ── DELETE /roles/{role_id} ──────────────────────────────────────────────────

pub async fn delete_role(
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = DeleteRoleUseCase {
        roles: state.role_repo(),
    };
    usecase.execute(role_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
