use anyhow::{Context as _, anyhow};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter, QuerySelect,
    RelationTrait, SqlErr, TransactionError, TransactionTrait,
    sea_query::Expr,
};
use uuid::Uuid;

use warden_auth_schema::{
    devices, permissions, refresh_tokens, role_permissions, roles, users, validation_codes,
};

use crate::domain::repository::{
    DeviceRepository, RefreshTokenRepository, RoleRepository, UserRepository,
    ValidationCodeRepository,
};
use crate::domain::types::{
    Device, DeviceUpdate, HttpMethod, NewDevice, NewUser, Permission, RefreshTokenRecord,
    RefreshTokenWithOwner, Role, RoleGrant, RoleUpdate, User, UserWithRole, ValidationCode,
    ValidationCodeType,
};
use crate::error::AuthServiceError;

// ── Store error translation ──────────────────────────────────────────────────

/// Map a unique-key violation to `conflict`; everything else is internal.
fn unique_violation_or(
    err: DbErr,
    conflict: AuthServiceError,
    op: &'static str,
) -> AuthServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => conflict,
        _ => AuthServiceError::Internal(anyhow::Error::new(err).context(op)),
    }
}

/// `ActiveModel::update` reports a missing row as `RecordNotUpdated`.
fn not_updated_or(err: DbErr, missing: AuthServiceError, op: &'static str) -> AuthServiceError {
    match err {
        DbErr::RecordNotUpdated => missing,
        other => AuthServiceError::Internal(anyhow::Error::new(other).context(op)),
    }
}

fn flatten_txn(err: TransactionError<DbErr>) -> DbErr {
    match err {
        TransactionError::Connection(e) | TransactionError::Transaction(e) => e,
    }
}

fn set_if<T: Into<sea_orm::Value>>(value: Option<T>) -> sea_orm::ActiveValue<T> {
    match value {
        Some(v) => Set(v),
        None => NotSet,
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_with_role_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserWithRole>, AuthServiceError> {
        let found = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .find_also_related(roles::Entity)
            .one(&self.db)
            .await
            .context("find user with role by email")?;

        let Some((user, role)) = found else {
            return Ok(None);
        };
        let role = role.ok_or_else(|| anyhow!("user {} has no role row", user.id))?;
        Ok(Some(UserWithRole {
            user: user_from_model(user),
            role: role_from_model(role),
        }))
    }

    async fn create(&self, user: &NewUser) -> Result<User, AuthServiceError> {
        let now = Utc::now();
        let model = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(user.email.clone()),
            name: Set(user.name.clone()),
            phone_number: Set(user.phone_number.clone()),
            password: Set(user.password_hash.clone()),
            role_id: Set(user.role_id),
            totp_secret: Set(None),
            avatar: Set(user.avatar.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            unique_violation_or(e, AuthServiceError::EmailAlreadyExists, "create user")
        })?;
        Ok(user_from_model(model))
    }

    async fn update_password(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<(), AuthServiceError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Password, Expr::value(password_hash))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Email.eq(email))
            .exec(&self.db)
            .await
            .context("update user password")?;
        if result.rows_affected == 0 {
            return Err(AuthServiceError::UserNotFound);
        }
        Ok(())
    }

    async fn set_totp_secret(
        &self,
        id: Uuid,
        secret: Option<&str>,
    ) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(id),
            totp_secret: Set(secret.map(str::to_owned)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| not_updated_or(e, AuthServiceError::UserNotFound, "set totp secret"))?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        name: model.name,
        phone_number: model.phone_number,
        password_hash: model.password,
        role_id: model.role_id,
        totp_secret: model.totp_secret,
        avatar: model.avatar,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Role repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRoleRepository {
    pub db: DatabaseConnection,
}

impl RoleRepository for DbRoleRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AuthServiceError> {
        let model = roles::Entity::find()
            .filter(roles::Column::Name.eq(name))
            .filter(roles::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .context("find role by name")?;
        Ok(model.map(role_from_model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, AuthServiceError> {
        let model = roles::Entity::find_by_id(id)
            .filter(roles::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .context("find role by id")?;
        Ok(model.map(role_from_model))
    }

    async fn find_active_grant(
        &self,
        role_id: Uuid,
        method: HttpMethod,
        path: &str,
    ) -> Result<Option<RoleGrant>, AuthServiceError> {
        let Some(role) = roles::Entity::find_by_id(role_id)
            .filter(roles::Column::IsActive.eq(true))
            .filter(roles::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .context("find active role")?
        else {
            return Ok(None);
        };

        let models = permissions::Entity::find()
            .join(
                JoinType::InnerJoin,
                permissions::Relation::RolePermissions.def(),
            )
            .filter(role_permissions::Column::RoleId.eq(role_id))
            .filter(permissions::Column::DeletedAt.is_null())
            .filter(permissions::Column::Method.eq(method.as_str()))
            .filter(permissions::Column::Path.eq(path))
            .all(&self.db)
            .await
            .context("find role permissions for route")?;

        let permissions = models
            .into_iter()
            .map(permission_from_model)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(RoleGrant {
            role: role_from_model(role),
            permissions,
        }))
    }

    async fn update(&self, id: Uuid, update: &RoleUpdate) -> Result<Role, AuthServiceError> {
        let update = update.clone();
        let model = self
            .db
            .transaction::<_, roles::Model, DbErr>(|txn| {
                Box::pin(async move {
                    let model = roles::ActiveModel {
                        id: Set(id),
                        name: set_if(update.name),
                        description: set_if(update.description),
                        is_active: set_if(update.is_active),
                        updated_at: Set(Utc::now()),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    if let Some(permission_ids) = update.permission_ids {
                        role_permissions::Entity::delete_many()
                            .filter(role_permissions::Column::RoleId.eq(id))
                            .exec(txn)
                            .await?;
                        if !permission_ids.is_empty() {
                            let rows = permission_ids.into_iter().map(|permission_id| {
                                role_permissions::ActiveModel {
                                    role_id: Set(id),
                                    permission_id: Set(permission_id),
                                }
                            });
                            role_permissions::Entity::insert_many(rows).exec(txn).await?;
                        }
                    }
                    Ok(model)
                })
            })
            .await
            .map_err(|e| match flatten_txn(e) {
                DbErr::RecordNotUpdated => AuthServiceError::RoleNotFound,
                other => {
                    unique_violation_or(other, AuthServiceError::RoleAlreadyExists, "update role")
                }
            })?;
        Ok(role_from_model(model))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), AuthServiceError> {
        let now = Utc::now();
        roles::ActiveModel {
            id: Set(id),
            deleted_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| not_updated_or(e, AuthServiceError::RoleNotFound, "soft delete role"))?;
        Ok(())
    }
}

fn role_from_model(model: roles::Model) -> Role {
    Role {
        id: model.id,
        name: model.name,
        description: model.description,
        is_active: model.is_active,
    }
}

fn permission_from_model(model: permissions::Model) -> Result<Permission, AuthServiceError> {
    let method = model
        .method
        .parse::<HttpMethod>()
        .with_context(|| format!("permission {} has bad method", model.id))?;
    Ok(Permission {
        id: model.id,
        name: model.name,
        description: model.description,
        path: model.path,
        method,
        module: model.module,
    })
}

// ── Device repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDeviceRepository {
    pub db: DatabaseConnection,
}

impl DeviceRepository for DbDeviceRepository {
    async fn create(&self, device: &NewDevice) -> Result<Device, AuthServiceError> {
        let now = Utc::now();
        let model = devices::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(device.user_id),
            user_agent: Set(device.user_agent.clone()),
            ip: Set(device.ip.clone()),
            last_active: Set(now),
            is_active: Set(true),
            created_at: Set(now),
        }
        .insert(&self.db)
        .await
        .context("create device")?;
        Ok(device_from_model(model))
    }

    async fn update(&self, id: Uuid, update: &DeviceUpdate) -> Result<Device, AuthServiceError> {
        let model = devices::ActiveModel {
            id: Set(id),
            ip: set_if(update.ip.clone()),
            user_agent: set_if(update.user_agent.clone()),
            is_active: set_if(update.is_active),
            last_active: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update device")?;
        Ok(device_from_model(model))
    }
}

fn device_from_model(model: devices::Model) -> Device {
    Device {
        id: model.id,
        user_id: model.user_id,
        user_agent: model.user_agent,
        ip: model.ip,
        last_active: model.last_active,
        is_active: model.is_active,
        created_at: model.created_at,
    }
}

// ── RefreshToken repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRefreshTokenRepository {
    pub db: DatabaseConnection,
}

impl RefreshTokenRepository for DbRefreshTokenRepository {
    async fn create(&self, record: &RefreshTokenRecord) -> Result<(), AuthServiceError> {
        refresh_tokens::ActiveModel {
            token: Set(record.token.clone()),
            user_id: Set(record.user_id),
            device_id: Set(record.device_id),
            expires_at: Set(record.expires_at),
            created_at: Set(record.created_at),
        }
        .insert(&self.db)
        .await
        .context("create refresh token")?;
        Ok(())
    }

    async fn find_with_owner(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenWithOwner>, AuthServiceError> {
        let found = refresh_tokens::Entity::find_by_id(token.to_owned())
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find refresh token with user")?;

        let Some((record, user)) = found else {
            return Ok(None);
        };
        let user = user.ok_or_else(|| anyhow!("refresh token owner missing"))?;
        let role = roles::Entity::find_by_id(user.role_id)
            .one(&self.db)
            .await
            .context("find refresh token owner role")?
            .ok_or_else(|| anyhow!("user {} has no role row", user.id))?;

        Ok(Some(RefreshTokenWithOwner {
            record: refresh_token_from_model(record),
            owner: UserWithRole {
                user: user_from_model(user),
                role: role_from_model(role),
            },
        }))
    }

    async fn delete(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AuthServiceError> {
        // one DELETE .. RETURNING: of two callers racing on the same token,
        // only one gets the row back
        let deleted = refresh_tokens::Entity::delete_many()
            .filter(refresh_tokens::Column::Token.eq(token))
            .exec_with_returning(&self.db)
            .await
            .context("delete refresh token")?;
        Ok(deleted.into_iter().next().map(refresh_token_from_model))
    }
}

fn refresh_token_from_model(model: refresh_tokens::Model) -> RefreshTokenRecord {
    RefreshTokenRecord {
        token: model.token,
        user_id: model.user_id,
        device_id: model.device_id,
        expires_at: model.expires_at,
        created_at: model.created_at,
    }
}

// ── ValidationCode repository ────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbValidationCodeRepository {
    pub db: DatabaseConnection,
}

impl ValidationCodeRepository for DbValidationCodeRepository {
    async fn upsert(&self, code: &ValidationCode) -> Result<(), AuthServiceError> {
        let code = code.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    validation_codes::Entity::delete_many()
                        .filter(validation_codes::Column::Email.eq(code.email.as_str()))
                        .filter(validation_codes::Column::Kind.eq(code.kind.as_str()))
                        .exec(txn)
                        .await?;
                    validation_codes::ActiveModel {
                        id: Set(code.id),
                        email: Set(code.email),
                        code: Set(code.code),
                        kind: Set(code.kind.as_str().to_owned()),
                        expires_at: Set(code.expires_at),
                        created_at: Set(code.created_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("upsert validation code")?;
        Ok(())
    }

    async fn find(
        &self,
        email: &str,
        code: &str,
        kind: ValidationCodeType,
    ) -> Result<Option<ValidationCode>, AuthServiceError> {
        let model = validation_codes::Entity::find()
            .filter(validation_codes::Column::Email.eq(email))
            .filter(validation_codes::Column::Code.eq(code))
            .filter(validation_codes::Column::Kind.eq(kind.as_str()))
            .one(&self.db)
            .await
            .context("find validation code")?;
        model.map(validation_code_from_model).transpose()
    }

    async fn delete(
        &self,
        email: &str,
        code: &str,
        kind: ValidationCodeType,
    ) -> Result<bool, AuthServiceError> {
        let result = validation_codes::Entity::delete_many()
            .filter(validation_codes::Column::Email.eq(email))
            .filter(validation_codes::Column::Code.eq(code))
            .filter(validation_codes::Column::Kind.eq(kind.as_str()))
            .exec(&self.db)
            .await
            .context("delete validation code")?;
        Ok(result.rows_affected > 0)
    }
}

fn validation_code_from_model(
    model: validation_codes::Model,
) -> Result<ValidationCode, AuthServiceError> {
    Ok(ValidationCode {
        id: model.id,
        kind: model.kind.parse()?,
        email: model.email,
        code: model.code,
        expires_at: model.expires_at,
        created_at: model.created_at,
    })
}
