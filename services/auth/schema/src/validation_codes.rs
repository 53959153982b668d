use sea_orm::entity::prelude::*;

/// Emailed one-time code. Unique on `(email, code, kind)`; issuing a new code
/// replaces any previous code for the same `(email, kind)`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "validation_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub code: String,
    /// `REGISTER`, `FORGOT_PASSWORD`, `LOGIN` or `DISABLE_2FA`.
    pub kind: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
