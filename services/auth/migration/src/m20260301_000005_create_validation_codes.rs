use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ValidationCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ValidationCodes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ValidationCodes::Email).string().not_null())
                    .col(ColumnDef::new(ValidationCodes::Code).string_len(16).not_null())
                    .col(ColumnDef::new(ValidationCodes::Kind).string_len(32).not_null())
                    .col(
                        ColumnDef::new(ValidationCodes::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ValidationCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ValidationCodes::Table)
                    .col(ValidationCodes::Email)
                    .col(ValidationCodes::Code)
                    .col(ValidationCodes::Kind)
                    .unique()
                    .name("uq_validation_codes_email_code_kind")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ValidationCodes::Table)
                    .col(ValidationCodes::Email)
                    .col(ValidationCodes::Kind)
                    .name("idx_validation_codes_email_kind")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ValidationCodes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ValidationCodes {
    Table,
    Id,
    Email,
    Code,
    Kind,
    ExpiresAt,
    CreatedAt,
}
