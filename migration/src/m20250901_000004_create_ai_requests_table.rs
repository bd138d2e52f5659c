use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AiRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AiRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AiRequests::UserId).integer())
                    .col(
                        ColumnDef::new(AiRequests::RequestType)
                            .string_len(20)
                            .not_null()
                            .default("chat"),
                    )
                    .col(
                        ColumnDef::new(AiRequests::Status)
                            .string_len(10)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(AiRequests::Prompt).text().not_null())
                    .col(
                        ColumnDef::new(AiRequests::ImageUrls)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(AiRequests::ModelName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AiRequests::MaxTokens)
                            .integer()
                            .not_null()
                            .default(256),
                    )
                    .col(
                        ColumnDef::new(AiRequests::Temperature)
                            .double()
                            .not_null()
                            .default(0.7),
                    )
                    .col(ColumnDef::new(AiRequests::ResponseText).text())
                    .col(
                        ColumnDef::new(AiRequests::ResponseTokens)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AiRequests::ProcessingTime)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(AiRequests::ErrorMessage).text())
                    .col(
                        ColumnDef::new(AiRequests::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AiRequests::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ai_requests_user_id")
                            .from(AiRequests::Table, AiRequests::UserId)
                            .to(Users::Table, Users::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 历史查询按用户 + 创建时间倒序
        manager
            .create_index(
                Index::create()
                    .name("idx_ai_requests_user_created")
                    .table(AiRequests::Table)
                    .col(AiRequests::UserId)
                    .col(AiRequests::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ai_requests_status")
                    .table(AiRequests::Table)
                    .col(AiRequests::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AiRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AiRequests {
    Table,
    Id,
    UserId,
    RequestType,
    Status,
    Prompt,
    ImageUrls,
    ModelName,
    MaxTokens,
    Temperature,
    ResponseText,
    ResponseTokens,
    ProcessingTime,
    ErrorMessage,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
