use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductAiGenerations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductAiGenerations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProductAiGenerations::ProductId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductAiGenerations::AiRequestId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductAiGenerations::GenerationType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductAiGenerations::OriginalContent)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ProductAiGenerations::AiGeneratedContent)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductAiGenerations::IsApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ProductAiGenerations::IsUsed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ProductAiGenerations::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ProductAiGenerations::ApprovedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_ai_generations_product_id")
                            .from(ProductAiGenerations::Table, ProductAiGenerations::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_ai_generations_ai_request_id")
                            .from(ProductAiGenerations::Table, ProductAiGenerations::AiRequestId)
                            .to(AiRequests::Table, AiRequests::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_ai_generations_product")
                    .table(ProductAiGenerations::Table)
                    .col(ProductAiGenerations::ProductId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductAiGenerations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProductAiGenerations {
    Table,
    Id,
    ProductId,
    AiRequestId,
    GenerationType,
    OriginalContent,
    AiGeneratedContent,
    IsApproved,
    IsUsed,
    CreatedAt,
    ApprovedAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum AiRequests {
    Table,
    Id,
}
