use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AiUsageStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AiUsageStats::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AiUsageStats::UserId).integer())
                    .col(ColumnDef::new(AiUsageStats::Date).date().not_null())
                    .col(counter(AiUsageStats::TotalRequests))
                    .col(counter(AiUsageStats::SuccessfulRequests))
                    .col(counter(AiUsageStats::FailedRequests))
                    .col(counter(AiUsageStats::TotalTokensUsed))
                    .col(counter(AiUsageStats::ProductDescriptionRequests))
                    .col(counter(AiUsageStats::ImageAnalysisRequests))
                    .col(counter(AiUsageStats::TextGenerationRequests))
                    .col(counter(AiUsageStats::ChatRequests))
                    .col(counter(AiUsageStats::ProductAnalysisRequests))
                    .col(
                        ColumnDef::new(AiUsageStats::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AiUsageStats::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ai_usage_stats_user_id")
                            .from(AiUsageStats::Table, AiUsageStats::UserId)
                            .to(Users::Table, Users::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建唯一约束
        manager
            .create_index(
                Index::create()
                    .name("idx_ai_usage_stats_user_date")
                    .table(AiUsageStats::Table)
                    .col(AiUsageStats::UserId)
                    .col(AiUsageStats::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AiUsageStats::Table).to_owned())
            .await
    }
}

fn counter(column: AiUsageStats) -> ColumnDef {
    ColumnDef::new(column)
        .integer()
        .not_null()
        .default(0)
        .to_owned()
}

#[derive(DeriveIden)]
enum AiUsageStats {
    Table,
    Id,
    UserId,
    Date,
    TotalRequests,
    SuccessfulRequests,
    FailedRequests,
    TotalTokensUsed,
    ProductDescriptionRequests,
    ImageAnalysisRequests,
    TextGenerationRequests,
    ChatRequests,
    ProductAnalysisRequests,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
