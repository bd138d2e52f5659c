use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AiConfigurations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AiConfigurations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AiConfigurations::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AiConfigurations::Endpoint)
                            .string_len(500)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AiConfigurations::ApiKey)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AiConfigurations::ModelName)
                            .string_len(100)
                            .not_null()
                            .default("google/gemma-3-4b-it"),
                    )
                    .col(
                        ColumnDef::new(AiConfigurations::MaxTokensDefault)
                            .integer()
                            .not_null()
                            .default(256),
                    )
                    .col(
                        ColumnDef::new(AiConfigurations::TemperatureDefault)
                            .double()
                            .not_null()
                            .default(0.7),
                    )
                    .col(
                        ColumnDef::new(AiConfigurations::TimeoutSeconds)
                            .integer()
                            .not_null()
                            .default(300),
                    )
                    .col(
                        ColumnDef::new(AiConfigurations::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AiConfigurations::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AiConfigurations::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AiConfigurations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AiConfigurations {
    Table,
    Id,
    Name,
    Endpoint,
    ApiKey,
    ModelName,
    MaxTokensDefault,
    TemperatureDefault,
    TimeoutSeconds,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
