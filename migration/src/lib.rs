pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_users_table;
mod m20250901_000002_create_catalog_tables;
mod m20250901_000003_create_ai_configurations_table;
mod m20250901_000004_create_ai_requests_table;
mod m20250901_000005_create_ai_usage_stats_table;
mod m20250901_000006_create_product_ai_generations_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_users_table::Migration),
            Box::new(m20250901_000002_create_catalog_tables::Migration),
            Box::new(m20250901_000003_create_ai_configurations_table::Migration),
            Box::new(m20250901_000004_create_ai_requests_table::Migration),
            Box::new(m20250901_000005_create_ai_usage_stats_table::Migration),
            Box::new(m20250901_000006_create_product_ai_generations_table::Migration),
        ]
    }
}
