pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_tarefa_table;
mod m20250901_000002_create_garantia_table;
mod m20250905_000003_add_pending_due_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_tarefa_table::Migration),
            Box::new(m20250901_000002_create_garantia_table::Migration),
            Box::new(m20250905_000003_add_pending_due_index::Migration),
        ]
    }
}
