use sea_orm_migration::prelude::*;

use crate::m20250901_000001_create_tarefa_table::Tarefa;
use crate::m20250901_000002_create_garantia_table::Garantia;

#[derive(DeriveMigrationName)]
pub struct Migration;

const IDX_TAREFA_PENDING_DUE: &str = "idx-tarefa-concluida-data_entrega";
const IDX_GARANTIA_PENDING_DUE: &str = "idx-garantia-concluida-data_entrega";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Both list pages filter on completion and sort by due date.
        manager
            .create_index(
                Index::create()
                    .name(IDX_TAREFA_PENDING_DUE)
                    .table(Tarefa::Table)
                    .col(Tarefa::Concluida)
                    .col(Tarefa::DataEntrega)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name(IDX_GARANTIA_PENDING_DUE)
                    .table(Garantia::Table)
                    .col(Garantia::Concluida)
                    .col(Garantia::DataEntrega)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_GARANTIA_PENDING_DUE)
                    .table(Garantia::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_TAREFA_PENDING_DUE)
                    .table(Tarefa::Table)
                    .to_owned(),
            )
            .await
    }
}
