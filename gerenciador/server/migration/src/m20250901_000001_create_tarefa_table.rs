use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tarefa::Table)
                    .if_not_exists()
                    .col(pk_auto(Tarefa::Id))
                    .col(string_len(Tarefa::Nome, 100))
                    .col(text_null(Tarefa::Descricao))
                    .col(timestamp_with_time_zone(Tarefa::DataCriacao))
                    .col(timestamp_with_time_zone(Tarefa::DataEntrega))
                    .col(timestamp_with_time_zone_null(Tarefa::DataConclusao))
                    .col(boolean(Tarefa::Concluida).default(false))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tarefa::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Tarefa {
    Table,
    Id,
    Nome,
    Descricao,
    DataCriacao,
    DataEntrega,
    DataConclusao,
    Concluida,
}
