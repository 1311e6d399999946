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
                    .table(Garantia::Table)
                    .if_not_exists()
                    .col(pk_auto(Garantia::Id))
                    .col(string_len(Garantia::Nome, 100))
                    .col(text_null(Garantia::Descricao))
                    .col(timestamp_with_time_zone(Garantia::DataCriacao))
                    .col(timestamp_with_time_zone(Garantia::DataEntrega))
                    .col(timestamp_with_time_zone_null(Garantia::DataConclusao))
                    .col(boolean(Garantia::Concluida).default(false))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Garantia::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Garantia {
    Table,
    Id,
    Nome,
    Descricao,
    DataCriacao,
    DataEntrega,
    DataConclusao,
    Concluida,
}
