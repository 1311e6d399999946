use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tarefa")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "nome")]
    pub name: String,
    #[sea_orm(column_name = "descricao", column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_name = "data_criacao")]
    pub created_at: DateTimeUtc,
    #[sea_orm(column_name = "data_entrega")]
    pub due_at: DateTimeUtc,
    #[sea_orm(column_name = "data_conclusao", nullable)]
    pub completed_at: Option<DateTimeUtc>,
    #[sea_orm(column_name = "concluida")]
    pub is_completed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
