use chrono::{DateTime, Utc};
use gerenciador_core::{Record, RecordInput, RecordKind};
use sea_orm::*;

use crate::entities::{garantia, tarefa};

pub mod web;

/// Expands `$body` once per record kind with `$entity` naming that kind's
/// entity module. Both tables share the same columns.
macro_rules! with_entity {
    ($kind:expr, $entity:ident => $body:expr) => {
        match $kind {
            RecordKind::Task => {
                use crate::entities::tarefa as $entity;
                $body
            }
            RecordKind::Warranty => {
                use crate::entities::garantia as $entity;
                $body
            }
        }
    };
}

/// Error type for RecordService operations.
#[derive(Debug, thiserror::Error)]
pub enum RecordServiceError {
    /// Represents a lookup for an ID that does not exist.
    #[error("{0} with ID {1} not found")]
    NotFound(RecordKind, u32),
    /// Represents a database error. The surrounding transaction has been rolled back.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Outcome of marking a record as completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Completed(Record),
    /// The record was already completed; its completion time is unchanged.
    AlreadyCompleted(Record),
}

impl Completion {
    pub fn record(&self) -> &Record {
        match self {
            Completion::Completed(record) | Completion::AlreadyCompleted(record) => record,
        }
    }
}

// A row flagged as completed without a completion time reads as pending.
fn completion_time(is_completed: bool, completed_at: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    if is_completed { completed_at } else { None }
}

impl From<tarefa::Model> for Record {
    fn from(model: tarefa::Model) -> Self {
        Record {
            id: model.id as u32,
            kind: RecordKind::Task,
            completed_at: completion_time(model.is_completed, model.completed_at),
            name: model.name,
            description: model.description,
            created_at: model.created_at,
            due_at: model.due_at,
        }
    }
}

impl From<garantia::Model> for Record {
    fn from(model: garantia::Model) -> Self {
        Record {
            id: model.id as u32,
            kind: RecordKind::Warranty,
            completed_at: completion_time(model.is_completed, model.completed_at),
            name: model.name,
            description: model.description,
            created_at: model.created_at,
            due_at: model.due_at,
        }
    }
}

/// Store operations for one record kind. Every mutation runs in its own
/// transaction.
pub struct RecordService<'a> {
    db: &'a sea_orm::DatabaseConnection,
    kind: RecordKind,
}

impl RecordService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection, kind: RecordKind) -> RecordService<'_> {
        RecordService { db, kind }
    }

    /// Creates a new record.
    ///
    /// # Arguments
    ///
    /// * `input` - The validated form fields.
    /// * `now` - The creation time.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `Record` if successful, or an error otherwise.
    #[tracing::instrument(skip(self), fields(kind = %self.kind))]
    pub async fn create_record(
        &self,
        input: RecordInput,
        now: DateTime<Utc>,
    ) -> Result<Record, RecordServiceError> {
        let txn = self.db.begin().await?;
        let record: Record = with_entity!(self.kind, entity => {
            let active_model = entity::ActiveModel {
                name: ActiveValue::Set(input.name),
                description: ActiveValue::Set(input.description),
                created_at: ActiveValue::Set(now),
                due_at: ActiveValue::Set(input.due_at),
                completed_at: ActiveValue::Set(None),
                is_completed: ActiveValue::Set(false),
                ..Default::default()
            };
            active_model.insert(&txn).await?.into()
        });
        txn.commit().await?;
        tracing::info!("Created {} {}", self.kind, record.id);
        Ok(record)
    }

    /// Retrieves a record by its ID.
    #[tracing::instrument(skip(self), fields(kind = %self.kind))]
    pub async fn get_record_by_id(&self, id: u32) -> Result<Record, RecordServiceError> {
        let record: Option<Record> = with_entity!(self.kind, entity => {
            entity::Entity::find_by_id(id as i32)
                .one(self.db)
                .await?
                .map(Record::from)
        });
        record.ok_or(RecordServiceError::NotFound(self.kind, id))
    }

    /// Retrieves records not yet completed, earliest due date first.
    ///
    /// Rows flagged as completed without a completion time are included.
    #[tracing::instrument(skip(self), fields(kind = %self.kind))]
    pub async fn get_pending_records(&self) -> Result<Vec<Record>, RecordServiceError> {
        let records = with_entity!(self.kind, entity => {
            entity::Entity::find()
                .filter(
                    Condition::any()
                        .add(entity::Column::IsCompleted.eq(false))
                        .add(entity::Column::CompletedAt.is_null()),
                )
                .order_by_asc(entity::Column::DueAt)
                .order_by_asc(entity::Column::Id)
                .all(self.db)
                .await?
                .into_iter()
                .map(Record::from)
                .collect::<Vec<_>>()
        });
        Ok(records)
    }

    /// Retrieves completed records, most recently completed first.
    #[tracing::instrument(skip(self), fields(kind = %self.kind))]
    pub async fn get_completed_records(&self) -> Result<Vec<Record>, RecordServiceError> {
        let records = with_entity!(self.kind, entity => {
            entity::Entity::find()
                .filter(entity::Column::IsCompleted.eq(true))
                .filter(entity::Column::CompletedAt.is_not_null())
                .order_by_desc(entity::Column::CompletedAt)
                .all(self.db)
                .await?
                .into_iter()
                .map(Record::from)
                .collect::<Vec<_>>()
        });
        Ok(records)
    }

    /// Replaces the name, description and due date of a record.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the record to edit.
    /// * `input` - The validated form fields.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Record` if successful, or an error otherwise.
    #[tracing::instrument(skip(self), fields(kind = %self.kind))]
    pub async fn edit_record_by_id(
        &self,
        id: u32,
        input: RecordInput,
    ) -> Result<Record, RecordServiceError> {
        let txn = self.db.begin().await?;
        let record: Record = with_entity!(self.kind, entity => {
            let model = entity::Entity::find_by_id(id as i32)
                .one(&txn)
                .await?
                .ok_or(RecordServiceError::NotFound(self.kind, id))?;
            let mut active_model: entity::ActiveModel = model.into();
            active_model.name = ActiveValue::Set(input.name);
            active_model.description = ActiveValue::Set(input.description);
            active_model.due_at = ActiveValue::Set(input.due_at);
            active_model.update(&txn).await?.into()
        });
        txn.commit().await?;
        Ok(record)
    }

    /// Marks a record as completed at `now`, setting the flag and the
    /// completion time together.
    #[tracing::instrument(skip(self), fields(kind = %self.kind))]
    pub async fn complete_record_by_id(
        &self,
        id: u32,
        now: DateTime<Utc>,
    ) -> Result<Completion, RecordServiceError> {
        let txn = self.db.begin().await?;
        let completion = with_entity!(self.kind, entity => {
            let model = entity::Entity::find_by_id(id as i32)
                .one(&txn)
                .await?
                .ok_or(RecordServiceError::NotFound(self.kind, id))?;
            if model.is_completed && model.completed_at.is_some() {
                Completion::AlreadyCompleted(model.into())
            } else {
                let mut active_model: entity::ActiveModel = model.into();
                active_model.is_completed = ActiveValue::Set(true);
                active_model.completed_at = ActiveValue::Set(Some(now));
                Completion::Completed(active_model.update(&txn).await?.into())
            }
        });
        txn.commit().await?;
        if let Completion::AlreadyCompleted(_) = completion {
            tracing::warn!("{} {} was already completed", self.kind, id);
        }
        Ok(completion)
    }

    /// Deletes a record by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted `Record` if successful, or an error otherwise.
    #[tracing::instrument(skip(self), fields(kind = %self.kind))]
    pub async fn delete_record_by_id(&self, id: u32) -> Result<Record, RecordServiceError> {
        let txn = self.db.begin().await?;
        let record: Record = with_entity!(self.kind, entity => {
            let model = entity::Entity::find_by_id(id as i32)
                .one(&txn)
                .await?
                .ok_or(RecordServiceError::NotFound(self.kind, id))?;
            entity::Entity::delete_by_id(id as i32).exec(&txn).await?;
            model.into()
        });
        txn.commit().await?;
        tracing::info!("Deleted {} {}", self.kind, id);
        Ok(record)
    }
}
