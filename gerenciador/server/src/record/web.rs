use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Duration, Utc};
use gerenciador_core::{DayCount, DeadlineStatus, Record, RecordKind, validate_record};
use serde::Deserialize;
use std::sync::Arc;

use crate::flash::{Alert, AlertLevel, Flash, set_flash, take_flash};
use crate::record::{Completion, RecordService, RecordServiceError};
use crate::web::{DATE_FORMAT, PERSISTENCE_ERROR_MESSAGE, UNEXPECTED_ERROR_MESSAGE, error_page};

/// Raw form fields as submitted. Missing fields read as empty and fail validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecordForm {
    nome: String,
    descricao: String,
    data_entrega: String,
}

#[derive(Clone, Debug)]
pub struct RecordState {
    pub db: Arc<sea_orm::DatabaseConnection>,
    pub kind: RecordKind,
    pub near_due_window: Duration,
}

/// Returns the path of the list page for `kind`.
pub fn list_path(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Task => "/",
        RecordKind::Warranty => "/garantias",
    }
}

/// Custom error type for record handler operations.
#[derive(Debug, thiserror::Error)]
enum RecordError {
    /// Represents an error during template rendering.
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
    /// Represents a record service error.
    #[error("Record service error")]
    Service(#[from] RecordServiceError),
    /// The id segment of the URL is not a number.
    #[error("Invalid {0} id")]
    InvalidId(RecordKind),
}

/// Extracts the record id, treating a malformed id like an unknown one.
fn record_id(kind: RecordKind, path: Result<Path<u32>, PathRejection>) -> Result<u32, RecordError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            tracing::info!("Rejected {} id: {}", kind, rejection);
            Err(RecordError::InvalidId(kind))
        }
    }
}

impl IntoResponse for RecordError {
    fn into_response(self) -> Response {
        match self {
            RecordError::Service(RecordServiceError::NotFound(kind, _))
            | RecordError::InvalidId(kind) => error_page(
                StatusCode::NOT_FOUND,
                &format!("{} não encontrada.", kind.label()),
            ),
            err => {
                tracing::error!("Request failed: {:?}", err);
                error_page(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UNEXPECTED_ERROR_MESSAGE,
                )
            }
        }
    }
}

/// A record prepared for display in a list.
struct RecordRow {
    id: u32,
    name: String,
    description: Option<String>,
    created_at: String,
    due_at: String,
    status_label: &'static str,
    status_class: &'static str,
    days: String,
}

impl RecordRow {
    fn new(record: &Record, status: DeadlineStatus, now: DateTime<Utc>) -> Self {
        let days = match record.day_count(now) {
            DayCount::Took(days) => format!("concluída em {} dia(s)", days),
            DayCount::OverdueSinceCreation(days) => {
                format!("{} dia(s) desde a criação", days)
            }
            DayCount::Remaining(days) => format!("{} dia(s) restante(s)", days),
        };
        Self {
            id: record.id,
            name: record.name.clone(),
            description: record.description.clone(),
            created_at: record.created_at.format(DATE_FORMAT).to_string(),
            due_at: record.due_at.format(DATE_FORMAT).to_string(),
            status_label: status_label(record.kind, status),
            status_class: status_class(status),
            days,
        }
    }
}

/// Warranties expire rather than run late.
fn status_label(kind: RecordKind, status: DeadlineStatus) -> &'static str {
    match (kind, status) {
        (RecordKind::Warranty, DeadlineStatus::Late) => "vencida",
        (RecordKind::Warranty, DeadlineStatus::NearDue) => "vence em breve",
        _ => status.label(),
    }
}

fn status_class(status: DeadlineStatus) -> &'static str {
    match status {
        DeadlineStatus::Completed => "success",
        DeadlineStatus::Late => "danger",
        DeadlineStatus::NearDue => "warning",
        DeadlineStatus::Normal => "secondary",
    }
}

/// Builds the warning shown at the top of a list for late or near-due items.
fn deadline_alert(record: &Record, status: DeadlineStatus, window: Duration) -> Option<Alert> {
    let message = match (record.kind, status) {
        (RecordKind::Task, DeadlineStatus::Late) => {
            format!("Tarefa \"{}\" está ATRASADA!", record.name)
        }
        (RecordKind::Warranty, DeadlineStatus::Late) => {
            format!("Garantia \"{}\" está VENCIDA!", record.name)
        }
        (RecordKind::Task, DeadlineStatus::NearDue) => format!(
            "Tarefa \"{}\" está com prazo próximo ({} dias ou menos)",
            record.name,
            window.num_days()
        ),
        (RecordKind::Warranty, DeadlineStatus::NearDue) => format!(
            "Garantia \"{}\" vence em breve ({} dias ou menos)",
            record.name,
            window.num_days()
        ),
        _ => return None,
    };
    let level = if status == DeadlineStatus::Late {
        AlertLevel::Danger
    } else {
        AlertLevel::Warning
    };
    Some(Alert::new(level, message))
}

#[derive(Template)]
#[template(path = "record_list.html")]
struct RecordListTemplate {
    title: &'static str,
    slug: &'static str,
    kind_label: &'static str,
    due_label: &'static str,
    rows: Vec<RecordRow>,
    alerts: Vec<Alert>,
}

impl RecordListTemplate {
    pub fn new(kind: RecordKind, rows: Vec<RecordRow>, alerts: Vec<Alert>) -> Self {
        let title = match kind {
            RecordKind::Task => "Tarefas pendentes",
            RecordKind::Warranty => "Garantias ativas",
        };
        Self {
            title,
            slug: kind.slug(),
            kind_label: kind.label(),
            due_label: due_label(kind),
            rows,
            alerts,
        }
    }
}

fn due_label(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Task => "Entrega",
        RecordKind::Warranty => "Vencimento",
    }
}

#[derive(Template)]
#[template(path = "record_form.html")]
struct RecordFormTemplate {
    heading: String,
    action: String,
    cancel_href: &'static str,
    due_label: &'static str,
    today: String,
    nome: String,
    descricao: String,
    data_entrega: String,
    error: Option<String>,
}

impl RecordFormTemplate {
    /// Creates an empty form for a new record.
    pub fn for_new(kind: RecordKind) -> Self {
        Self {
            heading: format!("Adicionar {}", kind.label()),
            action: format!("/adicionar_{}", kind.slug()),
            cancel_href: list_path(kind),
            due_label: due_label(kind),
            today: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            nome: String::new(),
            descricao: String::new(),
            data_entrega: String::new(),
            error: None,
        }
    }

    /// Creates a form prefilled with an existing record.
    pub fn for_edit(record: &Record) -> Self {
        Self {
            heading: format!("Editar {}", record.kind.label()),
            action: format!("/editar_{}/{}", record.kind.slug(), record.id),
            nome: record.name.clone(),
            descricao: record.description.clone().unwrap_or_default(),
            data_entrega: record.due_at.format("%Y-%m-%d").to_string(),
            ..Self::for_new(record.kind)
        }
    }

    /// Keeps what the user typed so a rejected form can be corrected.
    fn with_submitted(mut self, form: RecordForm) -> Self {
        self.nome = form.nome;
        self.descricao = form.descricao;
        self.data_entrega = form.data_entrega;
        self
    }

    fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }
}

fn render_form(status: StatusCode, template: RecordFormTemplate) -> Result<Response, RecordError> {
    let html = template.render()?;
    Ok((status, Html(html)).into_response())
}

/// Handler for the list page showing records not yet completed.
#[tracing::instrument(skip(state, jar), fields(kind = %state.kind))]
async fn list_records_handler(
    State(state): State<Arc<RecordState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), RecordError> {
    let service = RecordService::new(&state.db, state.kind);
    let records = service.get_pending_records().await?;
    let now = Utc::now();

    let (jar, flash) = take_flash(jar);
    let mut alerts: Vec<Alert> = flash.into_iter().collect();
    let mut rows = Vec::with_capacity(records.len());
    for record in &records {
        let status = record.deadline_status(now, state.near_due_window);
        alerts.extend(deadline_alert(record, status, state.near_due_window));
        rows.push(RecordRow::new(record, status, now));
    }

    let template = RecordListTemplate::new(state.kind, rows, alerts);
    let html = template.render()?;
    Ok((jar, Html(html)))
}

/// Handler for serving the add record form.
#[tracing::instrument(skip(state), fields(kind = %state.kind))]
async fn add_record_form_handler(
    State(state): State<Arc<RecordState>>,
) -> Result<Html<String>, RecordError> {
    let template = RecordFormTemplate::for_new(state.kind);
    template.render().map(Html).map_err(RecordError::from)
}

/// Handler for creating a new record via POST request.
#[tracing::instrument(skip(state, jar), fields(kind = %state.kind))]
async fn create_record_handler(
    State(state): State<Arc<RecordState>>,
    jar: CookieJar,
    Form(form): Form<RecordForm>,
) -> Result<Response, RecordError> {
    let service = RecordService::new(&state.db, state.kind);
    let today = Utc::now().date_naive();

    let input = match validate_record(&form.nome, &form.descricao, &form.data_entrega, today) {
        Ok(input) => input,
        Err(err) => {
            tracing::info!("Rejected {} form: {}", state.kind, err);
            let template = RecordFormTemplate::for_new(state.kind)
                .with_submitted(form)
                .with_error(err.to_string());
            return render_form(StatusCode::UNPROCESSABLE_ENTITY, template);
        }
    };

    match service.create_record(input, Utc::now()).await {
        Ok(_) => {
            let jar = set_flash(jar, Flash::Created(state.kind));
            Ok((jar, Redirect::to(list_path(state.kind))).into_response())
        }
        Err(err) => {
            tracing::error!("Failed to create {}: {}", state.kind, err);
            let template = RecordFormTemplate::for_new(state.kind)
                .with_submitted(form)
                .with_error(PERSISTENCE_ERROR_MESSAGE);
            render_form(StatusCode::INTERNAL_SERVER_ERROR, template)
        }
    }
}

/// Handler for serving the edit record form.
#[tracing::instrument(skip(state), fields(kind = %state.kind))]
async fn edit_record_form_handler(
    State(state): State<Arc<RecordState>>,
    path: Result<Path<u32>, PathRejection>,
) -> Result<Html<String>, RecordError> {
    let id = record_id(state.kind, path)?;
    let service = RecordService::new(&state.db, state.kind);
    let record = service.get_record_by_id(id).await?;
    let template = RecordFormTemplate::for_edit(&record);
    template.render().map(Html).map_err(RecordError::from)
}

/// Handler for updating a record via POST request.
#[tracing::instrument(skip(state, jar), fields(kind = %state.kind))]
async fn update_record_handler(
    State(state): State<Arc<RecordState>>,
    jar: CookieJar,
    path: Result<Path<u32>, PathRejection>,
    Form(form): Form<RecordForm>,
) -> Result<Response, RecordError> {
    let id = record_id(state.kind, path)?;
    let service = RecordService::new(&state.db, state.kind);
    let record = service.get_record_by_id(id).await?;
    let today = Utc::now().date_naive();

    let input = match validate_record(&form.nome, &form.descricao, &form.data_entrega, today) {
        Ok(input) => input,
        Err(err) => {
            tracing::info!("Rejected {} {} edit: {}", state.kind, id, err);
            let template = RecordFormTemplate::for_edit(&record)
                .with_submitted(form)
                .with_error(err.to_string());
            return render_form(StatusCode::UNPROCESSABLE_ENTITY, template);
        }
    };

    match service.edit_record_by_id(id, input).await {
        Ok(_) => {
            let jar = set_flash(jar, Flash::Updated(state.kind));
            Ok((jar, Redirect::to(list_path(state.kind))).into_response())
        }
        Err(err @ RecordServiceError::NotFound(..)) => Err(RecordError::Service(err)),
        Err(err) => {
            tracing::error!("Failed to update {} {}: {}", state.kind, id, err);
            let template = RecordFormTemplate::for_edit(&record)
                .with_submitted(form)
                .with_error(PERSISTENCE_ERROR_MESSAGE);
            render_form(StatusCode::INTERNAL_SERVER_ERROR, template)
        }
    }
}

/// Handler for marking a record as completed.
#[tracing::instrument(skip(state, jar), fields(kind = %state.kind))]
async fn complete_record_handler(
    State(state): State<Arc<RecordState>>,
    jar: CookieJar,
    path: Result<Path<u32>, PathRejection>,
) -> Result<(CookieJar, Redirect), RecordError> {
    let id = record_id(state.kind, path)?;
    let service = RecordService::new(&state.db, state.kind);

    let flash = match service.complete_record_by_id(id, Utc::now()).await {
        Ok(Completion::Completed(_)) => Flash::Completed(state.kind),
        Ok(Completion::AlreadyCompleted(_)) => Flash::AlreadyCompleted(state.kind),
        Err(err @ RecordServiceError::NotFound(..)) => return Err(RecordError::Service(err)),
        Err(err) => {
            tracing::error!("Failed to complete {} {}: {}", state.kind, id, err);
            Flash::PersistenceFailed
        }
    };

    Ok((set_flash(jar, flash), Redirect::to(list_path(state.kind))))
}

/// Handler for deleting a record via POST request.
///
/// Completed records are deleted from the history, so the user is sent back there.
#[tracing::instrument(skip(state, jar), fields(kind = %state.kind))]
async fn delete_record_handler(
    State(state): State<Arc<RecordState>>,
    jar: CookieJar,
    path: Result<Path<u32>, PathRejection>,
) -> Result<(CookieJar, Redirect), RecordError> {
    let id = record_id(state.kind, path)?;
    let service = RecordService::new(&state.db, state.kind);

    match service.delete_record_by_id(id).await {
        Ok(record) => {
            let target = if record.is_completed() {
                "/historico"
            } else {
                list_path(state.kind)
            };
            Ok((set_flash(jar, Flash::Deleted(state.kind)), Redirect::to(target)))
        }
        Err(err @ RecordServiceError::NotFound(..)) => Err(RecordError::Service(err)),
        Err(err) => {
            tracing::error!("Failed to delete {} {}: {}", state.kind, id, err);
            Ok((
                set_flash(jar, Flash::PersistenceFailed),
                Redirect::to(list_path(state.kind)),
            ))
        }
    }
}

/// Creates and returns the router with all routes for one record kind.
pub fn create_record_router(state: Arc<RecordState>) -> Router {
    let slug = state.kind.slug();
    Router::new()
        .route(list_path(state.kind), get(list_records_handler))
        .route(
            &format!("/adicionar_{slug}"),
            get(add_record_form_handler).post(create_record_handler),
        )
        .route(
            &format!("/concluir_{slug}/{{id}}"),
            get(complete_record_handler),
        )
        .route(
            &format!("/editar_{slug}/{{id}}"),
            get(edit_record_form_handler).post(update_record_handler),
        )
        .route(
            &format!("/excluir_{slug}/{{id}}"),
            post(delete_record_handler),
        )
        .with_state(state)
}
