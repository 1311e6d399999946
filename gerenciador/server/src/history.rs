use askama::Template;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::CookieJar;
use gerenciador_core::{DeliveryStatus, HistoryEntry, RecordKind, build_history};
use std::sync::Arc;

use crate::flash::{Alert, take_flash};
use crate::record::{RecordService, RecordServiceError};
use crate::web::{DATE_FORMAT, DATE_TIME_FORMAT, UNEXPECTED_ERROR_MESSAGE, error_page};

#[derive(Clone, Debug)]
pub struct HistoryState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// Custom error type for history handler operations.
#[derive(Debug, thiserror::Error)]
enum HistoryError {
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
    #[error("Record service error")]
    Service(#[from] RecordServiceError),
}

impl IntoResponse for HistoryError {
    fn into_response(self) -> Response {
        tracing::error!("Failed to render history: {:?}", self);
        error_page(
            StatusCode::INTERNAL_SERVER_ERROR,
            UNEXPECTED_ERROR_MESSAGE,
        )
    }
}

struct HistoryRow {
    kind_label: &'static str,
    name: String,
    created_at: String,
    due_at: String,
    completed_at: String,
    delivery_label: &'static str,
    delivery_class: &'static str,
    days_taken: i64,
    delete_action: String,
}

impl From<HistoryEntry> for HistoryRow {
    fn from(entry: HistoryEntry) -> Self {
        let delivery_class = match entry.delivery {
            DeliveryStatus::OnTime => "success",
            DeliveryStatus::Late => "danger",
            DeliveryStatus::Pending => "secondary",
        };
        Self {
            kind_label: entry.kind.label(),
            delete_action: format!("/excluir_{}/{}", entry.kind.slug(), entry.id),
            name: entry.name,
            created_at: entry.created_at.format(DATE_FORMAT).to_string(),
            due_at: entry.due_at.format(DATE_FORMAT).to_string(),
            completed_at: entry.completed_at.format(DATE_TIME_FORMAT).to_string(),
            delivery_label: entry.delivery.label(),
            delivery_class,
            days_taken: entry.days_taken,
        }
    }
}

#[derive(Template)]
#[template(path = "history.html")]
struct HistoryTemplate {
    rows: Vec<HistoryRow>,
    alerts: Vec<Alert>,
}

/// Handler for /historico: completed tasks and warranties, most recent first.
#[tracing::instrument(skip(state, jar))]
async fn history_handler(
    State(state): State<Arc<HistoryState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), HistoryError> {
    let tasks = RecordService::new(&state.db, RecordKind::Task)
        .get_completed_records()
        .await?;
    let warranties = RecordService::new(&state.db, RecordKind::Warranty)
        .get_completed_records()
        .await?;

    let rows = build_history(tasks.into_iter().chain(warranties))
        .into_iter()
        .map(HistoryRow::from)
        .collect();
    let (jar, flash) = take_flash(jar);

    let template = HistoryTemplate {
        rows,
        alerts: flash.into_iter().collect(),
    };
    let html = template.render()?;
    Ok((jar, Html(html)))
}

/// Creates and returns the history router.
pub fn create_history_router(state: Arc<HistoryState>) -> Router {
    Router::new()
        .route("/historico", get(history_handler))
        .with_state(state)
}
