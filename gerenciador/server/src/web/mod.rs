use askama::Template;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use gerenciador_core::RecordKind;
use migration::MigratorTrait;
use sea_orm::Database;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::{self, Config};
use crate::history::{HistoryState, create_history_router};
use crate::record::web::{RecordState, create_record_router};

/// Day format used across pages.
pub const DATE_FORMAT: &str = "%d/%m/%Y";
/// Timestamp format used for completion times.
pub const DATE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";
/// Generic message shown when a mutation could not be committed.
pub const PERSISTENCE_ERROR_MESSAGE: &str =
    "Não foi possível salvar as alterações. Tente novamente.";
/// Shown when a page cannot be produced at all.
pub const UNEXPECTED_ERROR_MESSAGE: &str =
    "Ocorreu um erro inesperado ao processar sua solicitação. Tente novamente mais tarde.";

/// Custom error type for web handler operations.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Represents an error during template rendering.
    /// The specific `askama::Error` is captured as the source of this error.
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!(
                "<h1>Erro interno</h1><p>{}</p>",
                UNEXPECTED_ERROR_MESSAGE
            )),
        )
            .into_response()
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPageTemplate<'a> {
    message: &'a str,
}

/// Renders the full-page error view with `status`.
pub fn error_page(status: StatusCode, message: &str) -> Response {
    match (ErrorPageTemplate { message }).render() {
        Ok(rendered) => (status, Html(rendered)).into_response(),
        Err(err) => WebError::from(err).into_response(),
    }
}

/// Builds the application router on top of an already migrated database.
pub fn create_app(db: sea_orm::DatabaseConnection, config: &Config) -> Router {
    let db = Arc::new(db);

    let record_router = |kind: RecordKind| {
        create_record_router(Arc::new(RecordState {
            db: db.clone(),
            kind,
            near_due_window: config.near_due_window(kind),
        }))
    };
    let history_router = create_history_router(Arc::new(HistoryState { db: db.clone() }));

    Router::new()
        .merge(record_router(RecordKind::Task))
        .merge(record_router(RecordKind::Warranty))
        .merge(history_router)
        .route("/health", axum::routing::get(health_check_handler))
        .fallback(not_found_handler)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: config::Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = Database::connect(&config.db_url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let app = create_app(db, &config);
    axum::serve(listener, app).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

#[tracing::instrument]
pub async fn not_found_handler() -> Response {
    error_page(StatusCode::NOT_FOUND, "Página não encontrada.")
}
