#![allow(dead_code)]

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use chrono::{DateTime, Duration, Utc};
use gerenciador_server::config::Config;
use gerenciador_server::entities::{garantia, tarefa};
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ActiveValue, Database, DatabaseConnection};

pub async fn setup_db() -> anyhow::Result<DatabaseConnection> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let db = Database::connect("sqlite::memory:").await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn test_config() -> Config {
    Config {
        db_url: "sqlite::memory:".to_string(),
        port: 8080,
        task_near_due_days: 3,
        warranty_near_due_days: 30,
    }
}

/// Inserts a task row directly, bypassing validation.
pub async fn insert_task(
    db: &DatabaseConnection,
    name: &str,
    due_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
) -> tarefa::Model {
    tarefa::ActiveModel {
        name: ActiveValue::Set(name.to_string()),
        description: ActiveValue::Set(None),
        created_at: ActiveValue::Set(Utc::now() - Duration::days(10)),
        due_at: ActiveValue::Set(due_at),
        completed_at: ActiveValue::Set(completed_at),
        is_completed: ActiveValue::Set(completed_at.is_some()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert task")
}

/// Inserts a warranty row directly, bypassing validation.
pub async fn insert_warranty(
    db: &DatabaseConnection,
    name: &str,
    due_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
) -> garantia::Model {
    garantia::ActiveModel {
        name: ActiveValue::Set(name.to_string()),
        description: ActiveValue::Set(None),
        created_at: ActiveValue::Set(Utc::now() - Duration::days(10)),
        due_at: ActiveValue::Set(due_at),
        completed_at: ActiveValue::Set(completed_at),
        is_completed: ActiveValue::Set(completed_at.is_some()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert warranty")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn read_response(response: axum::response::Response) -> (StatusCode, HeaderMap, String) {
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}
