use axum::http::StatusCode;
use chrono::{Duration, Utc};
use gerenciador_server::entities::{garantia, tarefa};
use gerenciador_server::web::create_app;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait};
use tower::ServiceExt;

mod common;

use common::{get, insert_task, insert_warranty, post_form, read_response};

async fn setup() -> anyhow::Result<DatabaseConnection> {
    common::setup_db().await
}

fn app(db: &DatabaseConnection) -> axum::Router {
    create_app(db.clone(), &common::test_config())
}

fn in_days(days: i64) -> String {
    (Utc::now() + Duration::days(days))
        .date_naive()
        .format("%Y-%m-%d")
        .to_string()
}

#[tokio::test]
async fn can_display_pending_tasks_with_deadline_warnings() {
    let db = setup().await.expect("Failed to setup test context");
    insert_task(&db, "Atrasada", Utc::now() - Duration::days(1), None).await;
    insert_task(&db, "Proxima", Utc::now() + Duration::days(2), None).await;
    insert_task(&db, "Tranquila", Utc::now() + Duration::days(20), None).await;
    insert_task(&db, "Feita", Utc::now(), Some(Utc::now())).await;

    let response = app(&db).oneshot(get("/")).await.unwrap();
    let (status, _, body) = read_response(response).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Atrasada"));
    assert!(body.contains("está ATRASADA!"));
    assert!(body.contains("está com prazo próximo (3 dias ou menos)"));
    assert!(body.contains("Tranquila"));
    assert!(!body.contains("Feita"));

    let late = body.find("Atrasada").unwrap();
    let near = body.find("Proxima").unwrap();
    let later = body.find("Tranquila").unwrap();
    assert!(late < near && near < later, "tasks should be ordered by due date");
}

#[tokio::test]
async fn can_display_warranties_with_thirty_day_window() {
    let db = setup().await.expect("Failed to setup test context");
    insert_warranty(&db, "Vencida", Utc::now() - Duration::days(3), None).await;
    insert_warranty(&db, "Geladeira", Utc::now() + Duration::days(20), None).await;
    insert_warranty(&db, "Notebook", Utc::now() + Duration::days(200), None).await;

    let response = app(&db).oneshot(get("/garantias")).await.unwrap();
    let (status, _, body) = read_response(response).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("está VENCIDA!"));
    assert!(body.contains(">vencida</span>"));
    assert!(!body.contains("atrasada"));
    assert!(body.contains("vence em breve (30 dias ou menos)"));
    assert!(body.contains("Notebook"));
    assert_eq!(body.matches("vence em breve").count(), 1);
}

#[tokio::test]
async fn can_render_add_form() {
    let db = setup().await.expect("Failed to setup test context");

    let response = app(&db).oneshot(get("/adicionar_garantia")).await.unwrap();
    let (status, _, body) = read_response(response).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Adicionar Garantia"));
    assert!(body.contains("action=\"/adicionar_garantia\""));
}

#[tokio::test]
async fn can_create_task_and_redirect_with_flash() {
    let db = setup().await.expect("Failed to setup test context");
    let form = format!("nome=Relatorio&descricao=mensal&data_entrega={}", in_days(5));

    let response = app(&db)
        .oneshot(post_form("/adicionar_tarefa", &form))
        .await
        .unwrap();
    let (status, headers, _) = read_response(response).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get("location").unwrap(), "/");
    let cookie = headers.get("set-cookie").unwrap().to_str().unwrap();
    assert!(cookie.starts_with("flash=created.tarefa"));

    let tasks = tarefa::Entity::find().all(&db).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name, "Relatorio");
    assert_eq!(tasks[0].description.as_deref(), Some("mensal"));
    assert!(!tasks[0].is_completed);
}

#[tokio::test]
async fn can_show_flash_once_on_next_page() {
    let db = setup().await.expect("Failed to setup test context");
    let request = axum::http::Request::builder()
        .uri("/")
        .header("cookie", "flash=created.tarefa")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app(&db).oneshot(request).await.unwrap();
    let (status, headers, body) = read_response(response).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Tarefa adicionada com sucesso!"));
    let cookie = headers.get("set-cookie").unwrap().to_str().unwrap();
    assert!(cookie.starts_with("flash=;"), "flash cookie should be cleared");
}

#[tokio::test]
async fn can_reject_empty_name_without_persisting() {
    let db = setup().await.expect("Failed to setup test context");
    let form = format!("nome=&descricao=&data_entrega={}", in_days(5));

    let response = app(&db)
        .oneshot(post_form("/adicionar_tarefa", &form))
        .await
        .unwrap();
    let (status, _, body) = read_response(response).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("O nome é obrigatório."));
    assert_eq!(tarefa::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn can_reject_unparsable_date_and_keep_submitted_values() {
    let db = setup().await.expect("Failed to setup test context");

    let response = app(&db)
        .oneshot(post_form(
            "/adicionar_garantia",
            "nome=Geladeira&descricao=&data_entrega=not-a-date",
        ))
        .await
        .unwrap();
    let (status, _, body) = read_response(response).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("Formato de data inválido. Use YYYY-MM-DD."));
    assert!(body.contains("value=\"Geladeira\""));
    assert_eq!(garantia::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn can_reject_past_due_date() {
    let db = setup().await.expect("Failed to setup test context");
    let form = format!("nome=Antiga&data_entrega={}", in_days(-1));

    let response = app(&db)
        .oneshot(post_form("/adicionar_tarefa", &form))
        .await
        .unwrap();
    let (status, _, body) = read_response(response).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("A data de entrega não pode ser no passado!"));
    assert_eq!(tarefa::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn can_edit_task_with_validation() {
    let db = setup().await.expect("Failed to setup test context");
    let task = insert_task(&db, "Original", Utc::now() + Duration::days(4), None).await;

    let response = app(&db)
        .oneshot(get(&format!("/editar_tarefa/{}", task.id)))
        .await
        .unwrap();
    let (status, _, body) = read_response(response).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("value=\"Original\""));

    let response = app(&db)
        .oneshot(post_form(
            &format!("/editar_tarefa/{}", task.id),
            "nome=Original&data_entrega=2000-01-01",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let form = format!("nome=Renomeada&descricao=nova&data_entrega={}", in_days(7));
    let response = app(&db)
        .oneshot(post_form(&format!("/editar_tarefa/{}", task.id), &form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let row = tarefa::Entity::find_by_id(task.id).one(&db).await.unwrap().unwrap();
    assert_eq!(row.name, "Renomeada");
    assert_eq!(row.description.as_deref(), Some("nova"));
}

#[tokio::test]
async fn can_return_not_found_when_editing_missing_task() {
    let db = setup().await.expect("Failed to setup test context");

    let response = app(&db).oneshot(get("/editar_tarefa/999")).await.unwrap();
    let (status, _, body) = read_response(response).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Tarefa não encontrada."));
}

#[tokio::test]
async fn can_complete_task_from_link() {
    let db = setup().await.expect("Failed to setup test context");
    let task = insert_task(&db, "Concluir", Utc::now() + Duration::days(4), None).await;

    let response = app(&db)
        .oneshot(get(&format!("/concluir_tarefa/{}", task.id)))
        .await
        .unwrap();
    let (status, headers, _) = read_response(response).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get("location").unwrap(), "/");
    let row = tarefa::Entity::find_by_id(task.id).one(&db).await.unwrap().unwrap();
    assert!(row.is_completed);
    assert!(row.completed_at.is_some());
}

#[tokio::test]
async fn can_return_not_found_when_deleting_missing_warranty() {
    let db = setup().await.expect("Failed to setup test context");
    insert_warranty(&db, "Fica", Utc::now() + Duration::days(40), None).await;

    let response = app(&db)
        .oneshot(post_form("/excluir_garantia/999", ""))
        .await
        .unwrap();
    let (status, _, body) = read_response(response).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Garantia não encontrada."));
    assert_eq!(garantia::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn can_delete_completed_task_and_return_to_history() {
    let db = setup().await.expect("Failed to setup test context");
    let task = insert_task(&db, "Antiga", Utc::now(), Some(Utc::now())).await;

    let response = app(&db)
        .oneshot(post_form(&format!("/excluir_tarefa/{}", task.id), ""))
        .await
        .unwrap();
    let (status, headers, _) = read_response(response).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get("location").unwrap(), "/historico");
    assert_eq!(tarefa::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn can_delete_pending_warranty_and_return_to_list() {
    let db = setup().await.expect("Failed to setup test context");
    let warranty = insert_warranty(&db, "Pendente", Utc::now() + Duration::days(90), None).await;

    let response = app(&db)
        .oneshot(post_form(&format!("/excluir_garantia/{}", warranty.id), ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/garantias");
}

#[tokio::test]
async fn can_check_health_endpoint() {
    let db = setup().await.expect("Failed to setup test context");

    let response = app(&db).oneshot(get("/health")).await.unwrap();
    let (status, _, body) = read_response(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn can_render_not_found_page_for_unknown_path() {
    let db = setup().await.expect("Failed to setup test context");

    let response = app(&db).oneshot(get("/nao-existe")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

async fn drop_task_table(db: &DatabaseConnection) {
    db.execute_unprepared("DROP TABLE tarefa")
        .await
        .expect("Failed to drop tarefa table");
}

#[tokio::test]
async fn can_rerender_form_with_500_when_create_cannot_be_saved() {
    let db = setup().await.expect("Failed to setup test context");
    drop_task_table(&db).await;
    let form = format!("nome=Perdida&data_entrega={}", in_days(5));

    let response = app(&db)
        .oneshot(post_form("/adicionar_tarefa", &form))
        .await
        .unwrap();
    let (status, headers, body) = read_response(response).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Não foi possível salvar as alterações."));
    assert!(body.contains("value=\"Perdida\""));
    assert!(headers.get("set-cookie").is_none());
}

#[tokio::test]
async fn can_redirect_with_failure_flash_when_complete_cannot_be_saved() {
    let db = setup().await.expect("Failed to setup test context");
    let task = insert_task(&db, "Quebrada", Utc::now() + Duration::days(4), None).await;
    drop_task_table(&db).await;

    let response = app(&db)
        .oneshot(get(&format!("/concluir_tarefa/{}", task.id)))
        .await
        .unwrap();
    let (status, headers, _) = read_response(response).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get("location").unwrap(), "/");
    let cookie = headers.get("set-cookie").unwrap().to_str().unwrap();
    assert!(cookie.starts_with("flash=persistence_failed"));
}

#[tokio::test]
async fn can_redirect_with_failure_flash_when_delete_cannot_be_saved() {
    let db = setup().await.expect("Failed to setup test context");
    let task = insert_task(&db, "Quebrada", Utc::now() + Duration::days(4), None).await;
    drop_task_table(&db).await;

    let response = app(&db)
        .oneshot(post_form(&format!("/excluir_tarefa/{}", task.id), ""))
        .await
        .unwrap();
    let (status, headers, _) = read_response(response).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get("location").unwrap(), "/");
    let cookie = headers.get("set-cookie").unwrap().to_str().unwrap();
    assert!(cookie.starts_with("flash=persistence_failed"));
}

#[tokio::test]
async fn can_show_failure_flash_after_redirect() {
    let db = setup().await.expect("Failed to setup test context");
    let request = axum::http::Request::builder()
        .uri("/garantias")
        .header("cookie", "flash=persistence_failed")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app(&db).oneshot(request).await.unwrap();
    let (status, _, body) = read_response(response).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("alert-danger"));
    assert!(body.contains("Não foi possível salvar as alterações."));
}

#[tokio::test]
async fn can_render_not_found_page_for_non_numeric_id() {
    let db = setup().await.expect("Failed to setup test context");

    for request in [
        get("/concluir_tarefa/abc"),
        get("/editar_garantia/abc"),
        post_form("/excluir_tarefa/abc", ""),
    ] {
        let response = app(&db).oneshot(request).await.unwrap();
        let (status, _, body) = read_response(response).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("não encontrada."));
    }
}
