use crate::domain::todo::driving_ports::TaskPort;
use crate::external_connections::{
    ExternalConnectivity, TransactableExternalConnectivity, TransactionHandle,
};
use crate::routing_utils::{
    BasicErrorResponse, GenericErrorResponse, Json, Path, Query, TaskErrorResponse,
    task_id_from_path,
};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::get;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(list_tasks, create_task, get_task, update_task, delete_task),
    tags((name = "Tasks", description = "Manage to-do tasks"))
)]
/// Defines the OpenAPI documentation for the task API
pub struct TaskApi;
/// Constant used to group task endpoints in OpenAPI documentation
pub const TASK_API_GROUP: &str = "Tasks";

/// Adds routes under "/todo" to the application router
pub fn task_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/todo",
            get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let task_service = domain::todo::TaskService {};

                list_tasks(&mut ext_cxn, &task_service).await
            })
            .post(
                |State(app_state): AppState, Json(new_task): Json<dto::NewTask>| async move {
                    let task_service = domain::todo::TaskService {};

                    create_task(new_task, &app_state.ext_cxn, &task_service).await
                },
            ),
        )
        .route(
            "/todo/:id",
            get(
                |State(app_state): AppState, Path(task_id): Path<i64>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let task_service = domain::todo::TaskService {};

                    get_task(task_id, &mut ext_cxn, &task_service).await
                },
            )
            .put(
                |State(app_state): AppState,
                 Path(task_id): Path<i64>,
                 Query(update): Query<dto::UpdateTask>| async move {
                    let task_service = domain::todo::TaskService {};

                    update_task(task_id, update, &app_state.ext_cxn, &task_service).await
                },
            )
            .delete(
                |State(app_state): AppState, Path(task_id): Path<i64>| async move {
                    let task_service = domain::todo::TaskService {};

                    delete_task(task_id, &app_state.ext_cxn, &task_service).await
                },
            ),
        )
}

#[utoipa::path(
    get,
    path = "/todo",
    tag = TASK_API_GROUP,
    responses(
        (status = 200, description = "Every stored task", body = [dto::TodoTask]),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Retrieves every task
async fn list_tasks(
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<Json<Vec<dto::TodoTask>>, ErrorResponse> {
    info!("Listing tasks");
    let task_reader = persistence::db_todo_driven_ports::DbTaskReader;

    let tasks = task_service
        .all_tasks(&mut *ext_cxn, &task_reader)
        .await
        .map_err(TaskErrorResponse::from)?;

    Ok(Json(tasks.into_iter().map(dto::TodoTask::from).collect()))
}

#[utoipa::path(
    post,
    path = "/todo",
    tag = TASK_API_GROUP,
    request_body = dto::NewTask,
    responses(
        (status = 201, description = "Task was created", body = dto::TodoTask),
        (status = 422, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Creates a task, committing it in its own transaction
async fn create_task(
    new_task: dto::NewTask,
    ext_cxn: &impl TransactableExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<(StatusCode, Json<dto::TodoTask>), ErrorResponse> {
    info!("Creating task {new_task}");
    let domain_task = domain::todo::NewTask::from(new_task);
    let task_writer = persistence::db_todo_driven_ports::DbTaskWriter;

    let mut txn = ext_cxn
        .start_transaction()
        .await
        .map_err(GenericErrorResponse)?;
    let created_task = task_service
        .create_task(&domain_task, &mut txn, &task_writer)
        .await
        .map_err(TaskErrorResponse::from)?;
    txn.commit().await.map_err(GenericErrorResponse)?;

    Ok((StatusCode::CREATED, Json(created_task.into())))
}

#[utoipa::path(
    get,
    path = "/todo/{id}",
    tag = TASK_API_GROUP,
    params(("id" = i64, Path, description = "ID of the task to fetch")),
    responses(
        (status = 200, description = "The requested task", body = dto::TodoTask),
        (status = 404, response = BasicErrorResponse),
        (status = 422, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Retrieves a single task
async fn get_task(
    task_id: i64,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<Json<dto::TodoTask>, ErrorResponse> {
    info!("Fetching task {task_id}");
    let task_id = task_id_from_path(task_id)?;
    let task_reader = persistence::db_todo_driven_ports::DbTaskReader;

    let task = task_service
        .task_by_id(task_id, &mut *ext_cxn, &task_reader)
        .await
        .map_err(TaskErrorResponse::from)?;

    Ok(Json(task.into()))
}

#[utoipa::path(
    put,
    path = "/todo/{id}",
    tag = TASK_API_GROUP,
    params(
        ("id" = i64, Path, description = "ID of the task to update"),
        dto::UpdateTask,
    ),
    responses(
        (status = 200, description = "The updated task", body = dto::TodoTask),
        (status = 404, response = BasicErrorResponse),
        (status = 422, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Replaces the content of a task
async fn update_task(
    task_id: i64,
    update: dto::UpdateTask,
    ext_cxn: &impl TransactableExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<Json<dto::TodoTask>, ErrorResponse> {
    info!("Updating task {task_id}");
    let task_id = task_id_from_path(task_id)?;
    let domain_update = domain::todo::UpdateTask::from(update);
    let task_writer = persistence::db_todo_driven_ports::DbTaskWriter;

    let mut txn = ext_cxn
        .start_transaction()
        .await
        .map_err(GenericErrorResponse)?;
    let updated_task = task_service
        .update_task(task_id, &domain_update, &mut txn, &task_writer)
        .await
        .map_err(TaskErrorResponse::from)?;
    txn.commit().await.map_err(GenericErrorResponse)?;

    Ok(Json(updated_task.into()))
}

#[utoipa::path(
    delete,
    path = "/todo/{id}",
    tag = TASK_API_GROUP,
    params(("id" = i64, Path, description = "ID of the task to delete")),
    responses(
        (status = 204, description = "Task was deleted"),
        (status = 404, response = BasicErrorResponse),
        (status = 422, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Deletes a task
async fn delete_task(
    task_id: i64,
    ext_cxn: &impl TransactableExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<StatusCode, ErrorResponse> {
    info!("Deleting task {task_id}");
    let task_id = task_id_from_path(task_id)?;
    let task_writer = persistence::db_todo_driven_ports::DbTaskWriter;

    let mut txn = ext_cxn
        .start_transaction()
        .await
        .map_err(GenericErrorResponse)?;
    task_service
        .delete_task(task_id, &mut txn, &task_writer)
        .await
        .map_err(TaskErrorResponse::from)?;
    txn.commit().await.map_err(GenericErrorResponse)?;

    Ok(StatusCode::NO_CONTENT)
}
