use crate::routing_utils::Json;
use crate::{SharedData, api, logging};
use axum::Router;
use axum::routing::get;
use std::sync::Arc;

/// Static message served from the root of the API
pub const ROOT_MESSAGE: &str = "This is the main page. Try /doc to learn how it works";

/// Assembles every route the application serves, including the API documentation,
/// and wraps them in the request tracing layer
pub fn build_router(shared_data: Arc<SharedData>) -> Router {
    let router = Router::new()
        .route("/", get(root))
        .merge(api::todo::task_routes())
        .merge(api::swagger_main::build_documentation())
        .with_state(shared_data);

    logging::attach_tracing_http(router)
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Pointer to the API documentation", body = String),
    ),
)]
/// Tells visitors where to find the API documentation
pub async fn root() -> Json<&'static str> {
    Json(ROOT_MESSAGE)
}
