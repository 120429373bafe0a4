mod task;

pub use task::*;

use crate::routing_utils::BasicErrorResponse;
use utoipa::OpenApi;

/// Collects the schemas of every DTO and error body so they can be merged into
/// the application's OpenAPI document
#[derive(OpenApi)]
#[openapi(components(
    schemas(NewTask, TodoTask),
    responses(BasicErrorResponse)
))]
pub struct OpenApiSchemas;
