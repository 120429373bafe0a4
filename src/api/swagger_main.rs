use crate::dto;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Where the interactive documentation is served. The root endpoint points visitors here.
pub const DOCS_PATH: &str = "/doc";
/// Where the raw OpenAPI document is served
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "To-Do API",
        description = "Create, read, update, and delete to-do tasks"
    ),
    paths(crate::routes::root)
)]
struct TodoApi;

/// Builds the complete OpenAPI document by merging in definitions from other parts of the app,
/// such as the [dto] package and submodules of [api][crate::api]
pub fn openapi_document() -> utoipa::openapi::OpenApi {
    let mut api_docs = TodoApi::openapi();
    api_docs.merge(dto::OpenApiSchemas::openapi());
    api_docs.merge(super::todo::TaskApi::openapi());

    api_docs
}

/// Constructs the route on the API that renders the swagger UI and returns the OpenAPI schema
pub fn build_documentation() -> SwaggerUi {
    SwaggerUi::new(DOCS_PATH).url(OPENAPI_JSON_PATH, openapi_document())
}
