use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_macros::{FromRequest, FromRequestParts};
use serde::Serialize;
use tracing::error;
use utoipa::ToResponse;

use crate::domain::todo::driving_ports::TaskError;

/// Message returned whenever a task ID doesn't match any stored task
pub const NOT_FOUND_DETAIL: &str = "There is no one item with this id";

/// Contains diagnostic information about an API failure
#[derive(Serialize, Debug, ToResponse)]
#[response(
    description = "Diagnostic information about a failed request",
    examples(
        ("Not Found" = (
            summary = "Task could not be found (404)",
            value = json!({
                "error_code": "not_found",
                "detail": "There is no one item with this id",
                "extra_info": null
            })
        )),

        ("Internal Failure" = (
            summary = "Something unexpected went wrong inside the server (500)",
            value = json!({
                "error_code": "internal_error",
                "detail": "Could not access data to complete your request",
                "extra_info": null
            })
        )),

        ("Invalid Path" = (
            summary = "Task ID in the URL wasn't an integer (422)",
            value = json!({
                "error_code": "invalid_path",
                "detail": "A path parameter had the wrong type.",
                "extra_info": "Invalid URL: Cannot parse `abc` to a `i64`"
            })
        )),

        ("Malformed JSON" = (
            summary = "Invalid JSON passed to server (422)",
            value = json!({
                "error_code": "invalid_json",
                "detail": "The passed request body contained malformed or unreadable JSON.",
                "extra_info": "Failed to deserialize the JSON body into the target type: missing field `task` at line 1 column 2"
            })
        ))
    )
)]
pub struct BasicErrorResponse {
    error_code: String,
    detail: String,
    extra_info: Option<String>,
}

impl BasicErrorResponse {
    fn new(error_code: &str, detail: &str, extra_info: Option<String>) -> Self {
        BasicErrorResponse {
            error_code: error_code.into(),
            detail: detail.into(),
            extra_info,
        }
    }
}

/// Response type that turns task operation failures into [BasicErrorResponse]s
#[derive(Debug)]
pub enum TaskErrorResponse {
    NotFound,
    InternalFailure,
}

impl IntoResponse for TaskErrorResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(BasicErrorResponse::new("not_found", NOT_FOUND_DETAIL, None)),
            )
                .into_response(),

            Self::InternalFailure => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BasicErrorResponse::new(
                    "internal_error",
                    "Could not access data to complete your request",
                    None,
                )),
            )
                .into_response(),
        }
    }
}

impl From<TaskError> for TaskErrorResponse {
    fn from(value: TaskError) -> Self {
        match value {
            // A missing task is an expected outcome, so it isn't logged as a failure
            TaskError::NotFound(_) => Self::NotFound,
            TaskError::PortError(err) => {
                error!("Task operation failed: {err:#}");
                Self::InternalFailure
            }
        }
    }
}

/// Narrows a task ID taken from the URL to the range the tasks table can store. An ID
/// outside that range can't belong to any task, so it's reported like any other missing task.
pub fn task_id_from_path(raw_id: i64) -> Result<i32, TaskErrorResponse> {
    i32::try_from(raw_id).map_err(|_| TaskErrorResponse::NotFound)
}

/// Response type for failures that happen outside of business logic, like being unable
/// to start or commit a transaction
pub struct GenericErrorResponse(pub anyhow::Error);

impl IntoResponse for GenericErrorResponse {
    fn into_response(self) -> Response {
        error!("Request failed: {:#}", self.0);
        TaskErrorResponse::InternalFailure.into_response()
    }
}

/// Wrapper for [axum::Json] which customizes the error response to use our
/// data structure for API errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(JsonErrorResponse))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Response type representing JSON parse errors
pub struct JsonErrorResponse {
    parse_problem: String,
}

impl From<JsonRejection> for JsonErrorResponse {
    fn from(value: JsonRejection) -> Self {
        JsonErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(BasicErrorResponse::new(
                "invalid_json",
                "The passed request body contained malformed or unreadable JSON.",
                Some(self.parse_problem),
            )),
        )
            .into_response()
    }
}

/// Wrapper for [axum::extract::Path] which reports unparseable path segments with our
/// data structure for API errors
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(PathErrorResponse))]
pub struct Path<T>(pub T);

/// Response type representing path parameters that couldn't be parsed
pub struct PathErrorResponse {
    parse_problem: String,
}

impl From<PathRejection> for PathErrorResponse {
    fn from(value: PathRejection) -> Self {
        PathErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for PathErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(BasicErrorResponse::new(
                "invalid_path",
                "A path parameter had the wrong type.",
                Some(self.parse_problem),
            )),
        )
            .into_response()
    }
}

/// Wrapper for [axum::extract::Query] which reports missing or malformed query
/// parameters with our data structure for API errors
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(QueryErrorResponse))]
pub struct Query<T>(pub T);

/// Response type representing query strings that couldn't be parsed
pub struct QueryErrorResponse {
    parse_problem: String,
}

impl From<QueryRejection> for QueryErrorResponse {
    fn from(value: QueryRejection) -> Self {
        QueryErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for QueryErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(BasicErrorResponse::new(
                "invalid_query",
                "A query parameter was missing or had the wrong type.",
                Some(self.parse_problem),
            )),
        )
            .into_response()
    }
}
