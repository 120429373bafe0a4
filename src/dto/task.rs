use crate::domain;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// DTO for creating a new task via the API
#[derive(Deserialize, Display, ToSchema)]
#[display("\"{task}\"")]
#[cfg_attr(test, derive(Serialize, Debug))]
pub struct NewTask {
    /// Content of the task. The storage column holds at most 256 characters
    #[schema(example = "buy milk")]
    pub task: String,
}

impl From<NewTask> for domain::todo::NewTask {
    fn from(value: NewTask) -> Self {
        domain::todo::NewTask { task: value.task }
    }
}

/// DTO for a returned task on the API
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug, PartialEq, Eq))]
pub struct TodoTask {
    #[schema(example = 10)]
    pub id: i32,
    #[schema(example = "buy milk")]
    pub task: String,
}

impl From<domain::todo::TodoTask> for TodoTask {
    fn from(value: domain::todo::TodoTask) -> Self {
        TodoTask {
            id: value.id,
            task: value.task,
        }
    }
}

/// Query parameters for replacing a task's content. Unlike [NewTask], the new content
/// arrives in the query string rather than the request body.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpdateTask {
    /// Replacement content for the task
    #[param(example = "new value")]
    pub task: String,
}

impl From<UpdateTask> for domain::todo::UpdateTask {
    fn from(value: UpdateTask) -> Self {
        domain::todo::UpdateTask { task: value.task }
    }
}
