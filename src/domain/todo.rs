use crate::domain::todo::driven_ports::{TaskReader, TaskWriter};
use crate::domain::todo::driving_ports::TaskError;
use crate::external_connections::ExternalConnectivity;
use anyhow::Context;

/// A to-do item as it exists in the system
#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct TodoTask {
    pub id: i32,
    pub task: String,
}

/// Everything needed to create a task. The ID is assigned by persistence.
#[derive(Debug)]
#[cfg_attr(test, derive(Clone, PartialEq, Eq))]
pub struct NewTask {
    pub task: String,
}

/// Replacement content for an existing task
#[derive(Debug)]
#[cfg_attr(test, derive(Clone, PartialEq, Eq))]
pub struct UpdateTask {
    pub task: String,
}

pub mod driven_ports {
    use super::*;

    pub trait TaskReader {
        async fn all_tasks(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<TodoTask>, anyhow::Error>;
        async fn task_by_id(
            &self,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<TodoTask>, anyhow::Error>;
    }

    pub trait TaskWriter {
        async fn create_task(
            &self,
            new_task: &NewTask,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<TodoTask, anyhow::Error>;

        /// Overwrites the content of a task, producing the updated task or [None] if
        /// no task had the given ID
        async fn update_task(
            &self,
            task_id: i32,
            update: &UpdateTask,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<TodoTask>, anyhow::Error>;

        /// Removes a task, returning false if there was nothing to remove
        async fn delete_task(
            &self,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum TaskError {
        #[error("task {0} does not exist")]
        NotFound(i32),
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }


    pub trait TaskPort {
        async fn all_tasks(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            task_read: &impl driven_ports::TaskReader,
        ) -> Result<Vec<TodoTask>, TaskError>;
        async fn task_by_id(
            &self,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            task_read: &impl driven_ports::TaskReader,
        ) -> Result<TodoTask, TaskError>;
        async fn create_task(
            &self,
            task: &NewTask,
            ext_cxn: &mut impl ExternalConnectivity,
            task_write: &impl driven_ports::TaskWriter,
        ) -> Result<TodoTask, TaskError>;
        async fn update_task(
            &self,
            task_id: i32,
            update: &UpdateTask,
            ext_cxn: &mut impl ExternalConnectivity,
            task_write: &impl driven_ports::TaskWriter,
        ) -> Result<TodoTask, TaskError>;
        async fn delete_task(
            &self,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            task_write: &impl driven_ports::TaskWriter,
        ) -> Result<(), TaskError>;
    }
}

pub struct TaskService {}

impl driving_ports::TaskPort for TaskService {
    async fn all_tasks(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        task_read: &impl TaskReader,
    ) -> Result<Vec<TodoTask>, TaskError> {
        let tasks = task_read
            .all_tasks(&mut *ext_cxn)
            .await
            .context("listing tasks")?;

        Ok(tasks)
    }

    async fn task_by_id(
        &self,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        task_read: &impl TaskReader,
    ) -> Result<TodoTask, TaskError> {
        task_read
            .task_by_id(task_id, &mut *ext_cxn)
            .await
            .context("fetching a task by ID")?
            .ok_or(TaskError::NotFound(task_id))
    }

    async fn create_task(
        &self,
        task: &NewTask,
        ext_cxn: &mut impl ExternalConnectivity,
        task_write: &impl TaskWriter,
    ) -> Result<TodoTask, TaskError> {
        let created_task = task_write
            .create_task(task, &mut *ext_cxn)
            .await
            .context("creating a task")?;

        Ok(created_task)
    }

    async fn update_task(
        &self,
        task_id: i32,
        update: &UpdateTask,
        ext_cxn: &mut impl ExternalConnectivity,
        task_write: &impl TaskWriter,
    ) -> Result<TodoTask, TaskError> {
        task_write
            .update_task(task_id, update, &mut *ext_cxn)
            .await
            .context("updating a task")?
            .ok_or(TaskError::NotFound(task_id))
    }

    async fn delete_task(
        &self,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        task_write: &impl TaskWriter,
    ) -> Result<(), TaskError> {
        let deleted = task_write
            .delete_task(task_id, &mut *ext_cxn)
            .await
            .context("deleting a task")?;

        if deleted {
            Ok(())
        } else {
            Err(TaskError::NotFound(task_id))
        }
    }
}
