use crate::domain;
use crate::domain::todo::{NewTask, TodoTask, UpdateTask};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use sqlx::{FromRow, query, query_as};

pub struct DbTaskReader;

#[derive(FromRow)]
struct TodoItemRow {
    id: i32,
    task: String,
}

impl From<TodoItemRow> for domain::todo::TodoTask {
    fn from(value: TodoItemRow) -> Self {
        TodoTask {
            id: value.id,
            task: value.task,
        }
    }
}

impl domain::todo::driven_ports::TaskReader for DbTaskReader {
    async fn all_tasks(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Vec<TodoTask>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todo_items: Vec<TodoTask> =
            query_as::<_, TodoItemRow>("SELECT t.id, t.task FROM tasks t ORDER BY t.id")
                .fetch_all(cxn.borrow_connection())
                .await
                .context("trying to fetch all todo items")?
                .into_iter()
                .map(domain::todo::TodoTask::from)
                .collect();

        Ok(todo_items)
    }

    async fn task_by_id(
        &self,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<TodoTask>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todo_item: Option<TodoTask> =
            query_as::<_, TodoItemRow>("SELECT t.id, t.task FROM tasks t WHERE t.id = $1")
                .bind(task_id)
                .fetch_optional(cxn.borrow_connection())
                .await
                .context("trying to fetch a todo item by ID")?
                .map(domain::todo::TodoTask::from);

        Ok(todo_item)
    }
}

pub struct DbTaskWriter;

impl domain::todo::driven_ports::TaskWriter for DbTaskWriter {
    async fn create_task(
        &self,
        new_task: &NewTask,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<TodoTask, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let inserted = query_as::<_, TodoItemRow>(
            "INSERT INTO tasks(task) VALUES ($1) RETURNING tasks.id, tasks.task",
        )
        .bind(&new_task.task)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new task into the database")?;

        Ok(inserted.into())
    }

    async fn update_task(
        &self,
        task_id: i32,
        update: &UpdateTask,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<TodoTask>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let updated = query_as::<_, TodoItemRow>(
            "UPDATE tasks SET task = $1 WHERE id = $2 RETURNING tasks.id, tasks.task",
        )
        .bind(&update.task)
        .bind(task_id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to update a task in the database")?
        .map(domain::todo::TodoTask::from);

        Ok(updated)
    }

    async fn delete_task(
        &self,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let delete_result = query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove a task from the database")?;

        Ok(delete_result.rows_affected() > 0)
    }
}
