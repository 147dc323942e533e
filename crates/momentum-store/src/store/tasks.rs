//! Task CRUD and priority-ordered listing.

use super::Store;
use chrono::NaiveDate;
use momentum_core::entities::{Priority, Task};
use momentum_core::error::MomentumError;

type TaskRow = (
    i64,            // id
    i64,            // user_id
    String,         // title
    String,         // description
    String,         // priority
    Option<String>, // due_date
    i64,            // completed
    String,         // created_at
);

const TASK_COLS: &str = "id, user_id, title, description, priority, due_date, completed, created_at";

pub(super) fn task_from_row(row: TaskRow) -> Task {
    Task {
        id: row.0,
        user_id: row.1,
        title: row.2,
        description: row.3,
        priority: row.4.parse().unwrap_or(Priority::Medium),
        due_date: row
            .5
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        completed: row.6 != 0,
        created_at: row.7,
    }
}

impl Store {
    /// Create a task (initially not completed).
    pub async fn create_task(
        &self,
        user_id: i64,
        title: &str,
        description: &str,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> Result<i64, MomentumError> {
        let result = sqlx::query(
            "INSERT INTO tasks (user_id, title, description, priority, due_date) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(priority.as_str())
        .bind(due_date.map(|d| d.format("%Y-%m-%d").to_string()))
        .execute(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("create task failed: {e}")))?;

        Ok(result.last_insert_rowid())
    }

    /// Get a single task by id.
    pub async fn task(&self, task_id: i64) -> Result<Option<Task>, MomentumError> {
        let row: Option<TaskRow> =
            sqlx::query_as(&format!("SELECT {TASK_COLS} FROM tasks WHERE id = ?"))
                .bind(task_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| MomentumError::Store(format!("get task failed: {e}")))?;

        Ok(row.map(task_from_row))
    }

    /// List a user's tasks by completion state, ordered by priority rank
    /// (high, medium, low, then anything unrecognized) and creation order.
    pub async fn list_tasks(
        &self,
        user_id: i64,
        completed: bool,
    ) -> Result<Vec<Task>, MomentumError> {
        let sql = format!(
            "SELECT {TASK_COLS} FROM tasks WHERE user_id = ? AND completed = ? \
             ORDER BY CASE priority \
               WHEN 'high' THEN 1 WHEN 'medium' THEN 2 WHEN 'low' THEN 3 ELSE 4 END, \
               created_at ASC, id ASC"
        );

        let rows: Vec<TaskRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(completed as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| MomentumError::Store(format!("list tasks failed: {e}")))?;

        Ok(rows.into_iter().map(task_from_row).collect())
    }

    /// One-way completion flip. Returns `false` if the id is unknown;
    /// completing an already-completed task is a successful no-op.
    pub async fn complete_task(&self, task_id: i64) -> Result<bool, MomentumError> {
        let result = sqlx::query("UPDATE tasks SET completed = 1 WHERE id = ?")
            .bind(task_id)
            .execute(&self.pool)
            .await
            .map_err(|e| MomentumError::Store(format!("complete task failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of completed tasks for a user.
    pub async fn count_completed_tasks(&self, user_id: i64) -> Result<i64, MomentumError> {
        let (n,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE user_id = ? AND completed = 1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| MomentumError::Store(format!("count tasks failed: {e}")))?;
        Ok(n)
    }
}
