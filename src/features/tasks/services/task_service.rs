use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{db_error, AppError, Result};
use crate::features::tasks::dtos::{CreateTaskDto, TaskResponseDto, UpdateTaskDto};
use crate::features::tasks::models::{TaskAssigneeRow, TaskPriority, TaskRow, TaskStatus};
use crate::features::users::dtos::UserSummaryDto;

const SELECT_TASK_ROWS: &str = r#"
    SELECT t.*, e.name AS establishment_name
    FROM tasks t
    LEFT JOIN establishments e ON e.id = t.establishment_id
"#;

pub struct TaskService {
    pool: PgPool,
}

impl TaskService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All tasks by due date (undated last), with establishment and assignees
    pub async fn list(&self) -> Result<Vec<TaskResponseDto>> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "{} ORDER BY t.due_date ASC NULLS LAST, t.created_at",
            SELECT_TASK_ROWS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list tasks"))?;

        debug!("Fetched {} tasks", rows.len());
        self.with_assignees(rows).await
    }

    pub async fn list_by_establishment(&self, establishment_id: Uuid) -> Result<Vec<TaskResponseDto>> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "{} WHERE t.establishment_id = $1 ORDER BY t.due_date ASC NULLS LAST, t.created_at",
            SELECT_TASK_ROWS
        ))
        .bind(establishment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list establishment tasks"))?;

        self.with_assignees(rows).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<TaskResponseDto> {
        let row = sqlx::query_as::<_, TaskRow>(&format!("{} WHERE t.id = $1", SELECT_TASK_ROWS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to get task"))?
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))?;

        self.with_assignees(vec![row])
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))
    }

    async fn with_assignees(&self, rows: Vec<TaskRow>) -> Result<Vec<TaskResponseDto>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.task.id).collect();
        let assignments = sqlx::query_as::<_, TaskAssigneeRow>(
            r#"
            SELECT a.task_id, a.user_id, u.full_name
            FROM task_assignments a
            JOIN users u ON u.id = a.user_id
            WHERE a.task_id = ANY($1)
            ORDER BY u.full_name
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load task assignees"))?;

        Ok(assemble(rows, assignments))
    }

    /// Insert the task and its assignments atomically
    pub async fn create(&self, dto: CreateTaskDto) -> Result<TaskResponseDto> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO tasks (title, description, priority, status, due_date, establishment_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(dto.priority.unwrap_or(TaskPriority::P2))
        .bind(dto.status.unwrap_or(TaskStatus::Todo))
        .bind(dto.due_date)
        .bind(dto.establishment_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to create task"))?;

        insert_assignments(&mut tx, id, &dto.assignee_ids).await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit task creation"))?;

        info!(
            "Task created: id={}, assignees={}",
            id,
            dto.assignee_ids.len()
        );
        self.get_by_id(id).await
    }

    /// Update fields and, when given, replace the assignee set in one transaction
    pub async fn update(&self, id: Uuid, dto: UpdateTaskDto) -> Result<TaskResponseDto> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                priority = COALESCE($4, priority),
                status = COALESCE($5, status),
                due_date = COALESCE($6, due_date),
                establishment_id = COALESCE($7, establishment_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(dto.title.as_deref().map(str::trim))
        .bind(&dto.description)
        .bind(dto.priority)
        .bind(dto.status)
        .bind(dto.due_date)
        .bind(dto.establishment_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to update task"))?;

        if updated.is_none() {
            return Err(AppError::NotFound(format!("Task {} not found", id)));
        }

        if let Some(assignee_ids) = &dto.assignee_ids {
            sqlx::query("DELETE FROM task_assignments WHERE task_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to clear task assignments"))?;

            insert_assignments(&mut tx, id, assignee_ids).await?;
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit task update"))?;

        info!(
            "Task updated: id={}, assignees_replaced={}",
            id,
            dto.assignee_ids.is_some()
        );
        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete task"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Task {} not found", id)));
        }

        info!("Task deleted: id={}", id);
        Ok(())
    }
}

async fn insert_assignments(
    tx: &mut Transaction<'_, Postgres>,
    task_id: Uuid,
    assignee_ids: &[String],
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO task_assignments (task_id, user_id)
        SELECT $1, UNNEST($2::text[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(task_id)
    .bind(assignee_ids)
    .execute(&mut **tx)
    .await
    .map_err(db_error("Failed to assign task"))?;

    Ok(())
}

fn assemble(rows: Vec<TaskRow>, assignments: Vec<TaskAssigneeRow>) -> Vec<TaskResponseDto> {
    let mut by_task: HashMap<Uuid, Vec<UserSummaryDto>> = HashMap::new();
    for a in assignments {
        by_task.entry(a.task_id).or_default().push(UserSummaryDto {
            id: a.user_id,
            full_name: a.full_name,
        });
    }

    rows.into_iter()
        .map(|row| {
            let assignees = by_task.remove(&row.task.id).unwrap_or_default();
            TaskResponseDto::assemble(row, assignees)
        })
        .collect()
}
