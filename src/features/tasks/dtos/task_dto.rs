use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::establishments::dtos::EstablishmentSummaryDto;
use crate::features::tasks::models::{TaskPriority, TaskRow, TaskStatus};
use crate::features::users::dtos::UserSummaryDto;
use crate::shared::types::BadgeVariant;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub priority_label: String,
    pub priority_badge: BadgeVariant,
    pub status: TaskStatus,
    pub status_label: String,
    pub status_badge: BadgeVariant,
    pub due_date: Option<NaiveDate>,
    pub establishment: Option<EstablishmentSummaryDto>,
    pub assignees: Vec<UserSummaryDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskResponseDto {
    pub fn assemble(row: TaskRow, assignees: Vec<UserSummaryDto>) -> Self {
        let TaskRow {
            task: t,
            establishment_name,
        } = row;

        let establishment = match (t.establishment_id, establishment_name) {
            (Some(id), Some(name)) => Some(EstablishmentSummaryDto::new(id, name)),
            _ => None,
        };

        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            priority_label: t.priority.label().to_string(),
            priority_badge: t.priority.badge(),
            priority: t.priority,
            status_label: t.status.label().to_string(),
            status_badge: t.status.badge(),
            status: t.status,
            due_date: t.due_date,
            establishment,
            assignees,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Kanban columns
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TaskBoardDto {
    pub todo: Vec<TaskResponseDto>,
    pub in_progress: Vec<TaskResponseDto>,
    pub done: Vec<TaskResponseDto>,
}

impl TaskBoardDto {
    /// Split tasks into columns, keeping their relative order
    pub fn from_tasks(tasks: Vec<TaskResponseDto>) -> Self {
        let mut board = Self::default();
        for task in tasks {
            match task.status {
                TaskStatus::Todo => board.todo.push(task),
                TaskStatus::InProgress => board.in_progress.push(task),
                TaskStatus::Done => board.done.push(task),
            }
        }
        board
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTaskDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    pub establishment_id: Option<Uuid>,
    #[validate(length(min = 1, message = "At least one assignee is required"))]
    pub assignee_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    pub establishment_id: Option<Uuid>,
    /// Replaces every assignment when present
    #[validate(length(min = 1, message = "At least one assignee is required"))]
    pub assignee_ids: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_an_assignee() {
        let dto: CreateTaskDto = serde_json::from_value(serde_json::json!({
            "title": "Relancer le bureau de contrôle",
            "assignee_ids": []
        }))
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_may_leave_assignees_alone() {
        let dto: UpdateTaskDto =
            serde_json::from_value(serde_json::json!({ "status": "done" })).unwrap();
        assert!(dto.validate().is_ok());

        let dto: UpdateTaskDto =
            serde_json::from_value(serde_json::json!({ "assignee_ids": [] })).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_board_splits_by_status_keeping_order() {
        use crate::features::tasks::models::Task;

        let task = |title: &str, status: TaskStatus| {
            let now = Utc::now();
            TaskResponseDto::assemble(
                TaskRow {
                    task: Task {
                        id: Uuid::new_v4(),
                        title: title.to_string(),
                        description: None,
                        priority: TaskPriority::P2,
                        status,
                        due_date: None,
                        establishment_id: None,
                        created_at: now,
                        updated_at: now,
                    },
                    establishment_name: None,
                },
                Vec::new(),
            )
        };

        let board = TaskBoardDto::from_tasks(vec![
            task("a", TaskStatus::Done),
            task("b", TaskStatus::Todo),
            task("c", TaskStatus::Todo),
            task("d", TaskStatus::InProgress),
        ]);

        let todo: Vec<&str> = board.todo.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(todo, vec!["b", "c"]);
        assert_eq!(board.in_progress.len(), 1);
        assert_eq!(board.done[0].title, "a");
    }
}
