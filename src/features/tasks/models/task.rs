use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::types::BadgeVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "task_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    P1,
    P2,
    P3,
}

impl TaskPriority {
    pub fn label(&self) -> &'static str {
        match self {
            TaskPriority::P1 => "P1 - Urgent",
            TaskPriority::P2 => "P2 - Normal",
            TaskPriority::P3 => "P3 - Faible",
        }
    }

    pub fn badge(&self) -> BadgeVariant {
        match self {
            TaskPriority::P1 => BadgeVariant::Destructive,
            TaskPriority::P2 => BadgeVariant::Default,
            TaskPriority::P3 => BadgeVariant::Secondary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "À faire",
            TaskStatus::InProgress => "En cours",
            TaskStatus::Done => "Fait",
        }
    }

    pub fn badge(&self) -> BadgeVariant {
        match self {
            TaskStatus::Todo => BadgeVariant::Outline,
            TaskStatus::InProgress => BadgeVariant::Default,
            TaskStatus::Done => BadgeVariant::Secondary,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub establishment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    #[sqlx(flatten)]
    pub task: Task,
    pub establishment_name: Option<String>,
}

/// One assignment joined with the assignee's name
#[derive(Debug, Clone, FromRow)]
pub struct TaskAssigneeRow {
    pub task_id: Uuid,
    pub user_id: String,
    pub full_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_presentation() {
        assert_eq!(TaskPriority::P1.label(), "P1 - Urgent");
        assert_eq!(TaskPriority::P1.badge(), BadgeVariant::Destructive);
        assert_eq!(TaskPriority::P3.badge(), BadgeVariant::Secondary);
    }

    #[test]
    fn test_status_presentation() {
        assert_eq!(TaskStatus::Todo.badge(), BadgeVariant::Outline);
        assert_eq!(TaskStatus::InProgress.label(), "En cours");
        assert_eq!(TaskStatus::Done.badge(), BadgeVariant::Secondary);
    }
}
