use serde::Deserialize;

use crate::features::tasks::dtos::TaskResponseDto;
use crate::features::tasks::models::{TaskPriority, TaskStatus};
use crate::shared::filters::{empty_as_none, matches_search, matches_value, sentinel_as_none};

/// Task list filter bar state
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "sentinel_as_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "sentinel_as_none")]
    pub status: Option<TaskStatus>,
    /// User id that must be among the assignees
    #[serde(default, deserialize_with = "sentinel_as_none")]
    pub assignee: Option<String>,
    /// Sent by the task page filter bar; tasks are not narrowed by it
    #[serde(default, deserialize_with = "sentinel_as_none")]
    pub establishment: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &TaskResponseDto) -> bool {
        let establishment = task.establishment.as_ref().map(|e| e.name.as_str());

        matches_search(
            self.search.as_deref(),
            &[
                Some(task.title.as_str()),
                task.description.as_deref(),
                establishment,
            ],
        ) && matches_value(self.priority.as_ref(), &task.priority)
            && matches_value(self.status.as_ref(), &task.status)
            && self
                .assignee
                .as_deref()
                .map_or(true, |id| task.assignees.iter().any(|a| a.id == id))
    }

    pub fn apply(&self, tasks: Vec<TaskResponseDto>) -> Vec<TaskResponseDto> {
        tasks.into_iter().filter(|t| self.matches(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::establishments::dtos::EstablishmentSummaryDto;
    use crate::features::tasks::models::{Task, TaskRow};
    use crate::features::users::dtos::UserSummaryDto;
    use chrono::Utc;
    use uuid::Uuid;

    fn task(
        title: &str,
        priority: TaskPriority,
        status: TaskStatus,
        assignees: &[&str],
    ) -> TaskResponseDto {
        let now = Utc::now();
        let establishment_id = Uuid::new_v4();
        let row = TaskRow {
            task: Task {
                id: Uuid::new_v4(),
                title: title.to_string(),
                description: Some("Voir avec le directeur".to_string()),
                priority,
                status,
                due_date: None,
                establishment_id: Some(establishment_id),
                created_at: now,
                updated_at: now,
            },
            establishment_name: Some("EHPAD Les Tilleuls".to_string()),
        };
        let assignees = assignees
            .iter()
            .map(|id| UserSummaryDto {
                id: id.to_string(),
                full_name: format!("User {}", id),
            })
            .collect();
        let dto = TaskResponseDto::assemble(row, assignees);
        assert_eq!(
            dto.establishment,
            Some(EstablishmentSummaryDto::new(
                establishment_id,
                "EHPAD Les Tilleuls".to_string()
            ))
        );
        dto
    }

    fn fixtures() -> Vec<TaskResponseDto> {
        vec![
            task("Commander les BAES", TaskPriority::P1, TaskStatus::Todo, &["u1"]),
            task("Planifier la visite", TaskPriority::P2, TaskStatus::InProgress, &["u2"]),
            task("Envoyer le rapport", TaskPriority::P1, TaskStatus::Done, &["u1", "u2"]),
        ]
    }

    fn filter(query: serde_json::Value) -> TaskFilter {
        serde_json::from_value(query).unwrap()
    }

    #[test]
    fn test_all_sentinels_are_identity() {
        let f = filter(serde_json::json!({
            "search": "",
            "priority": "all",
            "status": "all",
            "assignee": "all",
            "establishment": "all"
        }));
        assert_eq!(f.apply(fixtures()).len(), 3);
    }

    #[test]
    fn test_assignee_membership() {
        let kept = filter(serde_json::json!({ "assignee": "u1" })).apply(fixtures());
        let titles: Vec<&str> = kept.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Commander les BAES", "Envoyer le rapport"]);
        assert!(kept
            .iter()
            .all(|t| t.assignees.iter().any(|a| a.id == "u1")));
    }

    #[test]
    fn test_priority_and_status() {
        assert_eq!(
            filter(serde_json::json!({ "priority": "p1" }))
                .apply(fixtures())
                .len(),
            2
        );
        let kept = filter(serde_json::json!({ "status": "in_progress" })).apply(fixtures());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].status, TaskStatus::InProgress);
    }

    #[test]
    fn test_establishment_is_accepted_but_ignored() {
        let f = filter(serde_json::json!({
            "establishment": "6f1d7f8e-0000-4000-8000-000000000000"
        }));
        assert_eq!(f.apply(fixtures()).len(), 3);
    }

    #[test]
    fn test_search_covers_establishment_name() {
        let kept = filter(serde_json::json!({ "search": "tilleuls" })).apply(fixtures());
        assert_eq!(kept.len(), 3);
        let kept = filter(serde_json::json!({ "search": "rapport" })).apply(fixtures());
        assert_eq!(kept.len(), 1);
    }
}
