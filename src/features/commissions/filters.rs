use chrono::NaiveDate;
use serde::Deserialize;

use crate::features::commissions::dtos::CommissionResponseDto;
use crate::features::commissions::models::{CommissionCategory, CommissionStatus};
use crate::shared::filters::{
    empty_as_none, matches_search, matches_value, sentinel_as_none, DateRange,
};

/// Commission list filter bar state
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommissionFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub search: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "sentinel_as_none")]
    pub category: Option<CommissionCategory>,
    #[serde(default, deserialize_with = "sentinel_as_none")]
    pub status: Option<CommissionStatus>,
    #[serde(rename = "startDate", default, deserialize_with = "sentinel_as_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate", default, deserialize_with = "sentinel_as_none")]
    pub end_date: Option<NaiveDate>,
}

impl CommissionFilter {
    pub fn matches(&self, commission: &CommissionResponseDto) -> bool {
        let responsible = commission.responsible.as_ref().map(|r| r.full_name.as_str());

        matches_search(
            self.search.as_deref(),
            &[Some(commission.establishment.name.as_str()), responsible],
        ) && matches_value(self.category.as_ref(), &commission.category)
            && matches_value(self.status.as_ref(), &commission.status)
            && DateRange::new(self.start_date, self.end_date).contains(commission.date)
    }

    pub fn apply(&self, commissions: Vec<CommissionResponseDto>) -> Vec<CommissionResponseDto> {
        commissions.into_iter().filter(|c| self.matches(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::commissions::models::{
        Commission, CommissionKind, CommissionOpinion, CommissionPurpose, CommissionRow,
        CommissionType,
    };
    use chrono::Utc;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn commission(
        establishment: &str,
        category: CommissionCategory,
        status: CommissionStatus,
        on: NaiveDate,
    ) -> CommissionResponseDto {
        let now = Utc::now();
        let row = CommissionRow {
            commission: Commission {
                id: Uuid::new_v4(),
                kind: CommissionKind::Safety,
                establishment_id: Uuid::new_v4(),
                date: on,
                commission_type: CommissionType::Arrondissement,
                purpose: CommissionPurpose::VisitePeriodique,
                opinion: CommissionOpinion::Favorable,
                category,
                status,
                responsible_id: Some("u1".to_string()),
                minutes_received: false,
                report_url: None,
                created_at: now,
                updated_at: now,
            },
            establishment_name: establishment.to_string(),
            establishment_address: "1 rue de la Paix".to_string(),
            responsible_name: Some("Lucie Bernard".to_string()),
        };
        CommissionResponseDto::assemble(row, Vec::new())
    }

    fn sample() -> Vec<CommissionResponseDto> {
        vec![
            commission(
                "Lycée Pasteur",
                CommissionCategory::Periodic,
                CommissionStatus::InProgress,
                date(2024, 1, 10),
            ),
            commission(
                "Hôpital Nord",
                CommissionCategory::Opening,
                CommissionStatus::ReportSent,
                date(2024, 2, 15),
            ),
            commission(
                "Cinéma Lumière",
                CommissionCategory::Periodic,
                CommissionStatus::Archived,
                date(2024, 3, 20),
            ),
        ]
    }

    fn ids(items: &[CommissionResponseDto]) -> Vec<Uuid> {
        items.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_all_sentinels_keep_everything() {
        let filter: CommissionFilter = serde_json::from_value(serde_json::json!({
            "search": "", "type": "all", "status": "all", "startDate": "", "endDate": ""
        }))
        .unwrap();

        let input = sample();
        let expected = ids(&input);
        assert_eq!(ids(&filter.apply(input)), expected);
    }

    #[test]
    fn test_type_periodic_keeps_exactly_periodic() {
        let filter: CommissionFilter = serde_json::from_value(serde_json::json!({
            "search": "", "type": "periodic", "status": "all", "startDate": "", "endDate": ""
        }))
        .unwrap();

        let input = sample();
        let expected: Vec<Uuid> = input
            .iter()
            .filter(|c| c.category == CommissionCategory::Periodic)
            .map(|c| c.id)
            .collect();

        let result = filter.apply(input);
        assert_eq!(result.len(), 2);
        assert_eq!(ids(&result), expected);
    }

    #[test]
    fn test_status_filter_keeps_only_that_status() {
        let filter = CommissionFilter {
            status: Some(CommissionStatus::ReportSent),
            ..Default::default()
        };
        let result = filter.apply(sample());
        assert_eq!(result.len(), 1);
        assert!(result
            .iter()
            .all(|c| c.status == CommissionStatus::ReportSent));
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let filter = CommissionFilter {
            start_date: Some(date(2024, 1, 10)),
            end_date: Some(date(2024, 2, 15)),
            ..Default::default()
        };
        let names: Vec<String> = filter
            .apply(sample())
            .into_iter()
            .map(|c| c.establishment.name)
            .collect();
        assert_eq!(names, vec!["Lycée Pasteur", "Hôpital Nord"]);
    }

    #[test]
    fn test_search_covers_establishment_and_responsible() {
        let by_establishment = CommissionFilter {
            search: Some("hôpital".to_string()),
            ..Default::default()
        };
        assert_eq!(by_establishment.apply(sample()).len(), 1);

        let by_responsible = CommissionFilter {
            search: Some("BERNARD".to_string()),
            ..Default::default()
        };
        assert_eq!(by_responsible.apply(sample()).len(), 3);
    }

    #[test]
    fn test_search_for_all_is_a_search_term() {
        let filter: CommissionFilter = serde_json::from_value(serde_json::json!({
            "search": "all", "type": "all", "status": "all"
        }))
        .unwrap();
        assert_eq!(filter.search.as_deref(), Some("all"));

        let mut input = sample();
        input.push(commission(
            "Salle polyvalente",
            CommissionCategory::Periodic,
            CommissionStatus::InProgress,
            date(2024, 4, 5),
        ));
        let names: Vec<String> = filter
            .apply(input)
            .into_iter()
            .map(|c| c.establishment.name)
            .collect();
        assert_eq!(names, vec!["Salle polyvalente"]);
    }
}
