use chrono::NaiveDate;
use serde::Deserialize;

use crate::features::regulatory_files::dtos::RegulatoryFileResponseDto;
use crate::features::regulatory_files::models::RegulatoryFileStatus;
use crate::shared::filters::{
    empty_as_none, matches_search, matches_value, sentinel_as_none, DateRange,
};

/// Regulatory file list filter bar state
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegulatoryFileFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "sentinel_as_none")]
    pub status: Option<RegulatoryFileStatus>,
    #[serde(rename = "startDate", default, deserialize_with = "sentinel_as_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate", default, deserialize_with = "sentinel_as_none")]
    pub end_date: Option<NaiveDate>,
}

impl RegulatoryFileFilter {
    pub fn matches(&self, file: &RegulatoryFileResponseDto) -> bool {
        matches_search(
            self.search.as_deref(),
            &[
                Some(file.file_number.as_str()),
                Some(file.establishment.name.as_str()),
            ],
        ) && matches_value(self.status.as_ref(), &file.status)
            && DateRange::new(self.start_date, self.end_date).contains(file.submission_date)
    }

    pub fn apply(&self, files: Vec<RegulatoryFileResponseDto>) -> Vec<RegulatoryFileResponseDto> {
        files.into_iter().filter(|f| self.matches(f)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::establishments::dtos::EstablishmentSummaryDto;
    use chrono::Utc;
    use uuid::Uuid;

    fn file(number: &str, status: RegulatoryFileStatus, submitted: NaiveDate) -> RegulatoryFileResponseDto {
        let now = Utc::now();
        RegulatoryFileResponseDto {
            id: Uuid::new_v4(),
            establishment: EstablishmentSummaryDto::new(Uuid::new_v4(), "Cinéma Le Rex".to_string()),
            file_number: number.to_string(),
            submission_date: submitted,
            deadline_date: None,
            status_label: status.label().to_string(),
            status_badge: status.badge(),
            status,
            notes: None,
            attachment_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn fixtures() -> Vec<RegulatoryFileResponseDto> {
        let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
        vec![
            file("AT-069-24-001", RegulatoryFileStatus::InProgress, d(1, 15)),
            file("PC-069-24-017", RegulatoryFileStatus::Archived, d(4, 2)),
        ]
    }

    #[test]
    fn test_all_sentinels_are_identity() {
        let f: RegulatoryFileFilter =
            serde_json::from_value(serde_json::json!({ "status": "all", "search": "" })).unwrap();
        assert_eq!(f.apply(fixtures()).len(), 2);
    }

    #[test]
    fn test_search_matches_file_number() {
        let f: RegulatoryFileFilter =
            serde_json::from_value(serde_json::json!({ "search": "pc-069" })).unwrap();
        let kept = f.apply(fixtures());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].file_number, "PC-069-24-017");
    }

    #[test]
    fn test_submission_date_bounds() {
        let f: RegulatoryFileFilter = serde_json::from_value(serde_json::json!({
            "startDate": "2024-01-15",
            "endDate": "2024-04-01"
        }))
        .unwrap();
        let kept = f.apply(fixtures());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].status, RegulatoryFileStatus::InProgress);
    }
}
