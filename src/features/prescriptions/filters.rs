use chrono::NaiveDate;
use serde::Deserialize;

use crate::features::prescriptions::dtos::PrescriptionResponseDto;
use crate::features::prescriptions::models::PrescriptionStatus;
use crate::shared::filters::{
    empty_as_none, matches_search, matches_value, sentinel_as_none, DateRange,
};

/// Prescription list filter bar state
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrescriptionFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "sentinel_as_none")]
    pub status: Option<PrescriptionStatus>,
    #[serde(rename = "startDate", default, deserialize_with = "sentinel_as_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate", default, deserialize_with = "sentinel_as_none")]
    pub end_date: Option<NaiveDate>,
}

impl PrescriptionFilter {
    /// Undated prescriptions pass both date bounds
    pub fn matches(&self, prescription: &PrescriptionResponseDto) -> bool {
        matches_search(
            self.search.as_deref(),
            &[
                Some(prescription.description.as_str()),
                Some(prescription.establishment.name.as_str()),
            ],
        ) && matches_value(self.status.as_ref(), &prescription.status)
            && DateRange::new(self.start_date, self.end_date).admits(prescription.due_date)
    }

    pub fn apply(&self, prescriptions: Vec<PrescriptionResponseDto>) -> Vec<PrescriptionResponseDto> {
        prescriptions
            .into_iter()
            .filter(|p| self.matches(p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::establishments::dtos::EstablishmentSummaryDto;
    use crate::features::prescriptions::models::PrescriptionSource;
    use chrono::Utc;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn prescription(
        description: &str,
        establishment: &str,
        status: PrescriptionStatus,
        due_date: Option<NaiveDate>,
    ) -> PrescriptionResponseDto {
        let now = Utc::now();
        PrescriptionResponseDto {
            id: Uuid::new_v4(),
            establishment: EstablishmentSummaryDto::new(Uuid::new_v4(), establishment.to_string()),
            commission: None,
            description: description.to_string(),
            status_label: status.label().to_string(),
            status_badge: status.badge(),
            status,
            source: PrescriptionSource::Internal,
            source_label: PrescriptionSource::Internal.label().to_string(),
            due_date,
            created_at: now,
            updated_at: now,
        }
    }

    fn fixtures() -> Vec<PrescriptionResponseDto> {
        vec![
            prescription(
                "Remplacer les extincteurs",
                "Lycée Victor Hugo",
                PrescriptionStatus::Todo,
                Some(date(2024, 3, 1)),
            ),
            prescription(
                "Afficher le plan d'évacuation",
                "Médiathèque",
                PrescriptionStatus::Done,
                Some(date(2024, 6, 30)),
            ),
            prescription(
                "Former le personnel",
                "Médiathèque",
                PrescriptionStatus::Todo,
                None,
            ),
        ]
    }

    fn filter(query: serde_json::Value) -> PrescriptionFilter {
        serde_json::from_value(query).unwrap()
    }

    #[test]
    fn test_sentinels_keep_everything() {
        let f = filter(serde_json::json!({
            "search": "", "status": "all", "startDate": "", "endDate": ""
        }));
        assert_eq!(f.apply(fixtures()).len(), 3);
    }

    #[test]
    fn test_status_filter() {
        let kept = filter(serde_json::json!({ "status": "todo" })).apply(fixtures());
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|p| p.status == PrescriptionStatus::Todo));
    }

    #[test]
    fn test_undated_prescriptions_pass_date_bounds() {
        let kept = filter(serde_json::json!({
            "startDate": "2024-03-01",
            "endDate": "2024-03-31"
        }))
        .apply(fixtures());

        let descriptions: Vec<&str> = kept.iter().map(|p| p.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec!["Remplacer les extincteurs", "Former le personnel"]
        );
    }

    #[test]
    fn test_search_covers_description_and_establishment() {
        assert_eq!(
            filter(serde_json::json!({ "search": "MÉDIATHÈQUE" }))
                .apply(fixtures())
                .len(),
            2
        );
        assert_eq!(
            filter(serde_json::json!({ "search": "extincteur" }))
                .apply(fixtures())
                .len(),
            1
        );
    }
}
