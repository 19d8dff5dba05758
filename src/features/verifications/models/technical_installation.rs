use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Regulation an installation is checked under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "regulation_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RegulationType {
    Erp,
    WorkCode,
}

impl RegulationType {
    pub fn label(&self) -> &'static str {
        match self {
            RegulationType::Erp => "ERP",
            RegulationType::WorkCode => "Code du Travail",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TechnicalInstallation {
    pub id: Uuid,
    pub name: String,
    pub regulation_type: RegulationType,
    pub verification_period_months: i32,
    pub created_at: DateTime<Utc>,
}

impl TechnicalInstallation {
    /// Date the next check falls due after a check on `from`
    pub fn next_due(&self, from: NaiveDate) -> Option<NaiveDate> {
        let months = u32::try_from(self.verification_period_months).ok()?;
        from.checked_add_months(Months::new(months))
    }
}
