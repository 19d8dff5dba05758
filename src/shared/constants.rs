// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Full access, including user administration
pub const ROLE_ADMIN: &str = "admin";

/// Field consultant - plans visits, records commissions and writes reports
pub const ROLE_CONSULTANT: &str = "consultant";

// =============================================================================
// LIST LIMITS
// =============================================================================

/// Default number of activity log rows returned
pub const DEFAULT_ACTIVITY_LOG_LIMIT: i64 = 50;

/// Upper bound for the activity log `limit` parameter
pub const MAX_ACTIVITY_LOG_LIMIT: i64 = 500;

/// Visits shown in the dashboard "upcoming" card
pub const UPCOMING_VISITS_LIMIT: i64 = 3;

/// Prescriptions shown in the dashboard "urgent" card
pub const URGENT_PRESCRIPTIONS_LIMIT: i64 = 5;

// =============================================================================
// HTTP
// =============================================================================

/// Response header carrying the public URL of a freshly generated report
pub const REPORT_URL_HEADER: &str = "x-report-url";
