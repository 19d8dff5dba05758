use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::commissions::{
    dtos as commissions_dtos, handlers as commissions_handlers, models as commissions_models,
};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::establishments::{
    dtos as establishments_dtos, handlers as establishments_handlers,
};
use crate::features::files::{
    dtos as files_dtos, handlers as files_handlers, models as files_models,
};
use crate::features::groupings::{dtos as groupings_dtos, handlers as groupings_handlers};
use crate::features::prescriptions::{
    dtos as prescriptions_dtos, handlers as prescriptions_handlers, models as prescriptions_models,
};
use crate::features::regulatory_files::{
    dtos as regulatory_files_dtos, handlers as regulatory_files_handlers,
    models as regulatory_files_models,
};
use crate::features::tasks::{
    dtos as tasks_dtos, handlers as tasks_handlers, models as tasks_models,
};
use crate::features::users::{
    dtos as users_dtos, handlers as users_handlers, models as users_models,
};
use crate::features::verifications::{
    dtos as verifications_dtos, handlers as verifications_handlers, models as verifications_models,
};
use crate::features::visits::{
    dtos as visits_dtos, handlers as visits_handlers, models as visits_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Establishments
        establishments_handlers::establishment_handler::list_establishments,
        establishments_handlers::establishment_handler::get_establishment,
        establishments_handlers::establishment_handler::create_establishment,
        establishments_handlers::establishment_handler::update_establishment,
        establishments_handlers::establishment_handler::list_contacts,
        establishments_handlers::establishment_handler::get_overview,
        // Groupings
        groupings_handlers::grouping_handler::list_groupings,
        groupings_handlers::grouping_handler::get_grouping,
        // Commissions
        commissions_handlers::commission_handler::list_commissions,
        commissions_handlers::commission_handler::list_establishment_commissions,
        commissions_handlers::commission_handler::get_commission,
        commissions_handlers::commission_handler::create_commission,
        commissions_handlers::commission_handler::update_commission,
        commissions_handlers::commission_handler::delete_commission,
        commissions_handlers::commission_handler::create_commission_prescription,
        commissions_handlers::commission_handler::update_commission_prescription,
        commissions_handlers::commission_handler::delete_commission_prescription,
        // Prescriptions
        prescriptions_handlers::prescription_handler::list_prescriptions,
        prescriptions_handlers::prescription_handler::list_establishment_prescriptions,
        prescriptions_handlers::prescription_handler::create_prescription,
        prescriptions_handlers::prescription_handler::update_prescription,
        prescriptions_handlers::prescription_handler::delete_prescription,
        // Regulatory files
        regulatory_files_handlers::regulatory_file_handler::list_regulatory_files,
        regulatory_files_handlers::regulatory_file_handler::list_establishment_regulatory_files,
        regulatory_files_handlers::regulatory_file_handler::create_regulatory_file,
        regulatory_files_handlers::regulatory_file_handler::update_regulatory_file,
        // Verifications
        verifications_handlers::verification_handler::list_installations,
        verifications_handlers::verification_handler::create_installation,
        verifications_handlers::verification_handler::list_verifications,
        verifications_handlers::verification_handler::list_establishment_verifications,
        verifications_handlers::verification_handler::create_verification,
        verifications_handlers::verification_handler::update_verification,
        // Visits
        visits_handlers::visit_handler::list_visits,
        visits_handlers::visit_handler::list_establishment_visits,
        visits_handlers::visit_handler::create_visit,
        visits_handlers::visit_handler::update_visit,
        visits_handlers::visit_handler::delete_visit,
        visits_handlers::visit_report_handler::generate_visit_report,
        visits_handlers::visit_report_handler::list_visit_reports,
        // Tasks
        tasks_handlers::task_handler::list_tasks,
        tasks_handlers::task_handler::get_task_board,
        tasks_handlers::task_handler::list_establishment_tasks,
        tasks_handlers::task_handler::create_task,
        tasks_handlers::task_handler::update_task,
        tasks_handlers::task_handler::delete_task,
        // Users
        users_handlers::user_handler::list_users,
        users_handlers::user_handler::create_user,
        users_handlers::user_handler::update_user,
        users_handlers::user_handler::grant_access,
        users_handlers::user_handler::revoke_access,
        users_handlers::user_handler::list_consultants,
        users_handlers::user_handler::list_task_assignees,
        users_handlers::activity_log_handler::list_activity_logs,
        users_handlers::activity_log_handler::create_activity_log,
        // Dashboard
        dashboard_handlers::dashboard_handler::get_stats,
        dashboard_handlers::dashboard_handler::get_upcoming_visits,
        dashboard_handlers::dashboard_handler::get_urgent_prescriptions,
        // Files
        files_handlers::file_handler::upload_file,
        files_handlers::file_handler::delete_file_by_url,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Establishments
            establishments_dtos::EstablishmentSummaryDto,
            establishments_dtos::GroupingRefDto,
            establishments_dtos::EstablishmentResponseDto,
            establishments_dtos::EstablishmentDetailDto,
            establishments_dtos::CreateEstablishmentDto,
            establishments_dtos::UpdateEstablishmentDto,
            establishments_dtos::ContactResponseDto,
            establishments_dtos::EstablishmentOverviewDto,
            ApiResponse<Vec<establishments_dtos::EstablishmentResponseDto>>,
            ApiResponse<establishments_dtos::EstablishmentResponseDto>,
            ApiResponse<establishments_dtos::EstablishmentDetailDto>,
            ApiResponse<Vec<establishments_dtos::ContactResponseDto>>,
            ApiResponse<establishments_dtos::EstablishmentOverviewDto>,
            // Groupings
            groupings_dtos::GroupingEstablishmentDto,
            groupings_dtos::GroupingResponseDto,
            groupings_dtos::VisitSlotDto,
            groupings_dtos::GroupingEstablishmentVisitsDto,
            groupings_dtos::GroupingDetailDto,
            ApiResponse<Vec<groupings_dtos::GroupingResponseDto>>,
            ApiResponse<groupings_dtos::GroupingDetailDto>,
            // Commissions
            commissions_models::CommissionKind,
            commissions_models::CommissionType,
            commissions_models::CommissionPurpose,
            commissions_models::CommissionOpinion,
            commissions_models::CommissionCategory,
            commissions_models::CommissionStatus,
            commissions_models::CommissionPrescriptionStatus,
            commissions_dtos::CommissionResponseDto,
            commissions_dtos::CommissionPrescriptionResponseDto,
            commissions_dtos::CreateCommissionDto,
            commissions_dtos::UpdateCommissionDto,
            commissions_dtos::CreateCommissionPrescriptionDto,
            commissions_dtos::UpdateCommissionPrescriptionDto,
            ApiResponse<Vec<commissions_dtos::CommissionResponseDto>>,
            ApiResponse<commissions_dtos::CommissionResponseDto>,
            ApiResponse<commissions_dtos::CommissionPrescriptionResponseDto>,
            // Prescriptions
            prescriptions_models::PrescriptionStatus,
            prescriptions_models::PrescriptionSource,
            prescriptions_dtos::CommissionRefDto,
            prescriptions_dtos::PrescriptionResponseDto,
            prescriptions_dtos::CreatePrescriptionDto,
            prescriptions_dtos::UpdatePrescriptionDto,
            ApiResponse<Vec<prescriptions_dtos::PrescriptionResponseDto>>,
            ApiResponse<prescriptions_dtos::PrescriptionResponseDto>,
            // Regulatory files
            regulatory_files_models::RegulatoryFileStatus,
            regulatory_files_dtos::RegulatoryFileResponseDto,
            regulatory_files_dtos::CreateRegulatoryFileDto,
            regulatory_files_dtos::UpdateRegulatoryFileDto,
            ApiResponse<Vec<regulatory_files_dtos::RegulatoryFileResponseDto>>,
            ApiResponse<regulatory_files_dtos::RegulatoryFileResponseDto>,
            // Verifications
            verifications_models::RegulationType,
            verifications_models::VerificationStatus,
            verifications_dtos::TechnicalInstallationDto,
            verifications_dtos::VerificationResponseDto,
            verifications_dtos::CreateTechnicalInstallationDto,
            verifications_dtos::CreateVerificationDto,
            verifications_dtos::UpdateVerificationDto,
            ApiResponse<Vec<verifications_dtos::TechnicalInstallationDto>>,
            ApiResponse<verifications_dtos::TechnicalInstallationDto>,
            ApiResponse<Vec<verifications_dtos::VerificationResponseDto>>,
            ApiResponse<verifications_dtos::VerificationResponseDto>,
            // Visits
            visits_models::VisitType,
            visits_dtos::VisitResponseDto,
            visits_dtos::CreateVisitDto,
            visits_dtos::UpdateVisitDto,
            visits_dtos::ReportEstablishmentDto,
            visits_dtos::ReportContactDto,
            visits_dtos::ChecklistItemDto,
            visits_dtos::VisitReportRequestDto,
            visits_dtos::VisitReportDto,
            ApiResponse<Vec<visits_dtos::VisitResponseDto>>,
            ApiResponse<visits_dtos::VisitResponseDto>,
            ApiResponse<Vec<visits_dtos::VisitReportDto>>,
            // Tasks
            tasks_models::TaskPriority,
            tasks_models::TaskStatus,
            tasks_dtos::TaskResponseDto,
            tasks_dtos::TaskBoardDto,
            tasks_dtos::CreateTaskDto,
            tasks_dtos::UpdateTaskDto,
            ApiResponse<Vec<tasks_dtos::TaskResponseDto>>,
            ApiResponse<tasks_dtos::TaskResponseDto>,
            ApiResponse<tasks_dtos::TaskBoardDto>,
            // Users
            users_models::UserRole,
            users_dtos::UserSummaryDto,
            users_dtos::UserResponseDto,
            users_dtos::UserOptionDto,
            users_dtos::CreateUserDto,
            users_dtos::UpdateUserDto,
            users_dtos::GrantAccessDto,
            users_dtos::ActivityLogResponseDto,
            users_dtos::CreateActivityLogDto,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::UserOptionDto>>,
            ApiResponse<Vec<users_dtos::ActivityLogResponseDto>>,
            ApiResponse<users_dtos::ActivityLogResponseDto>,
            // Dashboard
            dashboard_dtos::DashboardStatsDto,
            dashboard_dtos::UpcomingVisitDto,
            dashboard_dtos::UrgentPrescriptionDto,
            ApiResponse<dashboard_dtos::DashboardStatsDto>,
            ApiResponse<Vec<dashboard_dtos::UpcomingVisitDto>>,
            ApiResponse<Vec<dashboard_dtos::UrgentPrescriptionDto>>,
            // Files
            files_models::UploadFolder,
            files_dtos::UploadFileDto,
            files_dtos::FileResponseDto,
            files_dtos::DeleteFileByUrlDto,
            files_dtos::DeleteFileResponseDto,
            ApiResponse<files_dtos::FileResponseDto>,
            ApiResponse<files_dtos::DeleteFileResponseDto>,
        )
    ),
    tags(
        (name = "establishments", description = "Establishments, contacts and the overview page"),
        (name = "groupings", description = "Groupings of establishments sharing a site"),
        (name = "commissions", description = "Safety and accessibility commissions with their prescriptions"),
        (name = "prescriptions", description = "Standalone prescriptions"),
        (name = "regulatory-files", description = "Building permits and work authorizations"),
        (name = "verifications", description = "Technical installations and periodic verifications"),
        (name = "visits", description = "Site visits and visit reports"),
        (name = "tasks", description = "Tasks and the task board"),
        (name = "users", description = "User administration and establishment grants"),
        (name = "activity-logs", description = "Activity log"),
        (name = "dashboard", description = "Home page counters"),
        (name = "files", description = "Document upload and removal"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "FireSafe Pro API",
        version = "0.1.0",
        description = "Fire-safety and accessibility compliance tracking",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
