use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::auth::guards::RequireStaff;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::visits::dtos::{VisitReportDto, VisitReportRequestDto};
use crate::features::visits::routes::VisitState;
use crate::shared::constants::REPORT_URL_HEADER;
use crate::shared::types::ApiResponse;

/// Generate the visit report PDF and return it as a download.
///
/// The stored report's public URL is sent in the `x-report-url` header.
#[utoipa::path(
    post,
    path = "/api/visits/{id}/report",
    params(("id" = Uuid, Path, description = "Visit ID")),
    request_body = VisitReportRequestDto,
    responses(
        (status = 200, description = "Report PDF", content_type = "application/pdf", body = Vec<u8>,
            headers(("x-report-url" = String, description = "Public URL of the stored report"))),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Visit or consultant not found")
    ),
    security(("bearer_auth" = [])),
    tag = "visits"
)]
pub async fn generate_visit_report(
    RequireStaff(_staff): RequireStaff,
    State(state): State<VisitState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<VisitReportRequestDto>,
) -> Result<impl IntoResponse> {
    let generated = state.reports.generate(id, dto).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&generated.file_name),
            ),
            (
                header::HeaderName::from_static(REPORT_URL_HEADER),
                generated.report.report_url,
            ),
        ],
        generated.pdf,
    ))
}

/// Generated reports of a visit, newest first
#[utoipa::path(
    get,
    path = "/api/visits/{id}/reports",
    params(("id" = Uuid, Path, description = "Visit ID")),
    responses(
        (status = 200, description = "Visit reports", body = ApiResponse<Vec<VisitReportDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "visits"
)]
pub async fn list_visit_reports(
    _user: AuthenticatedUser,
    State(state): State<VisitState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<VisitReportDto>>>> {
    let reports = state.visits.list_reports(id).await?;
    Ok(Json(ApiResponse::list(reports)))
}

/// ASCII fallback plus the RFC 5987 UTF-8 name
fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(file_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::visits::routes::tests::server_as;

    #[test]
    fn test_content_disposition_keeps_accented_names() {
        let value = content_disposition("Rapport_Visite_Hôtel_du_Lac_2026-03-12_a1b2c3d4.pdf");
        assert!(value.starts_with(
            "attachment; filename=\"Rapport_Visite_H_tel_du_Lac_2026-03-12_a1b2c3d4.pdf\""
        ));
        assert!(value.ends_with("filename*=UTF-8''Rapport_Visite_H%C3%B4tel_du_Lac_2026-03-12_a1b2c3d4.pdf"));
        assert!(value.is_ascii());
    }

    #[tokio::test]
    async fn test_client_cannot_generate_reports() {
        let server = server_as(&["client"]);
        let response = server
            .post("/api/visits/6d1f5a0e-8f7a-4c55-9a4c-0d7c2f3b9e11/report")
            .json(&serde_json::json!({}))
            .await;
        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_report_without_conclusion_is_rejected() {
        let server = server_as(&["consultant"]);
        let response = server
            .post("/api/visits/6d1f5a0e-8f7a-4c55-9a4c-0d7c2f3b9e11/report")
            .json(&serde_json::json!({
                "establishment_id": "0b9c9d5e-2f1a-4d7e-8a36-5b1f1c2d3e4f",
                "establishment": {
                    "name": "Hôtel du Lac",
                    "address": "3 quai des Pêcheurs",
                    "postal_code": "74000",
                    "city": "Annecy",
                    "category": "3ème catégorie"
                },
                "visit_date": "2026-03-12",
                "visit_type": "first_visit",
                "consultant_id": "consultant-1",
                "contact": { "name": "Claire Martin", "role": "Directrice" },
                "conclusion": ""
            }))
            .await;
        response.assert_status_bad_request();
    }
}
