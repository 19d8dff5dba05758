use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::auth::guards::RequireStaff;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{
    ActivityLogQuery, ActivityLogResponseDto, CreateActivityLogDto,
};
use crate::features::users::routes::UserState;
use crate::shared::types::ApiResponse;

/// Recent activity, newest first
#[utoipa::path(
    get,
    path = "/api/activity-logs",
    params(ActivityLogQuery),
    responses(
        (status = 200, description = "Activity logs", body = ApiResponse<Vec<ActivityLogResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "activity-logs"
)]
pub async fn list_activity_logs(
    RequireStaff(_staff): RequireStaff,
    State(state): State<UserState>,
    Query(query): Query<ActivityLogQuery>,
) -> Result<Json<ApiResponse<Vec<ActivityLogResponseDto>>>> {
    let rows = state.activity.list(query.effective_limit()).await?;
    Ok(Json(ApiResponse::list(
        rows.into_iter().map(Into::into).collect(),
    )))
}

/// Log an activity for the caller
#[utoipa::path(
    post,
    path = "/api/activity-logs",
    request_body = CreateActivityLogDto,
    responses(
        (status = 200, description = "Activity logged", body = ApiResponse<ActivityLogResponseDto>),
        (status = 400, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "activity-logs"
)]
pub async fn create_activity_log(
    user: AuthenticatedUser,
    State(state): State<UserState>,
    ValidatedJson(dto): ValidatedJson<CreateActivityLogDto>,
) -> Result<Json<ApiResponse<ActivityLogResponseDto>>> {
    let row = state
        .activity
        .log(&user.sub, dto.action.trim(), dto.details.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(Some(row.into()), None, None)))
}
