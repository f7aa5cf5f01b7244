use axum::Json;
use axum::extract::{Extension, State};
use deskhive_domain::UserProfile;

use crate::dto::DashboardResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn dashboard_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<UserProfile>,
) -> ApiResult<Json<DashboardResponse>> {
    let summary = state.tenant_service.dashboard(&actor).await?;
    Ok(Json(DashboardResponse::from(summary)))
}
