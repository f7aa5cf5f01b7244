use axum::Json;
use axum::extract::{Extension, State};
use deskhive_domain::UserProfile;

use crate::dto::{CompanyResponse, UpdateSettingsRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn get_settings_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<UserProfile>,
) -> ApiResult<Json<CompanyResponse>> {
    let company = state.tenant_service.settings(&actor).await?;
    Ok(Json(CompanyResponse::from(company)))
}

pub async fn update_settings_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<UserProfile>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> ApiResult<Json<CompanyResponse>> {
    let company = state
        .tenant_service
        .update_settings(&actor, &payload.name)
        .await?;

    Ok(Json(CompanyResponse::from(company)))
}
