use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use deskhive_domain::UserProfile;

use crate::dto::{CompanyResponse, CreateCompanyRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_companies_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<UserProfile>,
) -> ApiResult<Json<Vec<CompanyResponse>>> {
    let companies = state
        .tenant_service
        .list_companies(&actor)
        .await?
        .into_iter()
        .map(CompanyResponse::from)
        .collect();

    Ok(Json(companies))
}

pub async fn create_company_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<UserProfile>,
    Json(payload): Json<CreateCompanyRequest>,
) -> ApiResult<(StatusCode, Json<CompanyResponse>)> {
    let company = state
        .tenant_service
        .create_company(&actor, &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(CompanyResponse::from(company))))
}
