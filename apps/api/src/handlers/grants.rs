use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use deskhive_domain::{GrantId, UserId, UserProfile};
use uuid::Uuid;

use crate::dto::{CreateGrantRequest, GrantResponse, parse_department_id};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_user_grants_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<UserProfile>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<GrantResponse>>> {
    let grants = state
        .grant_service
        .list_for_user(&actor, UserId::from_uuid(user_id))
        .await?
        .into_iter()
        .map(GrantResponse::from)
        .collect();

    Ok(Json(grants))
}

pub async fn create_grant_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<UserProfile>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<CreateGrantRequest>,
) -> ApiResult<(StatusCode, Json<GrantResponse>)> {
    let department_id = parse_department_id(&payload.department_id)?;
    let grant = state
        .grant_service
        .grant(&actor, UserId::from_uuid(user_id), department_id)
        .await?;

    Ok((StatusCode::CREATED, Json(GrantResponse::from(grant))))
}

pub async fn revoke_grant_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<UserProfile>,
    Path(grant_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .grant_service
        .revoke(&actor, GrantId::from_uuid(grant_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
