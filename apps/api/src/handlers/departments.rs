use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use deskhive_application::{CreateDepartmentInput, DepartmentUpdate};
use deskhive_domain::{DepartmentId, UserProfile};
use uuid::Uuid;

use crate::dto::{
    CreateDepartmentRequest, DepartmentResponse, UpdateDepartmentRequest, parse_department_id,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_departments_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<UserProfile>,
) -> ApiResult<Json<Vec<DepartmentResponse>>> {
    let departments = state
        .department_service
        .list_departments(&actor)
        .await?
        .into_iter()
        .map(DepartmentResponse::from)
        .collect();

    Ok(Json(departments))
}

pub async fn create_department_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<UserProfile>,
    Json(payload): Json<CreateDepartmentRequest>,
) -> ApiResult<(StatusCode, Json<DepartmentResponse>)> {
    let input = CreateDepartmentInput {
        name: payload.name,
        parent_department_id: payload
            .parent_department_id
            .as_deref()
            .map(parse_department_id)
            .transpose()?,
    };
    let department = state
        .department_service
        .create_department(&actor, input)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DepartmentResponse::from(department)),
    ))
}

pub async fn update_department_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<UserProfile>,
    Path(department_id): Path<Uuid>,
    Json(payload): Json<UpdateDepartmentRequest>,
) -> ApiResult<Json<DepartmentResponse>> {
    let update = DepartmentUpdate::try_from(payload)?;
    let department = state
        .department_service
        .update_department(&actor, DepartmentId::from_uuid(department_id), update)
        .await?;

    Ok(Json(DepartmentResponse::from(department)))
}
