use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use deskhive_application::{InviteUserInput, ProfileUpdate};
use deskhive_domain::{UserId, UserProfile};
use uuid::Uuid;

use crate::dto::{InviteUserRequest, RoleResponse, UpdateUserRequest, UserProfileResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<UserProfile>,
) -> ApiResult<Json<Vec<UserProfileResponse>>> {
    let users = state
        .directory_service
        .list_users(&actor)
        .await?
        .into_iter()
        .map(UserProfileResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn list_roles_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .directory_service
        .list_roles()
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn invite_user_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<UserProfile>,
    Json(payload): Json<InviteUserRequest>,
) -> ApiResult<(StatusCode, Json<UserProfileResponse>)> {
    let input = InviteUserInput::try_from(payload)?;
    let invited = state.directory_service.invite_user(&actor, input).await?;

    Ok((StatusCode::CREATED, Json(UserProfileResponse::from(invited))))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<UserProfile>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserProfileResponse>> {
    let update = ProfileUpdate::try_from(payload)?;
    let updated = state
        .directory_service
        .update_user(&actor, UserId::from_uuid(user_id), update)
        .await?;

    Ok(Json(UserProfileResponse::from(updated)))
}
