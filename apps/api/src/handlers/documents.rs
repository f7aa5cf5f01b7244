use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use deskhive_application::RegisterDocumentInput;
use deskhive_domain::UserProfile;

use crate::dto::{DocumentResponse, RegisterDocumentRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_documents_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<UserProfile>,
) -> ApiResult<Json<Vec<DocumentResponse>>> {
    let documents = state
        .document_service
        .list_documents(&actor)
        .await?
        .into_iter()
        .map(DocumentResponse::from)
        .collect();

    Ok(Json(documents))
}

pub async fn register_document_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<UserProfile>,
    Json(payload): Json<RegisterDocumentRequest>,
) -> ApiResult<(StatusCode, Json<DocumentResponse>)> {
    let input = RegisterDocumentInput::try_from(payload)?;
    let document = state.document_service.register_upload(&actor, input).await?;

    Ok((StatusCode::CREATED, Json(DocumentResponse::from(document))))
}
