//! Session handlers: login against the external identity provider, logout,
//! and the current-session endpoint.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use deskhive_application::{LoginOutcome, ResolvedSession};
use deskhive_core::{AppError, SessionPrincipal};
use tower_sessions::Session;
use uuid::Uuid;

use crate::dto::{AuthLoginRequest, SessionResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub const SESSION_USER_KEY: &str = "session_principal";

/// Stable per-browser-session key for the resolution state machine; created
/// lazily on the first login attempt of a session.
const SESSION_RESOLUTION_KEY: &str = "resolution_key";

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AuthLoginRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let resolution_key = resolution_key(&session).await?;

    let outcome = state
        .profile_service
        .login(&resolution_key, &payload.provider_token)
        .await?;

    let resolved = match outcome {
        LoginOutcome::Resolved(resolved) => resolved,
        LoginOutcome::Superseded => {
            return Err(
                AppError::Conflict("login superseded by a newer attempt".to_owned()).into(),
            );
        }
    };

    let subject = match &resolved {
        ResolvedSession::Provisioned { profile, .. } => profile.subject.clone(),
        ResolvedSession::Unprovisioned { claims } => claims.subject().to_owned(),
    };

    session
        .insert(SESSION_USER_KEY, SessionPrincipal::new(subject))
        .await
        .map_err(|error| AppError::Internal(format!("failed to store session: {error}")))?;

    Ok(Json(SessionResponse::from(resolved)))
}

pub async fn logout_handler(State(state): State<AppState>, session: Session) -> ApiResult<StatusCode> {
    if let Some(resolution_key) = session
        .get::<String>(SESSION_RESOLUTION_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session: {error}")))?
    {
        state.profile_service.clear_session(&resolution_key);
    }

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<SessionResponse>> {
    let principal = session
        .get::<SessionPrincipal>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session principal: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let response = match state
        .profile_service
        .session_for_subject(principal.subject())
        .await?
    {
        Some((profile, scope)) => SessionResponse {
            provisioned: true,
            profile: Some(profile.into()),
            scope: Some(scope.into()),
            display_name: None,
            email: None,
        },
        None => SessionResponse {
            provisioned: false,
            profile: None,
            scope: None,
            display_name: None,
            email: None,
        },
    };

    Ok(Json(response))
}

async fn resolution_key(session: &Session) -> ApiResult<String> {
    if let Some(key) = session
        .get::<String>(SESSION_RESOLUTION_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session: {error}")))?
    {
        return Ok(key);
    }

    let key = Uuid::new_v4().to_string();
    session
        .insert(SESSION_RESOLUTION_KEY, key.clone())
        .await
        .map_err(|error| AppError::Internal(format!("failed to store session: {error}")))?;

    Ok(key)
}
