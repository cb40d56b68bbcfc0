use crate::{
    application::call_context::CallContext,
    domain::entities::*,
    domain::errors::DomainError,
    infrastructure::http::middleware::{ApiError, ApiResult, AppState},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

/// Logs a service failure where it is first observed and converts it into
/// the response the caller receives.
fn reject(operation: &str, ctx: &CallContext, err: DomainError) -> ApiError {
    tracing::error!(
        operation,
        request_id = %ctx.request_id,
        error = %err,
        "Session operation failed"
    );
    ApiError::from(err)
}

pub async fn create_session(
    State(state): State<AppState>,
    ctx: CallContext,
    Json(request): Json<CreateSessionRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    request
        .validate()
        .map_err(|e| reject("CreateSession", &ctx, e))?;

    let session = state
        .session_service
        .create_session(&ctx, &request)
        .await
        .map_err(|e| reject("CreateSession", &ctx, e))?;

    Ok((StatusCode::CREATED, Json(SessionResponse::from(session))))
}

pub async fn get_session_by_id(
    State(state): State<AppState>,
    ctx: CallContext,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state
        .session_service
        .get_session_by_id(&ctx, &id)
        .await
        .map_err(|e| reject("GetSessionById", &ctx, e))?;

    Ok(Json(SessionResponse::from(session)))
}

pub async fn delete_session_by_id(
    State(state): State<AppState>,
    ctx: CallContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Empty>> {
    state
        .session_service
        .delete_session_by_id(&ctx, &id)
        .await
        .map_err(|e| reject("DeleteSessionById", &ctx, e))?;

    Ok(Json(Empty {}))
}

pub async fn delete_session_by_user_id(
    State(state): State<AppState>,
    ctx: CallContext,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Empty>> {
    let affected = state
        .session_service
        .delete_session_by_user_id(&ctx, &user_id)
        .await
        .map_err(|e| reject("DeleteSessionByUserId", &ctx, e))?;

    tracing::info!(user_id = %user_id, affected, "User sessions soft-deleted");
    Ok(Json(Empty {}))
}

pub async fn get_user_sessions(
    State(state): State<AppState>,
    ctx: CallContext,
    Path(user_id): Path<String>,
    Query(query): Query<UserSessionsQuery>,
) -> ApiResult<Json<UserSessionsListResponse>> {
    let list = state
        .session_service
        .get_user_sessions(&ctx, &user_id, query.filter())
        .await
        .map_err(|e| reject("GetUserSessions", &ctx, e))?;

    Ok(Json(UserSessionsListResponse::from(list)))
}

pub async fn has_user_session(
    State(state): State<AppState>,
    ctx: CallContext,
    Path(user_id): Path<String>,
    Query(query): Query<UserSessionsQuery>,
) -> ApiResult<Json<SessionExistsResponse>> {
    let is_exists = state
        .session_service
        .has_user_session(&ctx, &user_id, query.filter())
        .await
        .map_err(|e| reject("HasUserSession", &ctx, e))?;

    Ok(Json(SessionExistsResponse { is_exists }))
}
