use crate::infrastructure::http::controllers::sessions;
use crate::infrastructure::http::middleware::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/sessions", post(sessions::create_session))
        .route("/api/sessions/:id", get(sessions::get_session_by_id))
        .route("/api/sessions/:id", delete(sessions::delete_session_by_id))
        .route(
            "/api/users/:user_id/sessions",
            get(sessions::get_user_sessions),
        )
        .route(
            "/api/users/:user_id/sessions",
            delete(sessions::delete_session_by_user_id),
        )
        .route(
            "/api/users/:user_id/sessions/exists",
            get(sessions::has_user_session),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "OK"
}
