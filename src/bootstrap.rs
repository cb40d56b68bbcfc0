use crate::application::services::SessionService;
use crate::config::Config;
use crate::domain::ports::session_repository::SessionRepository;
use crate::infrastructure::http::middleware::AppState;
use crate::infrastructure::persistence::Database;
use std::sync::Arc;

pub fn build_app_state(db: Database, config: &Config) -> AppState {
    let session_repo: Arc<dyn SessionRepository> = Arc::new(db);
    let session_service = SessionService::new(session_repo, config.context_timeout);
    tracing::info!(
        timeout_ms = config.context_timeout.as_millis() as u64,
        "Session service initialized"
    );

    AppState {
        session_service: Arc::new(session_service),
    }
}
