pub mod context;
pub mod error;

pub use context::*;
pub use error::*;

use crate::application::services::SessionService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
}
