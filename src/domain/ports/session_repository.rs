use crate::domain::entities::{CreateSessionRequest, Session, SessionFilter, UserSessionsList};
use crate::domain::errors::DomainResult;

#[async_trait::async_trait]
pub trait SessionRepository: Send + Sync {
    /// Inserts the session and returns the row as stored, store-assigned
    /// fields included.
    async fn create_session(&self, request: &CreateSessionRequest) -> DomainResult<Session>;
    /// Looks a session up regardless of its soft-delete state.
    async fn get_session_by_id(&self, id: &str) -> DomainResult<Session>;
    /// Stamps `deleted_at`; repeating the call re-stamps it.
    async fn delete_session_by_id(&self, id: &str) -> DomainResult<()>;
    /// Stamps `deleted_at` on every session of the user and returns the
    /// number of rows touched.
    async fn delete_session_by_user_id(&self, user_id: &str) -> DomainResult<u64>;
    async fn get_user_sessions(
        &self,
        user_id: &str,
        filter: SessionFilter,
    ) -> DomainResult<UserSessionsList>;
}
