use crate::application::call_context::CallContext;
use crate::domain::entities::{CreateSessionRequest, Session, SessionFilter, UserSessionsList};
use crate::domain::errors::{DomainError, DomainResult, ErrorKind};
use crate::domain::ports::session_repository::SessionRepository;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// Delegates every operation to the repository under a per-call deadline.
///
/// Errors from the repository come back untouched; only an expired
/// deadline produces an error of its own.
#[derive(Clone)]
pub struct SessionService {
    session_repo: Arc<dyn SessionRepository>,
    timeout: Duration,
}

impl SessionService {
    pub fn new(session_repo: Arc<dyn SessionRepository>, timeout: Duration) -> Self {
        Self {
            session_repo,
            timeout,
        }
    }

    pub async fn create_session(
        &self,
        ctx: &CallContext,
        request: &CreateSessionRequest,
    ) -> DomainResult<Session> {
        self.run(ctx, "CreateSession", self.session_repo.create_session(request))
            .await
    }

    pub async fn get_session_by_id(&self, ctx: &CallContext, id: &str) -> DomainResult<Session> {
        self.run(ctx, "GetSessionById", self.session_repo.get_session_by_id(id))
            .await
    }

    pub async fn delete_session_by_id(&self, ctx: &CallContext, id: &str) -> DomainResult<()> {
        self.run(
            ctx,
            "DeleteSessionById",
            self.session_repo.delete_session_by_id(id),
        )
        .await
    }

    pub async fn delete_session_by_user_id(
        &self,
        ctx: &CallContext,
        user_id: &str,
    ) -> DomainResult<u64> {
        self.run(
            ctx,
            "DeleteSessionByUserId",
            self.session_repo.delete_session_by_user_id(user_id),
        )
        .await
    }

    pub async fn get_user_sessions(
        &self,
        ctx: &CallContext,
        user_id: &str,
        filter: SessionFilter,
    ) -> DomainResult<UserSessionsList> {
        self.run(
            ctx,
            "GetUserSessions",
            self.session_repo.get_user_sessions(user_id, filter),
        )
        .await
    }

    /// True iff the user listing for `filter` is non-empty. Built on
    /// `get_user_sessions` so the active-filter rules live in one place.
    pub async fn has_user_session(
        &self,
        ctx: &CallContext,
        user_id: &str,
        filter: SessionFilter,
    ) -> DomainResult<bool> {
        let list = self.get_user_sessions(ctx, user_id, filter).await?;
        Ok(!list.user_sessions.is_empty())
    }

    async fn run<T, F>(&self, ctx: &CallContext, operation: &'static str, call: F) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        let deadline = ctx.effective_deadline(self.timeout);
        let span = tracing::info_span!(
            "session_service",
            operation = operation,
            request_id = %ctx.request_id
        );
        let started = std::time::Instant::now();

        // Dropping `call` on expiry cancels the in-flight statement and
        // hands its connection back to the pool.
        let result = match tokio::time::timeout_at(deadline, call)
            .instrument(span)
            .await
        {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    request_id = %ctx.request_id,
                    "Session operation exceeded its deadline"
                );
                Err(DomainError::DeadlineExceeded(format!(
                    "{} did not complete in time",
                    operation
                )))
            }
        };

        let outcome = match &result {
            Ok(_) => "ok",
            Err(err) => match err.kind() {
                ErrorKind::Validation => "validation_error",
                ErrorKind::Persistence => "persistence_error",
                ErrorKind::DeadlineExceeded => "deadline_exceeded",
            },
        };
        metrics::counter!(
            "session_service_requests_total",
            "operation" => operation,
            "outcome" => outcome
        )
        .increment(1);
        metrics::histogram!(
            "session_service_request_duration_seconds",
            "operation" => operation
        )
        .record(started.elapsed().as_secs_f64());

        result
    }
}
