use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

/// Per-call context handed to every service operation.
///
/// Carries the request id used to correlate log lines and the caller's own
/// deadline, if it has one.
#[derive(Debug, Clone)]
pub struct CallContext {
    pub request_id: String,
    pub deadline: Option<Instant>,
}

impl CallContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            deadline: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// The earlier of the caller's deadline and `now + timeout`.
    pub fn effective_deadline(&self, timeout: Duration) -> Instant {
        let own = Instant::now() + timeout;
        match self.deadline {
            Some(caller) => caller.min(own),
            None => own,
        }
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::new()
    }
}
