use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Entity: one authenticated login of a user on a device.
///
/// `order`, `login_at` and `created_at` are assigned by the store on insert.
/// A session is active while `deleted_at` is `None`; once set it is never
/// cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub order: i64,
    pub ip_address: String,
    pub user_id: String,
    pub fcm_token: String,
    pub platform_name: String,
    pub platform_type: String,
    pub login_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Which sessions a user listing includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionFilter {
    /// Only sessions that have not been soft-deleted.
    #[default]
    ActiveOnly,
    /// Every session of the user, soft-deleted ones included.
    All,
}

impl SessionFilter {
    /// Interprets the wire-level `is_active` flag: `false` restricts the
    /// listing to active sessions, `true` widens it to all sessions.
    pub fn from_is_active(is_active: bool) -> Self {
        if is_active {
            SessionFilter::All
        } else {
            SessionFilter::ActiveOnly
        }
    }
}

/// Sessions of one user together with how many match the filter.
#[derive(Debug, Clone, Default)]
pub struct UserSessionsList {
    pub user_sessions: Vec<Session>,
    pub count: i64,
}

/// DTO: Caller-supplied fields of a new session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub id: String,
    pub ip_address: String,
    pub user_id: String,
    pub fcm_token: String,
    pub platform_name: String,
    pub platform_type: String,
}

impl CreateSessionRequest {
    pub fn validate(&self) -> DomainResult<()> {
        if self.id.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Session id must not be empty".to_string(),
            ));
        }
        if self.user_id.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "User id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// DTO: Query string of the user listing endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSessionsQuery {
    #[serde(default)]
    pub is_active: bool,
}

impl UserSessionsQuery {
    pub fn filter(&self) -> SessionFilter {
        SessionFilter::from_is_active(self.is_active)
    }
}

/// DTO: Session as returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: String,
    pub order: i64,
    pub ip_address: String,
    pub user_id: String,
    pub fcm_token: String,
    pub platform_name: String,
    pub platform_type: String,
    pub login_at: String,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSessionsListResponse {
    pub user_sessions: Vec<SessionResponse>,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExistsResponse {
    pub is_exists: bool,
}

/// DTO: Acknowledgement with no payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Empty {}

/// Canonical textual form of every timestamp this service stores or emits.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            login_at: format_timestamp(&session.login_at),
            created_at: format_timestamp(&session.created_at),
            updated_at: session.updated_at.as_ref().map(format_timestamp),
            deleted_at: session.deleted_at.as_ref().map(format_timestamp),
            id: session.id,
            order: session.order,
            ip_address: session.ip_address,
            user_id: session.user_id,
            fcm_token: session.fcm_token,
            platform_name: session.platform_name,
            platform_type: session.platform_type,
        }
    }
}

impl From<UserSessionsList> for UserSessionsListResponse {
    fn from(list: UserSessionsList) -> Self {
        Self {
            user_sessions: list
                .user_sessions
                .into_iter()
                .map(SessionResponse::from)
                .collect(),
            count: list.count,
        }
    }
}
