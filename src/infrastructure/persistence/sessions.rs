use crate::domain::entities::{
    format_timestamp, CreateSessionRequest, Session, SessionFilter, UserSessionsList,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::session_repository::SessionRepository;
use crate::infrastructure::persistence::Database;
use chrono::{DateTime, Utc};
use sqlx::any::AnyRow;
use sqlx::Row;

// Timestamps are cast to TEXT for compatibility with the sqlx::any driver.
const SESSION_COLUMNS: &str = "id, session_order, ip_address, user_id, fcm_token,
       platform_name, platform_type,
       CAST(login_at AS TEXT) AS login_at,
       CAST(created_at AS TEXT) AS created_at,
       CAST(updated_at AS TEXT) AS updated_at,
       CAST(deleted_at AS TEXT) AS deleted_at";

fn filter_predicate(filter: SessionFilter) -> &'static str {
    match filter {
        SessionFilter::ActiveOnly => " AND deleted_at IS NULL",
        SessionFilter::All => "",
    }
}

fn parse_timestamp(column: &str, value: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            DomainError::Persistence(format!("Malformed {} value {:?}: {}", column, value, e))
        })
}

fn parse_optional_timestamp(
    column: &str,
    value: Option<String>,
) -> DomainResult<Option<DateTime<Utc>>> {
    value.map(|v| parse_timestamp(column, &v)).transpose()
}

// The any driver cannot decode NULL into Option<String>; a NULL column reads as None.
fn optional_text(row: &AnyRow, column: &str) -> DomainResult<Option<String>> {
    Ok(row
        .try_get::<Option<String>, _>(column)
        .or_else(|_| Ok::<_, sqlx::Error>(None))?)
}

fn session_from_row(row: &AnyRow) -> DomainResult<Session> {
    let login_at: String = row.try_get("login_at")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Session {
        id: row.try_get("id")?,
        order: row.try_get("session_order")?,
        ip_address: row.try_get("ip_address")?,
        user_id: row.try_get("user_id")?,
        fcm_token: row.try_get("fcm_token")?,
        platform_name: row.try_get("platform_name")?,
        platform_type: row.try_get("platform_type")?,
        login_at: parse_timestamp("login_at", &login_at)?,
        created_at: parse_timestamp("created_at", &created_at)?,
        updated_at: parse_optional_timestamp("updated_at", optional_text(row, "updated_at")?)?,
        deleted_at: parse_optional_timestamp("deleted_at", optional_text(row, "deleted_at")?)?,
    })
}

#[async_trait::async_trait]
impl SessionRepository for Database {
    async fn create_session(&self, request: &CreateSessionRequest) -> DomainResult<Session> {
        // session_order is assigned inside the statement so concurrent
        // inserts serialize on the store, never in this process.
        let sql = format!(
            "INSERT INTO sessions (id, session_order, ip_address, user_id, fcm_token, platform_name, platform_type)
             VALUES (?, (SELECT COALESCE(MAX(session_order), 0) + 1 FROM sessions), ?, ?, ?, ?, ?)
             RETURNING {}",
            SESSION_COLUMNS
        );

        // fetch_all steps the statement to completion so the insert is
        // committed before the returned row is handed back.
        let rows = sqlx::query(&sql)
            .bind(&request.id)
            .bind(&request.ip_address)
            .bind(&request.user_id)
            .bind(&request.fcm_token)
            .bind(&request.platform_name)
            .bind(&request.platform_type)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| match DomainError::from(e) {
                DomainError::Conflict(_) => {
                    DomainError::Conflict(format!("Session {} already exists", request.id))
                }
                other => other,
            })?;

        let row = rows.first().ok_or_else(|| {
            DomainError::Persistence(format!("Insert of session {} returned no row", request.id))
        })?;

        session_from_row(row)
    }

    async fn get_session_by_id(&self, id: &str) -> DomainResult<Session> {
        let sql = format!("SELECT {} FROM sessions WHERE id = ?", SESSION_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Session {} not found", id)))?;

        session_from_row(&row)
    }

    async fn delete_session_by_id(&self, id: &str) -> DomainResult<()> {
        let now = format_timestamp(&Utc::now());

        let result = sqlx::query("UPDATE sessions SET deleted_at = ? WHERE id = ?")
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(session_id = id, rows = result.rows_affected(), "Session soft-deleted");
        Ok(())
    }

    async fn delete_session_by_user_id(&self, user_id: &str) -> DomainResult<u64> {
        let now = format_timestamp(&Utc::now());

        let result = sqlx::query("UPDATE sessions SET deleted_at = ? WHERE user_id = ?")
            .bind(&now)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn get_user_sessions(
        &self,
        user_id: &str,
        filter: SessionFilter,
    ) -> DomainResult<UserSessionsList> {
        let predicate = filter_predicate(filter);
        let list_sql = format!(
            "SELECT {} FROM sessions WHERE user_id = ?{} ORDER BY session_order ASC",
            SESSION_COLUMNS, predicate
        );
        let count_sql = format!(
            "SELECT COUNT(*) FROM sessions WHERE user_id = ?{}",
            predicate
        );

        // List and count share one transaction so they see the same rows.
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(&list_sql)
            .bind(user_id)
            .fetch_all(&mut *tx)
            .await?;

        let count: i64 = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        let user_sessions = rows
            .iter()
            .map(session_from_row)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(UserSessionsList {
            user_sessions,
            count,
        })
    }
}
