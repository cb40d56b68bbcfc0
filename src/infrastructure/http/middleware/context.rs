use crate::application::call_context::CallContext;
use crate::infrastructure::http::middleware::error::ApiError;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::time::Duration;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const REQUEST_TIMEOUT_HEADER: &str = "x-request-timeout-ms";

/// Builds the call context from request headers: an optional caller
/// supplied request id and an optional caller deadline in milliseconds.
#[axum::async_trait]
impl<S> FromRequestParts<S> for CallContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mut ctx = CallContext::new();

        if let Some(value) = parts.headers.get(REQUEST_ID_HEADER) {
            let request_id = value
                .to_str()
                .map_err(|_| ApiError::BadRequest("Invalid x-request-id header".to_string()))?
                .trim();
            if !request_id.is_empty() {
                ctx = ctx.with_request_id(request_id);
            }
        }

        if let Some(value) = parts.headers.get(REQUEST_TIMEOUT_HEADER) {
            let millis: u64 = value
                .to_str()
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .ok_or_else(|| {
                    ApiError::BadRequest("Invalid x-request-timeout-ms header".to_string())
                })?;
            ctx = ctx.with_timeout(Duration::from_millis(millis));
        }

        Ok(ctx)
    }
}
