//! Publish endpoint.

use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use bytes::Bytes;
use tracing::debug;

use chathub_core::error::AppError;
use chathub_realtime::MessageKind;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /publish
///
/// Broadcasts the raw body to every subscriber and answers 202 once the
/// message has been queued. The body limit is enforced by the route's
/// `DefaultBodyLimit`.
pub async fn publish(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, ApiError> {
    let payload = body.map_err(|rejection| match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::payload_too_large(format!(
            "Publish body exceeds {} bytes",
            state.config.hub.max_publish_bytes
        )),
        _ => AppError::validation(rejection.body_text()),
    })?;

    if state.hub.is_shutting_down() {
        return Err(AppError::service_unavailable("Hub is shutting down").into());
    }

    let recipients = state.hub.publish(payload, MessageKind::Content).await?;
    debug!(recipients, "Publish accepted");

    Ok(StatusCode::ACCEPTED)
}
