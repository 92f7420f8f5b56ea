use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use std::sync::Arc;

use crate::error::RelayError;
use crate::metrics::{REPORTS_FORWARDED, record_rejected};
use crate::middleware::ClientIp;
use crate::models::{ReportResponse, SanitizedReport};
use crate::payload::build;
use crate::state::AppState;
use crate::validate::{parse_body, validate};

// POST /report. The global limiter already ran as a route layer.
pub async fn report_handler(
    State(state): State<Arc<AppState>>,
    ClientIp(client): ClientIp,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ReportResponse>, RelayError> {
    let result = ingest(&state, &client, body).await;
    if let Err(err) = &result {
        record_rejected(err.reason());
    }
    result.map(|_| Json(ReportResponse::success()))
}

async fn ingest(
    state: &AppState,
    client: &str,
    body: Result<Bytes, BytesRejection>,
) -> Result<(), RelayError> {
    if !state.burst_tracker.record(client) {
        tracing::warn!(client = %client, "burst limit exceeded");
        return Err(RelayError::RateLimited);
    }

    let bytes = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            RelayError::PayloadTooLarge
        } else {
            RelayError::InvalidBody
        }
    })?;

    let report = validate(parse_body(&bytes)?)?;
    let sanitized = SanitizedReport::from_incoming(&report, &state.fallbacks);
    let message = build(&sanitized);

    let ack = state.forwarder.forward(&message).await?;
    REPORTS_FORWARDED.inc();
    tracing::debug!(
        client = %client,
        entries = sanitized.brainrots.len(),
        sink_status = ack.status,
        "report forwarded"
    );
    Ok(())
}
