//! Webhook endpoint handler.
//!
//! Accepts GitHub webhook deliveries, feeds them through the pipeline, and
//! translates the pipeline outcome into an HTTP response:
//!
//! - `Rejected` (missing/invalid signature, malformed payload) -> 400 + text
//! - `Ignored` (non-push event, non-matching commit) -> 200 + `{"status":"ignored"}`
//! - `Delivered` -> 200 + `{"status":"success", ...}` with the echoed commit
//!   message, extracted fields, and per-batch delivery counts
//!
//! Delivery failures never demote the response below success; the webhook
//! caller only cares that the delivery was processed.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::AppState;
use crate::dispatch::Transport;
use crate::pipeline::{PipelineOutcome, WebhookRequest};

/// Header name for the HMAC-SHA256 signature.
const HEADER_SIGNATURE: &str = "x-hub-signature-256";
/// Header name for the event type.
const HEADER_EVENT: &str = "x-github-event";

/// Webhook handler.
///
/// # Request
///
/// - Method: POST
/// - Headers: `X-Hub-Signature-256` (`sha256=<hex>`), `X-GitHub-Event`
/// - Body: JSON webhook payload; push events carry `head_commit.message`
pub async fn webhook_handler<T: Transport + 'static>(
    State(state): State<AppState<T>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = WebhookRequest {
        signature: header_str(&headers, HEADER_SIGNATURE),
        event_type: header_str(&headers, HEADER_EVENT),
        body: &body,
    };

    match state.pipeline().handle(request).await {
        PipelineOutcome::Delivered {
            commit_message,
            fields,
            report,
            ..
        } => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "message": commit_message,
                "post_name": fields.post_name,
                "post_title": fields.post_title,
                "delivered": report.delivered(),
                "failed": report.failed(),
            })),
        )
            .into_response(),
        PipelineOutcome::Ignored { reason } => (
            StatusCode::OK,
            Json(json!({ "status": "ignored", "reason": reason })),
        )
            .into_response(),
        PipelineOutcome::Rejected { reason } => (StatusCode::BAD_REQUEST, reason).into_response(),
        PipelineOutcome::Failed { reason } => {
            (StatusCode::INTERNAL_SERVER_ERROR, reason).into_response()
        }
    }
}

/// Returns a header value as a string slice, treating non-UTF-8 as absent.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_str_reads_present_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-github-event", "push".parse().unwrap());

        assert_eq!(header_str(&headers, "x-github-event"), Some("push"));
    }

    #[test]
    fn header_str_is_none_for_missing_header() {
        assert_eq!(header_str(&HeaderMap::new(), "x-github-event"), None);
    }
}
