//! Best-effort fan-out of a rendered announcement to destination channels.
//!
//! A dispatch opens one transport session, sends to every destination in
//! configured order, and closes the session exactly once after the loop -
//! success or failure. Per-destination failures are recorded and logged but
//! never abort the batch: one bad channel id must not block the others.
//! There are no retries; the webhook platform re-delivers undelivered hooks,
//! which is relied upon instead of internal retry logic.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::types::ChannelId;

/// A handle to the messaging transport, able to open per-dispatch sessions.
///
/// Sessions are created per `dispatch` call and released per call; a session
/// must not be reused across dispatches or shared across concurrent pipeline
/// executions.
pub trait Transport: Send + Sync {
    /// The transport's error type, rendered into per-destination reasons.
    type Error: fmt::Display + Send;

    /// An open session that can deliver messages.
    type Session: TransportSession<Error = Self::Error> + Send;

    /// Opens a session for one dispatch.
    fn connect(&self) -> impl Future<Output = Result<Self::Session, Self::Error>> + Send;
}

/// An open transport session.
pub trait TransportSession {
    type Error: fmt::Display + Send;

    /// Delivers `text` to a single destination channel.
    fn send(
        &self,
        destination: ChannelId,
        text: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Releases the session. Called exactly once, after the whole batch.
    fn close(self) -> impl Future<Output = ()> + Send;
}

/// The delivery outcome for a single destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The transport accepted the message.
    Sent,
    /// Delivery failed; the remaining destinations were still attempted.
    Failed { reason: String },
}

/// One `(destination, outcome)` pair of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchEntry {
    pub destination: ChannelId,
    pub outcome: DeliveryOutcome,
}

/// The per-destination record of one dispatch, in configured order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub entries: Vec<DispatchEntry>,
}

impl DispatchReport {
    /// Number of destinations the transport accepted.
    pub fn delivered(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome == DeliveryOutcome::Sent)
            .count()
    }

    /// Number of destinations that failed.
    pub fn failed(&self) -> usize {
        self.entries.len() - self.delivered()
    }
}

/// Sends `message` to every destination, sequentially and best-effort.
///
/// Each send is bounded by `per_send_timeout`; a timeout is recorded as a
/// failure for that destination and the loop continues. A connect failure
/// marks every destination failed, since nothing could be attempted.
pub async fn dispatch<T: Transport>(
    transport: &T,
    message: &str,
    destinations: &[ChannelId],
    per_send_timeout: Duration,
) -> DispatchReport {
    let session = match transport.connect().await {
        Ok(session) => session,
        Err(error) => {
            warn!(error = %error, "transport connect failed; no deliveries attempted");
            return DispatchReport {
                entries: destinations
                    .iter()
                    .map(|&destination| DispatchEntry {
                        destination,
                        outcome: DeliveryOutcome::Failed {
                            reason: format!("connect failed: {error}"),
                        },
                    })
                    .collect(),
            };
        }
    };

    let mut entries = Vec::with_capacity(destinations.len());
    for &destination in destinations {
        let outcome = match tokio::time::timeout(per_send_timeout, session.send(destination, message))
            .await
        {
            Ok(Ok(())) => {
                info!(channel = %destination, "announcement delivered");
                DeliveryOutcome::Sent
            }
            Ok(Err(error)) => {
                warn!(channel = %destination, error = %error, "delivery failed");
                DeliveryOutcome::Failed {
                    reason: error.to_string(),
                }
            }
            Err(_) => {
                warn!(channel = %destination, "delivery timed out");
                DeliveryOutcome::Failed {
                    reason: "timeout".to_string(),
                }
            }
        };
        entries.push(DispatchEntry {
            destination,
            outcome,
        });
    }

    // One release for the whole batch, regardless of per-destination results.
    session.close().await;
    debug!(
        delivered = entries
            .iter()
            .filter(|e| e.outcome == DeliveryOutcome::Sent)
            .count(),
        total = entries.len(),
        "dispatch finished"
    );

    DispatchReport { entries }
}
