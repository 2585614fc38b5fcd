//! The webhook processing pipeline.
//!
//! One pipeline execution per inbound request: verify the signature, filter
//! by event type, parse the payload, match the commit message, render the
//! announcement, dispatch it. Authentication and payload-shape problems
//! abort immediately; a commit message that simply does not match is a
//! normal, reportable outcome; delivery problems are isolated per
//! destination and never change the overall outcome.
//!
//! The pipeline holds no cross-request state. Everything it reads (secret,
//! templates, destination list) is fixed at startup, so concurrent
//! executions share nothing mutable.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::announce;
use crate::config::Config;
use crate::dispatch::{dispatch, DispatchReport, Transport};
use crate::matcher::{CommitFields, CommitTemplate, TemplateError};
use crate::types::ChannelId;
use crate::webhooks::{head_commit_message, verify_signature, PUSH_EVENT};

/// Rejection reason: the signature header is absent.
pub const REASON_MISSING_SIGNATURE: &str = "missing signature";
/// Rejection reason: the signature does not match the body.
pub const REASON_INVALID_SIGNATURE: &str = "invalid signature";
/// Rejection reason: the body is not a push payload with a commit message.
pub const REASON_INVALID_PAYLOAD: &str = "invalid payload";
/// Ignore reason: the delivery is not a push event.
pub const REASON_NOT_PUSH: &str = "Not a push event";
/// Ignore reason: the commit message does not encode a publish intent.
pub const REASON_NO_MATCH: &str = "commit message does not match the configured template";

/// One inbound webhook delivery, as seen by the pipeline.
///
/// Owned exclusively by a single pipeline invocation and discarded after the
/// call returns.
#[derive(Debug, Clone, Copy)]
pub struct WebhookRequest<'a> {
    /// The `X-Hub-Signature-256` header, if present.
    pub signature: Option<&'a str>,
    /// The `X-GitHub-Event` header, if present.
    pub event_type: Option<&'a str>,
    /// The raw request body the signature was computed over.
    pub body: &'a [u8],
}

/// The terminal outcome of one pipeline execution.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// The commit matched; the announcement was rendered and dispatched.
    /// Per-destination failures live in the report and do not demote the
    /// outcome.
    Delivered {
        /// The matched commit message, echoed back to the webhook caller.
        commit_message: String,
        /// The extracted post fields.
        fields: CommitFields,
        /// The rendered announcement text.
        announcement: String,
        /// Per-destination delivery record.
        report: DispatchReport,
    },
    /// Nothing to do: wrong event type or a non-matching commit message.
    Ignored { reason: &'static str },
    /// The request failed authentication or was malformed.
    Rejected { reason: &'static str },
    /// The service itself failed (render defect that escaped load-time
    /// validation).
    Failed { reason: String },
}

/// The verify -> filter -> parse -> match -> render -> dispatch pipeline.
pub struct Pipeline<T> {
    secret: Vec<u8>,
    commit_template: CommitTemplate,
    announcement_template: String,
    blog_owner_name: String,
    blog_url: String,
    destinations: Vec<ChannelId>,
    send_timeout: Duration,
    transport: T,
}

impl<T: Transport> Pipeline<T> {
    /// Builds a pipeline from validated configuration and a transport.
    ///
    /// Compiles the commit template; configuration loaded through
    /// [`Config::load`] has already proven this cannot fail.
    pub fn new(config: &Config, transport: T) -> Result<Self, TemplateError> {
        Ok(Pipeline {
            secret: config.webhook.secret_token.as_bytes().to_vec(),
            commit_template: CommitTemplate::compile(&config.webhook.commit_template)?,
            announcement_template: config.telegram_channel.post_template.clone(),
            blog_owner_name: config.blog.blog_owner_name.clone(),
            blog_url: config.blog.blog_url.clone(),
            destinations: config.telegram_channel.channel_ids.clone(),
            send_timeout: Duration::from_secs(config.telegram_channel.send_timeout_secs),
            transport,
        })
    }

    /// Runs one webhook delivery through the pipeline.
    pub async fn handle(&self, request: WebhookRequest<'_>) -> PipelineOutcome {
        // Authenticate before touching the body; a request that cannot prove
        // knowledge of the secret gets no further processing.
        let Some(signature) = request.signature else {
            warn!("webhook rejected: missing signature header");
            return PipelineOutcome::Rejected {
                reason: REASON_MISSING_SIGNATURE,
            };
        };
        if !verify_signature(request.body, signature, &self.secret) {
            warn!("webhook rejected: signature does not match");
            return PipelineOutcome::Rejected {
                reason: REASON_INVALID_SIGNATURE,
            };
        }
        debug!("webhook signature verified");

        if request.event_type != Some(PUSH_EVENT) {
            info!(
                event = request.event_type.unwrap_or("<none>"),
                "event ignored"
            );
            return PipelineOutcome::Ignored {
                reason: REASON_NOT_PUSH,
            };
        }

        let payload: serde_json::Value = match serde_json::from_slice(request.body) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "webhook rejected: body is not valid JSON");
                return PipelineOutcome::Rejected {
                    reason: REASON_INVALID_PAYLOAD,
                };
            }
        };
        let Some(commit_message) = head_commit_message(&payload) else {
            warn!("webhook rejected: payload carries no head commit message");
            return PipelineOutcome::Rejected {
                reason: REASON_INVALID_PAYLOAD,
            };
        };
        info!(commit_message, "push event received");

        let Some(fields) = self.commit_template.match_message(commit_message) else {
            info!("commit message does not match the publish template");
            return PipelineOutcome::Ignored {
                reason: REASON_NO_MATCH,
            };
        };

        let announcement = match announce::render(
            &self.announcement_template,
            &self.announcement_fields(&fields),
        ) {
            Ok(text) => text,
            Err(err) => {
                // Load-time validation makes this unreachable in a correctly
                // started process; surface it as a server fault, not a
                // client error.
                error!(error = %err, "announcement template failed to render");
                return PipelineOutcome::Failed {
                    reason: err.to_string(),
                };
            }
        };

        info!(post_name = %fields.post_name, "announcing post");
        let report = dispatch(
            &self.transport,
            &announcement,
            &self.destinations,
            self.send_timeout,
        )
        .await;

        PipelineOutcome::Delivered {
            commit_message: commit_message.to_string(),
            fields,
            announcement,
            report,
        }
    }

    fn announcement_fields(&self, fields: &CommitFields) -> HashMap<&'static str, String> {
        HashMap::from([
            ("blog_owner_name", self.blog_owner_name.clone()),
            ("blog_url", self.blog_url.clone()),
            ("post_name", fields.post_name.clone()),
            ("post_title", fields.post_title.clone()),
        ])
    }
}
