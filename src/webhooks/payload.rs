//! Typed access to push-event payload fields.
//!
//! A `push` delivery carries the head commit under `head_commit`; its
//! `message` field is the only part of the payload this service reads.

use serde_json::Value;

/// Extracts the head commit message from a push payload.
///
/// Returns `None` when the payload has no `head_commit` object or the commit
/// has no string `message` (e.g. a branch deletion push, where `head_commit`
/// is `null`).
pub fn head_commit_message(payload: &Value) -> Option<&str> {
    payload.get("head_commit")?.get("message")?.as_str()
}
