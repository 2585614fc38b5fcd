//! Inbound GitHub webhook handling.
//!
//! This module provides:
//! - Signature verification for webhook payloads (HMAC-SHA256)
//! - Typed access to the fields of a `push` payload

pub mod payload;
pub mod signature;

pub use payload::head_commit_message;
pub use signature::{
    compute_signature, format_signature_header, parse_signature_header, verify_signature,
};

/// The event-type header value for repository push events.
///
/// All other event types are acknowledged and ignored.
pub const PUSH_EVENT: &str = "push";
