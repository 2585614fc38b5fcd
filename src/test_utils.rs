//! Shared test doubles and fixtures.
//!
//! `MockTransport` records every connect, send, and close so tests can assert
//! on delivery order and on the session being released exactly once.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::config::{BlogConfig, BotConfig, ChannelConfig, Config, ServerConfig, WebhookConfig};
use crate::dispatch::{Transport, TransportSession};
use crate::telegram::ParseMode;
use crate::types::ChannelId;

/// Observable transport events, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    Connected,
    Sent(ChannelId),
    SendFailed(ChannelId),
    Closed,
}

/// Error type returned by the mock transport.
#[derive(Debug)]
pub struct MockError(pub String);

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A scripted in-memory transport.
#[derive(Clone, Default)]
pub struct MockTransport {
    fail_sends: HashMap<i64, String>,
    hang_sends: HashSet<i64>,
    fail_connect: Option<String>,
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    sent: Vec<(ChannelId, String)>,
    events: Vec<MockEvent>,
}

impl MockTransport {
    /// Sends to the given channel fail with `reason`.
    pub fn failing(mut self, channel: i64, reason: &str) -> Self {
        self.fail_sends.insert(channel, reason.to_string());
        self
    }

    /// Sends to the given channel never complete.
    pub fn hanging(mut self, channel: i64) -> Self {
        self.hang_sends.insert(channel);
        self
    }

    /// Session opening fails with `reason`.
    pub fn failing_connect(mut self, reason: &str) -> Self {
        self.fail_connect = Some(reason.to_string());
        self
    }

    /// Successfully delivered messages, in send order.
    pub fn sent(&self) -> Vec<(ChannelId, String)> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Number of sessions opened.
    pub fn connects(&self) -> usize {
        self.count(|e| matches!(e, MockEvent::Connected))
    }

    /// Number of sessions released.
    pub fn closes(&self) -> usize {
        self.count(|e| matches!(e, MockEvent::Closed))
    }

    /// True if the (single) close happened after every send attempt.
    pub fn closed_after_all_sends(&self) -> bool {
        let state = self.state.lock().unwrap();
        match state.events.iter().position(|e| *e == MockEvent::Closed) {
            Some(index) => index == state.events.len() - 1,
            None => false,
        }
    }

    fn count(&self, predicate: impl Fn(&MockEvent) -> bool) -> usize {
        self.state
            .lock()
            .unwrap()
            .events
            .iter()
            .filter(|e| predicate(e))
            .count()
    }

    fn record(&self, event: MockEvent) {
        self.state.lock().unwrap().events.push(event);
    }
}

impl Transport for MockTransport {
    type Error = MockError;
    type Session = MockSession;

    async fn connect(&self) -> Result<MockSession, MockError> {
        if let Some(reason) = &self.fail_connect {
            return Err(MockError(reason.clone()));
        }
        self.record(MockEvent::Connected);
        Ok(MockSession {
            transport: self.clone(),
        })
    }
}

/// A session handed out by [`MockTransport`].
pub struct MockSession {
    transport: MockTransport,
}

impl TransportSession for MockSession {
    type Error = MockError;

    async fn send(&self, destination: ChannelId, text: &str) -> Result<(), MockError> {
        if self.transport.hang_sends.contains(&destination.0) {
            return std::future::pending().await;
        }
        if let Some(reason) = self.transport.fail_sends.get(&destination.0) {
            self.transport.record(MockEvent::SendFailed(destination));
            return Err(MockError(reason.clone()));
        }

        let mut state = self.transport.state.lock().unwrap();
        state.sent.push((destination, text.to_string()));
        state.events.push(MockEvent::Sent(destination));
        Ok(())
    }

    async fn close(self) {
        self.transport.record(MockEvent::Closed);
    }
}

/// A complete configuration with two destination channels, used by pipeline
/// and server tests.
pub fn test_config() -> Config {
    Config {
        bot: BotConfig {
            telegram_bot_token: "12345:TEST-TOKEN".to_string(),
        },
        webhook: WebhookConfig {
            secret_token: "test-secret".to_string(),
            commit_template: "post: <post_name> <post_title>".to_string(),
        },
        blog: BlogConfig {
            blog_url: "https://example.com/blog".to_string(),
            blog_owner_name: "Octocat".to_string(),
        },
        telegram_channel: ChannelConfig {
            channel_ids: vec![ChannelId(-1001), ChannelId(-1002)],
            post_template: "*{post_title}* by {blog_owner_name}\n{blog_url}/{post_name}"
                .to_string(),
            parse_mode: ParseMode::Markdown,
            send_timeout_secs: 10,
        },
        server: ServerConfig::default(),
    }
}

/// A minimal push payload whose head commit carries `message`.
pub fn push_payload(message: &str) -> serde_json::Value {
    serde_json::json!({
        "ref": "refs/heads/main",
        "head_commit": {
            "id": "a".repeat(40),
            "message": message,
        }
    })
}
