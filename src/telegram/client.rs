//! Bot API client implementing the dispatch transport.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::SendError;
use crate::dispatch::{Transport, TransportSession};
use crate::types::ChannelId;

/// Default Bot API host. Self-hosted Bot API servers can override it.
const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// How outbound message text is interpreted by Telegram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// No markup; the text is shown verbatim.
    Plain,
    /// Legacy Markdown, the mode the announcement templates are written in.
    #[default]
    Markdown,
    /// MarkdownV2 (requires escaping in templates).
    Markdownv2,
    /// HTML markup.
    Html,
}

impl ParseMode {
    /// The `parse_mode` value for the API request, or `None` for plain text.
    pub fn as_api_value(&self) -> Option<&'static str> {
        match self {
            ParseMode::Plain => None,
            ParseMode::Markdown => Some("Markdown"),
            ParseMode::Markdownv2 => Some("MarkdownV2"),
            ParseMode::Html => Some("HTML"),
        }
    }
}

/// A Bot API transport bound to one bot token.
///
/// Holds only configuration; the HTTP client lives in the per-dispatch
/// [`TelegramSession`].
#[derive(Clone)]
pub struct TelegramTransport {
    token: String,
    parse_mode: ParseMode,
    api_base: String,
}

impl TelegramTransport {
    /// Creates a transport for the given bot token (from @BotFather).
    pub fn new(token: impl Into<String>) -> Self {
        TelegramTransport {
            token: token.into(),
            parse_mode: ParseMode::default(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Sets the parse mode applied to every outbound message.
    pub fn with_parse_mode(mut self, parse_mode: ParseMode) -> Self {
        self.parse_mode = parse_mode;
        self
    }

    /// Points the transport at a self-hosted Bot API server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

impl std::fmt::Debug for TelegramTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The token is a credential; never include it in debug output.
        f.debug_struct("TelegramTransport")
            .field("parse_mode", &self.parse_mode)
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl Transport for TelegramTransport {
    type Error = SendError;
    type Session = TelegramSession;

    async fn connect(&self) -> Result<TelegramSession, SendError> {
        let http = reqwest::Client::builder().build()?;
        debug!("telegram session opened");
        Ok(TelegramSession {
            http,
            send_url: format!("{}/bot{}/sendMessage", self.api_base, self.token),
            parse_mode: self.parse_mode,
        })
    }
}

/// One dispatch's worth of Bot API access.
pub struct TelegramSession {
    http: reqwest::Client,
    send_url: String,
    parse_mode: ParseMode,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
}

/// The envelope every Bot API response arrives in.
#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TransportSession for TelegramSession {
    type Error = SendError;

    async fn send(&self, destination: ChannelId, text: &str) -> Result<(), SendError> {
        let response = self
            .http
            .post(&self.send_url)
            .json(&SendMessageRequest {
                chat_id: destination.as_i64(),
                text,
                parse_mode: self.parse_mode.as_api_value(),
            })
            .send()
            .await?;

        let status = response.status();
        let body: ApiResponse = response.json().await.unwrap_or(ApiResponse {
            ok: status.is_success(),
            description: None,
        });

        if body.ok {
            return Ok(());
        }
        Err(SendError::Api {
            status: status.as_u16(),
            description: body
                .description
                .unwrap_or_else(|| "no description".to_string()),
        })
    }

    async fn close(self) {
        // Dropping the client tears down its connection pool; the Bot API
        // keeps no server-side session state to release.
        debug!("telegram session closed");
    }
}
