//! Telegram Bot API error types.

use thiserror::Error;

/// Errors raised while delivering a message through the Bot API.
#[derive(Debug, Error)]
pub enum SendError {
    /// The API rejected the request (bad chat id, bot not in channel,
    /// malformed markup, ...). Carries the `description` from the response.
    #[error("telegram API error (HTTP {status}): {description}")]
    Api { status: u16, description: String },

    /// The request never produced an API response (connect, TLS, or
    /// protocol failure).
    #[error("telegram request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_status_and_description() {
        let err = SendError::Api {
            status: 400,
            description: "chat not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "telegram API error (HTTP 400): chat not found"
        );
    }
}
