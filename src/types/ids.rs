//! Newtype wrappers for domain identifiers.
//!
//! These types prevent accidental mixing of different numeric configuration
//! values and make the code more self-documenting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Telegram chat identifier addressing a destination channel.
///
/// Channel and supergroup ids as reported by the Bot API are large negative
/// integers (e.g. `-1001234567890`); private chats are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub i64);

impl ChannelId {
    /// Returns the raw chat id for use in API request bodies.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ChannelId {
    fn from(id: i64) -> Self {
        ChannelId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_raw_id() {
        assert_eq!(ChannelId(-1001234567890).to_string(), "-1001234567890");
    }

    #[test]
    fn serde_is_transparent() {
        let id: ChannelId = serde_json::from_str("-42").unwrap();
        assert_eq!(id, ChannelId(-42));
        assert_eq!(serde_json::to_string(&id).unwrap(), "-42");
    }
}
