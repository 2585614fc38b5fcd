//! Telegram Bot API transport.
//!
//! Implements the [`Transport`](crate::dispatch::Transport) capability over
//! the Bot API's `sendMessage` method. One HTTPS session is opened per
//! dispatch and released afterwards.

pub mod client;
pub mod error;

pub use client::{ParseMode, TelegramSession, TelegramTransport};
pub use error::SendError;
