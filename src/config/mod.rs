//! Startup configuration.
//!
//! Configuration is read once from a TOML file and validated eagerly:
//! every defect a template or channel list can carry (missing placeholder,
//! unknown announcement key, empty destination list) fails startup with a
//! descriptive error instead of surfacing on the first webhook.
//!
//! # File format
//!
//! ```toml
//! [bot]
//! telegram_bot_token = "12345:TOKEN"
//!
//! [webhook]
//! secret_token = "shared-secret"
//! commit_template = "post: <post_name> <post_title>"
//!
//! [blog]
//! blog_url = "https://example.com/blog"
//! blog_owner_name = "Jane Doe"
//!
//! [telegram_channel]
//! channel_ids = [-1001234567890]
//! post_template = "*{post_title}*\n{blog_url}/{post_name}"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::announce::{self, RenderError};
use crate::matcher::{CommitTemplate, TemplateError};
use crate::telegram::ParseMode;
use crate::types::ChannelId;

fn default_send_timeout_secs() -> u64 {
    10
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid commit template: {0}")]
    CommitTemplate(#[from] TemplateError),

    #[error("invalid post template: {0}")]
    PostTemplate(#[from] RenderError),

    #[error("at least one destination channel id is required")]
    NoDestinations,
}

/// The complete service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bot: BotConfig,
    pub webhook: WebhookConfig,
    pub blog: BlogConfig,
    pub telegram_channel: ChannelConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Bot credential.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Telegram bot token from @BotFather.
    pub telegram_bot_token: String,
}

/// Inbound webhook settings.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Shared secret the hosting platform signs deliveries with.
    pub secret_token: String,
    /// Commit template with the `<post_name>` and `<post_title>` placeholders.
    pub commit_template: String,
}

/// Static metadata substituted into announcements.
#[derive(Debug, Clone, Deserialize)]
pub struct BlogConfig {
    pub blog_url: String,
    pub blog_owner_name: String,
}

/// Outbound announcement settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    /// Destination channels, announced to in this order.
    pub channel_ids: Vec<ChannelId>,
    /// Announcement template with `{key}` placeholders.
    pub post_template: String,
    #[serde(default)]
    pub parse_mode: ParseMode,
    /// Upper bound on a single delivery attempt.
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen: default_listen(),
        }
    }
}

impl Config {
    /// Reads and validates the configuration file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants a deserialized configuration must uphold.
    ///
    /// Both templates are exercised here so that a defect fails startup;
    /// the pipeline re-compiles the commit template for actual use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        CommitTemplate::compile(&self.webhook.commit_template)?;
        announce::validate_template(&self.telegram_channel.post_template)?;
        if self.telegram_channel.channel_ids.is_empty() {
            return Err(ConfigError::NoDestinations);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID: &str = r#"
[bot]
telegram_bot_token = "12345:TOKEN"

[webhook]
secret_token = "shared-secret"
commit_template = "post: <post_name> <post_title>"

[blog]
blog_url = "https://example.com/blog"
blog_owner_name = "Jane Doe"

[telegram_channel]
channel_ids = [-1001234567890, -1009876543210]
post_template = "*{post_title}* by {blog_owner_name}: {blog_url}/{post_name}"
"#;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_a_valid_file() {
        let file = write_config(VALID);
        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.webhook.secret_token, "shared-secret");
        assert_eq!(config.telegram_channel.channel_ids.len(), 2);
        assert_eq!(config.blog.blog_owner_name, "Jane Doe");
    }

    #[test]
    fn defaults_apply_when_optional_fields_are_absent() {
        let file = write_config(VALID);
        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.server.listen, "0.0.0.0:3000");
        assert_eq!(config.telegram_channel.send_timeout_secs, 10);
        assert_eq!(config.telegram_channel.parse_mode, ParseMode::Markdown);
    }

    #[test]
    fn explicit_server_section_overrides_the_default() {
        let file = write_config(&format!("{VALID}\n[server]\nlisten = \"127.0.0.1:8080\"\n"));
        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.server.listen, "127.0.0.1:8080");
    }

    #[test]
    fn commit_template_without_placeholders_fails_startup() {
        let broken = VALID.replace(
            "post: <post_name> <post_title>",
            "post with no placeholders",
        );
        let file = write_config(&broken);

        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::CommitTemplate(_))
        ));
    }

    #[test]
    fn post_template_with_unknown_key_fails_startup() {
        let broken = VALID.replace("{post_title}", "{post_titel}");
        let file = write_config(&broken);

        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::PostTemplate(_))
        ));
    }

    #[test]
    fn empty_channel_list_fails_startup() {
        let broken = VALID.replace("[-1001234567890, -1009876543210]", "[]");
        let file = write_config(&broken);

        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::NoDestinations)
        ));
    }

    #[test]
    fn missing_section_is_a_parse_error() {
        let broken = VALID.replace("[blog]", "[blag]");
        let file = write_config(&broken);

        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.toml");

        assert!(matches!(Config::load(&path), Err(ConfigError::Io(_))));
    }
}
