use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use post_herald::config::Config;
use post_herald::pipeline::Pipeline;
use post_herald::server::{build_router, AppState};
use post_herald::telegram::TelegramTransport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "post_herald=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "post-herald.toml".to_string());
    let config = Config::load(Path::new(&config_path))
        .with_context(|| format!("loading configuration from {config_path}"))?;

    let transport = TelegramTransport::new(config.bot.telegram_bot_token.clone())
        .with_parse_mode(config.telegram_channel.parse_mode);
    tracing::info!(
        channels = config.telegram_channel.channel_ids.len(),
        "telegram transport initialized"
    );

    let pipeline = Pipeline::new(&config, transport).context("building pipeline")?;
    let app = build_router(AppState::new(pipeline));

    let addr: SocketAddr = config
        .server
        .listen
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server.listen))?;
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
