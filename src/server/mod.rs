//! HTTP server for the announcement bot.
//!
//! # Endpoints
//!
//! - `POST /webhook` - accepts GitHub webhook deliveries
//! - `GET /health` - returns 200 while the server is running

use std::sync::Arc;

pub mod health;
pub mod webhook;

pub use health::health_handler;
pub use webhook::webhook_handler;

use crate::dispatch::Transport;
use crate::pipeline::Pipeline;

/// Shared application state, passed to handlers via axum's `State`
/// extractor.
///
/// Wraps the pipeline (read-only configuration plus the transport handle) in
/// an `Arc`; concurrent requests share it without locks because nothing in
/// it is mutable after startup.
pub struct AppState<T> {
    pipeline: Arc<Pipeline<T>>,
}

impl<T> AppState<T> {
    pub fn new(pipeline: Pipeline<T>) -> Self {
        AppState {
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn pipeline(&self) -> &Pipeline<T> {
        &self.pipeline
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        AppState {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router<T: Transport + 'static>(state: AppState<T>) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/webhook", post(webhook_handler::<T>))
        .route("/health", get(health_handler))
        .with_state(state)
}
