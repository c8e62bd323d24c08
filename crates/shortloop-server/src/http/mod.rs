//! The text/JSON front-end.

pub mod error;
pub mod handlers;
pub mod model;

use axum::routing::{get, post};
use axum::Router;
use shortloop_core::Shortener;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use self::handlers::{health_handler, resolve_handler, shorten_handler};

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
}

impl AppState {
    pub fn new(shortener: Arc<dyn Shortener>) -> Self {
        Self { shortener }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/shorten", post(shorten_handler))
        .route("/resolve/{short_url}", get(resolve_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
