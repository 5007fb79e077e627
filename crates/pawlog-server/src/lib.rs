//! HTML front end and process wiring for pawlog.
//!
//! Serves the single-page weight log at `/` and mounts the JSON API from
//! [`pawlog_api`] under `/api`, both over the same [`WeightStore`].

pub mod pages;
pub mod settings;
pub mod ui;

pub use settings::ServerConfig;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use pawlog_core::store::WeightStore;
use tower_http::trace::TraceLayer;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the page handlers.
pub struct AppState<S: WeightStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

impl<S: WeightStore> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      config: Arc::clone(&self.config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: WeightStore + 'static,
{
  let api = pawlog_api::api_router(Arc::clone(&state.store));

  Router::new()
    .route("/",                    get(pages::index::<S>))
    .route("/entries",             post(pages::submit::<S>))
    .route("/entries/{id}/delete", post(pages::delete::<S>))
    .with_state(state)
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}
