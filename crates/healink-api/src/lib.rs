//! HTTP layer for the Healink telemetry core.
//!
//! Exposes an axum [`Router`] backed by any store implementing the
//! `healink-core` traits. Session resolution, TLS, and the admin CRUD
//! screens are the caller's responsibility; this crate covers the device
//! write path, the per-viewer live feed, and the alert lifecycle.

pub mod alerts;
pub mod auth;
pub mod error;
pub mod history;
pub mod ingest;
pub mod stream;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use healink_core::store::{AlertStore, AssociationDirectory, TelemetryStore};

use auth::DeviceKey;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  /// Pre-shared secret devices present to `POST /api/update`.
  pub device_api_key: String,
  /// Live-feed poll interval. One tick bounds both delivery latency and
  /// how quickly a dropped subscriber is noticed.
  #[serde(default = "default_poll_interval_ms")]
  pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 { 1000 }

impl ServerConfig {
  pub fn poll_interval(&self) -> Duration {
    Duration::from_millis(self.poll_interval_ms)
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Arc<DeviceKey>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the telemetry API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: TelemetryStore
    + AlertStore
    + AssociationDirectory
    + Clone
    + Send
    + Sync
    + 'static,
{
  Router::new()
    // Telemetry
    .route("/api/update", post(ingest::update::<S>))
    .route("/api/history", get(history::history::<S>))
    .route("/api/stream", get(stream::subscribe::<S>))
    // Alerts
    .route("/api/trigger_sos", get(alerts::trigger_sos::<S>))
    .route("/api/check_sos", get(alerts::check_sos::<S>))
    .route("/api/dismiss_sos", post(alerts::dismiss_sos::<S>))
    .route("/api/active_sos", get(alerts::active_sos::<S>))
    .route("/api/meds", get(alerts::pending_meds::<S>))
    .route("/api/meds_update", get(alerts::meds_update::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
