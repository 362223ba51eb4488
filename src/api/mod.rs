//! Local HTTP ingress.
//!
//! Provides HTTP endpoints for:
//! - Event delivery from the device's event feed (POST /events)
//! - Coordinator status (GET /status)

pub mod error;
pub mod routes;

use crate::app::CoordinatorStatusHandle;
use crate::config::Config;
use crate::event::Event;
use anyhow::{Context, Result};
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::info;

pub use routes::events::EventState;

pub struct ApiServer {
    host: String,
    port: u16,
    events: EventState,
    status: CoordinatorStatusHandle,
}

impl ApiServer {
    pub fn new(tx: mpsc::Sender<Event>, status: CoordinatorStatusHandle, config: &Config) -> Self {
        Self {
            host: config.api.host.clone(),
            port: config.api.port,
            events: EventState { tx },
            status,
        }
    }

    pub fn router(self) -> Router {
        Router::new()
            .route("/", get(service_info))
            .route("/version", get(version))
            .merge(routes::events::router(self.events))
            .merge(routes::status::router(self.status))
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub async fn start(self) -> Result<()> {
        let address = self.address();
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind API address {}", address))?;

        info!("API server listening on http://{}", address);
        info!("Endpoints:");
        info!("  GET  /         - Service info");
        info!("  GET  /version  - Version info");
        info!("  POST /events   - Queue a device event");
        info!("  GET  /status   - Coordinator status");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn service_info() -> Json<Value> {
    Json(json!({
        "service": "siminterp",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "siminterp"
    }))
}
