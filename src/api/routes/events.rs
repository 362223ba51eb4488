//! Event ingress: `POST /events` queues one JSON-encoded event.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::post,
    Router,
};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::api::error::{ApiError, ApiResult};
use crate::event::Event;

#[derive(Clone)]
pub struct EventState {
    pub tx: mpsc::Sender<Event>,
}

pub fn router(state: EventState) -> Router {
    Router::new()
        .route("/events", post(queue_event))
        .with_state(state)
}

async fn queue_event(
    State(state): State<EventState>,
    body: Result<Json<Event>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(event) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let name = event.name();
    debug!("Queueing {} event", name);

    state.tx.send(event).await.map_err(|e| {
        error!("Failed to queue {} event: {}", name, e);
        ApiError::unavailable("Coordinator is not running")
    })?;

    Ok(Json(json!({
        "queued": true,
        "type": name,
    })))
}
