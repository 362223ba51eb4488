//! `GET /status`: resolved role, authentication phase and tracked call.

use axum::{extract::State, response::Json, routing::get, Router};

use crate::app::{CoordinatorStatus, CoordinatorStatusHandle};

pub fn router(status: CoordinatorStatusHandle) -> Router {
    Router::new()
        .route("/status", get(coordinator_status))
        .with_state(status)
}

async fn coordinator_status(State(status): State<CoordinatorStatusHandle>) -> Json<CoordinatorStatus> {
    Json(status.get().await)
}
