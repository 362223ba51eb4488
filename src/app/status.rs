//! Coordinator status shared with the API handlers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::auth::AuthPhase;
use crate::call::CallSession;
use crate::registry::LocalRole;

#[derive(Debug, Clone, Serialize)]
pub struct CoordinatorStatus {
    pub role: &'static str,
    /// Assigned language on a language device.
    pub language: Option<String>,
    pub serial: Option<String>,
    pub auth_phase: &'static str,
    pub call: Option<CallSession>,
    pub events_handled: u64,
    pub last_event: Option<&'static str>,
    pub last_event_at: Option<DateTime<Utc>>,
}

impl Default for CoordinatorStatus {
    fn default() -> Self {
        Self {
            role: LocalRole::Disabled.as_str(),
            language: None,
            serial: None,
            auth_phase: AuthPhase::Idle.as_str(),
            call: None,
            events_handled: 0,
            last_event: None,
            last_event_at: None,
        }
    }
}

/// Thread-safe handle the coordinator writes and API handlers read.
#[derive(Clone, Default)]
pub struct CoordinatorStatusHandle {
    inner: Arc<Mutex<CoordinatorStatus>>,
}

impl CoordinatorStatusHandle {
    pub async fn get(&self) -> CoordinatorStatus {
        self.inner.lock().await.clone()
    }

    pub async fn set_role(&self, role: &LocalRole) {
        let mut state = self.inner.lock().await;
        state.role = role.as_str();
        state.serial = role.endpoint().map(|e| e.serial.clone());
        state.language = role
            .endpoint()
            .and_then(|e| e.role.language())
            .map(str::to_string);
    }

    pub async fn record_event(
        &self,
        name: &'static str,
        auth_phase: AuthPhase,
        call: Option<CallSession>,
    ) {
        let mut state = self.inner.lock().await;
        state.events_handled += 1;
        state.last_event = Some(name);
        state.last_event_at = Some(Utc::now());
        state.auth_phase = auth_phase.as_str();
        state.call = call;
    }
}
