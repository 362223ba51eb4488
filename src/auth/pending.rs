//! Animated "validating" indicator shown while the meeting checks a PIN.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, warn};

use crate::device::UiSurface;

pub const PENDING_GLYPHS: [&str; 4] = ["◜", "◝", "◞", "◟"];
pub const PENDING_TICK: Duration = Duration::from_millis(300);

/// Cycles [`PENDING_GLYPHS`] on a display widget until stopped.
///
/// The tick task is aborted by [`stop`](Self::stop) and on drop, so a
/// forgotten indicator cannot keep ticking.
pub struct PendingIndicator {
    ui: Arc<dyn UiSurface>,
    widget_id: String,
    tick: Duration,
    handle: Option<JoinHandle<()>>,
}

impl PendingIndicator {
    pub fn new(ui: Arc<dyn UiSurface>, widget_id: impl Into<String>) -> Self {
        Self {
            ui,
            widget_id: widget_id.into(),
            tick: PENDING_TICK,
            handle: None,
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        let ui = Arc::clone(&self.ui);
        let widget_id = self.widget_id.clone();
        let tick = self.tick;

        debug!("Starting pending indicator on {}", widget_id);
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + tick, tick);
            let mut frame = 0usize;
            loop {
                ticker.tick().await;
                frame = (frame + 1) % PENDING_GLYPHS.len();
                if let Err(e) = ui.set_widget_value(&widget_id, PENDING_GLYPHS[frame]).await {
                    warn!("Failed to update pending indicator: {}", e);
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("Stopping pending indicator on {}", self.widget_id);
            handle.abort();
        }
    }
}

impl Drop for PendingIndicator {
    fn drop(&mut self) {
        self.stop();
    }
}
