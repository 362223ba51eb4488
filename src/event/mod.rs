//! Notifications delivered to the coordinator queue.

use serde::{Deserialize, Serialize};

use crate::auth::AuthRequestKind;
use crate::call::CallStatusUpdate;
use crate::device::InterpretationChannel;

/// Widget interaction type we react to.
pub const CLICKED: &str = "clicked";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    CallStatus(CallStatusUpdate),
    AuthenticationRequest {
        kind: AuthRequestKind,
    },
    PinEntered {
        #[serde(default)]
        authenticating: bool,
        #[serde(default)]
        digits_entered: u32,
    },
    PinError,
    InterpretationLanguage(InterpretationChannel),
    WidgetAction {
        widget_id: String,
        #[serde(default = "default_action")]
        action: String,
    },
    PageClosed {
        page_id: String,
    },
}

fn default_action() -> String {
    CLICKED.to_string()
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CallStatus(_) => "call_status",
            Self::AuthenticationRequest { .. } => "authentication_request",
            Self::PinEntered { .. } => "pin_entered",
            Self::PinError => "pin_error",
            Self::InterpretationLanguage(_) => "interpretation_language",
            Self::WidgetAction { .. } => "widget_action",
            Self::PageClosed { .. } => "page_closed",
        }
    }
}
