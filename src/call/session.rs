//! Call status notifications and the tracked meeting call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallDirection {
    Incoming,
    Outgoing,
    #[default]
    #[serde(other)]
    Unknown,
}

impl CallDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
            Self::Unknown => "unknown",
        }
    }
}

/// One call status notification. A `ghost` update means the call is gone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallStatusUpdate {
    pub id: u64,
    pub ghost: bool,
    pub direction: CallDirection,
    pub remote_number: String,
    pub callback_number: Option<String>,
    pub display_name: Option<String>,
}

impl CallStatusUpdate {
    pub fn outgoing(id: u64, remote_number: impl Into<String>) -> Self {
        Self {
            id,
            direction: CallDirection::Outgoing,
            remote_number: remote_number.into(),
            ..Default::default()
        }
    }

    pub fn ghost(id: u64) -> Self {
        Self {
            id,
            ghost: true,
            ..Default::default()
        }
    }

    /// Whether this is an outgoing call into a meeting on `domain`.
    pub fn is_meeting_call(&self, domain: &str) -> bool {
        self.direction == CallDirection::Outgoing
            && !domain.is_empty()
            && self.remote_number.trim().ends_with(domain)
    }
}

/// The outgoing meeting call the floor device is currently in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSession {
    pub id: u64,
    pub direction: CallDirection,
    pub remote_number: String,
    pub callback_number: Option<String>,
    pub observed_at: DateTime<Utc>,
}

impl CallSession {
    pub fn from_update(update: &CallStatusUpdate) -> Self {
        Self {
            id: update.id,
            direction: update.direction,
            remote_number: update.remote_number.clone(),
            callback_number: update
                .callback_number
                .clone()
                .filter(|number| !number.trim().is_empty()),
            observed_at: Utc::now(),
        }
    }
}
