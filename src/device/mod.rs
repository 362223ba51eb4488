//! Local device collaborators.
//!
//! The coordinators never talk to the codec directly. They go through
//! [`DeviceControl`] for status and call directives and [`UiSurface`] for the
//! on-screen prompt, so both can be swapped for fakes in tests.

pub mod panel;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::auth::{AuthRequestKind, ParticipantRole};

pub use panel::{PanelDefinition, PanelRow, Widget, WidgetAction, WidgetIdError, WidgetKind};

/// Full output level for a selected interpretation channel.
pub const FULL_MIXER_LEVEL: u8 = 100;

/// An interpreted-audio feed announced by the active call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretationChannel {
    pub code: String,
    #[serde(default)]
    pub name: String,
}

impl InterpretationChannel {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    pub fn matches(&self, language: &str) -> bool {
        self.code.eq_ignore_ascii_case(language) || self.name.eq_ignore_ascii_case(language)
    }
}

/// Whether the active call lets the device add participants itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipantAdd {
    Available,
    Unavailable,
}

impl ParticipantAdd {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("Unavailable") {
            Self::Unavailable
        } else {
            Self::Available
        }
    }
}

/// Subset of the conference status the coordinators read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConferenceStatus {
    pub authentication_request: Option<AuthRequestKind>,
    pub participant_add: Option<ParticipantAdd>,
    pub languages: Vec<InterpretationChannel>,
}

/// Subset of the active call status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveCall {
    pub id: Option<u64>,
    pub callback_number: Option<String>,
    pub display_name: Option<String>,
}

impl ActiveCall {
    /// Keypad page title: display name, else callback number, else "Meeting".
    pub fn meeting_title(&self) -> String {
        [&self.display_name, &self.callback_number]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| "Meeting".to_string())
    }
}

#[async_trait]
pub trait DeviceControl: Send + Sync {
    async fn serial_number(&self) -> Result<String>;

    async fn conference_status(&self) -> Result<ConferenceStatus>;

    async fn active_call(&self) -> Result<Option<ActiveCall>>;

    async fn select_interpretation_language(&self, code: &str) -> Result<()>;

    async fn set_interpretation_mixer(&self, level: u8) -> Result<()>;

    async fn disconnect_call(&self) -> Result<()>;

    /// Answers the meeting's authentication request. `pin` is omitted for a
    /// role-only response.
    async fn authentication_response(&self, role: ParticipantRole, pin: Option<&str>) -> Result<()>;
}

#[async_trait]
pub trait UiSurface: Send + Sync {
    async fn save_panel(&self, panel: &PanelDefinition) -> Result<()>;

    async fn open_panel(&self, panel_id: &str) -> Result<()>;

    async fn close_panel(&self) -> Result<()>;

    async fn set_widget_value(&self, widget_id: &str, value: &str) -> Result<()>;
}
