//! [`DeviceControl`] and [`UiSurface`] backed by the local codec's HTTP API.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::document::CommandDocument;
use super::panel::panel_xml;
use super::status;
use crate::auth::ParticipantRole;
use crate::config::DeviceConfig;
use crate::device::{ActiveCall, ConferenceStatus, DeviceControl, PanelDefinition, UiSurface};
use crate::dispatch::HttpTransport;
use crate::registry::Credentials;

const SERIAL_LOCATION: &str = "/Status/SystemUnit/Hardware/Module/SerialNumber";
const CONFERENCE_LOCATION: &str = "/Status/Conference/Call";
const CALL_LOCATION: &str = "/Status/Call";

pub struct XapiDevice {
    transport: HttpTransport,
    address: String,
    credentials: Credentials,
}

impl XapiDevice {
    pub fn new(transport: HttpTransport, config: &DeviceConfig) -> Self {
        Self {
            transport,
            address: config.address.clone(),
            credentials: Credentials::new(&config.username, &config.password),
        }
    }

    async fn command(&self, document: CommandDocument) -> Result<()> {
        debug!("xCommand {}", document.path());
        self.transport
            .post_xml(&self.address, &self.credentials, document.to_xml())
            .await
            .with_context(|| format!("xCommand {} failed", document.path()))?;
        Ok(())
    }

    async fn status(&self, location: &str) -> Result<String> {
        self.transport
            .get_xml(&self.address, &self.credentials, location)
            .await
            .with_context(|| format!("Failed to read {}", location))
    }
}

#[async_trait]
impl DeviceControl for XapiDevice {
    async fn serial_number(&self) -> Result<String> {
        let body = self.status(SERIAL_LOCATION).await?;
        status::parse_serial_number(&body).ok_or_else(|| anyhow!("Device reported no serial number"))
    }

    async fn conference_status(&self) -> Result<ConferenceStatus> {
        let body = self.status(CONFERENCE_LOCATION).await?;
        Ok(status::parse_conference(&body))
    }

    async fn active_call(&self) -> Result<Option<ActiveCall>> {
        let body = self.status(CALL_LOCATION).await?;
        Ok(status::parse_active_call(&body))
    }

    async fn select_interpretation_language(&self, code: &str) -> Result<()> {
        self.command(
            CommandDocument::new(&["Conference", "SimultaneousInterpretation", "SelectLanguage"])
                .param("LanguageCode", code),
        )
        .await
    }

    async fn set_interpretation_mixer(&self, level: u8) -> Result<()> {
        self.command(
            CommandDocument::new(&["Conference", "SimultaneousInterpretation", "SetMixer"])
                .param("Level", level),
        )
        .await
    }

    async fn disconnect_call(&self) -> Result<()> {
        self.command(CommandDocument::new(&["Call", "Disconnect"])).await
    }

    async fn authentication_response(&self, role: ParticipantRole, pin: Option<&str>) -> Result<()> {
        self.command(
            CommandDocument::new(&["Conference", "Call", "AuthenticationResponse"])
                .param("ParticipantRole", role)
                .optional_param("Pin", pin),
        )
        .await
    }
}

#[async_trait]
impl UiSurface for XapiDevice {
    async fn save_panel(&self, panel: &PanelDefinition) -> Result<()> {
        self.command(
            CommandDocument::new(&["UserInterface", "Extensions", "Panel", "Save"])
                .param("PanelId", &panel.panel_id)
                .body(panel_xml(panel)),
        )
        .await
    }

    async fn open_panel(&self, panel_id: &str) -> Result<()> {
        self.command(
            CommandDocument::new(&["UserInterface", "Extensions", "Panel", "Open"])
                .param("PanelId", panel_id),
        )
        .await
    }

    async fn close_panel(&self) -> Result<()> {
        self.command(CommandDocument::new(&["UserInterface", "Extensions", "Panel", "Close"]))
            .await
    }

    async fn set_widget_value(&self, widget_id: &str, value: &str) -> Result<()> {
        self.command(
            CommandDocument::new(&["UserInterface", "Extensions", "Widget", "SetValue"])
                .param("Value", value)
                .param("WidgetId", widget_id),
        )
        .await
    }
}
