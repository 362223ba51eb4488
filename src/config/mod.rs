use crate::auth::ParticipantRole;
use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoints: Vec<EndpointConfig>,
    pub coordinator: CoordinatorConfig,
    pub transport: TransportConfig,
    pub device: DeviceConfig,
    pub api: ApiConfig,
    pub localization: Localization,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Id of the custom panel used for role and PIN prompts.
    pub panel_id: String,
    /// Outgoing calls whose remote number ends with this are tracked.
    pub meeting_domain: String,
    /// Mixer level applied when a language device binds its channel.
    pub mixer_level: u8,
    /// Log every handled event at info level.
    pub debugging: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            panel_id: "simacro".to_string(),
            meeting_domain: "webex.com".to_string(),
            mixer_level: 100,
            debugging: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub timeout_seconds: u64,
    pub scheme: String,
    /// Devices ship self-signed certificates; trust comes from this file.
    pub accept_invalid_certs: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 5,
            scheme: "https".to_string(),
            accept_invalid_certs: true,
        }
    }
}

/// The codec this process runs next to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub address: String,
    pub username: String,
    pub password: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: "localhost".to_string(),
            username: "admin".to_string(),
            password: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Interface the event ingress binds to.
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3939,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// `floor` for the main codec, otherwise the interpretation language code.
    pub language: String,
    pub address: String,
    pub serial: String,
    pub username: String,
    pub password: String,
}

/// User-facing prompt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Localization {
    pub host_or_guest_prompt: String,
    pub panelist_or_attendee_prompt: String,
    pub guest_pin_prompt: String,
    pub host_pin_prompt: String,
    pub panelist_pin_prompt: String,
    pub default_pin_prompt: String,
    pub pin_error: String,
}

impl Default for Localization {
    fn default() -> Self {
        Self {
            host_or_guest_prompt: "Are you the meeting host?".to_string(),
            panelist_or_attendee_prompt: "Are you a Panelist or Attendee?".to_string(),
            guest_pin_prompt: "Enter the meeting password followed by #".to_string(),
            host_pin_prompt: "Enter the host key or personal room PIN followed by #".to_string(),
            panelist_pin_prompt: "Enter the webinar Panelist password followed by #".to_string(),
            default_pin_prompt: "Enter PIN".to_string(),
            pin_error: "Incorrect numeric meeting password, please try again.".to_string(),
        }
    }
}

impl Localization {
    pub fn pin_prompt(&self, role: ParticipantRole) -> &str {
        match role {
            ParticipantRole::Guest => &self.guest_pin_prompt,
            ParticipantRole::Host => &self.host_pin_prompt,
            ParticipantRole::Panelist => &self.panelist_pin_prompt,
            ParticipantRole::Attendee => &self.default_pin_prompt,
        }
    }
}

impl Config {
    /// Loads from `path`, or the default location when `None`. A missing file
    /// is created with defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!(
            "Loaded config from {:?} ({} endpoints)",
            config_path,
            config.endpoints.len()
        );
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}
