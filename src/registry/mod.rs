//! Peer registry and local role resolution.
//!
//! The registry is the static table of every device taking part in an
//! interpreted meeting: exactly one floor device plus one device per
//! interpreted language. The local device finds its own entry by hardware
//! serial number once at startup.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::EndpointConfig;

/// Language value that marks the floor device in configuration.
pub const FLOOR_LANGUAGE: &str = "floor";

/// Errors raised while building the registry from configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no floor endpoint configured")]
    MissingFloor,

    #[error("more than one floor endpoint configured ({0} found)")]
    MultipleFloors(usize),

    #[error("language '{0}' is assigned to more than one endpoint")]
    DuplicateLanguage(String),

    #[error("endpoint {0} has an empty language code")]
    EmptyLanguage(String),
}

/// What an endpoint does in the meeting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "language", rename_all = "lowercase")]
pub enum Role {
    Floor,
    Language(String),
}

impl Role {
    pub fn from_language(language: &str) -> Self {
        let trimmed = language.trim();
        if trimmed.eq_ignore_ascii_case(FLOOR_LANGUAGE) {
            Role::Floor
        } else {
            Role::Language(trimmed.to_string())
        }
    }

    pub fn language(&self) -> Option<&str> {
        match self {
            Role::Floor => None,
            Role::Language(code) => Some(code),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Floor => f.write_str(FLOOR_LANGUAGE),
            Role::Language(code) => f.write_str(code),
        }
    }
}

/// Local account used to authenticate against a device's HTTP API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        let token = BASE64.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub role: Role,
    pub address: String,
    pub serial: String,
    pub credentials: Credentials,
}

impl Endpoint {
    pub fn is_floor(&self) -> bool {
        self.role == Role::Floor
    }

    /// True when an interpretation channel announced as `code`/`name`
    /// belongs to this endpoint.
    pub fn serves_language(&self, code: &str, name: &str) -> bool {
        match &self.role {
            Role::Floor => false,
            Role::Language(language) => {
                language.eq_ignore_ascii_case(code) || language.eq_ignore_ascii_case(name)
            }
        }
    }
}

impl From<&EndpointConfig> for Endpoint {
    fn from(config: &EndpointConfig) -> Self {
        Self {
            role: Role::from_language(&config.language),
            address: config.address.clone(),
            serial: config.serial.clone(),
            credentials: Credentials::new(&config.username, &config.password),
        }
    }
}

/// Outcome of matching the local serial against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalRole {
    Floor(Endpoint),
    Language(Endpoint),
    /// The local device is not configured. Nothing else may run.
    Disabled,
}

impl LocalRole {
    pub fn is_disabled(&self) -> bool {
        matches!(self, LocalRole::Disabled)
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        match self {
            LocalRole::Floor(endpoint) | LocalRole::Language(endpoint) => Some(endpoint),
            LocalRole::Disabled => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LocalRole::Floor(_) => "floor",
            LocalRole::Language(_) => "language",
            LocalRole::Disabled => "disabled",
        }
    }
}

/// Matches `local_identity` against each endpoint's serial. First match wins.
pub fn resolve_role(local_identity: &str, endpoints: &[Endpoint]) -> LocalRole {
    let identity = local_identity.trim();
    match endpoints.iter().find(|endpoint| endpoint.serial == identity) {
        Some(endpoint) if endpoint.is_floor() => LocalRole::Floor(endpoint.clone()),
        Some(endpoint) => LocalRole::Language(endpoint.clone()),
        None => LocalRole::Disabled,
    }
}

#[derive(Debug, Clone)]
pub struct PeerRegistry {
    endpoints: Vec<Endpoint>,
}

impl PeerRegistry {
    /// Builds the registry, enforcing one floor and distinct language codes.
    /// Duplicate serials are not checked.
    pub fn new(endpoints: Vec<Endpoint>) -> Result<Self, RegistryError> {
        let floors = endpoints.iter().filter(|e| e.is_floor()).count();
        match floors {
            0 => return Err(RegistryError::MissingFloor),
            1 => {}
            n => return Err(RegistryError::MultipleFloors(n)),
        }

        let mut seen: Vec<String> = Vec::new();
        for endpoint in &endpoints {
            if let Role::Language(code) = &endpoint.role {
                if code.is_empty() {
                    return Err(RegistryError::EmptyLanguage(endpoint.address.clone()));
                }
                let normalized = code.to_ascii_lowercase();
                if seen.contains(&normalized) {
                    return Err(RegistryError::DuplicateLanguage(code.clone()));
                }
                seen.push(normalized);
            }
        }

        Ok(Self { endpoints })
    }

    pub fn from_config(configs: &[EndpointConfig]) -> Result<Self, RegistryError> {
        Self::new(configs.iter().map(Endpoint::from).collect())
    }

    pub fn resolve(&self, local_identity: &str) -> LocalRole {
        resolve_role(local_identity, &self.endpoints)
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn floor(&self) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.is_floor())
    }

    /// Every language endpoint.
    pub fn peers(&self) -> Vec<Endpoint> {
        self.endpoints
            .iter()
            .filter(|e| !e.is_floor())
            .cloned()
            .collect()
    }

    pub fn peer_for_language(&self, code: &str, name: &str) -> Option<&Endpoint> {
        self.endpoints
            .iter()
            .find(|e| e.serves_language(code, name))
    }
}
