//! Authentication state types: request kinds, participant roles, the digit
//! buffer and the state owned by the coordinator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Glyph shown once per entered digit.
pub const MASK_GLYPH: &str = " • ";

/// Keypad value that removes the last digit.
pub const BACKSPACE_KEY: &str = "⌫";

/// Keypad value that returns to the role choice prompt.
pub const BACK_KEY: &str = "Back";

/// Terminates a PIN on the keypad.
pub const PIN_TERMINATOR: char = '#';

/// What the meeting currently asks of the device, as reported by the
/// conference `AuthenticationRequest` status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthRequestKind {
    /// No authentication pending.
    None,
    HostPinOrGuest,
    HostPinOrGuestPin,
    AnyHostPinOrGuestPin,
    PanelistPin,
    PanelistPinOrAttendeePin,
    PanelistPinOrAttendee,
    GuestPin,
    Unknown(String),
}

impl AuthRequestKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "None",
            Self::HostPinOrGuest => "HostPinOrGuest",
            Self::HostPinOrGuestPin => "HostPinOrGuestPin",
            Self::AnyHostPinOrGuestPin => "AnyHostPinOrGuestPin",
            Self::PanelistPin => "PanelistPin",
            Self::PanelistPinOrAttendeePin => "PanelistPinOrAttendeePin",
            Self::PanelistPinOrAttendee => "PanelistPinOrAttendee",
            Self::GuestPin => "GuestPin",
            Self::Unknown(value) => value,
        }
    }

    /// The role question this request needs answered, if any.
    pub fn role_choice(&self) -> Option<RoleChoice> {
        match self {
            Self::HostPinOrGuest | Self::HostPinOrGuestPin => Some(RoleChoice::HostOrGuest),
            Self::PanelistPinOrAttendeePin | Self::PanelistPinOrAttendee => {
                Some(RoleChoice::PanelistOrAttendee)
            }
            _ => None,
        }
    }
}

impl From<String> for AuthRequestKind {
    fn from(value: String) -> Self {
        match value.trim() {
            "None" | "" => Self::None,
            "HostPinOrGuest" => Self::HostPinOrGuest,
            "HostPinOrGuestPin" => Self::HostPinOrGuestPin,
            "AnyHostPinOrGuestPin" => Self::AnyHostPinOrGuestPin,
            "PanelistPin" => Self::PanelistPin,
            "PanelistPinOrAttendeePin" => Self::PanelistPinOrAttendeePin,
            "PanelistPinOrAttendee" => Self::PanelistPinOrAttendee,
            "GuestPin" => Self::GuestPin,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<&str> for AuthRequestKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<AuthRequestKind> for String {
    fn from(kind: AuthRequestKind) -> Self {
        kind.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipantRole {
    Host,
    Guest,
    Panelist,
    Attendee,
}

impl ParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Host => "Host",
            Self::Guest => "Guest",
            Self::Panelist => "Panelist",
            Self::Attendee => "Attendee",
        }
    }
}

impl fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParticipantRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "host" => Ok(Self::Host),
            "guest" => Ok(Self::Guest),
            "panelist" => Ok(Self::Panelist),
            "attendee" => Ok(Self::Attendee),
            _ => Err(s.to_string()),
        }
    }
}

/// A two-way role question shown before the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChoice {
    HostOrGuest,
    PanelistOrAttendee,
}

impl RoleChoice {
    /// Button labels and the role each one selects.
    pub fn options(&self) -> [(&'static str, ParticipantRole); 2] {
        match self {
            Self::HostOrGuest => [("Yes", ParticipantRole::Host), ("No", ParticipantRole::Guest)],
            Self::PanelistOrAttendee => [
                ("Panelist", ParticipantRole::Panelist),
                ("Attendee", ParticipantRole::Attendee),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    Idle,
    RoleSelectionPrompt,
    PinEntry,
    Submitting,
}

impl AuthPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::RoleSelectionPrompt => "role_selection_prompt",
            Self::PinEntry => "pin_entry",
            Self::Submitting => "submitting",
        }
    }
}

/// Digits typed on the keypad, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigitBuffer {
    digits: String,
}

impl DigitBuffer {
    pub fn push(&mut self, key: &str) {
        self.digits.push_str(key);
    }

    pub fn backspace(&mut self) {
        self.digits.pop();
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.digits)
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    pub fn len(&self) -> usize {
        self.digits.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// One mask glyph per buffered character.
    pub fn masked(&self) -> String {
        MASK_GLYPH.repeat(self.len())
    }
}

#[derive(Debug, Clone)]
pub struct AuthenticationState {
    pub phase: AuthPhase,
    pub request_kind: Option<AuthRequestKind>,
    pub choice: Option<RoleChoice>,
    pub role: Option<ParticipantRole>,
    pub buffer: DigitBuffer,
    /// Digits that were in the buffer when the meeting accepted them.
    pub accepted_pin: Option<String>,
    pub pending: bool,
    pub error: bool,
}

impl Default for AuthenticationState {
    fn default() -> Self {
        Self {
            phase: AuthPhase::Idle,
            request_kind: None,
            choice: None,
            role: None,
            buffer: DigitBuffer::default(),
            accepted_pin: None,
            pending: false,
            error: false,
        }
    }
}

impl AuthenticationState {
    /// Buffered digits, or the accepted PIN once the buffer has been reset.
    pub fn collected_pin(&self) -> Option<&str> {
        if !self.buffer.is_empty() {
            return Some(self.buffer.as_str());
        }
        self.accepted_pin.as_deref().filter(|pin| !pin.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_kind_parsing() {
        assert_eq!(AuthRequestKind::from("None"), AuthRequestKind::None);
        assert_eq!(
            AuthRequestKind::from("HostPinOrGuestPin"),
            AuthRequestKind::HostPinOrGuestPin
        );
        assert_eq!(
            AuthRequestKind::from("Something"),
            AuthRequestKind::Unknown("Something".to_string())
        );
    }

    #[test]
    fn test_request_kind_serde() {
        let kind: AuthRequestKind = serde_json::from_str("\"PanelistPinOrAttendee\"").unwrap();
        assert_eq!(kind, AuthRequestKind::PanelistPinOrAttendee);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"PanelistPinOrAttendee\"");
    }

    #[test]
    fn test_role_choice_by_kind() {
        assert_eq!(
            AuthRequestKind::HostPinOrGuest.role_choice(),
            Some(RoleChoice::HostOrGuest)
        );
        assert_eq!(
            AuthRequestKind::PanelistPinOrAttendeePin.role_choice(),
            Some(RoleChoice::PanelistOrAttendee)
        );
        assert_eq!(AuthRequestKind::None.role_choice(), None);
        assert_eq!(AuthRequestKind::AnyHostPinOrGuestPin.role_choice(), None);
        assert_eq!(AuthRequestKind::GuestPin.role_choice(), None);
    }

    #[test]
    fn test_participant_role_from_str() {
        assert_eq!("Host".parse::<ParticipantRole>(), Ok(ParticipantRole::Host));
        assert_eq!("guest".parse::<ParticipantRole>(), Ok(ParticipantRole::Guest));
        assert!("Chair".parse::<ParticipantRole>().is_err());
    }

    #[test]
    fn test_digit_buffer_masking() {
        let mut buffer = DigitBuffer::default();
        for key in ["1", "2", "3"] {
            buffer.push(key);
        }
        buffer.backspace();
        assert_eq!(buffer.as_str(), "12");
        assert_eq!(buffer.masked(), " •  • ");
        assert!(!buffer.masked().chars().any(|c| c.is_ascii_digit()));

        buffer.backspace();
        buffer.backspace();
        buffer.backspace();
        assert!(buffer.is_empty());
        assert_eq!(buffer.masked(), "");
    }

    #[test]
    fn test_collected_pin_prefers_buffer() {
        let mut state = AuthenticationState::default();
        assert_eq!(state.collected_pin(), None);

        state.accepted_pin = Some("9999#".to_string());
        assert_eq!(state.collected_pin(), Some("9999#"));

        state.buffer.push("12");
        assert_eq!(state.collected_pin(), Some("12"));
    }
}
