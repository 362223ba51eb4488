//! Commands sent to peer devices.

use crate::auth::{ParticipantRole, PIN_TERMINATOR};
use crate::xapi::CommandDocument;

/// URI schemes stripped from a callback number before dialing it.
const URI_SCHEMES: [&str; 6] = ["sip:", "h323:", "spark:", "h320:", "webex:", "locus:"];

/// Status path holding a device's human-readable name.
pub const CONTACT_NAME_LOCATION: &str = "/Status/UserInterface/ContactInfo/Name";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerCommand {
    /// Hang up whatever call the peer is in.
    Disconnect,
    Join(JoinMeeting),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinMeeting {
    pub number: String,
    pub role: Option<ParticipantRole>,
    pub pin: Option<String>,
}

impl JoinMeeting {
    /// Builds a join from a raw callback number and the collected keypad digits.
    pub fn new(callback_number: &str, role: ParticipantRole, digits: Option<&str>) -> Self {
        let pin = digits
            .map(|d| d.trim_end_matches(PIN_TERMINATOR))
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Self {
            number: normalise_remote_uri(callback_number),
            role: Some(role),
            pin,
        }
    }
}

impl PeerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Disconnect => "disconnect",
            Self::Join(_) => "join",
        }
    }

    pub fn to_document(&self) -> CommandDocument {
        match self {
            Self::Disconnect => CommandDocument::new(&["Call", "Disconnect"]),
            Self::Join(join) => CommandDocument::new(&["Webex", "Join"])
                .optional_param("Number", Some(join.number.as_str()))
                .optional_param("ParticipantRole", join.role.map(|r| r.as_str()))
                .optional_param("Pin", join.pin.as_deref()),
        }
    }
}

/// Strips a leading transport scheme such as `sip:` from a remote URI.
pub fn normalise_remote_uri(number: &str) -> String {
    let trimmed = number.trim();
    URI_SCHEMES
        .iter()
        .find_map(|scheme| trimmed.strip_prefix(scheme))
        .unwrap_or(trimmed)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_remote_uri() {
        assert_eq!(normalise_remote_uri("sip:alice@webex.com"), "alice@webex.com");
        assert_eq!(normalise_remote_uri("spark:123@locus"), "123@locus");
        assert_eq!(normalise_remote_uri("alice@webex.com"), "alice@webex.com");
        assert_eq!(normalise_remote_uri("tel:123"), "tel:123");
    }

    #[test]
    fn test_join_trims_terminator() {
        let join = JoinMeeting::new("webex:alice@webex.com", ParticipantRole::Guest, Some("1234#"));
        assert_eq!(join.number, "alice@webex.com");
        assert_eq!(join.pin.as_deref(), Some("1234"));

        let no_pin = JoinMeeting::new("alice@webex.com", ParticipantRole::Guest, Some("#"));
        assert_eq!(no_pin.pin, None);
    }

    #[test]
    fn test_disconnect_document() {
        assert_eq!(
            PeerCommand::Disconnect.to_document().to_xml(),
            "<Command><Call><Disconnect/></Call></Command>"
        );
    }

    #[test]
    fn test_join_document() {
        let join = JoinMeeting::new("sip:alice@webex.com", ParticipantRole::Guest, Some("1234"));
        assert_eq!(
            PeerCommand::Join(join).to_document().to_xml(),
            "<Command><Webex><Join><Number>alice@webex.com</Number>\
             <ParticipantRole>Guest</ParticipantRole><Pin>1234</Pin></Join></Webex></Command>"
        );
    }

    #[test]
    fn test_join_document_without_pin() {
        let join = JoinMeeting::new("alice@webex.com", ParticipantRole::Guest, None);
        let xml = PeerCommand::Join(join).to_document().to_xml();
        assert!(!xml.contains("<Pin>"));
    }
}
