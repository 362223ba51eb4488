//! Reads the few status values we need out of `getxml` responses.

use regex::Regex;

use super::document::unescape_xml;
use crate::auth::AuthRequestKind;
use crate::device::{ActiveCall, ConferenceStatus, InterpretationChannel, ParticipantAdd};

fn element_regex(tag: &str, capture: &str) -> Option<Regex> {
    let tag = regex::escape(tag);
    Regex::new(&format!(r"(?s)<{tag}(?:\s[^>]*)?>{capture}</{tag}>")).ok()
}

/// Text of the first `<tag>` element that holds no child elements.
pub fn leaf(body: &str, tag: &str) -> Option<String> {
    element_regex(tag, "([^<]*)")?
        .captures(body)
        .and_then(|captures| captures.get(1))
        .map(|value| unescape_xml(value.as_str().trim()))
}

/// Inner XML of every `<tag>` element, in document order.
pub fn blocks(body: &str, tag: &str) -> Vec<String> {
    let Some(regex) = element_regex(tag, "(.*?)") else {
        return Vec::new();
    };
    regex
        .captures_iter(body)
        .filter_map(|captures| captures.get(1))
        .map(|inner| inner.as_str().to_string())
        .collect()
}

/// `/Status/SystemUnit/Hardware/Module/SerialNumber`
pub fn parse_serial_number(body: &str) -> Option<String> {
    leaf(body, "SerialNumber").filter(|serial| !serial.is_empty())
}

/// `/Status/Conference/Call`, first call only.
pub fn parse_conference(body: &str) -> ConferenceStatus {
    let call = blocks(body, "Call").into_iter().next();
    let scope = call.as_deref().unwrap_or(body);

    let languages = blocks(scope, "Languages")
        .iter()
        .filter_map(|entry| {
            let code = leaf(entry, "LanguageCode")?;
            let name = leaf(entry, "LanguageName").unwrap_or_default();
            Some(InterpretationChannel::new(code, name))
        })
        .collect();

    ConferenceStatus {
        authentication_request: leaf(scope, "AuthenticationRequest").map(AuthRequestKind::from),
        participant_add: leaf(scope, "ParticipantAdd").map(|value| ParticipantAdd::parse(&value)),
        languages,
    }
}

/// `/Status/Call`, first call only. `None` when no call is up.
pub fn parse_active_call(body: &str) -> Option<ActiveCall> {
    let call_regex = Regex::new(r"(?s)<Call(\s[^>]*)?>(.*?)</Call>").ok()?;
    let item_regex = Regex::new(r#"item="(\d+)""#).ok()?;
    let captures = call_regex.captures(body)?;
    let inner = captures.get(2)?.as_str();
    let id = captures
        .get(1)
        .and_then(|attributes| item_regex.captures(attributes.as_str()))
        .and_then(|item| item.get(1))
        .and_then(|item| item.as_str().parse().ok());

    Some(ActiveCall {
        id,
        callback_number: leaf(inner, "CallbackNumber"),
        display_name: leaf(inner, "DisplayName"),
    })
}
