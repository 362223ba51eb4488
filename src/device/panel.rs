//! Declarative prompt definitions and widget identifiers.
//!
//! Widgets on our panel carry a composite id
//! `{panel}-{kind}-{value}-{role}`, which is how a click is routed back to
//! the authentication flow.

use thiserror::Error;

use crate::auth::{ParticipantRole, RoleChoice, BACKSPACE_KEY, BACK_KEY};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WidgetIdError {
    #[error("widget '{0}' does not belong to this panel")]
    ForeignPanel(String),

    #[error("malformed widget id '{0}'")]
    Malformed(String),

    #[error("unknown participant role '{0}'")]
    UnknownRole(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Button,
    Text,
    Spacer,
}

impl WidgetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "Button",
            Self::Text => "Text",
            Self::Spacer => "Spacer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub id: String,
    pub name: String,
    pub kind: WidgetKind,
    pub options: String,
}

impl Widget {
    fn button(id: String, name: &str, size: u8) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind: WidgetKind::Button,
            options: format!("size={size}"),
        }
    }

    fn text(id: String, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind: WidgetKind::Text,
            options: "size=3;fontSize=normal;align=center".to_string(),
        }
    }

    fn spacer(panel_id: &str) -> Self {
        Self {
            id: format!("{panel_id}-spacer"),
            name: String::new(),
            kind: WidgetKind::Spacer,
            options: "size=1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    pub widgets: Vec<Widget>,
}

/// A hidden custom panel holding a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelDefinition {
    pub panel_id: String,
    pub title: String,
    pub rows: Vec<PanelRow>,
}

/// Keypad layout, top to bottom. Empty cells become spacers.
const KEYPAD_LAYOUT: [[&str; 3]; 5] = [
    ["1", "2", "3"],
    ["4", "5", "6"],
    ["7", "8", "9"],
    [BACKSPACE_KEY, "0", "#"],
    ["", BACK_KEY, ""],
];

impl PanelDefinition {
    /// Two-button question such as "Are you the meeting host?".
    pub fn role_choice(panel_id: &str, question: &str, choice: RoleChoice) -> Self {
        let widgets = choice
            .options()
            .iter()
            .map(|(label, role)| {
                Widget::button(response_widget_id(panel_id, label, *role), label, 2)
            })
            .collect();

        Self {
            panel_id: panel_id.to_string(),
            title: question.to_string(),
            rows: vec![PanelRow { widgets }],
        }
    }

    /// PIN keypad with an instruction line and the shared display line.
    pub fn keypad(panel_id: &str, title: &str, instruction: &str, role: ParticipantRole) -> Self {
        let mut rows = vec![
            PanelRow {
                widgets: vec![Widget::text(format!("{panel_id}-instruction"), instruction)],
            },
            PanelRow {
                widgets: vec![Widget::text(display_widget_id(panel_id), "")],
            },
        ];

        rows.extend(KEYPAD_LAYOUT.iter().map(|row| PanelRow {
            widgets: row
                .iter()
                .map(|key| match *key {
                    "" => Widget::spacer(panel_id),
                    key => Widget::button(key_widget_id(panel_id, key, role), key, 1),
                })
                .collect(),
        }));

        Self {
            panel_id: panel_id.to_string(),
            title: title.to_string(),
            rows,
        }
    }

    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.rows
            .iter()
            .flat_map(|row| row.widgets.iter())
            .find(|widget| widget.id == id)
    }
}

pub fn display_widget_id(panel_id: &str) -> String {
    format!("{panel_id}-display")
}

pub fn key_widget_id(panel_id: &str, key: &str, role: ParticipantRole) -> String {
    format!("{panel_id}-key-{key}-{role}")
}

pub fn response_widget_id(panel_id: &str, label: &str, role: ParticipantRole) -> String {
    format!("{panel_id}-response-{label}-{role}")
}

/// A click on one of our interactive widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    Key { value: String, role: ParticipantRole },
    Response { label: String, role: ParticipantRole },
}

impl WidgetAction {
    pub fn parse(panel_id: &str, widget_id: &str) -> Result<Self, WidgetIdError> {
        let rest = widget_id
            .strip_prefix(panel_id)
            .and_then(|rest| rest.strip_prefix('-'))
            .ok_or_else(|| WidgetIdError::ForeignPanel(widget_id.to_string()))?;

        let mut parts = rest.splitn(3, '-');
        let (Some(kind), Some(value), Some(role)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(WidgetIdError::Malformed(widget_id.to_string()));
        };

        let role: ParticipantRole = role.parse().map_err(WidgetIdError::UnknownRole)?;
        match kind {
            "key" => Ok(Self::Key {
                value: value.to_string(),
                role,
            }),
            "response" => Ok(Self::Response {
                label: value.to_string(),
                role,
            }),
            _ => Err(WidgetIdError::Malformed(widget_id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_choice_panel() {
        let panel = PanelDefinition::role_choice("simacro", "Are you the meeting host?", RoleChoice::HostOrGuest);
        assert_eq!(panel.title, "Are you the meeting host?");
        assert_eq!(panel.rows.len(), 1);
        let ids: Vec<_> = panel.rows[0].widgets.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["simacro-response-Yes-Host", "simacro-response-No-Guest"]);
    }

    #[test]
    fn test_keypad_layout() {
        let panel = PanelDefinition::keypad("simacro", "Weekly Sync", "Enter PIN", ParticipantRole::Host);
        assert_eq!(panel.rows.len(), 7);
        assert!(panel.widget("simacro-display").is_some());
        assert_eq!(
            panel.widget("simacro-instruction").map(|w| w.name.as_str()),
            Some("Enter PIN")
        );
        assert!(panel.widget("simacro-key-5-Host").is_some());
        assert!(panel.widget("simacro-key-⌫-Host").is_some());
        assert!(panel.widget("simacro-key-Back-Host").is_some());
        let spacers = panel.rows[6]
            .widgets
            .iter()
            .filter(|w| w.kind == WidgetKind::Spacer)
            .count();
        assert_eq!(spacers, 2);
    }

    #[test]
    fn test_parse_key_action() {
        assert_eq!(
            WidgetAction::parse("simacro", "simacro-key-7-Guest"),
            Ok(WidgetAction::Key {
                value: "7".to_string(),
                role: ParticipantRole::Guest
            })
        );
        assert_eq!(
            WidgetAction::parse("simacro", "simacro-response-Yes-Host"),
            Ok(WidgetAction::Response {
                label: "Yes".to_string(),
                role: ParticipantRole::Host
            })
        );
    }

    #[test]
    fn test_parse_rejects_foreign_and_malformed() {
        assert_eq!(
            WidgetAction::parse("simacro", "other-key-1-Host"),
            Err(WidgetIdError::ForeignPanel("other-key-1-Host".to_string()))
        );
        assert!(matches!(
            WidgetAction::parse("simacro", "simacro-display"),
            Err(WidgetIdError::Malformed(_))
        ));
        assert_eq!(
            WidgetAction::parse("simacro", "simacro-key-1-Chair"),
            Err(WidgetIdError::UnknownRole("Chair".to_string()))
        );
    }
}
