//! Typed builder for xAPI command documents.
//!
//! Business logic describes commands as a path plus named parameters; the
//! XML text is only produced here, right before it goes on the wire.

/// A single `putxml` command such as `Call Disconnect` or `Webex Join`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDocument {
    path: Vec<String>,
    params: Vec<(String, String)>,
    body: Option<String>,
}

impl CommandDocument {
    pub fn new(path: &[&str]) -> Self {
        Self {
            path: path.iter().map(|segment| segment.to_string()).collect(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    /// Adds the parameter only when a non-empty value is present.
    pub fn optional_param(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) if !value.is_empty() => self.param(name, value),
            _ => self,
        }
    }

    /// Multiline payload, used by commands such as `Panel Save`.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn path(&self) -> String {
        self.path.join(" ")
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<Command>");
        let Some((leaf, parents)) = self.path.split_last() else {
            xml.push_str("</Command>");
            return xml;
        };

        for segment in parents {
            xml.push_str(&format!("<{segment}>"));
        }

        if self.params.is_empty() && self.body.is_none() {
            xml.push_str(&format!("<{leaf}/>"));
        } else {
            xml.push_str(&format!("<{leaf}>"));
            for (name, value) in &self.params {
                xml.push_str(&format!("<{name}>{}</{name}>", escape_xml(value)));
            }
            if let Some(body) = &self.body {
                xml.push_str(&format!("<body>{}</body>", escape_xml(body)));
            }
            xml.push_str(&format!("</{leaf}>"));
        }

        for segment in parents.iter().rev() {
            xml.push_str(&format!("</{segment}>"));
        }
        xml.push_str("</Command>");
        xml
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_without_params_is_self_closing() {
        let doc = CommandDocument::new(&["Call", "Disconnect"]);
        assert_eq!(
            doc.to_xml(),
            "<Command><Call><Disconnect/></Call></Command>"
        );
        assert_eq!(doc.path(), "Call Disconnect");
    }

    #[test]
    fn test_command_with_params() {
        let doc = CommandDocument::new(&["Webex", "Join"])
            .param("Number", "alice@webex.com")
            .optional_param("Pin", None)
            .optional_param("ParticipantRole", Some("Guest"));
        assert_eq!(
            doc.to_xml(),
            "<Command><Webex><Join><Number>alice@webex.com</Number>\
             <ParticipantRole>Guest</ParticipantRole></Join></Webex></Command>"
        );
    }

    #[test]
    fn test_body_is_escaped() {
        let doc = CommandDocument::new(&["UserInterface", "Extensions", "Panel", "Save"])
            .param("PanelId", "simacro")
            .body("<Extensions/>");
        let xml = doc.to_xml();
        assert!(xml.contains("<PanelId>simacro</PanelId>"));
        assert!(xml.contains("<body>&lt;Extensions/&gt;</body>"));
    }

    #[test]
    fn test_escape_round_trip() {
        let raw = r#"a & b < "c" > 'd'"#;
        assert_eq!(unescape_xml(&escape_xml(raw)), raw);
    }
}
