//! Serializes [`PanelDefinition`]s to the UI extensions XML a device accepts
//! in `UserInterface Extensions Panel Save`.

use super::document::escape_xml;
use crate::device::{PanelDefinition, Widget, WidgetKind};

fn widget_xml(widget: &Widget) -> String {
    let name = match widget.kind {
        WidgetKind::Spacer => String::new(),
        _ => format!("<Name>{}</Name>", escape_xml(&widget.name)),
    };
    format!(
        "<Widget><WidgetId>{}</WidgetId>{}<Type>{}</Type><Options>{}</Options></Widget>",
        escape_xml(&widget.id),
        name,
        widget.kind.as_str(),
        escape_xml(&widget.options)
    )
}

pub fn panel_xml(panel: &PanelDefinition) -> String {
    let rows: String = panel
        .rows
        .iter()
        .map(|row| {
            let widgets: String = row.widgets.iter().map(widget_xml).collect();
            format!("<Row>{widgets}</Row>")
        })
        .collect();

    format!(
        "<Extensions><Panel><Location>Hidden</Location><ActivityType>Custom</ActivityType>\
         <Page><PageId>{id}</PageId><Name>{title}</Name>{rows}\
         <Options>hideRowNames=1</Options></Page></Panel></Extensions>",
        id = escape_xml(&panel.panel_id),
        title = escape_xml(&panel.title),
    )
}
