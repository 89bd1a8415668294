use crate::{
    dom::{Document, Handler, NodeId},
    engine::{shell, FanLayout, RenderError},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What happens to an unfurled view when another page is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnfurlPolicy {
    /// Every page starts fanned out.
    #[default]
    ResetOnNavigate,
    /// Once unfurled, later pages are unfurled right after layout.
    Persist,
}

const TEXT_ADJUSTMENTS: [(&str, &str); 4] = [
    ("margin-top", "3rem"),
    ("max-width", "40rem"),
    ("margin-left", "auto"),
    ("margin-right", "auto"),
];

/// Swaps the portrait for a listener-free copy and attaches the toggle.
///
/// Returns the new portrait node.
pub fn arm(document: &mut Document) -> Result<NodeId, RenderError> {
    let portrait = disarm(document)?;
    document.add_click_listener(portrait, Handler::Unfurl);
    Ok(portrait)
}

/// Leaves the portrait without any listener.
pub fn disarm(document: &mut Document) -> Result<NodeId, RenderError> {
    let portrait = document
        .get_element_by_id(shell::PORTRAIT)
        .ok_or(RenderError::MissingElement(shell::PORTRAIT))?;
    document
        .replace_with_clone(portrait)
        .ok_or(RenderError::MissingElement(shell::PORTRAIT))
}

/// Flattens the fan into a static list.
pub fn apply(document: &mut Document, fan: &FanLayout) {
    for slot in &fan.slots {
        document.set_style(slot.node, "position", "static");
        if slot.linked {
            document.set_style(slot.node, "transform", "rotate(0deg)");
        } else {
            document.set_style(slot.node, "rotate", "0deg");
        }
        document.set_style(slot.node, "margin-left", "2rem");
        document.set_style(slot.node, "margin-bottom", "2rem");
    }

    if let Some(flexbox) = document.query_class(shell::FLEXBOX) {
        document.set_style(flexbox, "height", "min-content");
        document.set_style(flexbox, "margin-top", format!("{}px", fan.portrait_offset));
    }

    if let Some(container) = document.query_class(shell::MY_CONTAINER) {
        document.set_style(container, "width", "inherit");
    }

    if let Some(text) = document.get_element_by_id(shell::TEXT) {
        for (property, value) in TEXT_ADJUSTMENTS {
            document.set_style(text, property, value);
        }
    }

    debug!(images = fan.slots.len(), "unfurled");
}

/// Undoes the container adjustments made by [`apply`].
///
/// The images themselves are rebuilt by the next render.
pub fn restore(document: &mut Document) {
    if let Some(flexbox) = document.query_class(shell::FLEXBOX) {
        document.remove_style(flexbox, "height");
        document.remove_style(flexbox, "margin-top");
    }
    if let Some(container) = document.query_class(shell::MY_CONTAINER) {
        document.remove_style(container, "width");
    }
    if let Some(text) = document.get_element_by_id(shell::TEXT) {
        for (property, _) in TEXT_ADJUSTMENTS {
            document.remove_style(text, property);
        }
    }
}
