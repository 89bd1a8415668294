use crate::{
    dom::{Document, Handler, NodeId},
    engine::{shell, RenderError},
    site::{NavEntry, PageContent, PageId},
};
use serde::{Deserialize, Serialize};

/// How a navbar control picks what to show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressingMode {
    /// The entry's link names a page; supports deep links and back/forward.
    #[default]
    Fragment,
    /// The entry's position selects a filter over the flat portfolio.
    Index,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFilter {
    Natural,
    Reversed,
}

impl ContentFilter {
    pub fn slug(self) -> &'static str {
        match self {
            Self::Natural => "natural",
            Self::Reversed => "reversed",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        [Self::Natural, Self::Reversed]
            .into_iter()
            .find(|filter| filter.slug() == slug)
    }

    pub fn page_id(self) -> PageId {
        PageId::new(self.slug())
    }

    pub fn apply(self, content: &PageContent) -> PageContent {
        let mut ret = content.clone();
        if self == Self::Reversed {
            ret.portfolio.reverse();
        }
        ret
    }
}

/// Where activating a navbar control leads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavTarget {
    Page(PageId),
    Filter(ContentFilter),
}

impl NavTarget {
    pub fn page_id(&self) -> PageId {
        match self {
            Self::Page(id) => id.clone(),
            Self::Filter(filter) => filter.page_id(),
        }
    }
}

pub fn nav_target(
    entries: &[NavEntry],
    index: usize,
    mode: AddressingMode,
    filters: &[ContentFilter],
) -> Result<NavTarget, RenderError> {
    let entry = entries
        .get(index)
        .ok_or(RenderError::NavEntryNotFound(index))?;
    match mode {
        AddressingMode::Fragment => entry
            .page_id()
            .map(NavTarget::Page)
            .ok_or(RenderError::NavEntryNotFound(index)),
        AddressingMode::Index => filters
            .get(index)
            .copied()
            .map(NavTarget::Filter)
            .ok_or(RenderError::NavEntryNotFound(index)),
    }
}

/// One button per entry, in order, each carrying its position.
pub fn render_navbar(
    document: &mut Document,
    entries: &[NavEntry],
) -> Result<Vec<NodeId>, RenderError> {
    let container = document
        .get_element_by_id(shell::NAVBAR_CONTAINER)
        .ok_or(RenderError::MissingElement(shell::NAVBAR_CONTAINER))?;
    document.clear_children(container);

    let mut buttons = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let button = document.create_element("button");
        document.set_attribute(button, "class", "btn btn-outline-success mr-2");
        document.set_attribute(button, "type", "button");
        let label = document.create_text(entry.text.clone());
        document.append_child(button, label);
        document.add_click_listener(button, Handler::Navigate(index));
        document.append_child(container, button);
        buttons.push(button);
    }
    Ok(buttons)
}
