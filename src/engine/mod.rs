use crate::site::{PageId, SiteDocument};
use thiserror::Error;

mod controller;
mod fan;
mod navbar;
mod navigation;
mod page;
pub mod shell;
pub mod unfurl;

pub use controller::*;
pub use fan::*;
pub use navbar::*;
pub use navigation::*;
pub use page::*;
pub use unfurl::UnfurlPolicy;

/// Recoverable rendering failures. Logged by the controller, never fatal.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("element {0} not found")]
    MissingElement(&'static str),
    #[error("Page not found: {0}")]
    PageNotFound(PageId),
    #[error("no navbar target at position {0}")]
    NavEntryNotFound(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineOptions {
    pub default_page: PageId,
    /// Always rendered as a creator page, whatever its content.
    pub creator_page: Option<PageId>,
    pub addressing: AddressingMode,
    pub filters: Vec<ContentFilter>,
    pub unfurl: UnfurlPolicy,
    pub fan: FanParams,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            default_page: PageId::new("portfolio1"),
            creator_page: Some(PageId::new("creator")),
            addressing: AddressingMode::default(),
            filters: vec![ContentFilter::Natural, ContentFilter::Reversed],
            unfurl: UnfurlPolicy::default(),
            fan: FanParams::default(),
        }
    }
}

impl EngineOptions {
    /// Page shown when the fragment is empty.
    ///
    /// In index mode, that's the first filter.
    pub fn start_page(&self) -> PageId {
        match (self.addressing, self.filters.first()) {
            (AddressingMode::Index, Some(filter)) => filter.page_id(),
            _ => self.default_page.clone(),
        }
    }
}

/// Every page a visitor can reach in the configured addressing mode.
pub fn reachable_pages(site: &SiteDocument, options: &EngineOptions) -> Vec<PageId> {
    match options.addressing {
        AddressingMode::Fragment => site.page_ids().cloned().collect(),
        AddressingMode::Index => options
            .filters
            .iter()
            .map(|filter| filter.page_id())
            .collect(),
    }
}

/// Label of the navbar control leading to `id`, if any.
pub fn page_label<'a>(
    site: &'a SiteDocument,
    options: &EngineOptions,
    id: &PageId,
) -> Option<&'a str> {
    match options.addressing {
        AddressingMode::Fragment => site.nav_label(id),
        AddressingMode::Index => {
            let position = options
                .filters
                .iter()
                .position(|filter| filter.page_id() == *id)?;
            site.navbar.get(position).map(|entry| entry.text.as_str())
        }
    }
}
