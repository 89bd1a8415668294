use crate::{
    dom::{Document, Handler, LayoutHost, NodeId},
    engine::{
        apply_fan, nav_target, reachable_pages, render_navbar, render_page, shell, unfurl,
        AddressingMode, ContentFilter, EngineOptions, FanLayout, Location, NavTarget, Navigation,
        PageView, RenderError, UnfurlPolicy,
    },
    site::{PageContent, PageId, SiteDocument},
};
use std::borrow::Cow;
use tracing::{debug, error};

/// Something the user or the browser did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    NavActivated(usize),
    /// New fragment, with or without the leading `#`.
    HashChanged(String),
    Click(NodeId),
}

/// Everything derived from the active page. Rebuilt on every navigation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderState {
    pub page: Option<PageId>,
    pub view: Option<PageView>,
    pub fan: Option<FanLayout>,
    pub unfurled: bool,
}

/// Owns the document and routes every event to the page engine.
#[derive(Clone)]
pub struct Controller<'a, L> {
    site: &'a SiteDocument,
    options: EngineOptions,
    navigation: Navigation,
    layout: L,
    document: Document,
    location: Location,
    state: RenderState,
}

impl<'a, L: LayoutHost> Controller<'a, L> {
    /// Builds the page and renders whatever the location points at.
    ///
    /// A location naming an unknown page is logged and leaves the page empty.
    pub fn start(
        site: &'a SiteDocument,
        options: EngineOptions,
        layout: L,
        location: Location,
    ) -> Result<Self, RenderError> {
        let mut document = Document::new();
        shell::build_shell(&mut document, site.portrait.as_ref());
        render_navbar(&mut document, &site.navbar)?;

        let mut controller = Self {
            site,
            navigation: Navigation::new(options.start_page()),
            options,
            layout,
            document,
            location,
            state: RenderState::default(),
        };

        let initial = controller.navigation.resolve_location(&controller.location);
        if let Err(e) = controller.navigate(&initial) {
            error!("{e}");
        }
        Ok(controller)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn portrait(&self) -> Option<NodeId> {
        self.document.get_element_by_id(shell::PORTRAIT)
    }

    /// Every page reachable in the current addressing mode.
    pub fn page_ids(&self) -> Vec<PageId> {
        reachable_pages(self.site, &self.options)
    }

    pub fn nav_target(&self, index: usize) -> Result<NavTarget, RenderError> {
        nav_target(
            &self.site.navbar,
            index,
            self.options.addressing,
            &self.options.filters,
        )
    }

    /// Handles an event, logging instead of propagating failures.
    pub fn dispatch(&mut self, event: Event) {
        debug!(?event, "dispatch");
        let result = match event {
            Event::NavActivated(index) => self.activate_nav(index).map(drop),
            Event::HashChanged(fragment) => self.hash_changed(&fragment).map(drop),
            Event::Click(node) => self.click(node),
        };
        if let Err(e) = result {
            error!("{e}");
        }
    }

    fn content_for(&self, id: &PageId) -> Option<Cow<'a, PageContent>> {
        let site: &'a SiteDocument = self.site;
        match self.options.addressing {
            AddressingMode::Fragment => site.page(id).map(Cow::Borrowed),
            AddressingMode::Index => {
                let filter = ContentFilter::from_slug(id.as_str())
                    .filter(|filter| self.options.filters.contains(filter))?;
                let content = site.flat_content(&self.options.default_page)?;
                Some(Cow::Owned(filter.apply(content)))
            }
        }
    }

    /// Clears and rebuilds the page for `id`, then lays out and arms the fan.
    ///
    /// An unknown `id` changes nothing.
    pub fn navigate(&mut self, id: &PageId) -> Result<PageView, RenderError> {
        let content = self
            .content_for(id)
            .ok_or_else(|| RenderError::PageNotFound(id.clone()))?;

        if self.state.unfurled && self.options.unfurl == UnfurlPolicy::ResetOnNavigate {
            unfurl::restore(&mut self.document);
            self.state.unfurled = false;
        }
        self.state.fan = None;

        let creator =
            self.options.creator_page.as_ref() == Some(id) || content.is_text_only();
        let view = render_page(&mut self.document, &content, creator)?;
        self.state.page = Some(id.clone());
        self.state.view = Some(view);

        if matches!(view, PageView::Portfolio { .. }) {
            self.state.fan = apply_fan(&mut self.document, &self.layout, &self.options.fan)?;
        }

        match &self.state.fan {
            Some(fan) => {
                unfurl::arm(&mut self.document)?;
                if self.state.unfurled {
                    unfurl::apply(&mut self.document, fan);
                }
            }
            None => {
                unfurl::disarm(&mut self.document)?;
            }
        }

        debug!(page = %id, ?view, "navigated");
        Ok(view)
    }

    /// Activates the navbar control at `index`.
    pub fn activate_nav(&mut self, index: usize) -> Result<PageView, RenderError> {
        let target = self.nav_target(index)?;
        if let NavTarget::Page(id) = &target {
            self.location.set_fragment(id);
        }
        self.navigate(&target.page_id())
    }

    /// The fragment changed from outside, e.g. back/forward.
    pub fn hash_changed(&mut self, fragment: &str) -> Result<PageView, RenderError> {
        self.location = Location::new(fragment);
        let id = self.navigation.resolve_location(&self.location);
        self.navigate(&id)
    }

    /// Returns whether this activation unfurled the fan.
    pub fn activate_portrait(&mut self) -> Result<bool, RenderError> {
        if self.state.unfurled {
            return Ok(false);
        }
        let Some(fan) = &self.state.fan else {
            return Ok(false);
        };
        unfurl::apply(&mut self.document, fan);
        self.state.unfurled = true;
        Ok(true)
    }

    /// Runs the click listeners attached to `node`.
    pub fn click(&mut self, node: NodeId) -> Result<(), RenderError> {
        for handler in self.document.click_handlers(node) {
            match handler {
                Handler::Navigate(index) => {
                    self.activate_nav(index)?;
                }
                Handler::Unfurl => {
                    self.activate_portrait()?;
                }
            }
        }
        Ok(())
    }

    /// A copy of the document as it would look once unfurled.
    ///
    /// `None` when the current view has no fan.
    pub fn preview_unfurl(&self) -> Option<Document> {
        let fan = self.state.fan.as_ref()?;
        let mut document = self.document.clone();
        if !self.state.unfurled {
            unfurl::apply(&mut document, fan);
        }
        Some(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Viewport;

    fn site() -> SiteDocument {
        serde_json::from_str(
            r##"{
                "navbar": [
                    {"text": "One", "link": "#portfolio1"},
                    {"text": "Two", "link": "#portfolio2"},
                    {"text": "Creator", "link": "#creator"},
                    {"text": "Nowhere", "link": "#nowhere"}
                ],
                "portrait": {"src": "me.jpg", "alt": "Me"},
                "pages": {
                    "portfolio1": {
                        "portfolio": [
                            {"src": "a.jpg", "alt": "A", "link": "https://a"},
                            {"src": "b.jpg", "alt": "B"},
                            {"src": "c.jpg", "alt": "C"}
                        ],
                        "about": {"text": "First"}
                    },
                    "portfolio2": {"portfolio": [{"src": "d.jpg", "alt": "D"}]},
                    "creator": {"about": {"text": "About me"}}
                }
            }"##,
        )
        .unwrap()
    }

    fn start<'a>(site: &'a SiteDocument, fragment: &str) -> Controller<'a, Viewport> {
        Controller::start(
            site,
            EngineOptions::default(),
            Viewport::default(),
            Location::new(fragment),
        )
        .unwrap()
    }

    fn image_count(controller: &Controller<'_, Viewport>) -> usize {
        controller
            .document()
            .elements_by_class(shell::IMG)
            .len()
            - 1
    }

    #[test]
    fn starts_on_default_or_fragment() {
        let site = site();
        let controller = start(&site, "");
        assert_eq!(controller.state().page, Some("portfolio1".into()));
        assert_eq!(image_count(&controller), 3);

        let controller = start(&site, "#portfolio2");
        assert_eq!(controller.state().page, Some("portfolio2".into()));
        assert_eq!(image_count(&controller), 1);
    }

    #[test]
    fn portrait_attributes() {
        let site = site();
        let controller = start(&site, "");
        let portrait = controller.portrait().unwrap();
        assert_eq!(controller.document().attribute(portrait, "src"), Some("me.jpg"));
        assert_eq!(controller.document().attribute(portrait, "alt"), Some("Me"));
    }

    #[test]
    fn unknown_start_page_is_empty() {
        let site = site();
        let controller = start(&site, "#nowhere");
        assert_eq!(controller.state().page, None);
        assert_eq!(image_count(&controller), 0);
    }

    #[test]
    fn nav_updates_fragment() {
        let site = site();
        let mut controller = start(&site, "");
        controller.dispatch(Event::NavActivated(1));
        assert_eq!(controller.location().fragment(), "portfolio2");
        assert_eq!(controller.state().page, Some("portfolio2".into()));
    }

    #[test]
    fn unknown_page_keeps_view() {
        let site = site();
        let mut controller = start(&site, "");
        let before = controller.document().clone();
        assert_eq!(
            controller.activate_nav(3),
            Err(RenderError::PageNotFound("nowhere".into()))
        );
        assert_eq!(controller.state().page, Some("portfolio1".into()));
        assert_eq!(
            controller.document().text_content(controller.document().root()),
            before.text_content(before.root())
        );
        assert_eq!(image_count(&controller), 3);
    }

    #[test]
    fn click_dispatches_navbar() {
        let site = site();
        let mut controller = start(&site, "");
        let container = controller
            .document()
            .get_element_by_id(shell::NAVBAR_CONTAINER)
            .unwrap();
        let creator_button = controller.document().children(container)[2];
        controller.dispatch(Event::Click(creator_button));
        assert_eq!(controller.state().view, Some(PageView::Creator));
        assert_eq!(controller.state().fan, None);
        let portrait = controller.portrait().unwrap();
        assert!(controller.document().click_handlers(portrait).is_empty());
    }

    #[test]
    fn unfurl_once_per_view() {
        let site = site();
        let mut controller = start(&site, "");
        let portrait = controller.portrait().unwrap();
        assert_eq!(
            controller.document().click_handlers(portrait),
            vec![Handler::Unfurl]
        );

        controller.dispatch(Event::Click(portrait));
        assert!(controller.state().unfurled);
        let after_first = controller.document().clone();

        assert_eq!(controller.activate_portrait(), Ok(false));
        let fan = controller.state().fan.clone().unwrap();
        for slot in &fan.slots {
            assert_eq!(
                controller.document().style(slot.node),
                after_first.style(slot.node)
            );
            assert_eq!(
                controller.document().style(slot.node).unwrap().get("position"),
                Some("static")
            );
        }
    }

    #[test]
    fn navigation_resets_unfurl() {
        let site = site();
        let mut controller = start(&site, "");
        controller.activate_portrait().unwrap();
        controller.hash_changed("#portfolio2").unwrap();

        assert!(!controller.state().unfurled);
        let flexbox = controller.document().query_class(shell::FLEXBOX).unwrap();
        assert_eq!(
            controller.document().style(flexbox).unwrap().get("margin-top"),
            None
        );
        let slot = &controller.state().fan.as_ref().unwrap().slots[0];
        assert_eq!(
            controller.document().style(slot.node).unwrap().get("position"),
            None
        );
        // Re-armed for the new view.
        assert_eq!(controller.activate_portrait(), Ok(true));
    }

    #[test]
    fn persist_policy_keeps_unfurl() {
        let site = site();
        let mut controller = Controller::start(
            &site,
            EngineOptions {
                unfurl: UnfurlPolicy::Persist,
                ..EngineOptions::default()
            },
            Viewport::default(),
            Location::default(),
        )
        .unwrap();
        controller.activate_portrait().unwrap();
        controller.activate_nav(1).unwrap();

        assert!(controller.state().unfurled);
        let slot = &controller.state().fan.as_ref().unwrap().slots[0];
        assert_eq!(
            controller.document().style(slot.node).unwrap().get("position"),
            Some("static")
        );
        let flexbox = controller.document().query_class(shell::FLEXBOX).unwrap();
        assert_eq!(
            controller.document().style(flexbox).unwrap().get("height"),
            Some("min-content")
        );
    }

    #[test]
    fn hash_change_back_to_default() {
        let site = site();
        let mut controller = start(&site, "#creator");
        assert_eq!(controller.state().view, Some(PageView::Creator));
        controller.dispatch(Event::HashChanged(String::new()));
        assert_eq!(controller.state().page, Some("portfolio1".into()));
        assert_eq!(controller.state().view, Some(PageView::Portfolio { images: 3 }));
    }

    #[test]
    fn stale_nodes_are_inert() {
        let site = site();
        let mut controller = start(&site, "");
        let old_portrait = controller.portrait().unwrap();
        controller.activate_nav(1).unwrap();
        // The portrait was replaced on re-render.
        controller.dispatch(Event::Click(old_portrait));
        assert!(!controller.state().unfurled);
    }

    #[test]
    fn index_mode_filters_flat_list() {
        let site: SiteDocument = serde_json::from_str(
            r##"{
                "navbar": [{"text": "Natural", "link": "#"}, {"text": "Reversed", "link": "#"}],
                "portfolio": [{"src": "a.jpg"}, {"src": "b.jpg"}],
                "about": {"text": "Hi"}
            }"##,
        )
        .unwrap();
        let mut controller = Controller::start(
            &site,
            EngineOptions {
                addressing: AddressingMode::Index,
                ..EngineOptions::default()
            },
            Viewport::default(),
            Location::default(),
        )
        .unwrap();
        assert_eq!(controller.state().page, Some("natural".into()));
        assert_eq!(controller.page_ids(), vec![PageId::new("natural"), PageId::new("reversed")]);

        controller.activate_nav(1).unwrap();
        assert_eq!(controller.location().fragment(), "");
        let first = controller.state().fan.as_ref().unwrap().slots[0].node;
        assert_eq!(controller.document().attribute(first, "src"), Some("b.jpg"));
    }

    #[test]
    fn preview_leaves_document_alone() {
        let site = site();
        let controller = start(&site, "");
        let preview = controller.preview_unfurl().unwrap();
        let slot = &controller.state().fan.as_ref().unwrap().slots[1];
        assert_eq!(preview.style(slot.node).unwrap().get("position"), Some("static"));
        assert_ne!(
            controller.document().style(slot.node).unwrap().get("position"),
            Some("static")
        );
    }
}
