use crate::{
    config::SiteConfig,
    dom::{Document, Handler, LayoutHost, NodeId},
    engine::{shell, AddressingMode, Controller, NavTarget},
};
use std::fmt::Write;

/// Id of the hidden checkbox the portrait toggles.
pub const UNFURL_TOGGLE: &str = "unfurl";

/// A rendered view, rewritten to work without the engine running.
pub struct StaticPage {
    pub document: Document,
    /// Rules that replay the unfurl once the toggle is checked.
    pub stylesheet: String,
    /// Fragment routing, only in fragment mode.
    pub script: Option<String>,
}

pub fn static_page<L: LayoutHost>(controller: &Controller<'_, L>, config: &SiteConfig) -> StaticPage {
    let mut document = controller.document().clone();

    link_navbar(&mut document, controller, config);

    let toggle = controller.state().fan.is_some() && !controller.state().unfurled;
    if toggle {
        if let Some(portrait) = document.get_element_by_id(shell::PORTRAIT) {
            if let Some(label) = document.wrap(portrait, "label") {
                document.set_attribute(label, "for", UNFURL_TOGGLE);
            }
        }
        let root = document.root();
        let checkbox = document.create_element("input");
        document.set_attribute(checkbox, "type", "checkbox");
        document.set_attribute(checkbox, "id", UNFURL_TOGGLE);
        document.set_attribute(checkbox, "aria-label", "Unfurl portfolio");
        document.prepend_child(root, checkbox);
    }

    let stylesheet = match controller.preview_unfurl() {
        Some(unfurled) if toggle => unfurl_stylesheet(&document, controller.document(), &unfurled),
        _ => String::new(),
    };

    StaticPage {
        document,
        stylesheet,
        script: navigation_script(controller),
    }
}

/// Navbar buttons become plain links to the page files.
fn link_navbar<L: LayoutHost>(
    document: &mut Document,
    controller: &Controller<'_, L>,
    config: &SiteConfig,
) {
    let buttons = document
        .descendants(document.root())
        .into_iter()
        .flat_map(|node| {
            document
                .click_handlers(node)
                .into_iter()
                .filter_map(move |handler| match handler {
                    Handler::Navigate(index) => Some((node, index)),
                    Handler::Unfurl => None,
                })
        })
        .collect::<Vec<_>>();

    for (button, index) in buttons {
        let Ok(target) = controller.nav_target(index) else {
            continue;
        };
        let href = match &target {
            NavTarget::Page(id) => {
                format!("{}{}", config.page_html::<true>(id), id.to_fragment())
            }
            NavTarget::Filter(filter) => config.page_html::<true>(&filter.page_id()),
        };
        let current = controller.state().page.as_ref() == Some(&target.page_id());

        document.clear_listeners(button);
        if let Some(element) = document.element_mut(button) {
            element.tag = "a";
            element.attributes.retain(|(name, _)| *name != "type");
            element.set_attribute("href", href);
            if current {
                element.set_attribute("aria-current", "page");
            }
        }
    }
}

fn unfurl_stylesheet(document: &Document, before: &Document, after: &Document) -> String {
    let scope = format!("body:has(#{UNFURL_TOGGLE}:checked)");
    let mut ret = String::new();
    for node in before.descendants(before.root()) {
        let (Some(old), Some(new)) = (before.style(node), after.style(node)) else {
            continue;
        };
        let changes = old.changes_to(new);
        if changes.is_empty() {
            continue;
        }
        let Some(selector) = selector(document, node) else {
            continue;
        };
        let _ = writeln!(ret, "{scope} {selector} {{");
        for (property, value) in changes {
            let _ = writeln!(ret, "\t{property}: {value} !important;");
        }
        ret.push_str("}\n");
    }
    // One-way, like the listener it replaces.
    let _ = writeln!(
        ret,
        "{scope} label[for=\"{UNFURL_TOGGLE}\"] {{\n\tpointer-events: none;\n\tcursor: auto;\n}}"
    );
    ret
}

/// Shortest of: `#id`, a class no other element has, or a path of
/// `:nth-child` steps from the closest ancestor that has one of those.
fn selector(document: &Document, node: NodeId) -> Option<String> {
    let element = document.element(node)?;
    if let Some(id) = element.id() {
        return Some(format!("#{id}"));
    }
    if let Some(class) = element
        .classes()
        .find(|class| document.elements_by_class(class).len() == 1)
    {
        return Some(format!(".{class}"));
    }
    let parent = document.parent(node)?;
    let position = document
        .children(parent)
        .iter()
        .filter(|child| document.element(**child).is_some())
        .position(|child| *child == node)?;
    Some(format!(
        "{} > :nth-child({})",
        selector(document, parent)?,
        position + 1
    ))
}

fn navigation_script<L: LayoutHost>(controller: &Controller<'_, L>) -> Option<String> {
    if controller.options().addressing != AddressingMode::Fragment {
        return None;
    }
    let pages = serde_json::to_string(&controller.page_ids()).ok()?;
    let current = serde_json::to_string(&controller.state().page).ok()?;
    let default = serde_json::to_string(&controller.options().start_page()).ok()?;
    let script = format!(
        "const PAGES = {pages};\nconst CURRENT_PAGE = {current};\nconst DEFAULT_PAGE = {default};\n{}",
        include_str!("navigation.js")
    );
    Some(script.replace("</", "<\\/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dom::Viewport,
        engine::{EngineOptions, Location},
        site::SiteDocument,
    };

    fn site() -> SiteDocument {
        serde_json::from_str(
            r##"{
                "navbar": [
                    {"text": "One", "link": "#portfolio1"},
                    {"text": "Creator", "link": "#creator"}
                ],
                "portrait": {"src": "me.jpg", "alt": "Me"},
                "pages": {
                    "portfolio1": {
                        "portfolio": [
                            {"src": "a.jpg", "link": "https://a"},
                            {"src": "b.jpg"}
                        ]
                    },
                    "creator": {"about": {"text": "About me"}}
                }
            }"##,
        )
        .unwrap()
    }

    fn page(site: &SiteDocument, options: EngineOptions, fragment: &str) -> StaticPage {
        let controller =
            Controller::start(site, options, Viewport::default(), Location::new(fragment)).unwrap();
        static_page(&controller, &SiteConfig::default())
    }

    #[test]
    fn buttons_become_links() {
        let site = site();
        let page = page(&site, EngineOptions::default(), "");
        let container = page
            .document
            .get_element_by_id(shell::NAVBAR_CONTAINER)
            .unwrap();
        let links = page.document.children(container).to_vec();
        assert_eq!(page.document.tag(links[0]), Some("a"));
        assert_eq!(
            page.document.attribute(links[0], "href"),
            Some("/portfolio1/#portfolio1")
        );
        assert_eq!(page.document.attribute(links[0], "aria-current"), Some("page"));
        assert_eq!(page.document.attribute(links[0], "type"), None);
        assert_eq!(page.document.attribute(links[1], "href"), Some("/creator/#creator"));
        assert_eq!(page.document.attribute(links[1], "aria-current"), None);
        assert!(page.document.click_handlers(links[0]).is_empty());
    }

    #[test]
    fn portrait_toggles_unfurl() {
        let site = site();
        let page = page(&site, EngineOptions::default(), "");
        let checkbox = page.document.get_element_by_id(UNFURL_TOGGLE).unwrap();
        assert_eq!(page.document.parent(checkbox), Some(page.document.root()));
        assert_eq!(page.document.children(page.document.root())[0], checkbox);

        let portrait = page.document.get_element_by_id(shell::PORTRAIT).unwrap();
        let label = page.document.parent(portrait).unwrap();
        assert_eq!(page.document.tag(label), Some("label"));
        assert_eq!(page.document.attribute(label, "for"), Some(UNFURL_TOGGLE));

        let css = &page.stylesheet;
        assert!(
            css.contains("body:has(#unfurl:checked) #portfolio-container > :nth-child(1) {"),
            "{css}"
        );
        assert!(css.contains("\tposition: static !important;"), "{css}");
        assert!(css.contains("\ttransform: rotate(0deg) !important;"), "{css}");
        assert!(css.contains("\trotate: 0deg !important;"), "{css}");
        assert!(css.contains("body:has(#unfurl:checked) .flexbox {"), "{css}");
        assert!(css.contains("\twidth: inherit !important;"), "{css}");
        assert!(css.contains("body:has(#unfurl:checked) #text {"), "{css}");
        assert!(css.contains("pointer-events: none;"), "{css}");
    }

    #[test]
    fn creator_page_has_no_toggle() {
        let site = site();
        let page = page(&site, EngineOptions::default(), "#creator");
        assert!(page.document.get_element_by_id(UNFURL_TOGGLE).is_none());
        let portrait = page.document.get_element_by_id(shell::PORTRAIT).unwrap();
        let parent = page.document.parent(portrait).unwrap();
        assert_eq!(page.document.tag(parent), Some("div"));
        assert!(page.stylesheet.is_empty());
    }

    #[test]
    fn script_knows_pages() {
        let site = site();
        let page = page(&site, EngineOptions::default(), "#creator");
        let script = page.script.unwrap();
        assert!(script.contains(r#"const PAGES = ["creator","portfolio1"];"#), "{script}");
        assert!(script.contains(r#"const CURRENT_PAGE = "creator";"#), "{script}");
        assert!(script.contains(r#"const DEFAULT_PAGE = "portfolio1";"#), "{script}");
        assert!(script.contains("hashchange"));
    }

    #[test]
    fn index_mode_links_filters() {
        let site: SiteDocument = serde_json::from_str(
            r##"{
                "navbar": [{"text": "Natural", "link": "#"}, {"text": "Reversed", "link": "#"}],
                "portfolio": [{"src": "a.jpg"}, {"src": "b.jpg"}]
            }"##,
        )
        .unwrap();
        let page = page(
            &site,
            EngineOptions {
                addressing: AddressingMode::Index,
                ..EngineOptions::default()
            },
            "",
        );
        assert!(page.script.is_none());
        let container = page
            .document
            .get_element_by_id(shell::NAVBAR_CONTAINER)
            .unwrap();
        let links = page.document.children(container).to_vec();
        assert_eq!(page.document.attribute(links[1], "href"), Some("/reversed/"));
        assert_eq!(page.document.attribute(links[0], "aria-current"), Some("page"));
    }
}
