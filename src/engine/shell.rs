use crate::{
    dom::{Document, NodeId},
    site::ImageRef,
};

pub const NAVBAR_CONTAINER: &str = "navbar-container";
pub const MAIN_BODY: &str = "main-body";
pub const PORTRAIT: &str = "portrait";
pub const PORTFOLIO_CONTAINER: &str = "portfolio-container";
pub const TEXT: &str = "text";
pub const FLEXBOX: &str = "flexbox";
pub const MY_CONTAINER: &str = "my-container";
pub const IMG: &str = "img";

/// Builds the static page skeleton the engine binds to:
///
/// ```text
/// nav.navbar > div#navbar-container
/// div.my-container
///     div#main-body > div.flexbox > img#portrait.img, div#portfolio-container
///     div#text
/// ```
pub fn build_shell(document: &mut Document, portrait: Option<&ImageRef>) {
    let root = document.root();

    let nav = element(document, root, "nav", None, Some("navbar"));
    element(document, nav, "div", Some(NAVBAR_CONTAINER), None);

    let container = element(document, root, "div", None, Some(MY_CONTAINER));
    let main_body = element(document, container, "div", Some(MAIN_BODY), None);
    let flexbox = element(document, main_body, "div", None, Some(FLEXBOX));
    let portrait_node = element(document, flexbox, "img", Some(PORTRAIT), Some(IMG));
    if let Some(portrait) = portrait {
        document.set_attribute(portrait_node, "src", portrait.src.clone());
        document.set_attribute(portrait_node, "alt", portrait.alt.clone());
    }
    element(document, flexbox, "div", Some(PORTFOLIO_CONTAINER), None);
    element(document, container, "div", Some(TEXT), None);
}

fn element(
    document: &mut Document,
    parent: NodeId,
    tag: &'static str,
    id: Option<&str>,
    class: Option<&str>,
) -> NodeId {
    let node = document.create_element(tag);
    if let Some(id) = id {
        document.set_attribute(node, "id", id);
    }
    if let Some(class) = class {
        document.set_attribute(node, "class", class);
    }
    document.append_child(parent, node);
    node
}
