use crate::{
    dom::Document,
    engine::{shell, RenderError},
    site::PageContent,
};
use tracing::debug;

/// Which shape of page was rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageView {
    /// Text only; fan and portrait hidden.
    Creator,
    Portfolio { images: usize },
}

/// Replaces the contents of `portfolio-container` and `text`.
///
/// Does not lay out the fan; see [`crate::engine::apply_fan`].
pub fn render_page(
    document: &mut Document,
    content: &PageContent,
    creator: bool,
) -> Result<PageView, RenderError> {
    if creator {
        render_creator(document, content)?;
        return Ok(PageView::Creator);
    }

    let portfolio_container = document.get_element_by_id(shell::PORTFOLIO_CONTAINER);
    if let Some(portfolio_container) = portfolio_container {
        document.set_style(portfolio_container, "display", "block");
    }
    if let Some(portrait) = document.get_element_by_id(shell::PORTRAIT) {
        document.set_style(portrait, "display", "block");
    }

    let portfolio_container =
        portfolio_container.ok_or(RenderError::MissingElement(shell::PORTFOLIO_CONTAINER))?;
    document.clear_children(portfolio_container);

    for item in &content.portfolio {
        let img = document.create_element("img");
        document.set_attribute(img, "class", shell::IMG);
        document.set_attribute(img, "src", item.src.clone());
        document.set_attribute(img, "alt", item.alt.clone());

        if let Some(href) = &item.link {
            let link = document.create_element("a");
            document.set_attribute(link, "href", href.clone());
            document.set_attribute(link, "target", "_blank");
            document.set_attribute(link, "rel", "noopener");
            document.append_child(link, img);
            document.append_child(portfolio_container, link);
        } else {
            document.append_child(portfolio_container, img);
        }
    }

    let text = document
        .get_element_by_id(shell::TEXT)
        .ok_or(RenderError::MissingElement(shell::TEXT))?;
    document.clear_children(text);
    if let Some(about) = content.about_text() {
        let paragraph = document.create_element("p");
        let node = document.create_text(about);
        document.append_child(paragraph, node);
        document.append_child(text, paragraph);
    }

    debug!(images = content.portfolio.len(), "rendered portfolio page");
    Ok(PageView::Portfolio {
        images: content.portfolio.len(),
    })
}

fn render_creator(document: &mut Document, content: &PageContent) -> Result<(), RenderError> {
    if let Some(portfolio_container) = document.get_element_by_id(shell::PORTFOLIO_CONTAINER) {
        document.clear_children(portfolio_container);
        document.set_style(portfolio_container, "display", "none");
    }
    if let Some(portrait) = document.get_element_by_id(shell::PORTRAIT) {
        document.set_style(portrait, "display", "none");
    }

    let text = document
        .get_element_by_id(shell::TEXT)
        .ok_or(RenderError::MissingElement(shell::TEXT))?;
    document.clear_children(text);

    if let Some(about) = content.about_text() {
        let paragraph = document.create_element("p");
        for (property, value) in [
            ("font-size", "1.2rem"),
            ("line-height", "1.6"),
            ("max-width", "800px"),
            ("margin", "2rem auto"),
            ("padding", "2rem"),
            ("background-color", "#f8f9fa"),
            ("border-radius", "8px"),
            ("box-shadow", "0 4px 8px rgba(0,0,0,0.1)"),
        ] {
            document.set_style(paragraph, property, value);
        }
        let node = document.create_text(about);
        document.append_child(paragraph, node);
        document.append_child(text, paragraph);
    }

    debug!("rendered creator page");
    Ok(())
}
