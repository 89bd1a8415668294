use crate::dom::{Document, NodeId};
use serde::{Deserialize, Serialize};

/// Viewport-relative box, as `getBoundingClientRect` reports it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

/// Geometry the engine reads back from whatever lays the document out.
pub trait LayoutHost {
    fn bounding_rect(&self, document: &Document, node: NodeId) -> Option<Rect>;
    fn offset_height(&self, document: &Document, node: NodeId) -> f64;
    fn scroll_y(&self) -> f64;
}

/// Fixed geometry used when no browser is around, e.g. for snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    #[serde(default = "default_main_body_top")]
    pub main_body_top: f64,
    #[serde(default = "default_main_body_height")]
    pub main_body_height: f64,
    #[serde(default = "default_image_height")]
    pub image_height: f64,
    #[serde(default = "default_portrait_height")]
    pub portrait_height: f64,
    #[serde(default)]
    pub scroll_y: f64,
}

fn default_main_body_top() -> f64 {
    80.0
}

fn default_main_body_height() -> f64 {
    720.0
}

fn default_image_height() -> f64 {
    160.0
}

fn default_portrait_height() -> f64 {
    320.0
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            main_body_top: default_main_body_top(),
            main_body_height: default_main_body_height(),
            image_height: default_image_height(),
            portrait_height: default_portrait_height(),
            scroll_y: 0.0,
        }
    }
}

impl LayoutHost for Viewport {
    fn bounding_rect(&self, document: &Document, node: NodeId) -> Option<Rect> {
        let element = document.element(node)?;
        match element.id() {
            Some("main-body") => Some(Rect {
                top: self.main_body_top - self.scroll_y,
                height: self.main_body_height,
            }),
            _ => {
                // Absolutely positioned: `top` is in document coordinates.
                let top = element.style.px("top").unwrap_or(self.main_body_top);
                Some(Rect {
                    top: top - self.scroll_y,
                    height: self.offset_height(document, node),
                })
            }
        }
    }

    fn offset_height(&self, document: &Document, node: NodeId) -> f64 {
        match document.element(node).and_then(|e| e.id()) {
            Some("portrait") => self.portrait_height,
            Some("main-body") => self.main_body_height,
            _ => self.image_height,
        }
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }
}
