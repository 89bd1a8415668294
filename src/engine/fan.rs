use crate::{
    dom::{Document, LayoutHost, NodeId},
    engine::{shell, RenderError},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FanParams {
    /// Half of the total spread contributed by each image.
    #[serde(default = "default_degrees_per_image")]
    pub degrees_per_image: f64,
    /// Raises the vertical band above the container midpoint.
    #[serde(default = "default_band_offset")]
    pub band_offset: f64,
    /// Horizontal offset shared by every image.
    #[serde(default = "default_left")]
    pub left: String,
}

fn default_degrees_per_image() -> f64 {
    8.0
}

fn default_band_offset() -> f64 {
    100.0
}

fn default_left() -> String {
    "11rem".to_owned()
}

impl Default for FanParams {
    fn default() -> Self {
        Self {
            degrees_per_image: default_degrees_per_image(),
            band_offset: default_band_offset(),
            left: default_left(),
        }
    }
}

/// Container geometry in document coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FanGeometry {
    pub top: f64,
    pub height: f64,
    pub image_height: f64,
}

/// Position of one image in the fan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FanPosition {
    /// Degrees.
    pub rotation: f64,
    /// Pixels from the top of the document.
    pub top: f64,
}

/// Evenly interpolates rotation and top from the first to the last image.
///
/// A single image sits unrotated in the middle of the band.
pub fn fan_positions(count: usize, geometry: FanGeometry, params: &FanParams) -> Vec<FanPosition> {
    let spread = params.degrees_per_image * count as f64;
    let (start_angle, end_angle) = (-spread, spread);

    let middle = geometry.top + geometry.height / 2.0 - params.band_offset;
    let start_pos = middle - geometry.image_height;
    let end_pos = middle + geometry.image_height;

    if count == 1 {
        return vec![FanPosition {
            rotation: 0.0,
            top: (start_pos + end_pos) / 2.0,
        }];
    }

    let steps = count.saturating_sub(1) as f64;
    (0..count)
        .map(|i| {
            let i = i as f64;
            FanPosition {
                rotation: start_angle + i * (end_angle - start_angle) / steps,
                top: start_pos + i * (end_pos - start_pos) / steps,
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct FanSlot {
    /// The positioned node: the wrapping link if any, otherwise the image.
    pub node: NodeId,
    pub linked: bool,
    pub position: FanPosition,
}

/// Result of one layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct FanLayout {
    pub slots: Vec<FanSlot>,
    pub portrait_top: f64,
    /// Distance from the top of `main-body` to the top of the portrait.
    pub portrait_offset: f64,
}

/// Fans out every `.img` except the portrait and centers the portrait.
///
/// Returns `Ok(None)` without touching anything when there are no images.
pub fn apply_fan(
    document: &mut Document,
    host: &impl LayoutHost,
    params: &FanParams,
) -> Result<Option<FanLayout>, RenderError> {
    let images = document
        .elements_by_class(shell::IMG)
        .into_iter()
        .filter(|img| {
            document
                .element(*img)
                .map(|element| element.id() != Some(shell::PORTRAIT))
                .unwrap_or(false)
        })
        .collect::<Vec<_>>();

    let Some(first) = images.first().copied() else {
        return Ok(None);
    };

    let main_body = document
        .get_element_by_id(shell::MAIN_BODY)
        .ok_or(RenderError::MissingElement(shell::MAIN_BODY))?;
    let portrait = document
        .get_element_by_id(shell::PORTRAIT)
        .ok_or(RenderError::MissingElement(shell::PORTRAIT))?;

    let main_body_rect = host
        .bounding_rect(document, main_body)
        .ok_or(RenderError::MissingElement(shell::MAIN_BODY))?;
    let geometry = FanGeometry {
        top: main_body_rect.top + host.scroll_y(),
        height: main_body_rect.height,
        image_height: host.offset_height(document, first),
    };
    let portrait_height = host.offset_height(document, portrait);

    let portrait_top = geometry.top + (geometry.height - portrait_height) / 2.0;
    document.set_style(portrait, "top", format!("{portrait_top}px"));

    let positions = fan_positions(images.len(), geometry, params);
    let mut slots = Vec::with_capacity(images.len());
    for (img, position) in images.into_iter().zip(positions) {
        let link = document
            .parent(img)
            .filter(|parent| document.tag(*parent) == Some("a"));
        if let Some(link) = link {
            document.set_style(link, "position", "absolute");
            document.set_style(link, "top", format!("{}px", position.top));
            document.set_style(link, "left", params.left.clone());
            document.set_style(
                link,
                "transform",
                format!("rotate({}deg)", position.rotation),
            );
            document.set_style(link, "display", "block");
            document.set_style(link, "text-decoration", "none");
        } else {
            document.set_style(img, "top", format!("{}px", position.top));
            document.set_style(img, "left", params.left.clone());
            document.set_style(img, "rotate", format!("{}deg", position.rotation));
        }
        slots.push(FanSlot {
            node: link.unwrap_or(img),
            linked: link.is_some(),
            position,
        });
    }

    let rendered_portrait_top = host
        .bounding_rect(document, portrait)
        .map(|rect| rect.top + host.scroll_y())
        .unwrap_or(portrait_top);
    let main_body_top = host
        .bounding_rect(document, main_body)
        .map(|rect| rect.top + host.scroll_y())
        .unwrap_or(geometry.top);

    debug!(images = slots.len(), portrait_top, "laid out fan");
    Ok(Some(FanLayout {
        slots,
        portrait_top,
        portrait_offset: rendered_portrait_top - main_body_top,
    }))
}
