use crate::foundation::geom::{Bounds, RootSize};
use crate::scene::model::{Justification, Vec2a};
use serde::{Deserialize, Serialize};

/// Output coordinate convention, selected by the triggering command and
/// passed explicitly to every conversion so the transform stays pure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordMode {
    /// Origin at canvas center, y-axis pointing up (sprite engines).
    #[serde(rename = "spritekit")]
    Centered,
    /// Origin at top-left, y-axis pointing down (native UI toolkits).
    #[serde(rename = "native_ui")]
    TopLeft,
}

/// Position/size pair produced from raw document bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedRect {
    pub position: Vec2a,
    pub size: Vec2a,
}

/// Convert raw axis-aligned bounds into a position/size pair under `mode`.
///
/// `Centered` re-origins to the canvas center and flips the vertical axis so
/// the position names the rect's center; `TopLeft` passes the document-space
/// top-left corner through unchanged.
pub fn placed_rect(bounds: Bounds, root: RootSize, mode: CoordMode) -> PlacedRect {
    let width = bounds.width();
    let height = bounds.height();

    match mode {
        CoordMode::Centered => {
            let center_x = bounds.left + width / 2.0 - root.width / 2.0;
            let center_y = root.height / 2.0 - (bounds.bottom - height / 2.0);
            PlacedRect {
                position: [center_x, center_y],
                size: [width, height],
            }
        }
        CoordMode::TopLeft => PlacedRect {
            position: [bounds.left, bounds.top],
            size: [width, height],
        },
    }
}

/// Shift a text node's x position so its anchor matches the paragraph
/// alignment under the active mode.
///
/// Sprite engines anchor labels at the alignment edge of the text box;
/// native UI keeps the left edge for left-aligned text. Only x changes.
pub fn align_text_x(position: Vec2a, size: Vec2a, justification: Justification, mode: CoordMode) -> Vec2a {
    let [x, y] = position;
    let width = size[0];

    let x = match (justification, mode) {
        (Justification::Left, CoordMode::Centered) => x - width / 2.0,
        (Justification::Left, CoordMode::TopLeft) => x,
        (Justification::Right, CoordMode::Centered) => x + width / 2.0,
        (Justification::Right, CoordMode::TopLeft) => x + width,
        (Justification::Center, CoordMode::Centered) => x,
        (Justification::Center, CoordMode::TopLeft) => x + width / 2.0,
    };

    [x, y]
}

#[cfg(test)]
#[path = "../../tests/unit/scene/coords.rs"]
mod tests;
