use crate::foundation::error::{LayercastError, LayercastResult};

pub use kurbo::{Point, Rect, Vec2};

/// Axis-aligned layer bounds in document space (y-down, origin at top-left).
///
/// This is the raw shape the host document reports for every layer and for the
/// document itself; all scene-graph positions are derived from it via
/// [`crate::scene::coords`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(self) -> f64 {
        self.right - self.left
    }

    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    /// Smallest bounds containing both `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    pub fn as_rect(self) -> Rect {
        Rect::new(self.left, self.top, self.right, self.bottom)
    }
}

impl From<Rect> for Bounds {
    fn from(r: Rect) -> Self {
        Self::new(r.x0, r.y0, r.x1, r.y1)
    }
}

/// Document canvas dimensions, computed once per export from the document's
/// top-level bounds and fixed for the whole traversal.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RootSize {
    pub width: f64,
    pub height: f64,
}

impl RootSize {
    /// Create a validated root size with positive dimensions.
    pub fn new(width: f64, height: f64) -> LayercastResult<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(LayercastError::validation(
                "root width/height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn from_bounds(bounds: Bounds) -> LayercastResult<Self> {
        Self::new(bounds.width(), bounds.height())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geom.rs"]
mod tests;
