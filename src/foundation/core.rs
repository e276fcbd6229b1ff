use crate::foundation::error::{MossError, MossResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Pixel dimensions of the drawing surface the engine places instances on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> MossResult<Self> {
        if width == 0 || height == 0 {
            return Err(MossError::surface(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Width as `f64`.
    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64`.
    pub fn h(self) -> f64 {
        f64::from(self.height)
    }

    /// Return `true` when `p` lies inside the canvas grown by `margin` on every side.
    pub fn contains_with_margin(self, p: Point, margin: f64) -> bool {
        p.x >= -margin && p.x <= self.w() + margin && p.y >= -margin && p.y <= self.h() + margin
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
