use std::sync::Arc;

use anyhow::Context;
use kurbo::Shape;

use crate::foundation::core::{BezPath, Rect};
use crate::foundation::error::{MossError, MossResult};

/// Drawable handle for an element, resolved by the host before registration.
#[derive(Clone)]
pub enum ElementShape {
    /// Vector outline filled with the element color.
    Path(BezPath),
    /// Parsed SVG document, rasterized and tinted on demand.
    Svg(Arc<usvg::Tree>),
}

impl ElementShape {
    /// Parse an SVG document.
    pub fn from_svg_bytes(bytes: &[u8]) -> MossResult<Self> {
        let opts = usvg::Options::default();
        let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
        Ok(Self::Svg(Arc::new(tree)))
    }

    /// Parse SVG path data (`d` attribute syntax).
    pub fn from_path_data(d: &str) -> MossResult<Self> {
        let path = BezPath::from_svg(d)
            .map_err(|e| MossError::asset(format!("invalid path data: {e}")))?;
        if path.elements().is_empty() {
            return Err(MossError::asset("path data is empty"));
        }
        Ok(Self::Path(path))
    }

    /// Bounds of the shape in its own coordinate space.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Path(p) => p.bounding_box(),
            Self::Svg(tree) => {
                let size = tree.size();
                Rect::new(0.0, 0.0, f64::from(size.width()), f64::from(size.height()))
            }
        }
    }
}

impl std::fmt::Debug for ElementShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(p) => f.debug_tuple("Path").field(&p.elements().len()).finish(),
            Self::Svg(_) => f.debug_tuple("Svg").finish(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/elements/shape.rs"]
mod tests;
