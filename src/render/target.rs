use crate::elements::shape::ElementShape;
use crate::foundation::color::Color;
use crate::foundation::core::{Affine, Rect};
use crate::foundation::error::MossResult;

/// One instance draw, fully resolved by the engine.
#[derive(Clone, Copy, Debug)]
pub struct DrawCommand<'a> {
    /// Element the instance belongs to; also the tint cache prefix.
    pub element_id: &'a str,
    /// Drawable handle of the element.
    pub shape: &'a ElementShape,
    /// Fill or tint color.
    pub color: Color,
    /// Maps a `size`×`size` box centered on the origin onto the canvas.
    pub transform: Affine,
    /// Edge length of the box the shape is fitted into, pixels.
    pub size: f64,
    /// Opacity in `(0, 1]`.
    pub opacity: f32,
}

impl DrawCommand<'_> {
    /// Transform from shape-local coordinates to canvas pixels.
    ///
    /// The shape bounds are scaled uniformly so their longer side equals `size`, then centered.
    pub fn shape_transform(&self) -> Affine {
        self.transform * fit_to_box(self.shape.bounds(), self.size)
    }
}

/// Affine fitting `bounds` into a `size`×`size` box centered on the origin.
pub fn fit_to_box(bounds: Rect, size: f64) -> Affine {
    let longest = bounds.width().max(bounds.height());
    let scale = if longest > 0.0 && longest.is_finite() {
        size / longest
    } else {
        1.0
    };
    Affine::scale(scale) * Affine::translate(-bounds.center().to_vec2())
}

/// A 2D surface the engine draws a frame onto.
pub trait RenderTarget {
    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Reallocate the surface.
    fn resize(&mut self, width: u32, height: u32) -> MossResult<()>;

    /// Start a frame filled with `background`.
    fn begin_frame(&mut self, background: Color) -> MossResult<()>;

    /// Draw one instance.
    fn draw(&mut self, cmd: &DrawCommand<'_>) -> MossResult<()>;

    /// Finish the frame and make it visible.
    fn present(&mut self) -> MossResult<()>;

    /// Drop cached recolored rasters of one element.
    fn invalidate_element(&mut self, _element_id: &str) {}
}

/// Target that keeps a log of what was drawn, for headless runs and tests.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    width: u32,
    height: u32,
    frames: u64,
    last_frame: Vec<RecordedDraw>,
    current: Vec<RecordedDraw>,
    invalidated: Vec<String>,
}

/// What [`RecordingTarget`] keeps per draw.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedDraw {
    /// Element id.
    pub element_id: String,
    /// Full shape transform.
    pub transform: Affine,
    /// Opacity.
    pub opacity: f32,
    /// Color.
    pub color: Color,
}

impl RecordingTarget {
    /// Recording surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draws of the last presented frame.
    pub fn last_frame(&self) -> &[RecordedDraw] {
        &self.last_frame
    }

    /// Element ids passed to [`RenderTarget::invalidate_element`].
    pub fn invalidated(&self) -> &[String] {
        &self.invalidated
    }
}

impl RenderTarget for RecordingTarget {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) -> MossResult<()> {
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn begin_frame(&mut self, _background: Color) -> MossResult<()> {
        self.current.clear();
        Ok(())
    }

    fn draw(&mut self, cmd: &DrawCommand<'_>) -> MossResult<()> {
        self.current.push(RecordedDraw {
            element_id: cmd.element_id.to_owned(),
            transform: cmd.shape_transform(),
            opacity: cmd.opacity,
            color: cmd.color,
        });
        Ok(())
    }

    fn present(&mut self) -> MossResult<()> {
        self.last_frame = std::mem::take(&mut self.current);
        self.frames += 1;
        Ok(())
    }

    fn invalidate_element(&mut self, element_id: &str) {
        self.invalidated.push(element_id.to_owned());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/target.rs"]
mod tests;
