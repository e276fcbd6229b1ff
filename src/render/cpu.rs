use std::sync::Arc;

use crate::elements::shape::ElementShape;
use crate::foundation::color::Color;
use crate::foundation::core::{Affine, BezPath, Point};
use crate::foundation::error::{MossError, MossResult};
use crate::render::target::{DrawCommand, RenderTarget};
use crate::render::tint::{TintCache, element_prefix, tint_key, tint_premul_rgba8};

/// Longest edge, in pixels, SVG elements are rasterized at before tinting.
pub const SVG_RASTER_EDGE: u32 = 256;

/// Software canvas backed by `vello_cpu`.
pub struct CpuCanvas {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    tints: TintCache<vello_cpu::Image>,
}

impl CpuCanvas {
    /// Allocate a canvas. Zero or oversized dimensions are a surface error.
    pub fn new(width: u32, height: u32) -> MossResult<Self> {
        let (w, h) = surface_dims(width, height)?;
        Ok(Self {
            width: w,
            height: h,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            tints: TintCache::new(),
        })
    }

    /// Premultiplied RGBA8 pixels of the last presented frame.
    pub fn pixels_premul(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Straight-alpha RGBA8 pixels of the last presented frame.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = self.pixels_premul().to_vec();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    /// Cached tinted rasters.
    pub fn tint_cache_len(&self) -> usize {
        self.tints.len()
    }

    fn svg_paint(
        &mut self,
        element_id: &str,
        tree: &usvg::Tree,
        color: Color,
    ) -> MossResult<vello_cpu::Image> {
        let key = tint_key(element_id, color);
        self.tints.get_or_try_insert_with::<MossError>(&key, || {
            let (w, h) = svg_raster_dims(tree)?;
            let mut rgba = rasterize_svg_to_premul_rgba8(tree, w, h)?;
            tint_premul_rgba8(&mut rgba, color);
            let pixmap = premul_bytes_to_pixmap(&rgba, w, h)?;
            tracing::debug!(key = %key, w, h, "svg tint rasterized");
            Ok(vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            })
        })
    }
}

impl std::fmt::Debug for CpuCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuCanvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("tints", &self.tints.len())
            .finish_non_exhaustive()
    }
}

impl RenderTarget for CpuCanvas {
    fn size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    fn resize(&mut self, width: u32, height: u32) -> MossResult<()> {
        let (w, h) = surface_dims(width, height)?;
        if (w, h) != (self.width, self.height) {
            self.width = w;
            self.height = h;
            self.ctx = vello_cpu::RenderContext::new(w, h);
            self.pixmap = vello_cpu::Pixmap::new(w, h);
        }
        Ok(())
    }

    fn begin_frame(&mut self, background: Color) -> MossResult<()> {
        self.ctx.reset();
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(to_cpu_color(background));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
        Ok(())
    }

    fn draw(&mut self, cmd: &DrawCommand<'_>) -> MossResult<()> {
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        let layered = cmd.opacity < 1.0;

        match cmd.shape {
            ElementShape::Path(path) => {
                self.ctx.set_transform(affine_to_cpu(cmd.shape_transform()));
                self.ctx.set_paint(to_cpu_color(cmd.color));
                if layered {
                    self.ctx.push_opacity_layer(cmd.opacity);
                }
                self.ctx.fill_path(&bezpath_to_cpu(path));
            }
            ElementShape::Svg(tree) => {
                let paint = self.svg_paint(cmd.element_id, tree, cmd.color)?;
                let (w, h) = image_paint_size(&paint)?;
                // The raster replaces the tree's own coordinate space.
                let to_tree = Affine::scale_non_uniform(
                    f64::from(tree.size().width()) / w,
                    f64::from(tree.size().height()) / h,
                );
                self.ctx
                    .set_transform(affine_to_cpu(cmd.shape_transform() * to_tree));
                self.ctx.set_paint(paint);
                if layered {
                    self.ctx.push_opacity_layer(cmd.opacity);
                }
                self.ctx
                    .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
            }
        }

        if layered {
            self.ctx.pop_layer();
        }
        Ok(())
    }

    fn present(&mut self) -> MossResult<()> {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        Ok(())
    }

    fn invalidate_element(&mut self, element_id: &str) {
        let dropped = self.tints.invalidate_prefix(&element_prefix(element_id));
        if dropped > 0 {
            tracing::debug!(element = element_id, dropped, "tint cache invalidated");
        }
    }
}

fn surface_dims(width: u32, height: u32) -> MossResult<(u16, u16)> {
    if width == 0 || height == 0 {
        return Err(MossError::surface(format!(
            "canvas must be non-empty, got {width}x{height}"
        )));
    }
    let w: u16 = width
        .try_into()
        .map_err(|_| MossError::surface("canvas width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| MossError::surface("canvas height exceeds u16"))?;
    Ok((w, h))
}

fn to_cpu_color(c: Color) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_rgba8();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Raster size keeping the SVG aspect ratio with the longer edge at [`SVG_RASTER_EDGE`].
fn svg_raster_dims(tree: &usvg::Tree) -> MossResult<(u32, u32)> {
    let size = tree.size();
    let (tw, th) = (f64::from(size.width()), f64::from(size.height()));
    if !(tw.is_finite() && th.is_finite()) || tw <= 0.0 || th <= 0.0 {
        return Err(MossError::asset("svg has invalid width/height"));
    }
    let scale = f64::from(SVG_RASTER_EDGE) / tw.max(th);
    let w = (tw * scale).ceil().max(1.0) as u32;
    let h = (th * scale).ceil().max(1.0) as u32;
    Ok((w, h))
}

fn rasterize_svg_to_premul_rgba8(tree: &usvg::Tree, width: u32, height: u32) -> MossResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| MossError::asset("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

fn premul_bytes_to_pixmap(rgba8_premul: &[u8], width: u32, height: u32) -> MossResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| MossError::asset("raster width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| MossError::asset("raster height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(MossError::asset("raster byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn image_paint_size(image: &vello_cpu::Image) -> MossResult<(f64, f64)> {
    match &image.image {
        vello_cpu::ImageSource::Pixmap(p) => Ok((f64::from(p.width()), f64::from(p.height()))),
        vello_cpu::ImageSource::OpaqueId(_) => Err(MossError::asset(
            "cpu canvas does not support opaque image ids",
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
