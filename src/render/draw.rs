//! Backend-agnostic description of one quad draw, lowered to target pixel space.

use crate::foundation::core::{Point, Rgba8Premul};
use crate::geometry::quad::{DeviceQuad, edge_coverage};
use crate::geometry::rect::RectI;
use crate::geometry::transform::Homography;
use crate::render::composite::CompositeMode;
use crate::render::sample::Sampler;

/// Where a quad's color comes from.
#[derive(Clone, Copy, Debug)]
pub(crate) enum QuadSource<'a> {
    Solid(Rgba8Premul),
    Texture(Sampler<'a>),
    Yuv {
        y: Sampler<'a>,
        u: Sampler<'a>,
        v: Sampler<'a>,
        a: Option<Sampler<'a>>,
    },
}

/// A quad ready for rasterization into one target surface.
///
/// Built by the compositor; backends only read it.
#[derive(Clone, Debug)]
pub struct QuadDraw<'a> {
    /// Device-space polygon, already snapped when pixel-aligned.
    pub(crate) quad: DeviceQuad,
    /// Device to quad-local mapping.
    pub(crate) to_local: Homography,
    /// Scissor in target pixels.
    pub(crate) clip: RectI,
    pub(crate) opacity: f32,
    pub(crate) anti_alias: bool,
    pub(crate) source: QuadSource<'a>,
    /// Its single channel multiplies the source.
    pub(crate) mask: Option<Sampler<'a>>,
    pub(crate) mode: CompositeMode,
}

impl QuadDraw<'_> {
    /// Quad-local position of the center of device pixel `(x, y)`.
    pub(crate) fn local_at(&self, x: i32, y: i32) -> Option<Point> {
        self.to_local
            .project(Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5))
    }

    /// Visit every pixel of `target` the quad touches, with its coverage.
    ///
    /// Without anti-aliasing coverage is always 1 and follows the pixel-center rule; with it,
    /// coverage falls off linearly across each edge.
    pub(crate) fn for_each_pixel(&self, target: RectI, mut f: impl FnMut(i32, i32, f32)) {
        let area = target.intersect(self.clip);
        if area.is_empty() {
            return;
        }
        if !self.anti_alias {
            for span in self.quad.spans(area) {
                for x in span.x0..span.x1 {
                    f(x, span.y, 1.0);
                }
            }
            return;
        }
        let edges = self.quad.edge_equations();
        let bounds = self.quad.pixel_bounds().intersect(area);
        for y in bounds.y..bounds.bottom() {
            for x in bounds.x..bounds.right() {
                let cov = edge_coverage(&edges, f64::from(x) + 0.5, f64::from(y) + 0.5);
                if cov > 0.0 {
                    f(x, y, cov);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/draw.rs"]
mod tests;
