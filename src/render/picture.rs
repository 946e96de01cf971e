use kurbo::PathEl;

use crate::foundation::core::{Affine, BezPath, Point};
use crate::foundation::error::{TesseraError, TesseraResult};
use crate::geometry::rect::Size;
use crate::resource::provider::ResourceFormat;
use crate::scene::picture::PictureOp;
use crate::scene::quad::PictureQuad;

/// A picture played back into a texture.
#[derive(Clone, Debug)]
pub(crate) struct PictureRaster {
    pub(crate) size: Size,
    pub(crate) format: ResourceFormat,
    pub(crate) data: Vec<u8>,
}

/// Play the quad's picture into a premultiplied texture of `texture_size`.
///
/// Content space is scaled by `contents_scale`, then shifted so `content_rect`'s origin lands on
/// texel (0, 0). Swizzled quads come back in `Bgra8` order.
pub(crate) fn rasterize_picture(quad: &PictureQuad) -> TesseraResult<PictureRaster> {
    let size = quad.texture_size;
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| TesseraError::allocation("picture texture width exceeds u16"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| TesseraError::allocation("picture texture height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(TesseraError::allocation("picture texture has zero area"));
    }
    if !quad.contents_scale.is_finite() || quad.contents_scale <= 0.0 {
        return Err(TesseraError::validation(format!(
            "picture contents_scale must be > 0, got {}",
            quad.contents_scale
        )));
    }

    let origin = quad.content_rect;
    let transform = Affine::translate((-f64::from(origin.x), -f64::from(origin.y)))
        * Affine::scale(f64::from(quad.contents_scale));

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_transform(affine_to_cpu(transform));
    for op in &quad.picture.ops {
        match op {
            PictureOp::FillRect { rect, color } => {
                let [r, g, b, a] = *color;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
            }
            PictureOp::FillPath { path, color } => {
                let [r, g, b, a] = *color;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                ctx.fill_path(&bezpath_to_cpu(path));
            }
        }
    }
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);

    let mut data = pixmap.data_as_u8_slice().to_vec();
    let format = if quad.contents_swizzled {
        for px in data.chunks_exact_mut(4) {
            px.swap(0, 2);
        }
        ResourceFormat::Bgra8
    } else {
        ResourceFormat::Rgba8
    };
    tracing::trace!(width = w, height = h, ops = quad.picture.ops.len(), "rasterized picture");
    Ok(PictureRaster { size, format, data })
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
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

#[cfg(test)]
#[path = "../../tests/unit/render/picture.rs"]
mod tests;
