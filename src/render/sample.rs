use crate::foundation::core::{Point, Rect};
use crate::foundation::math::mul_div255_u8;
use crate::resource::provider::{ResourceFormat, Texels};

/// Linear map from a rect in quad-local space to a rect in texel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TexMap {
    pub(crate) local: Rect,
    pub(crate) texel: Rect,
}

impl TexMap {
    pub(crate) fn map(&self, p: Point) -> Point {
        let sx = self.texel.width() / self.local.width();
        let sy = self.texel.height() / self.local.height();
        Point::new(
            self.texel.x0 + (p.x - self.local.x0) * sx,
            self.texel.y0 + (p.y - self.local.y0) * sy,
        )
    }
}

/// A texture bound for sampling. Reads outside the texture clamp to its edge.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Sampler<'a> {
    pub(crate) texels: Texels<'a>,
    pub(crate) map: TexMap,
    /// Texels hold straight alpha and are premultiplied as they are read.
    pub(crate) premultiply: bool,
}

struct Taps {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    fx: f64,
    fy: f64,
}

impl<'a> Sampler<'a> {
    pub(crate) fn new(texels: Texels<'a>, map: TexMap) -> Self {
        Self {
            texels,
            map,
            premultiply: false,
        }
    }

    /// Premultiplied RGBA of one texel; luminance reads as opaque gray.
    fn texel(&self, x: i32, y: i32) -> [u8; 4] {
        let w = self.texels.size.width as usize;
        let i = y as usize * w + x as usize;
        let d = self.texels.data;
        let px = match self.texels.format {
            ResourceFormat::Rgba8 => [d[i * 4], d[i * 4 + 1], d[i * 4 + 2], d[i * 4 + 3]],
            ResourceFormat::Bgra8 => [d[i * 4 + 2], d[i * 4 + 1], d[i * 4], d[i * 4 + 3]],
            ResourceFormat::Luminance8 => [d[i], d[i], d[i], 255],
        };
        if self.premultiply && px[3] != 255 {
            let a = u16::from(px[3]);
            return [
                mul_div255_u8(u16::from(px[0]), a),
                mul_div255_u8(u16::from(px[1]), a),
                mul_div255_u8(u16::from(px[2]), a),
                px[3],
            ];
        }
        px
    }

    /// Single channel: luminance for L8, alpha otherwise.
    fn channel(&self, x: i32, y: i32) -> u8 {
        let i = y as usize * self.texels.size.width as usize + x as usize;
        match self.texels.format {
            ResourceFormat::Luminance8 => self.texels.data[i],
            ResourceFormat::Rgba8 | ResourceFormat::Bgra8 => self.texels.data[i * 4 + 3],
        }
    }

    fn taps(&self, local: Point) -> Taps {
        let p = self.map.map(local);
        let max_x = self.texels.size.width as i32 - 1;
        let max_y = self.texels.size.height as i32 - 1;
        let sx = p.x - 0.5;
        let sy = p.y - 0.5;
        let bx = sx.floor();
        let by = sy.floor();
        let clamp = |v: f64, max: i32| v.clamp(0.0, f64::from(max)) as i32;
        Taps {
            x0: clamp(bx, max_x),
            y0: clamp(by, max_y),
            x1: clamp(bx + 1.0, max_x),
            y1: clamp(by + 1.0, max_y),
            fx: sx - bx,
            fy: sy - by,
        }
    }

    /// Bilinear RGBA with 8-bit fractional weights.
    pub(crate) fn rgba_fixed(&self, local: Point) -> [u8; 4] {
        let t = self.taps(local);
        let (wx, wy) = (frac_u8(t.fx), frac_u8(t.fy));
        let (c00, c10) = (self.texel(t.x0, t.y0), self.texel(t.x1, t.y0));
        let (c01, c11) = (self.texel(t.x0, t.y1), self.texel(t.x1, t.y1));
        std::array::from_fn(|i| lerp2_fixed(c00[i], c10[i], c01[i], c11[i], wx, wy))
    }

    /// Bilinear RGBA in 0..1.
    pub(crate) fn rgba_float(&self, local: Point) -> [f32; 4] {
        let t = self.taps(local);
        let (fx, fy) = (t.fx as f32, t.fy as f32);
        let (c00, c10) = (self.texel(t.x0, t.y0), self.texel(t.x1, t.y0));
        let (c01, c11) = (self.texel(t.x0, t.y1), self.texel(t.x1, t.y1));
        std::array::from_fn(|i| lerp2_float(c00[i], c10[i], c01[i], c11[i], fx, fy))
    }

    pub(crate) fn channel_fixed(&self, local: Point) -> u8 {
        let t = self.taps(local);
        let (wx, wy) = (frac_u8(t.fx), frac_u8(t.fy));
        lerp2_fixed(
            self.channel(t.x0, t.y0),
            self.channel(t.x1, t.y0),
            self.channel(t.x0, t.y1),
            self.channel(t.x1, t.y1),
            wx,
            wy,
        )
    }

    pub(crate) fn channel_float(&self, local: Point) -> f32 {
        let t = self.taps(local);
        lerp2_float(
            self.channel(t.x0, t.y0),
            self.channel(t.x1, t.y0),
            self.channel(t.x0, t.y1),
            self.channel(t.x1, t.y1),
            t.fx as f32,
            t.fy as f32,
        )
    }
}

/// Fraction in 0..1 to a weight in 0..=256.
fn frac_u8(f: f64) -> u32 {
    (f * 256.0).round().clamp(0.0, 256.0) as u32
}

fn lerp2_fixed(c00: u8, c10: u8, c01: u8, c11: u8, wx: u32, wy: u32) -> u8 {
    let top = u32::from(c00) * (256 - wx) + u32::from(c10) * wx;
    let bottom = u32::from(c01) * (256 - wx) + u32::from(c11) * wx;
    ((top * (256 - wy) + bottom * wy + 32768) >> 16).min(255) as u8
}

fn lerp2_float(c00: u8, c10: u8, c01: u8, c11: u8, fx: f32, fy: f32) -> f32 {
    let f = |c: u8| f32::from(c) / 255.0;
    let top = f(c00) + (f(c10) - f(c00)) * fx;
    let bottom = f(c01) + (f(c11) - f(c01)) * fx;
    top + (bottom - top) * fy
}

/// Integer BT.601 (video range) to premultiplied RGBA.
pub(crate) fn yuv_to_rgba_fixed(y: u8, u: u8, v: u8, a: u8) -> [u8; 4] {
    let c = i32::from(y) - 16;
    let d = i32::from(u) - 128;
    let e = i32::from(v) - 128;
    let clamp = |x: i32| (x >> 8).clamp(0, 255) as u8;
    let r = clamp(298 * c + 409 * e + 128);
    let g = clamp(298 * c - 100 * d - 208 * e + 128);
    let b = clamp(298 * c + 516 * d + 128);
    let a16 = u16::from(a);
    [
        mul_div255_u8(u16::from(r), a16),
        mul_div255_u8(u16::from(g), a16),
        mul_div255_u8(u16::from(b), a16),
        a,
    ]
}

/// Float BT.601 (video range) to premultiplied RGBA in 0..1.
pub(crate) fn yuv_to_rgba_float(y: f32, u: f32, v: f32, a: f32) -> [f32; 4] {
    let y = (y - 16.0 / 255.0) * 1.164;
    let u = u - 0.5;
    let v = v - 0.5;
    let r = (y + 1.596 * v).clamp(0.0, 1.0);
    let g = (y - 0.391 * u - 0.813 * v).clamp(0.0, 1.0);
    let b = (y + 2.018 * u).clamp(0.0, 1.0);
    [r * a, g * a, b * a, a]
}

#[cfg(test)]
#[path = "../../tests/unit/render/sample.rs"]
mod tests;
