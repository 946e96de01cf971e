use crate::foundation::math::{add_sat_u8, mul_div255_u8, unit_to_u8};

pub(crate) type PremulRgba8 = [u8; 4];

/// How a drawn pixel combines with the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CompositeMode {
    SrcOver,
    /// Overwrites the target (filtered backdrops).
    Replace,
}

/// Opacity in 0..1 as an 8-bit multiplier.
pub(crate) fn opacity_to_u8(opacity: f32) -> u8 {
    ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u8
}

/// Scale every premultiplied channel by `s / 255`.
pub(crate) fn scale_fixed(px: PremulRgba8, s: u8) -> PremulRgba8 {
    if s == 255 {
        return px;
    }
    let s = u16::from(s);
    px.map(|c| mul_div255_u8(u16::from(c), s))
}

pub(crate) fn over_fixed(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }
    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = add_sat_u8(src[i], mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

pub(crate) fn composite_fixed(dst: &mut [u8], src: PremulRgba8, mode: CompositeMode) {
    let d = [dst[0], dst[1], dst[2], dst[3]];
    let out = match mode {
        CompositeMode::SrcOver => over_fixed(d, src),
        CompositeMode::Replace => src,
    };
    dst.copy_from_slice(&out);
}

/// Source-over or coverage-weighted replace in f32; `src` is premultiplied in 0..1.
pub(crate) fn composite_float(dst: &mut [u8], src: [f32; 4], coverage: f32, mode: CompositeMode) {
    let d = [dst[0], dst[1], dst[2], dst[3]].map(|c| f32::from(c) / 255.0);
    let out: [f32; 4] = match mode {
        CompositeMode::SrcOver => {
            let s = src.map(|c| c * coverage);
            let inv = 1.0 - s[3];
            std::array::from_fn(|i| s[i] + d[i] * inv)
        }
        CompositeMode::Replace => std::array::from_fn(|i| src[i] * coverage + d[i] * (1.0 - coverage)),
    };
    for (o, v) in dst.iter_mut().zip(out) {
        *o = unit_to_u8(v);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
