use crate::foundation::math::{mul_div255_u8, unit_to_u8};

/// 5x4 color matrix over unpremultiplied RGBA.
///
/// Row `i` computes output channel `i` as `m[5i] * r + m[5i+1] * g + m[5i+2] * b + m[5i+3] * a
/// + m[5i+4]`, where channels are in `0..=255` and the translation column `m[5i+4]` is in the same
/// 0..255 units. Results are clamped and premultiplied.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ColorMatrix(pub [f32; 20]);

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ColorMatrix {
    /// Leaves every pixel unchanged.
    #[rustfmt::skip]
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]);

    fn scale_rgb(s: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.0[0] = s;
        m.0[6] = s;
        m.0[12] = s;
        m
    }

    fn with_rgb_translation(mut self, t: f32) -> Self {
        self.0[4] = t;
        self.0[9] = t;
        self.0[14] = t;
        self
    }

    /// Multiply color channels by `amount`.
    pub fn brightness(amount: f32) -> Self {
        Self::scale_rgb(amount.max(0.0))
    }

    /// Add `amount` (as a fraction of full scale) to color channels.
    pub fn saturating_brightness(amount: f32) -> Self {
        Self::IDENTITY.with_rgb_translation(amount.max(0.0) * 255.0)
    }

    /// Scale color channels around mid-gray.
    pub fn contrast(amount: f32) -> Self {
        let amount = amount.max(0.0);
        Self::scale_rgb(amount).with_rgb_translation((-0.5 * amount + 0.5) * 255.0)
    }

    /// Mix each channel toward `255 - channel`.
    pub fn invert(amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        Self::scale_rgb(1.0 - 2.0 * amount).with_rgb_translation(amount * 255.0)
    }

    /// Multiply alpha by `amount`.
    pub fn opacity(amount: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.0[18] = amount.clamp(0.0, 1.0);
        m
    }

    /// Saturation; 0 is fully desaturated, 1 is unchanged, above 1 oversaturates.
    pub fn saturate(amount: f32) -> Self {
        let s = amount.max(0.0);
        let mut m = Self::IDENTITY;
        m.0[0] = 0.213 + 0.787 * s;
        m.0[1] = 0.715 - 0.715 * s;
        m.0[2] = 1.0 - (m.0[0] + m.0[1]);
        m.0[5] = 0.213 - 0.213 * s;
        m.0[6] = 0.715 + 0.285 * s;
        m.0[7] = 1.0 - (m.0[5] + m.0[6]);
        m.0[10] = 0.213 - 0.213 * s;
        m.0[11] = 0.715 - 0.715 * s;
        m.0[12] = 1.0 - (m.0[10] + m.0[11]);
        m
    }

    /// Luminance-preserving grayscale; 1 is fully gray.
    pub fn grayscale(amount: f32) -> Self {
        let o = (1.0 - amount).clamp(0.0, 1.0);
        let mut m = Self::IDENTITY;
        m.0[0] = 0.2126 + 0.7874 * o;
        m.0[1] = 0.7152 - 0.7152 * o;
        m.0[2] = 0.0722 - 0.0722 * o;
        m.0[5] = 0.2126 - 0.2126 * o;
        m.0[6] = 0.7152 + 0.2848 * o;
        m.0[7] = 0.0722 - 0.0722 * o;
        m.0[10] = 0.2126 - 0.2126 * o;
        m.0[11] = 0.7152 - 0.7152 * o;
        m.0[12] = 0.0722 + 0.9278 * o;
        m
    }

    /// Sepia tone; 1 is full sepia.
    pub fn sepia(amount: f32) -> Self {
        let o = (1.0 - amount).clamp(0.0, 1.0);
        let mut m = Self::IDENTITY;
        m.0[0] = 0.393 + 0.607 * o;
        m.0[1] = 0.769 - 0.769 * o;
        m.0[2] = 0.189 - 0.189 * o;
        m.0[5] = 0.349 - 0.349 * o;
        m.0[6] = 0.686 + 0.314 * o;
        m.0[7] = 0.168 - 0.168 * o;
        m.0[10] = 0.272 - 0.272 * o;
        m.0[11] = 0.534 - 0.534 * o;
        m.0[12] = 0.131 + 0.869 * o;
        m
    }

    /// Hue rotation in degrees.
    pub fn hue_rotate(degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        let mut m = Self::IDENTITY;
        m.0[0] = 0.213 + c * 0.787 - s * 0.213;
        m.0[1] = 0.715 - c * 0.715 - s * 0.715;
        m.0[2] = 0.072 - c * 0.072 + s * 0.928;
        m.0[5] = 0.213 - c * 0.213 + s * 0.143;
        m.0[6] = 0.715 + c * 0.285 + s * 0.140;
        m.0[7] = 0.072 - c * 0.072 - s * 0.283;
        m.0[10] = 0.213 - c * 0.213 - s * 0.787;
        m.0[11] = 0.715 - c * 0.715 + s * 0.715;
        m.0[12] = 0.072 + c * 0.928 + s * 0.072;
        m
    }

    /// Whether every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Whether alpha can change.
    pub fn affects_alpha(&self) -> bool {
        self.0[15..20] != [0.0, 0.0, 0.0, 1.0, 0.0]
    }

    /// Apply in 16.16 fixed point, in place, on premultiplied RGBA8.
    pub(crate) fn apply_fixed(&self, data: &mut [u8]) {
        let q: [i64; 20] = std::array::from_fn(|i| (f64::from(self.0[i]) * 65536.0).round() as i64);
        for px in data.chunks_exact_mut(4) {
            let a = u32::from(px[3]);
            let straight: [i64; 4] = if a == 0 {
                [0, 0, 0, 0]
            } else {
                let un = |c: u8| i64::from(((u32::from(c) * 255 + a / 2) / a).min(255));
                [un(px[0]), un(px[1]), un(px[2]), i64::from(a)]
            };
            let mut out = [0u8; 4];
            for (row, o) in out.iter_mut().enumerate() {
                let w = &q[row * 5..row * 5 + 5];
                let acc = w[0] * straight[0]
                    + w[1] * straight[1]
                    + w[2] * straight[2]
                    + w[3] * straight[3]
                    + w[4];
                *o = ((acc + 32768) >> 16).clamp(0, 255) as u8;
            }
            let oa = u16::from(out[3]);
            px[0] = mul_div255_u8(u16::from(out[0]), oa);
            px[1] = mul_div255_u8(u16::from(out[1]), oa);
            px[2] = mul_div255_u8(u16::from(out[2]), oa);
            px[3] = out[3];
        }
    }

    /// Apply in f32, in place, on premultiplied RGBA8.
    pub(crate) fn apply_float(&self, data: &mut [u8]) {
        let m = &self.0;
        for px in data.chunks_exact_mut(4) {
            let pa = f32::from(px[3]) / 255.0;
            let inv_a = if pa > 0.0 { 1.0 / pa } else { 0.0 };
            let r = f32::from(px[0]) / 255.0 * inv_a;
            let g = f32::from(px[1]) / 255.0 * inv_a;
            let b = f32::from(px[2]) / 255.0 * inv_a;
            let a = pa;

            let row = |i: usize| {
                (m[i] * r + m[i + 1] * g + m[i + 2] * b + m[i + 3] * a + m[i + 4] / 255.0)
                    .clamp(0.0, 1.0)
            };
            let (out_r, out_g, out_b, out_a) = (row(0), row(5), row(10), row(15));

            px[0] = unit_to_u8(out_r * out_a);
            px[1] = unit_to_u8(out_g * out_a);
            px[2] = unit_to_u8(out_b * out_a);
            px[3] = unit_to_u8(out_a);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/matrix.rs"]
mod tests;
