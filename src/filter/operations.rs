use crate::filter::blur::{EdgeMode, blur_rgba8_premul_fixed, blur_rgba8_premul_float};
use crate::filter::matrix::ColorMatrix;
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{TesseraError, TesseraResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};
use crate::geometry::rect::Offset;

/// One step of a filter pipeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperation {
    Identity,
    Grayscale(f32),
    Sepia(f32),
    Saturate(f32),
    /// Degrees.
    HueRotate(f32),
    Invert(f32),
    Brightness(f32),
    SaturatingBrightness(f32),
    Contrast(f32),
    Opacity(f32),
    ColorMatrix(ColorMatrix),
    /// Gaussian standard deviation in pixels.
    Blur(f32),
    DropShadow {
        offset: Offset,
        sigma: f32,
        color: Rgba8Premul,
    },
}

impl FilterOperation {
    /// The color matrix this operation reduces to, if it is a pure per-pixel color transform.
    pub fn color_matrix(&self) -> Option<ColorMatrix> {
        Some(match *self {
            Self::Identity => ColorMatrix::IDENTITY,
            Self::Grayscale(a) => ColorMatrix::grayscale(a),
            Self::Sepia(a) => ColorMatrix::sepia(a),
            Self::Saturate(a) => ColorMatrix::saturate(a),
            Self::HueRotate(deg) => ColorMatrix::hue_rotate(deg),
            Self::Invert(a) => ColorMatrix::invert(a),
            Self::Brightness(a) => ColorMatrix::brightness(a),
            Self::SaturatingBrightness(a) => ColorMatrix::saturating_brightness(a),
            Self::Contrast(a) => ColorMatrix::contrast(a),
            Self::Opacity(a) => ColorMatrix::opacity(a),
            Self::ColorMatrix(m) => m,
            Self::Blur(_) | Self::DropShadow { .. } => return None,
        })
    }

    /// Whether output pixels depend on neighbouring input pixels.
    pub fn moves_pixels(&self) -> bool {
        matches!(self, Self::Blur(_) | Self::DropShadow { .. })
    }

    /// Reject non-finite amounts and negative blur radii.
    pub fn validate(&self) -> TesseraResult<()> {
        match self {
            Self::Blur(sigma) | Self::DropShadow { sigma, .. } => {
                if !sigma.is_finite() || *sigma < 0.0 {
                    return Err(TesseraError::validation(format!(
                        "blur sigma must be finite and >= 0, got {sigma}"
                    )));
                }
            }
            Self::ColorMatrix(m) => {
                if !m.is_finite() {
                    return Err(TesseraError::validation("color matrix has non-finite entries"));
                }
            }
            Self::Identity => {}
            Self::Grayscale(a)
            | Self::Sepia(a)
            | Self::Saturate(a)
            | Self::HueRotate(a)
            | Self::Invert(a)
            | Self::Brightness(a)
            | Self::SaturatingBrightness(a)
            | Self::Contrast(a)
            | Self::Opacity(a) => {
                if !a.is_finite() {
                    return Err(TesseraError::validation(format!(
                        "filter amount must be finite: {self:?}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Numeric path a backend uses when running filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Precision {
    /// 16.16 fixed point.
    Fixed,
    /// f32.
    Float,
}

/// Ordered filter pipeline, applied first to last.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FilterOperations(pub Vec<FilterOperation>);

impl FilterOperations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation.
    pub fn append(&mut self, op: FilterOperation) {
        self.0.push(op);
    }

    /// Builder form of [`Self::append`].
    pub fn with(mut self, op: FilterOperation) -> Self {
        self.append(op);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterOperation> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn has_filter_that_moves_pixels(&self) -> bool {
        self.0.iter().any(FilterOperation::moves_pixels)
    }

    pub fn validate(&self) -> TesseraResult<()> {
        self.0.iter().try_for_each(FilterOperation::validate)
    }

    /// Run the pipeline in place over a premultiplied RGBA8 buffer.
    pub(crate) fn apply_to(
        &self,
        data: &mut Vec<u8>,
        width: u32,
        height: u32,
        edge: EdgeMode,
        precision: Precision,
    ) -> TesseraResult<()> {
        for op in &self.0 {
            if let Some(m) = op.color_matrix() {
                if m == ColorMatrix::IDENTITY {
                    continue;
                }
                match precision {
                    Precision::Fixed => m.apply_fixed(data),
                    Precision::Float => m.apply_float(data),
                }
                continue;
            }
            match *op {
                FilterOperation::Blur(sigma) => {
                    *data = blur(data, width, height, sigma, edge, precision)?;
                }
                FilterOperation::DropShadow {
                    offset,
                    sigma,
                    color,
                } => {
                    drop_shadow(data, width, height, offset, sigma, color, edge, precision)?;
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl FromIterator<FilterOperation> for FilterOperations {
    fn from_iter<I: IntoIterator<Item = FilterOperation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn blur(
    data: &[u8],
    width: u32,
    height: u32,
    sigma: f32,
    edge: EdgeMode,
    precision: Precision,
) -> TesseraResult<Vec<u8>> {
    match precision {
        Precision::Fixed => blur_rgba8_premul_fixed(data, width, height, sigma, edge),
        Precision::Float => blur_rgba8_premul_float(data, width, height, sigma, edge),
    }
}

/// Source composited over a blurred, offset, tinted copy of its own alpha.
#[allow(clippy::too_many_arguments)]
fn drop_shadow(
    data: &mut [u8],
    width: u32,
    height: u32,
    offset: Offset,
    sigma: f32,
    color: Rgba8Premul,
    edge: EdgeMode,
    precision: Precision,
) -> TesseraResult<()> {
    let (w, h) = (width as i32, height as i32);
    let tint = color.to_array();
    let mut shadow = vec![0u8; data.len()];
    for y in 0..h {
        let sy = y - offset.y;
        if !(0..h).contains(&sy) {
            continue;
        }
        for x in 0..w {
            let sx = x - offset.x;
            if !(0..w).contains(&sx) {
                continue;
            }
            let a = u16::from(data[(sy * w + sx) as usize * 4 + 3]);
            let di = (y * w + x) as usize * 4;
            for c in 0..4 {
                shadow[di + c] = mul_div255_u8(u16::from(tint[c]), a);
            }
        }
    }
    let shadow = blur(&shadow, width, height, sigma, edge, precision)?;
    for (d, s) in data.chunks_exact_mut(4).zip(shadow.chunks_exact(4)) {
        let inv = 255 - u16::from(d[3]);
        for c in 0..4 {
            d[c] = add_sat_u8(d[c], mul_div255_u8(u16::from(s[c]), inv));
        }
    }
    Ok(())
}

/// Single image filter attached to a render pass quad, applied after its filter list.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFilter {
    ColorMatrix(ColorMatrix),
    Blur { sigma: f32 },
    /// `outer(inner(x))`.
    Compose {
        outer: Box<ImageFilter>,
        inner: Box<ImageFilter>,
    },
}

impl ImageFilter {
    /// Flatten into a pipeline; composed filters run inner first.
    pub fn to_operations(&self) -> FilterOperations {
        let mut ops = FilterOperations::new();
        self.push_operations(&mut ops);
        ops
    }

    fn push_operations(&self, ops: &mut FilterOperations) {
        match self {
            Self::ColorMatrix(m) => ops.append(FilterOperation::ColorMatrix(*m)),
            Self::Blur { sigma } => ops.append(FilterOperation::Blur(*sigma)),
            Self::Compose { outer, inner } => {
                inner.push_operations(ops);
                outer.push_operations(ops);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/operations.rs"]
mod tests;
