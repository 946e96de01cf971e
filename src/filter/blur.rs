use crate::foundation::error::{TesseraError, TesseraResult};

/// How a filter treats pixels outside the buffer it reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EdgeMode {
    /// Outside pixels are transparent black.
    #[default]
    Transparent,
    /// Outside pixels repeat the nearest edge pixel.
    Clamp,
}

/// Kernel half-width for a Gaussian of standard deviation `sigma`.
pub fn blur_radius(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (3.0 * sigma).ceil() as u32
}

/// Separable Gaussian blur of premultiplied RGBA8 with 16.16 fixed-point weights.
pub(crate) fn blur_rgba8_premul_fixed(
    src: &[u8],
    width: u32,
    height: u32,
    sigma: f32,
    edge: EdgeMode,
) -> TesseraResult<Vec<u8>> {
    let expected_len = checked_len(src, width, height)?;
    let radius = blur_radius(sigma);
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];
    pass_q16(src, &mut tmp, width, height, &kernel, Axis::Horizontal, edge);
    pass_q16(&tmp, &mut out, width, height, &kernel, Axis::Vertical, edge);
    Ok(out)
}

/// Separable Gaussian blur of premultiplied RGBA8 with f32 weights and accumulation.
pub(crate) fn blur_rgba8_premul_float(
    src: &[u8],
    width: u32,
    height: u32,
    sigma: f32,
    edge: EdgeMode,
) -> TesseraResult<Vec<u8>> {
    let expected_len = checked_len(src, width, height)?;
    let radius = blur_radius(sigma);
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_f32(radius, sigma)?;
    let mut tmp = vec![0f32; expected_len];
    let src_f: Vec<f32> = src.iter().map(|&v| f32::from(v)).collect();
    pass_f32(&src_f, &mut tmp, width, height, &kernel, Axis::Horizontal, edge);
    let mut out_f = vec![0f32; expected_len];
    pass_f32(&tmp, &mut out_f, width, height, &kernel, Axis::Vertical, edge);
    Ok(out_f
        .into_iter()
        .map(|v| (v + 0.5).clamp(0.0, 255.0) as u8)
        .collect())
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

fn checked_len(src: &[u8], width: u32, height: u32) -> TesseraResult<usize> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| TesseraError::validation("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(TesseraError::validation(
            "blur expects a buffer matching width*height*4",
        ));
    }
    Ok(expected_len)
}

fn gaussian_weights(radius: u32, sigma: f32) -> TesseraResult<Vec<f64>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(TesseraError::validation("blur sigma must be > 0"));
    }
    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        return Err(TesseraError::validation("gaussian kernel sum is zero"));
    }
    Ok(weights.into_iter().map(|w| w / sum).collect())
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> TesseraResult<Vec<u32>> {
    let weights_f = gaussian_weights(radius, sigma)?;

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf * 65536.0).round() as i64).clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Push the rounding residue into the center tap so the kernel sums to exactly 1.0.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

fn gaussian_kernel_f32(radius: u32, sigma: f32) -> TesseraResult<Vec<f32>> {
    Ok(gaussian_weights(radius, sigma)?
        .into_iter()
        .map(|w| w as f32)
        .collect())
}

/// Index of the texel read for tap `pos` along an axis of length `len`, or `None` if it falls
/// outside and the edge mode makes it transparent.
fn tap_index(pos: i32, len: i32, edge: EdgeMode) -> Option<i32> {
    match edge {
        EdgeMode::Clamp => Some(pos.clamp(0, len - 1)),
        EdgeMode::Transparent => (0..len).contains(&pos).then_some(pos),
    }
}

fn pass_q16(
    src: &[u8],
    dst: &mut [u8],
    width: u32,
    height: u32,
    k: &[u32],
    axis: Axis,
    edge: EdgeMode,
) {
    let radius = (k.len() / 2) as i32;
    let (w, h) = (width as i32, height as i32);
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let d = ki as i32 - radius;
                let idx = match axis {
                    Axis::Horizontal => tap_index(x + d, w, edge).map(|sx| y * w + sx),
                    Axis::Vertical => tap_index(y + d, h, edge).map(|sy| sy * w + x),
                };
                let Some(idx) = idx else { continue };
                let idx = idx as usize * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = (y * w + x) as usize * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn pass_f32(
    src: &[f32],
    dst: &mut [f32],
    width: u32,
    height: u32,
    k: &[f32],
    axis: Axis,
    edge: EdgeMode,
) {
    let radius = (k.len() / 2) as i32;
    let (w, h) = (width as i32, height as i32);
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0f32; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let d = ki as i32 - radius;
                let idx = match axis {
                    Axis::Horizontal => tap_index(x + d, w, edge).map(|sx| y * w + sx),
                    Axis::Vertical => tap_index(y + d, h, edge).map(|sy| sy * w + x),
                };
                let Some(idx) = idx else { continue };
                let idx = idx as usize * 4;
                for c in 0..4 {
                    acc[c] += kw * src[idx + c];
                }
            }
            let out_idx = (y * w + x) as usize * 4;
            dst[out_idx..out_idx + 4].copy_from_slice(&acc);
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/filter/blur.rs"]
mod tests;
