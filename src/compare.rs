//! Pixel comparison for rendered frames.

use crate::render::backend::FrameRGBA;

/// Decides whether two frames match.
pub trait PixelComparator {
    fn compare(&self, actual: &FrameRGBA, expected: &FrameRGBA) -> bool;
}

fn same_shape(actual: &FrameRGBA, expected: &FrameRGBA) -> bool {
    if actual.width != expected.width
        || actual.height != expected.height
        || actual.data.len() != expected.data.len()
    {
        tracing::warn!(
            actual_width = actual.width,
            actual_height = actual.height,
            expected_width = expected.width,
            expected_height = expected.height,
            "frame size mismatch"
        );
        return false;
    }
    true
}

fn channels(discard_alpha: bool) -> usize {
    if discard_alpha { 3 } else { 4 }
}

/// Every compared channel must be identical.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExactPixelComparator {
    pub discard_alpha: bool,
}

impl ExactPixelComparator {
    pub fn new(discard_alpha: bool) -> Self {
        Self { discard_alpha }
    }
}

impl PixelComparator for ExactPixelComparator {
    fn compare(&self, actual: &FrameRGBA, expected: &FrameRGBA) -> bool {
        if !same_shape(actual, expected) {
            return false;
        }
        let n = channels(self.discard_alpha);
        let mut mismatched = 0usize;
        let mut first: Option<usize> = None;
        for (i, (a, e)) in actual
            .data
            .chunks_exact(4)
            .zip(expected.data.chunks_exact(4))
            .enumerate()
        {
            if a[..n] != e[..n] {
                mismatched += 1;
                first.get_or_insert(i);
            }
        }
        if let Some(i) = first {
            let w = actual.width.max(1) as usize;
            tracing::warn!(
                mismatched,
                first_x = i % w,
                first_y = i / w,
                "exact pixel comparison failed"
            );
            return false;
        }
        true
    }
}

/// Tolerates bounded per-channel error on a bounded share of pixels.
///
/// A pixel is in error when any compared channel differs. Errors above `small_error_threshold`
/// are large; a zero threshold disables the large-error limit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuzzyPixelComparator {
    pub discard_alpha: bool,
    /// Largest share of pixels, in percent, allowed to differ at all.
    pub error_pixels_percentage_limit: f32,
    /// Share of pixels, in percent, allowed a large error.
    pub small_error_pixels_percentage_limit: f32,
    /// Largest mean absolute channel error over erroneous pixels.
    pub avg_abs_error_limit: f32,
    /// Largest absolute channel error anywhere.
    pub max_abs_error_limit: u8,
    pub small_error_threshold: u8,
}

impl FuzzyPixelComparator {
    /// Any pixel may be off by one in any channel.
    pub fn off_by_one(discard_alpha: bool) -> Self {
        Self {
            discard_alpha,
            error_pixels_percentage_limit: 100.0,
            small_error_pixels_percentage_limit: 0.0,
            avg_abs_error_limit: 1.0,
            max_abs_error_limit: 1,
            small_error_threshold: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct ErrorStats {
    error_pixels: usize,
    small_error_pixels: usize,
    abs_error_sum: u64,
    max_abs_error: u8,
}

impl PixelComparator for FuzzyPixelComparator {
    fn compare(&self, actual: &FrameRGBA, expected: &FrameRGBA) -> bool {
        if !same_shape(actual, expected) {
            return false;
        }
        let n = channels(self.discard_alpha);
        let mut s = ErrorStats::default();
        for (a, e) in actual.data.chunks_exact(4).zip(expected.data.chunks_exact(4)) {
            let mut pixel_max = 0u8;
            for c in 0..n {
                let d = a[c].abs_diff(e[c]);
                s.abs_error_sum += u64::from(d);
                pixel_max = pixel_max.max(d);
            }
            if pixel_max == 0 {
                continue;
            }
            s.error_pixels += 1;
            if pixel_max <= self.small_error_threshold {
                s.small_error_pixels += 1;
            }
            s.max_abs_error = s.max_abs_error.max(pixel_max);
        }

        let total = (actual.width as usize * actual.height as usize).max(1) as f32;
        let error_pct = 100.0 * s.error_pixels as f32 / total;
        let large_pct = 100.0 * (s.error_pixels - s.small_error_pixels) as f32 / total;
        let avg = if s.error_pixels == 0 {
            0.0
        } else {
            s.abs_error_sum as f32 / (s.error_pixels * n) as f32
        };

        let large_ok = self.small_error_threshold == 0
            || large_pct <= self.small_error_pixels_percentage_limit;
        let ok = error_pct <= self.error_pixels_percentage_limit
            && large_ok
            && avg <= self.avg_abs_error_limit
            && s.max_abs_error <= self.max_abs_error_limit;
        if !ok {
            tracing::warn!(
                error_pixels = s.error_pixels,
                error_pct,
                large_error_pct = large_pct,
                avg_abs_error = avg,
                max_abs_error = s.max_abs_error,
                "fuzzy pixel comparison failed"
            );
        }
        ok
    }
}

#[cfg(test)]
#[path = "../tests/unit/compare.rs"]
mod tests;
