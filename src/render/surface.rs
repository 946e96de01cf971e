use crate::foundation::error::{TesseraError, TesseraResult};
use crate::geometry::rect::{Offset, RectI, Size};

/// Premultiplied RGBA8 pixels, rows tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

fn byte_len(width: u32, height: u32) -> TesseraResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| TesseraError::allocation("surface size overflow"))
}

impl Surface {
    /// Transparent surface.
    pub fn new(width: u32, height: u32) -> TesseraResult<Self> {
        Ok(Self {
            width,
            height,
            data: vec![0; byte_len(width, height)?],
        })
    }

    /// Wrap existing pixels.
    pub fn from_pixels(width: u32, height: u32, data: Vec<u8>) -> TesseraResult<Self> {
        if data.len() != byte_len(width, height)? {
            return Err(TesseraError::validation(format!(
                "{} bytes do not make a {width}x{height} RGBA8 surface",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn bounds(&self) -> RectI {
        RectI::from_size(self.size())
    }

    pub fn clear(&mut self, rgba: [u8; 4]) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    pub(crate) fn pixel_mut(&mut self, x: i32, y: i32) -> &mut [u8] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        &mut self.data[i..i + 4]
    }

    /// Copy of `rect`, which must lie inside the surface.
    pub fn crop(&self, rect: RectI) -> TesseraResult<Surface> {
        if !self.bounds().contains(rect) {
            return Err(TesseraError::out_of_bounds(format!(
                "crop {rect:?} exceeds {}x{} surface",
                self.width, self.height
            )));
        }
        let mut out = Surface::new(rect.width as u32, rect.height as u32)?;
        let row = rect.width as usize * 4;
        for y in 0..rect.height as usize {
            let src = ((rect.y as usize + y) * self.width as usize + rect.x as usize) * 4;
            out.data[y * row..(y + 1) * row].copy_from_slice(&self.data[src..src + row]);
        }
        Ok(out)
    }

    /// Overwrite the pixels under `src` placed at `origin`, clipped to this surface.
    pub fn blit(&mut self, src: &Surface, origin: Offset) {
        let dest = src.bounds().offset(origin).intersect(self.bounds());
        if dest.is_empty() {
            return;
        }
        let row = dest.width as usize * 4;
        for y in dest.y..dest.bottom() {
            let sx = (dest.x - origin.x) as usize;
            let sy = (y - origin.y) as usize;
            let s = (sy * src.width as usize + sx) * 4;
            let d = (y as usize * self.width as usize + dest.x as usize) * 4;
            self.data[d..d + row].copy_from_slice(&src.data[s..s + row]);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
