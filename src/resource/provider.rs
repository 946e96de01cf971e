use crate::foundation::error::{TesseraError, TesseraResult};
use crate::foundation::ids::ResourceId;
use crate::geometry::rect::{Offset, RectI, Size};
use crate::resource::pool::{BufferKey, BufferPool, PoolOpts, PoolStats};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Texel layout of a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ResourceFormat {
    /// 4 bytes per texel in R,G,B,A order.
    Rgba8,
    /// 4 bytes per texel in B,G,R,A order. Swizzled to RGBA only when sampled.
    Bgra8,
    /// 1 byte per texel (video planes, masks).
    Luminance8,
}

impl ResourceFormat {
    /// Bytes used by one texel.
    pub fn bytes_per_texel(self) -> usize {
        match self {
            Self::Rgba8 | Self::Bgra8 => 4,
            Self::Luminance8 => 1,
        }
    }
}

/// What a resource will be used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TextureUsage {
    /// Sampled only.
    Any,
    /// Also rendered into (intermediate pass buffers).
    Framebuffer,
}

/// Provider configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceProviderOpts {
    /// Largest allowed width or height.
    pub max_resource_size: u32,
    /// Backing store reuse limits.
    pub pool: PoolOpts,
}

impl Default for ResourceProviderOpts {
    fn default() -> Self {
        Self {
            max_resource_size: 16384,
            pool: PoolOpts::default(),
        }
    }
}

/// Borrowed view of a resource's texels.
#[derive(Clone, Copy, Debug)]
pub struct Texels<'a> {
    /// Resource dimensions.
    pub size: Size,
    /// Texel layout of `data`.
    pub format: ResourceFormat,
    /// Tightly packed rows.
    pub data: &'a [u8],
}

struct Resource {
    size: Size,
    format: ResourceFormat,
    usage: TextureUsage,
    pixels: Vec<u8>,
}

impl Resource {
    fn key(&self) -> BufferKey {
        BufferKey::new(self.size, self.format)
    }
}

/// Resource provider shared between the caller and a compositor.
///
/// A frame holds the write guard for its whole duration, so creation and deletion from other
/// threads are serialized against in-flight draws.
pub type SharedResourceProvider = Arc<RwLock<ResourceProvider>>;

/// Owns pixel buffers addressed by [`ResourceId`].
pub struct ResourceProvider {
    opts: ResourceProviderOpts,
    next_id: u64,
    resources: HashMap<ResourceId, Resource>,
    pool: BufferPool,
}

impl Default for ResourceProvider {
    fn default() -> Self {
        Self::new(ResourceProviderOpts::default())
    }
}

impl ResourceProvider {
    /// Create an empty provider.
    pub fn new(opts: ResourceProviderOpts) -> Self {
        Self {
            opts,
            next_id: 1,
            resources: HashMap::new(),
            pool: BufferPool::new(opts.pool),
        }
    }

    /// Wrap into a [`SharedResourceProvider`].
    pub fn into_shared(self) -> SharedResourceProvider {
        Arc::new(RwLock::new(self))
    }

    /// Allocate a zero-filled resource.
    pub fn create_resource(
        &mut self,
        size: Size,
        format: ResourceFormat,
        usage: TextureUsage,
    ) -> TesseraResult<ResourceId> {
        if size.is_empty() {
            return Err(TesseraError::allocation(format!(
                "resource size {}x{} has zero area",
                size.width, size.height
            )));
        }
        if size.width > self.opts.max_resource_size || size.height > self.opts.max_resource_size {
            return Err(TesseraError::allocation(format!(
                "resource size {}x{} exceeds the {} px limit",
                size.width, size.height, self.opts.max_resource_size
            )));
        }
        if usage == TextureUsage::Framebuffer && format == ResourceFormat::Luminance8 {
            return Err(TesseraError::allocation(
                "Luminance8 resources cannot be used as framebuffers",
            ));
        }

        let id = ResourceId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| TesseraError::allocation("resource id space exhausted"))?;

        let pixels = self.pool.borrow(BufferKey::new(size, format));
        self.resources.insert(
            id,
            Resource {
                size,
                format,
                usage,
                pixels,
            },
        );
        tracing::trace!(%id, width = size.width, height = size.height, ?format, "create resource");
        Ok(id)
    }

    /// Upload part of a CPU image into a resource.
    ///
    /// `data` is a tightly packed image (in the resource's format) covering `image_rect`. The
    /// `source_rect` part of it is written at `source_rect.origin + dest_offset` in the resource.
    pub fn set_pixels(
        &mut self,
        id: ResourceId,
        data: &[u8],
        image_rect: RectI,
        source_rect: RectI,
        dest_offset: Offset,
    ) -> TesseraResult<()> {
        let res = self
            .resources
            .get_mut(&id)
            .ok_or(TesseraError::InvalidResource(id))?;

        if !image_rect.contains(source_rect) {
            return Err(TesseraError::out_of_bounds(format!(
                "source rect {source_rect:?} is not inside image rect {image_rect:?}"
            )));
        }
        if source_rect.is_empty() {
            return Ok(());
        }
        let resource_rect = RectI::from_size(res.size);
        let dest = source_rect.checked_offset(dest_offset).ok_or_else(|| {
            TesseraError::out_of_bounds(format!(
                "source rect {source_rect:?} moved by {dest_offset:?} overflows"
            ))
        })?;
        if !resource_rect.contains(dest) {
            return Err(TesseraError::out_of_bounds(format!(
                "destination {dest:?} exceeds resource {id} of size {}x{}",
                res.size.width, res.size.height
            )));
        }

        let bpp = res.format.bytes_per_texel();
        let image_stride = image_rect.width as usize * bpp;
        let needed = image_stride * image_rect.height as usize;
        if data.len() < needed {
            return Err(TesseraError::out_of_bounds(format!(
                "pixel data holds {} bytes, image rect needs {needed}",
                data.len()
            )));
        }

        let res_stride = res.size.width as usize * bpp;
        let row_bytes = source_rect.width as usize * bpp;
        for row in 0..source_rect.height {
            let sy = (source_rect.y - image_rect.y + row) as usize;
            let sx = (source_rect.x - image_rect.x) as usize;
            let src_off = sy * image_stride + sx * bpp;
            let dst_off = (dest.y + row) as usize * res_stride + dest.x as usize * bpp;
            res.pixels[dst_off..dst_off + row_bytes]
                .copy_from_slice(&data[src_off..src_off + row_bytes]);
        }
        Ok(())
    }

    /// Copy out `rect` of a resource, tightly packed in the resource's own format.
    pub fn read_pixels(&self, id: ResourceId, rect: RectI) -> TesseraResult<Vec<u8>> {
        let res = self
            .resources
            .get(&id)
            .ok_or(TesseraError::InvalidResource(id))?;
        if rect.is_empty() || !RectI::from_size(res.size).contains(rect) {
            return Err(TesseraError::out_of_bounds(format!(
                "read rect {rect:?} is not inside resource {id} of size {}x{}",
                res.size.width, res.size.height
            )));
        }
        let bpp = res.format.bytes_per_texel();
        let stride = res.size.width as usize * bpp;
        let row_bytes = rect.width as usize * bpp;
        let mut out = Vec::with_capacity(row_bytes * rect.height as usize);
        for y in rect.y..rect.bottom() {
            let off = y as usize * stride + rect.x as usize * bpp;
            out.extend_from_slice(&res.pixels[off..off + row_bytes]);
        }
        Ok(out)
    }

    /// Release a resource. Its id is never handed out again.
    pub fn delete_resource(&mut self, id: ResourceId) -> TesseraResult<()> {
        let res = self
            .resources
            .remove(&id)
            .ok_or(TesseraError::InvalidResource(id))?;
        let key = res.key();
        self.pool.release(key, res.pixels);
        tracing::trace!(%id, "delete resource");
        Ok(())
    }

    /// Whether `id` names a live resource.
    pub fn contains(&self, id: ResourceId) -> bool {
        self.resources.contains_key(&id)
    }

    /// Number of live resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether there are no live resources.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Dimensions of a live resource.
    pub fn resource_size(&self, id: ResourceId) -> TesseraResult<Size> {
        self.resources
            .get(&id)
            .map(|r| r.size)
            .ok_or(TesseraError::InvalidResource(id))
    }

    /// Format and usage of a live resource.
    pub fn resource_format(&self, id: ResourceId) -> TesseraResult<(ResourceFormat, TextureUsage)> {
        self.resources
            .get(&id)
            .map(|r| (r.format, r.usage))
            .ok_or(TesseraError::InvalidResource(id))
    }

    /// Backing store pool counters.
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    pub(crate) fn texels(&self, id: ResourceId) -> TesseraResult<Texels<'_>> {
        let res = self
            .resources
            .get(&id)
            .ok_or(TesseraError::InvalidResource(id))?;
        Ok(Texels {
            size: res.size,
            format: res.format,
            data: &res.pixels,
        })
    }

    /// Move a framebuffer's pixels out so a backend can render into them.
    pub(crate) fn take_framebuffer(&mut self, id: ResourceId) -> TesseraResult<(Size, Vec<u8>)> {
        let res = self
            .resources
            .get_mut(&id)
            .ok_or(TesseraError::InvalidResource(id))?;
        if res.usage != TextureUsage::Framebuffer || res.format != ResourceFormat::Rgba8 {
            return Err(TesseraError::validation(format!(
                "resource {id} is not an RGBA8 framebuffer"
            )));
        }
        Ok((res.size, std::mem::take(&mut res.pixels)))
    }

    /// Return pixels taken with [`Self::take_framebuffer`].
    pub(crate) fn restore_framebuffer(&mut self, id: ResourceId, pixels: Vec<u8>) -> TesseraResult<()> {
        let res = self
            .resources
            .get_mut(&id)
            .ok_or(TesseraError::InvalidResource(id))?;
        if pixels.len() != res.key().byte_len() {
            return Err(TesseraError::validation(format!(
                "framebuffer {id} restored with {} bytes",
                pixels.len()
            )));
        }
        res.pixels = pixels;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resource/provider.rs"]
mod tests;
