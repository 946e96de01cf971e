use crate::geometry::rect::Size;
use crate::resource::provider::ResourceFormat;
use std::collections::HashMap;

/// Retention limits for recycled resource backing stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOpts {
    /// Maximum bytes retained across all buckets.
    pub max_pool_bytes: usize,
    /// Maximum number of retained buffers per (width, height, format) bucket.
    pub max_buffers_per_bucket: usize,
}

impl Default for PoolOpts {
    fn default() -> Self {
        Self {
            max_pool_bytes: 128 * 1024 * 1024,
            max_buffers_per_bucket: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct BufferKey {
    pub(crate) w: u32,
    pub(crate) h: u32,
    pub(crate) format: ResourceFormat,
}

impl BufferKey {
    pub(crate) fn new(size: Size, format: ResourceFormat) -> Self {
        Self {
            w: size.width,
            h: size.height,
            format,
        }
    }

    pub(crate) fn byte_len(self) -> usize {
        (self.w as usize)
            .saturating_mul(self.h as usize)
            .saturating_mul(self.format.bytes_per_texel())
    }
}

/// Counters describing pool behaviour, for diagnostics and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PoolStats {
    /// Buffers currently held for reuse.
    pub retained_buffers: usize,
    /// Bytes currently held for reuse.
    pub retained_bytes: usize,
    /// Fresh allocations made.
    pub alloc_buffers: u64,
    /// Bytes of fresh allocations made.
    pub alloc_bytes: u64,
    /// Borrows served from a retained buffer.
    pub reused_buffers: u64,
    /// Releases dropped because a cap was hit.
    pub dropped_on_release: u64,
}

struct Bucket {
    buffers: Vec<Vec<u8>>,
}

/// Bounded pool of zero-filled backing stores keyed by `(width, height, format)`.
///
/// Borrow/release happen at resource granularity, never per pixel.
pub(crate) struct BufferPool {
    opts: PoolOpts,
    stats: PoolStats,

    bucket_idx_by_key: HashMap<BufferKey, usize>,
    buckets: Vec<Bucket>,
}

impl BufferPool {
    pub(crate) fn new(opts: PoolOpts) -> Self {
        Self {
            opts,
            stats: PoolStats::default(),
            bucket_idx_by_key: HashMap::new(),
            buckets: Vec::new(),
        }
    }

    pub(crate) fn stats(&self) -> PoolStats {
        self.stats.clone()
    }

    pub(crate) fn borrow(&mut self, key: BufferKey) -> Vec<u8> {
        if let Some(&bi) = self.bucket_idx_by_key.get(&key)
            && let Some(mut buf) = self.buckets[bi].buffers.pop()
        {
            self.stats.retained_buffers = self.stats.retained_buffers.saturating_sub(1);
            self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(key.byte_len());
            self.stats.reused_buffers = self.stats.reused_buffers.saturating_add(1);
            buf.fill(0);
            return buf;
        }

        self.stats.alloc_buffers = self.stats.alloc_buffers.saturating_add(1);
        self.stats.alloc_bytes = self.stats.alloc_bytes.saturating_add(key.byte_len() as u64);
        vec![0u8; key.byte_len()]
    }

    pub(crate) fn release(&mut self, key: BufferKey, buf: Vec<u8>) {
        if self.opts.max_pool_bytes == 0 || self.opts.max_buffers_per_bucket == 0 {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let bytes = key.byte_len();
        if buf.len() != bytes
            || self.stats.retained_bytes.saturating_add(bytes) > self.opts.max_pool_bytes
        {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let bi = match self.bucket_idx_by_key.get(&key).copied() {
            Some(i) => i,
            None => {
                let i = self.buckets.len();
                self.buckets.push(Bucket {
                    buffers: Vec::new(),
                });
                self.bucket_idx_by_key.insert(key, i);
                i
            }
        };

        let bucket = &mut self.buckets[bi];
        if bucket.buffers.len() >= self.opts.max_buffers_per_bucket {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        bucket.buffers.push(buf);
        self.stats.retained_buffers = self.stats.retained_buffers.saturating_add(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_add(bytes);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resource/pool.rs"]
mod tests;
