use super::*;

fn key(w: u32, h: u32) -> BufferKey {
    BufferKey::new(Size::new(w, h), ResourceFormat::Rgba8)
}

#[test]
fn pool_honors_bucket_cap() {
    let mut p = BufferPool::new(PoolOpts {
        max_pool_bytes: 1 << 30,
        max_buffers_per_bucket: 1,
    });
    let k = key(8, 8);

    let a = p.borrow(k);
    let b = p.borrow(k);
    p.release(k, a);
    p.release(k, b);

    let st = p.stats();
    assert_eq!(st.retained_buffers, 1);
    assert_eq!(st.dropped_on_release, 1);
}

#[test]
fn pool_honors_global_byte_cap() {
    let bytes_8x8 = key(8, 8).byte_len();
    let mut p = BufferPool::new(PoolOpts {
        max_pool_bytes: bytes_8x8,
        max_buffers_per_bucket: 8,
    });
    let k = key(8, 8);

    let a = p.borrow(k);
    let b = p.borrow(k);
    p.release(k, a);
    p.release(k, b);

    let st = p.stats();
    assert_eq!(st.retained_bytes, bytes_8x8);
    assert_eq!(st.retained_buffers, 1);
    assert!(st.dropped_on_release >= 1);
}

#[test]
fn reused_buffers_come_back_zeroed() {
    let mut p = BufferPool::new(PoolOpts::default());
    let k = key(2, 2);
    let mut a = p.borrow(k);
    a.fill(0xAB);
    p.release(k, a);

    let b = p.borrow(k);
    assert_eq!(b.len(), 16);
    assert!(b.iter().all(|&v| v == 0));
    assert_eq!(p.stats().reused_buffers, 1);
    assert_eq!(p.stats().alloc_buffers, 1);
}

#[test]
fn luminance_buckets_are_separate() {
    let lum = BufferKey::new(Size::new(4, 4), ResourceFormat::Luminance8);
    assert_eq!(lum.byte_len(), 16);
    let mut p = BufferPool::new(PoolOpts::default());
    let a = p.borrow(lum);
    p.release(lum, a);
    let _ = p.borrow(key(4, 4));
    assert_eq!(p.stats().alloc_buffers, 2);
    assert_eq!(p.stats().retained_buffers, 1);
}
