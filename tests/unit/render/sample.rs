use super::*;
use crate::foundation::math::unit_to_u8;
use crate::geometry::rect::Size;

fn float_to_rgba8(c: [f32; 4]) -> [u8; 4] {
    c.map(unit_to_u8)
}

fn identity_map(w: u32, h: u32) -> TexMap {
    let r = Rect::new(0.0, 0.0, f64::from(w), f64::from(h));
    TexMap { local: r, texel: r }
}

fn sampler(data: &[u8], w: u32, h: u32, format: ResourceFormat) -> Sampler<'_> {
    Sampler::new(
        Texels {
            size: Size::new(w, h),
            format,
            data,
        },
        identity_map(w, h),
    )
}

#[test]
fn tex_map_scales_and_offsets() {
    let m = TexMap {
        local: Rect::new(10.0, 10.0, 20.0, 30.0),
        texel: Rect::new(1.0, 1.0, 6.0, 11.0),
    };
    assert_eq!(m.map(Point::new(10.0, 10.0)), Point::new(1.0, 1.0));
    assert_eq!(m.map(Point::new(20.0, 30.0)), Point::new(6.0, 11.0));
    assert_eq!(m.map(Point::new(12.0, 20.0)), Point::new(2.0, 6.0));
}

#[test]
fn texel_centers_sample_exactly() {
    let data = [10, 20, 30, 40, 50, 60, 70, 80];
    let s = sampler(&data, 2, 1, ResourceFormat::Rgba8);
    assert_eq!(s.rgba_fixed(Point::new(1.5, 0.5)), [50, 60, 70, 80]);
    assert_eq!(
        float_to_rgba8(s.rgba_float(Point::new(0.5, 0.5))),
        [10, 20, 30, 40]
    );
}

#[test]
fn midpoint_interpolates_both_ways() {
    let data = [0, 0, 0, 0, 255, 255, 255, 255];
    let s = sampler(&data, 2, 1, ResourceFormat::Rgba8);
    let mid = Point::new(1.0, 0.5);
    assert_eq!(s.rgba_fixed(mid), [128, 128, 128, 128]);
    assert_eq!(float_to_rgba8(s.rgba_float(mid)), [128, 128, 128, 128]);
}

#[test]
fn reads_outside_clamp_to_edge() {
    let data = [1, 2, 3, 4, 5, 6, 7, 8];
    let s = sampler(&data, 2, 1, ResourceFormat::Rgba8);
    assert_eq!(s.rgba_fixed(Point::new(-5.0, 9.0)), [1, 2, 3, 4]);
    assert_eq!(s.rgba_fixed(Point::new(50.0, -3.0)), [5, 6, 7, 8]);
}

#[test]
fn bgra_is_swizzled_on_read() {
    let data = [0, 0, 255, 255];
    let s = sampler(&data, 1, 1, ResourceFormat::Bgra8);
    assert_eq!(s.rgba_fixed(Point::new(0.5, 0.5)), [255, 0, 0, 255]);
}

#[test]
fn luminance_reads_as_channel_and_gray() {
    let data = [200];
    let s = sampler(&data, 1, 1, ResourceFormat::Luminance8);
    assert_eq!(s.channel_fixed(Point::new(0.5, 0.5)), 200);
    assert_eq!(s.rgba_fixed(Point::new(0.5, 0.5)), [200, 200, 200, 255]);
    assert!((s.channel_float(Point::new(0.5, 0.5)) - 200.0 / 255.0).abs() < 1e-6);
}

#[test]
fn straight_alpha_textures_premultiply_on_read() {
    let data = [255, 0, 0, 128];
    let mut s = sampler(&data, 1, 1, ResourceFormat::Rgba8);
    s.premultiply = true;
    assert_eq!(s.rgba_fixed(Point::new(0.5, 0.5)), [128, 0, 0, 128]);
}

#[test]
fn bt601_green_decodes_to_green() {
    assert_eq!(yuv_to_rgba_fixed(149, 43, 21, 255), [0, 255, 0, 255]);
    let f = yuv_to_rgba_float(149.0 / 255.0, 43.0 / 255.0, 21.0 / 255.0, 1.0);
    assert_eq!(float_to_rgba8(f), [0, 255, 0, 255]);
    assert_eq!(yuv_to_rgba_fixed(149, 43, 21, 0), [0, 0, 0, 0]);
}
