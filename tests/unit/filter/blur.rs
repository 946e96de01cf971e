use super::*;

fn constant(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    px.repeat((w * h) as usize)
}

#[test]
fn radius_follows_three_sigma() {
    assert_eq!(blur_radius(0.0), 0);
    assert_eq!(blur_radius(-1.0), 0);
    assert_eq!(blur_radius(f32::NAN), 0);
    assert_eq!(blur_radius(1.0), 3);
    assert_eq!(blur_radius(1.1), 4);
}

#[test]
fn zero_sigma_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_rgba8_premul_fixed(&src, 1, 2, 0.0, EdgeMode::Clamp).unwrap();
    assert_eq!(out, src);
    let out = blur_rgba8_premul_float(&src, 1, 2, 0.0, EdgeMode::Clamp).unwrap();
    assert_eq!(out, src);
}

#[test]
fn clamped_constant_image_is_unchanged() {
    let src = constant(4, 3, [10, 20, 30, 40]);
    let fixed = blur_rgba8_premul_fixed(&src, 4, 3, 2.0, EdgeMode::Clamp).unwrap();
    assert_eq!(fixed, src);
    let float = blur_rgba8_premul_float(&src, 4, 3, 2.0, EdgeMode::Clamp).unwrap();
    assert_eq!(float, src);
}

#[test]
fn transparent_edges_fade_the_border() {
    let src = constant(9, 9, [255, 255, 255, 255]);
    let out = blur_rgba8_premul_fixed(&src, 9, 9, 1.0, EdgeMode::Transparent).unwrap();
    let corner = out[3];
    let center = out[(4 * 9 + 4) * 4 + 3];
    assert!(corner < 128, "corner alpha {corner}");
    assert!(center > corner);
}

#[test]
fn single_pixel_energy_is_spread_and_conserved() {
    let (w, h) = (9u32, 9u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((4 * w + 4) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    for out in [
        blur_rgba8_premul_fixed(&src, w, h, 0.8, EdgeMode::Transparent).unwrap(),
        blur_rgba8_premul_float(&src, w, h, 0.8, EdgeMode::Transparent).unwrap(),
    ] {
        let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
        assert!(nonzero > 1);
        let sum_a: i32 = out.chunks_exact(4).map(|px| i32::from(px[3])).sum();
        assert!((sum_a - 255).abs() <= 12, "alpha sum {sum_a}");
    }
}

#[test]
fn mismatched_buffer_is_rejected() {
    let err = blur_rgba8_premul_fixed(&[0; 12], 2, 2, 1.0, EdgeMode::Clamp).unwrap_err();
    assert!(matches!(err, TesseraError::Validation(_)));
}
