use super::*;

const SAMPLES: [u8; 20] = [
    0, 0, 255, 255, //
    255, 255, 0, 255, //
    64, 32, 0, 128, //
    127, 127, 255, 255, //
    0, 0, 0, 0,
];

#[test]
fn identity_is_lossless_in_both_precisions() {
    let mut fixed = SAMPLES.to_vec();
    ColorMatrix::IDENTITY.apply_fixed(&mut fixed);
    assert_eq!(fixed, SAMPLES.to_vec());

    let mut float = SAMPLES.to_vec();
    ColorMatrix::IDENTITY.apply_float(&mut float);
    assert_eq!(float, SAMPLES.to_vec());
}

#[test]
fn invert_is_exact_on_opaque_primaries() {
    let mut px = vec![255, 255, 255, 255, 0, 255, 0, 255];
    let mut px2 = px.clone();
    ColorMatrix::invert(1.0).apply_fixed(&mut px);
    ColorMatrix::invert(1.0).apply_float(&mut px2);
    assert_eq!(px, vec![0, 0, 0, 255, 255, 0, 255, 255]);
    assert_eq!(px, px2);
}

#[test]
fn fixed_and_float_agree_within_one() {
    for m in [
        ColorMatrix::saturate(0.5),
        ColorMatrix::hue_rotate(33.0),
        ColorMatrix::sepia(0.7),
        ColorMatrix::contrast(1.4),
        ColorMatrix::opacity(0.5),
    ] {
        let mut a = SAMPLES.to_vec();
        let mut b = SAMPLES.to_vec();
        m.apply_fixed(&mut a);
        m.apply_float(&mut b);
        for (x, y) in a.iter().zip(&b) {
            assert!(x.abs_diff(*y) <= 1, "{m:?}: {a:?} vs {b:?}");
        }
    }
}

#[test]
fn translation_shifts_color_not_alpha_coverage() {
    let mut m = ColorMatrix::saturate(0.5);
    m.0[4] = 20.0;
    m.0[9] = 200.0;
    m.0[14] = 1.5;
    let mut shifted = vec![0, 0, 255, 255, 0, 0, 0, 0];
    m.apply_float(&mut shifted);
    let mut plain = vec![0, 0, 255, 255, 0, 0, 0, 0];
    ColorMatrix::saturate(0.5).apply_float(&mut plain);

    assert!(shifted[0] > plain[0]);
    assert!(shifted[1] > plain[1]);
    assert_eq!(shifted[3], plain[3]);
    // Transparent pixels stay transparent: translation is premultiplied by alpha.
    assert_eq!(&shifted[4..8], &[0, 0, 0, 0]);
}

#[test]
fn special_matrices_classify_alpha() {
    assert!(!ColorMatrix::grayscale(1.0).affects_alpha());
    assert!(!ColorMatrix::brightness(2.0).affects_alpha());
    assert!(ColorMatrix::opacity(0.3).affects_alpha());
    assert!(ColorMatrix::saturating_brightness(0.2).is_finite());
}
