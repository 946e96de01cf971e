use super::*;

#[test]
fn straight_colors_premultiply_with_rounding() {
    assert_eq!(
        Rgba8Premul::from_straight_rgba(255, 128, 0, 128),
        Rgba8Premul {
            r: 128,
            g: 64,
            b: 0,
            a: 128
        }
    );
    assert_eq!(
        Rgba8Premul::from_straight_rgba(10, 20, 30, 0),
        Rgba8Premul::TRANSPARENT
    );
}

#[test]
fn argb_words_unpack_in_skia_order() {
    assert_eq!(Rgba8Premul::from_argb_u32(0xFF00_FF00), Rgba8Premul::GREEN);
    assert_eq!(Rgba8Premul::from_argb_u32(0xFFFF_FF00), Rgba8Premul::YELLOW);
    assert_eq!(Rgba8Premul::from_argb_u32(0x0000_0000), Rgba8Premul::TRANSPARENT);
    assert!(Rgba8Premul::BLUE.is_opaque());
    assert_eq!(Rgba8Premul::RED.to_array(), [255, 0, 0, 255]);
}
