use super::*;
use crate::foundation::core::Rect;
use crate::geometry::rect::RectI;
use crate::scene::picture::Picture;

fn quad(picture: Picture, scale: f32, content_rect: RectI, swizzled: bool) -> PictureQuad {
    PictureQuad {
        tex_coord_rect: Rect::new(0.0, 0.0, 4.0, 4.0),
        texture_size: Size::new(4, 4),
        contents_swizzled: swizzled,
        content_rect,
        contents_scale: scale,
        picture,
    }
}

fn texel(r: &PictureRaster, x: usize, y: usize) -> [u8; 4] {
    let i = (y * r.size.width as usize + x) * 4;
    [r.data[i], r.data[i + 1], r.data[i + 2], r.data[i + 3]]
}

#[test]
fn fills_pixel_aligned_rects_exactly() {
    let pic = Picture::new().fill_rect(Rect::new(1.0, 1.0, 3.0, 3.0), [255, 0, 0, 255]);
    let r = rasterize_picture(&quad(pic, 1.0, RectI::new(0, 0, 4, 4), false)).unwrap();
    assert_eq!(r.format, ResourceFormat::Rgba8);
    assert_eq!(texel(&r, 1, 1), [255, 0, 0, 255]);
    assert_eq!(texel(&r, 2, 2), [255, 0, 0, 255]);
    assert_eq!(texel(&r, 0, 0), [0, 0, 0, 0]);
    assert_eq!(texel(&r, 3, 3), [0, 0, 0, 0]);
}

#[test]
fn scale_and_content_origin_position_the_picture() {
    let pic = Picture::new().fill_rect(Rect::new(1.0, 1.0, 2.0, 2.0), [0, 0, 255, 255]);
    let r = rasterize_picture(&quad(pic, 2.0, RectI::new(2, 2, 4, 4), false)).unwrap();
    assert_eq!(texel(&r, 0, 0), [0, 0, 255, 255]);
    assert_eq!(texel(&r, 1, 1), [0, 0, 255, 255]);
    assert_eq!(texel(&r, 2, 2), [0, 0, 0, 0]);
}

#[test]
fn swizzled_pictures_are_stored_bgra() {
    let pic = Picture::new().fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), [255, 0, 0, 255]);
    let r = rasterize_picture(&quad(pic, 1.0, RectI::new(0, 0, 4, 4), true)).unwrap();
    assert_eq!(r.format, ResourceFormat::Bgra8);
    assert_eq!(texel(&r, 0, 0), [0, 0, 255, 255]);
}

#[test]
fn paths_fill_their_interior() {
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.line_to((4.0, 0.0));
    path.line_to((4.0, 2.0));
    path.line_to((0.0, 2.0));
    path.close_path();
    let pic = Picture::new().fill_path(path, [0, 255, 0, 255]);
    let r = rasterize_picture(&quad(pic, 1.0, RectI::new(0, 0, 4, 4), false)).unwrap();
    assert_eq!(texel(&r, 3, 1), [0, 255, 0, 255]);
    assert_eq!(texel(&r, 3, 2), [0, 0, 0, 0]);
}

#[test]
fn invalid_scale_is_rejected() {
    let err = rasterize_picture(&quad(Picture::new(), 0.0, RectI::new(0, 0, 4, 4), false));
    assert!(matches!(err, Err(TesseraError::Validation(_))));
}
