use super::*;
use crate::filter::operations::FilterOperation;
use crate::foundation::core::{Rect, Rgba8Premul};
use crate::geometry::quad::DeviceQuad;
use crate::geometry::rect::{RectI, Size};
use crate::geometry::transform::Transform;
use crate::render::sample::{Sampler, TexMap};
use crate::resource::provider::{ResourceFormat, Texels};

fn draw<'a>(rect: Rect, source: QuadSource<'a>, opacity: f32) -> QuadDraw<'a> {
    let h = Transform::IDENTITY.homography();
    QuadDraw {
        quad: DeviceQuad::project(rect, &h).unwrap(),
        to_local: h.inverse().unwrap(),
        clip: RectI::new(0, 0, 64, 64),
        opacity,
        anti_alias: true,
        source,
        mask: None,
        mode: CompositeMode::SrcOver,
    }
}

#[test]
fn opaque_solid_quad_is_exact() {
    let mut s = Surface::new(4, 4).unwrap();
    let d = draw(
        Rect::new(1.0, 1.0, 3.0, 3.0),
        QuadSource::Solid(Rgba8Premul::GREEN),
        1.0,
    );
    SoftwareBackend::new().draw_quad(&mut s, &d).unwrap();
    assert_eq!(s.pixel(1, 1), Some([0, 255, 0, 255]));
    assert_eq!(s.pixel(2, 2), Some([0, 255, 0, 255]));
    assert_eq!(s.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(3, 1), Some([0, 0, 0, 0]));
}

#[test]
fn anti_aliasing_request_is_ignored() {
    let mut s = Surface::new(4, 1).unwrap();
    let d = draw(
        Rect::new(0.0, 0.0, 2.4, 1.0),
        QuadSource::Solid(Rgba8Premul::WHITE),
        1.0,
    );
    SoftwareBackend::new().draw_quad(&mut s, &d).unwrap();
    assert_eq!(s.pixel(1, 0), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(2, 0), Some([0, 0, 0, 0]));
}

#[test]
fn opacity_blends_in_fixed_point() {
    let mut s = Surface::new(1, 1).unwrap();
    s.clear([255, 255, 255, 255]);
    let d = draw(
        Rect::new(0.0, 0.0, 1.0, 1.0),
        QuadSource::Solid(Rgba8Premul::BLACK),
        0.5,
    );
    SoftwareBackend::new().draw_quad(&mut s, &d).unwrap();
    assert_eq!(s.pixel(0, 0), Some([127, 127, 127, 255]));
}

#[test]
fn textures_and_masks_are_sampled() {
    let texels = [10, 20, 30, 255, 40, 50, 60, 255];
    let mask = [255, 0];
    let map = TexMap {
        local: Rect::new(0.0, 0.0, 2.0, 1.0),
        texel: Rect::new(0.0, 0.0, 2.0, 1.0),
    };
    let tex = Sampler::new(
        Texels {
            size: Size::new(2, 1),
            format: ResourceFormat::Rgba8,
            data: &texels,
        },
        map,
    );
    let mut d = draw(Rect::new(0.0, 0.0, 2.0, 1.0), QuadSource::Texture(tex), 1.0);
    d.mask = Some(Sampler::new(
        Texels {
            size: Size::new(2, 1),
            format: ResourceFormat::Luminance8,
            data: &mask,
        },
        map,
    ));
    let mut s = Surface::new(2, 1).unwrap();
    SoftwareBackend::new().draw_quad(&mut s, &d).unwrap();
    assert_eq!(s.pixel(0, 0), Some([10, 20, 30, 255]));
    assert_eq!(s.pixel(1, 0), Some([0, 0, 0, 0]));
}

#[test]
fn filters_run_in_fixed_point() {
    let mut s = Surface::new(1, 1).unwrap();
    s.clear([255, 255, 255, 255]);
    let ops = FilterOperations::new().with(FilterOperation::Invert(1.0));
    SoftwareBackend::new()
        .apply_filters(&mut s, &ops, EdgeMode::Transparent)
        .unwrap();
    assert_eq!(s.pixel(0, 0), Some([0, 0, 0, 255]));
}
