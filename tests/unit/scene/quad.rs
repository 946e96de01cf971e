use super::*;
use crate::filter::matrix::ColorMatrix;
use crate::filter::operations::FilterOperation;

fn rect() -> RectI {
    RectI::new(0, 0, 10, 10)
}

#[test]
fn opaque_solid_color_needs_no_blending() {
    let q = DrawQuad::solid_color(0, rect(), Rgba8Premul::GREEN, false);
    assert_eq!(q.opaque_rect, rect());
    assert!(!q.needs_blending(1.0));
    assert!(q.needs_blending(0.5));
}

#[test]
fn translucent_materials_need_blending() {
    let q = DrawQuad::solid_color(0, rect(), Rgba8Premul::from_straight_rgba(0, 0, 255, 128), false);
    assert!(q.opaque_rect.is_empty());
    assert!(q.needs_blending(1.0));

    let planes = YuvVideoQuad {
        y_plane: ResourceId(1),
        u_plane: ResourceId(2),
        v_plane: ResourceId(3),
        a_plane: Some(ResourceId(4)),
        tex_size: Size::default(),
    };
    let video = DrawQuad::yuv_video(0, rect(), rect(), planes);
    assert!(video.needs_blending(1.0));
    assert_eq!(
        video.resource_ids(),
        vec![ResourceId(1), ResourceId(2), ResourceId(3), ResourceId(4)]
    );
}

#[test]
fn partially_opaque_texture_blends() {
    let tex = TextureQuad::new(ResourceId(7));
    let full = DrawQuad::texture(0, rect(), rect(), tex);
    assert!(!full.needs_blending(1.0));
    let partial = DrawQuad::texture(0, rect(), RectI::new(0, 0, 5, 10), tex);
    assert!(partial.needs_blending(1.0));
    let culled_to_opaque = partial.with_visible_rect(RectI::new(1, 1, 3, 3));
    assert!(!culled_to_opaque.needs_blending(1.0));
}

#[test]
fn render_pass_quads_report_their_dependencies() {
    let id = RenderPassId::new(2, 1);
    let rp = RenderPassQuad::new(id).with_mask(ResourceId(9), Rect::new(0.0, 0.0, 0.5, 0.5));
    let q = DrawQuad::render_pass(0, rect(), rp);
    assert_eq!(q.referenced_pass(), Some(id));
    assert_eq!(q.resource_ids(), vec![ResourceId(9)]);
    assert_eq!(
        DrawQuad::solid_color(0, rect(), Rgba8Premul::RED, false).referenced_pass(),
        None
    );
}

#[test]
fn foreground_filters_append_the_image_filter() {
    let rp = RenderPassQuad::new(RenderPassId::new(1, 1))
        .with_filters(FilterOperations::new().with(FilterOperation::Invert(1.0)))
        .with_image_filter(ImageFilter::Blur { sigma: 2.0 });
    assert_eq!(
        rp.foreground_filters().0,
        vec![FilterOperation::Invert(1.0), FilterOperation::Blur(2.0)]
    );
}

#[test]
fn materials_are_tagged_by_kind_in_json() {
    let q = DrawQuad::solid_color(3, rect(), Rgba8Premul::BLUE, true);
    let json = serde_json::to_value(&q).unwrap();
    assert_eq!(json["material"]["kind"], "solid_color");
    assert_eq!(json["material"]["force_anti_aliasing_off"], true);

    let parsed: DrawQuad = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, q);

    let rp: RenderPassQuad = serde_json::from_str(
        r#"{"render_pass_id": {"layer_id": 1, "index": 2},
            "filters": [{"color_matrix": [1,0,0,0,0, 0,1,0,0,0, 0,0,1,0,0, 0,0,0,1,0]}]}"#,
    )
    .unwrap();
    assert_eq!(rp.mask_uv_rect, Rect::new(0.0, 0.0, 1.0, 1.0));
    assert_eq!(
        rp.filters.0,
        vec![FilterOperation::ColorMatrix(ColorMatrix::IDENTITY)]
    );
}

#[test]
fn replica_flag_round_trips_as_metadata() {
    let q = RenderPassQuad::new(RenderPassId::new(2, 1)).replica();
    assert!(q.is_replica);
    let json = serde_json::to_string(&q).unwrap();
    let back: RenderPassQuad = serde_json::from_str(&json).unwrap();
    assert_eq!(back, q);
}
