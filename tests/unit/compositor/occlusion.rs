use super::*;
use crate::filter::operations::{FilterOperation, FilterOperations};
use crate::foundation::core::Rgba8Premul;
use crate::foundation::ids::RenderPassId;
use crate::geometry::transform::Transform;
use crate::scene::quad::RenderPassQuad;

fn pass_with(states: Vec<SharedQuadState>) -> RenderPass {
    let mut p = RenderPass::new(
        RenderPassId::new(1, 1),
        RectI::new(0, 0, 100, 100),
        Transform::IDENTITY,
    );
    for s in states {
        p.push_shared_quad_state(s);
    }
    p
}

fn identity_state() -> SharedQuadState {
    SharedQuadState::new(Transform::IDENTITY, RectI::new(0, 0, 100, 100))
}

#[test]
fn quads_under_an_opaque_quad_are_culled() {
    let mut p = pass_with(vec![identity_state()]);
    p.push_quad(DrawQuad::solid_color(0, RectI::new(10, 10, 20, 20), Rgba8Premul::RED, false));
    p.push_quad(DrawQuad::solid_color(0, RectI::new(50, 50, 60, 60), Rgba8Premul::RED, false));
    p.push_quad(DrawQuad::solid_color(0, RectI::new(0, 0, 40, 40), Rgba8Premul::GREEN, false));
    assert_eq!(visible_quads(&p), vec![false, true, true]);
}

#[test]
fn translucent_covers_do_not_occlude() {
    let half = Rgba8Premul::from_straight_rgba(0, 255, 0, 128);
    let mut p = pass_with(vec![identity_state(), identity_state().with_opacity(0.5)]);
    p.push_quad(DrawQuad::solid_color(0, RectI::new(10, 10, 20, 20), Rgba8Premul::RED, false));
    p.push_quad(DrawQuad::solid_color(0, RectI::new(0, 0, 40, 40), half, false));
    p.push_quad(DrawQuad::solid_color(1, RectI::new(0, 0, 40, 40), Rgba8Premul::BLUE, false));
    assert_eq!(visible_quads(&p), vec![true, true, true]);
}

#[test]
fn only_integer_translations_occlude() {
    let rotated = SharedQuadState::new(Transform::IDENTITY.rotate(1.0), RectI::new(0, 0, 100, 100));
    let shifted = SharedQuadState::new(
        Transform::translation(30.0, 30.0),
        RectI::new(0, 0, 100, 100),
    );
    let mut p = pass_with(vec![identity_state(), rotated, shifted]);
    p.push_quad(DrawQuad::solid_color(0, RectI::new(35, 35, 5, 5), Rgba8Premul::RED, false));
    p.push_quad(DrawQuad::solid_color(0, RectI::new(0, 0, 5, 5), Rgba8Premul::RED, false));
    p.push_quad(DrawQuad::solid_color(1, RectI::new(0, 0, 10, 10), Rgba8Premul::BLUE, false));
    p.push_quad(DrawQuad::solid_color(2, RectI::new(0, 0, 20, 20), Rgba8Premul::BLUE, false));
    // The rotated cover cannot hide the quad at the origin; the shifted one hides (35, 35).
    assert_eq!(visible_quads(&p), vec![false, true, true, true]);
}

#[test]
fn background_filters_keep_the_backdrop() {
    let mut p = pass_with(vec![identity_state()]);
    p.push_quad(DrawQuad::solid_color(0, RectI::new(10, 10, 20, 20), Rgba8Premul::RED, false));
    p.push_quad(DrawQuad::render_pass(
        0,
        RectI::new(0, 0, 50, 50),
        RenderPassQuad::new(RenderPassId::new(2, 1))
            .with_background_filters(FilterOperations::new().with(FilterOperation::Blur(2.0))),
    ));
    p.push_quad(DrawQuad::solid_color(0, RectI::new(0, 0, 40, 40), Rgba8Premul::GREEN, false));
    assert_eq!(visible_quads(&p), vec![true, true, true]);
}

#[test]
fn clip_limits_both_occluder_and_occludee() {
    let clipped = identity_state().clipped(RectI::new(0, 0, 15, 15));
    let mut p = pass_with(vec![identity_state(), clipped]);
    p.push_quad(DrawQuad::solid_color(1, RectI::new(0, 0, 100, 100), Rgba8Premul::RED, false));
    p.push_quad(DrawQuad::solid_color(0, RectI::new(0, 0, 20, 20), Rgba8Premul::GREEN, false));
    p.push_quad(DrawQuad::solid_color(1, RectI::new(50, 0, 10, 10), Rgba8Premul::GREEN, false));
    assert_eq!(visible_quads(&p), vec![false, true, true]);
}
