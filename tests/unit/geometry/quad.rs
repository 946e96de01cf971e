use super::*;
use crate::geometry::transform::Transform;

fn project(rect: Rect, t: Transform) -> DeviceQuad {
    DeviceQuad::project(rect, &t.homography()).unwrap()
}

fn covered(spans: &[Span]) -> u64 {
    spans.iter().map(|s| (s.x1 - s.x0) as u64).sum()
}

#[test]
fn identity_rect_covers_exact_pixels() {
    let q = project(Rect::new(0.0, 0.0, 100.0, 50.0), Transform::IDENTITY);
    assert!(q.is_pixel_aligned());
    let spans = q.spans(RectI::new(0, 0, 200, 200));
    assert_eq!(spans.len(), 50);
    assert!(spans.iter().all(|s| s.x0 == 0 && s.x1 == 100));
}

#[test]
fn spans_respect_clip() {
    let q = project(Rect::new(0.0, 0.0, 100.0, 100.0), Transform::IDENTITY);
    let spans = q.spans(RectI::new(10, 20, 5, 7));
    assert_eq!(covered(&spans), 35);
    assert_eq!(spans[0], Span { y: 20, x0: 10, x1: 15 });
}

#[test]
fn half_pixel_shift_uses_center_rule() {
    let q = project(
        Rect::new(0.0, 0.0, 10.0, 2.0),
        Transform::translation(0.5, 0.0),
    );
    assert!(!q.is_pixel_aligned());
    let spans = q.spans(RectI::new(0, 0, 20, 20));
    // Centers 0.5..=9.5 are inside [0.5, 10.5).
    assert!(spans.iter().all(|s| s.x0 == 0 && s.x1 == 10));
}

#[test]
fn adjacent_rects_share_no_pixels() {
    let clip = RectI::new(0, 0, 64, 64);
    let t = Transform::IDENTITY.translate(0.3, 0.7).scale(1.37, 0.91);
    let a = project(Rect::new(0.0, 0.0, 20.0, 30.0), t).spans(clip);
    let b = project(Rect::new(20.0, 0.0, 40.0, 30.0), t).spans(clip);
    let whole = project(Rect::new(0.0, 0.0, 40.0, 30.0), t).spans(clip);
    assert_eq!(covered(&a) + covered(&b), covered(&whole));
}

#[test]
fn edge_coverage_is_half_on_the_edge() {
    let q = project(Rect::new(0.0, 0.0, 10.0, 10.0), Transform::IDENTITY);
    let edges = q.edge_equations();
    assert_eq!(edges.len(), 4);
    assert_eq!(edge_coverage(&edges, 5.0, 5.0), 1.0);
    assert!((edge_coverage(&edges, 0.0, 5.0) - 0.5).abs() < 1e-6);
    assert_eq!(edge_coverage(&edges, -3.0, 5.0), 0.0);
}

#[test]
fn edge_equations_ignore_winding() {
    let flipped = project(
        Rect::new(0.0, 0.0, 10.0, 10.0),
        Transform::IDENTITY.scale(-1.0, 1.0),
    );
    let edges = flipped.edge_equations();
    assert_eq!(edge_coverage(&edges, -5.0, 5.0), 1.0);
    assert_eq!(edge_coverage(&edges, 5.0, 5.0), 0.0);
}

#[test]
fn near_integer_corners_snap() {
    let q = project(
        Rect::new(0.0, 0.0, 10.0, 10.0),
        Transform::translation(0.004, 2.996),
    );
    assert!(q.is_pixel_aligned());
    let s = q.snapped();
    assert_eq!(s.bounds(), Rect::new(0.0, 3.0, 10.0, 13.0));
}

#[test]
fn quad_crossing_the_eye_plane_is_clipped() {
    let t = Transform::IDENTITY
        .apply_perspective_depth(10.0)
        .rotate_about_y(80.0);
    let q = DeviceQuad::project(Rect::new(-100.0, -5.0, 100.0, 5.0), &t.homography()).unwrap();
    assert!(q.points.len() >= 4);
    assert!(q.bounds().x0.is_finite() && q.bounds().x1.is_finite());

    let behind = Transform::IDENTITY.apply_perspective_depth(10.0).rotate_about_y(80.0);
    assert!(DeviceQuad::project(Rect::new(-100.0, -5.0, -50.0, 5.0), &behind.homography()).is_none());
}
