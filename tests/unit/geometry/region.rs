use super::*;

#[test]
fn union_keeps_rects_disjoint() {
    let mut r = Region::new();
    r.union_rect(RectI::new(0, 0, 10, 10));
    r.union_rect(RectI::new(5, 5, 10, 10));
    assert_eq!(r.area(), 100 + 100 - 25);
    assert_eq!(r.bounds(), RectI::new(0, 0, 15, 15));
    for (i, a) in r.rects().iter().enumerate() {
        for b in &r.rects()[i + 1..] {
            assert!(!a.intersects(*b));
        }
    }
}

#[test]
fn contains_rect_across_pieces() {
    let mut r = Region::from_rect(RectI::new(0, 0, 10, 20));
    r.union_rect(RectI::new(10, 0, 10, 20));
    assert!(r.contains_rect(RectI::new(5, 5, 10, 10)));
    assert!(!r.contains_rect(RectI::new(15, 15, 10, 10)));
    assert!(r.contains_rect(RectI::default()));
}

#[test]
fn subtract_punches_holes() {
    let mut r = Region::from_rect(RectI::new(0, 0, 10, 10));
    r.subtract_rect(RectI::new(3, 3, 4, 4));
    assert_eq!(r.area(), 100 - 16);
    assert!(!r.contains_point(4, 4));
    assert!(r.contains_point(0, 0));
    assert!(r.contains_point(9, 9));
}

#[test]
fn intersect_clips_to_rect() {
    let mut r = Region::from_rect(RectI::new(0, 0, 10, 10));
    r.union_rect(RectI::new(20, 0, 10, 10));
    r.intersect_rect(RectI::new(5, 0, 20, 5));
    assert_eq!(r.area(), 5 * 5 + 5 * 5);
    let mut other = Region::from_rect(RectI::new(100, 100, 1, 1));
    other.union(&r);
    assert_eq!(other.area(), 51);
}
