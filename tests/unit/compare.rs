use super::*;

fn frame(width: u32, height: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data: px.repeat((width * height) as usize),
        premultiplied: true,
    }
}

#[test]
fn exact_matches_identical_frames_only() {
    let a = frame(4, 4, [1, 2, 3, 255]);
    let mut b = a.clone();
    assert!(ExactPixelComparator::new(false).compare(&a, &b));
    b.data[5] = 9;
    assert!(!ExactPixelComparator::new(false).compare(&a, &b));
}

#[test]
fn discard_alpha_ignores_the_alpha_channel() {
    let a = frame(2, 2, [10, 20, 30, 255]);
    let b = frame(2, 2, [10, 20, 30, 0]);
    assert!(!ExactPixelComparator::new(false).compare(&a, &b));
    assert!(ExactPixelComparator::new(true).compare(&a, &b));
}

#[test]
fn size_mismatch_never_matches() {
    let a = frame(2, 2, [0; 4]);
    let b = frame(4, 1, [0; 4]);
    assert!(!ExactPixelComparator::default().compare(&a, &b));
    assert!(!FuzzyPixelComparator::off_by_one(false).compare(&a, &b));
}

#[test]
fn off_by_one_tolerates_single_steps_everywhere() {
    let a = frame(3, 3, [100, 100, 100, 255]);
    let b = frame(3, 3, [101, 99, 100, 254]);
    let c = frame(3, 3, [102, 100, 100, 255]);
    let cmp = FuzzyPixelComparator::off_by_one(false);
    assert!(cmp.compare(&a, &b));
    assert!(!cmp.compare(&a, &c));
}

#[test]
fn large_error_share_is_bounded_when_a_threshold_is_set() {
    let a = frame(10, 1, [0, 0, 0, 255]);
    let mut b = a.clone();
    b.data[0] = 50; // one pixel, 10%, off by 50
    let cmp = FuzzyPixelComparator {
        discard_alpha: true,
        error_pixels_percentage_limit: 20.0,
        small_error_pixels_percentage_limit: 5.0,
        avg_abs_error_limit: 50.0,
        max_abs_error_limit: 60,
        small_error_threshold: 2,
    };
    assert!(!cmp.compare(&a, &b));
    let relaxed = FuzzyPixelComparator {
        small_error_pixels_percentage_limit: 10.0,
        ..cmp
    };
    assert!(relaxed.compare(&a, &b));
}
