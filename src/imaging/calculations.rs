//! Pure calculation functions for image geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Rounding is half away from zero (`f64::round`) throughout, so
//! `percent_to_pixels(50.0, 3) == 2` and `derive_aspect(4, 1, 2) == 1`.

use super::params::{PixelBox, SizeOp};

/// Clamp a box to the `[0, max_w] × [0, max_h]` image bounds.
///
/// Returns `None` for an inverted box (`x1 < x0` or `y1 < y0`); the ordering
/// check runs before clamping. Once it passes, clamping never fails: a box
/// lying entirely outside the image collapses to zero area.
///
/// # Examples
/// ```
/// # use iiify::imaging::{PixelBox, clamp_box};
/// let b = clamp_box(PixelBox::new(-10, 5, 300, 50), 200, 100).unwrap();
/// assert_eq!(b, PixelBox::new(0, 5, 200, 50));
///
/// assert_eq!(clamp_box(PixelBox::new(50, 0, 10, 10), 200, 100), None);
/// ```
pub fn clamp_box(bounds: PixelBox, max_w: u32, max_h: u32) -> Option<PixelBox> {
    if bounds.x1 < bounds.x0 || bounds.y1 < bounds.y0 {
        return None;
    }
    let (w, h) = (i64::from(max_w), i64::from(max_h));
    Some(PixelBox {
        x0: bounds.x0.clamp(0, w),
        y0: bounds.y0.clamp(0, h),
        x1: bounds.x1.clamp(0, w),
        y1: bounds.y1.clamp(0, h),
    })
}

/// Convert a percentage of `dimension` to whole pixels.
///
/// The result is signed: percentages are not range-checked here, callers
/// clamp or reject as their grammar requires.
pub fn percent_to_pixels(pct: f64, dimension: u32) -> i64 {
    (pct / 100.0 * f64::from(dimension)).round() as i64
}

/// Derive the free axis when scaling one axis to `target`.
///
/// `known` is the current size of the axis being set, `other` the current
/// size of the axis being derived. Returns `None` when `known` is zero.
///
/// # Examples
/// ```
/// # use iiify::imaging::derive_aspect;
/// // 200x100 scaled to width 100 → height 50
/// assert_eq!(derive_aspect(200, 100, 100), Some(50));
/// ```
pub fn derive_aspect(known: u32, other: u32, target: u32) -> Option<u32> {
    if known == 0 {
        return None;
    }
    Some((f64::from(other) * f64::from(target) / f64::from(known)).round() as u32)
}

/// Dimensions that fit `source` inside `bounds` without changing its aspect
/// ratio and without enlarging it.
///
/// Both results are at least 1 and never exceed the box.
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (box_w, box_h) = bounds;
    if src_w <= box_w && src_h <= box_h {
        return source;
    }

    let scale = (f64::from(box_w) / f64::from(src_w)).min(f64::from(box_h) / f64::from(src_h));
    let w = ((f64::from(src_w) * scale).round() as u32).clamp(1, box_w.max(1));
    let h = ((f64::from(src_h) * scale).round() as u32).clamp(1, box_h.max(1));
    (w, h)
}

/// Resolve a size descriptor to concrete output dimensions.
///
/// Returns `None` when an axis cannot be derived: a zero-sized source axis,
/// or a percentage whose result does not fit in a pixel count.
pub fn size_target(op: &SizeOp, dims: (u32, u32)) -> Option<(u32, u32)> {
    let (w, h) = dims;
    match *op {
        SizeOp::Full => Some(dims),
        SizeOp::ScaleToWidth(target_w) => derive_aspect(w, h, target_w).map(|th| (target_w, th)),
        SizeOp::ScaleToHeight(target_h) => derive_aspect(h, w, target_h).map(|tw| (tw, target_h)),
        SizeOp::ScalePercent(pct) => {
            let target_w = u32::try_from(percent_to_pixels(pct, w)).ok()?;
            let target_h = u32::try_from(percent_to_pixels(pct, h)).ok()?;
            Some((target_w, target_h))
        }
        SizeOp::FitBox(box_w, box_h) => {
            if w == 0 || h == 0 {
                return None;
            }
            Some(fit_within(dims, (box_w, box_h)))
        }
        SizeOp::Absolute(target_w, target_h) => Some((target_w, target_h)),
    }
}

/// Canvas size that holds the full image after a rotation by `degrees`.
///
/// Right angles are exact (90 and 270 swap the axes). Other angles use the
/// bounding box of the rotated rectangle, rounded up.
pub fn rotated_canvas(dims: (u32, u32), degrees: u32) -> (u32, u32) {
    let (w, h) = dims;
    match degrees % 360 {
        0 | 180 => (w, h),
        90 | 270 => (h, w),
        d => {
            let theta = f64::from(d).to_radians();
            let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
            let (w, h) = (f64::from(w), f64::from(h));
            // Trim float noise so an exact integer extent does not round up.
            let new_w = (w * cos + h * sin - 1e-6).ceil().max(1.0) as u32;
            let new_h = (w * sin + h * cos - 1e-6).ceil().max(1.0) as u32;
            (new_w, new_h)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // clamp_box tests
    // =========================================================================

    #[test]
    fn clamp_box_inside_bounds_unchanged() {
        let b = PixelBox::new(10, 10, 50, 50);
        assert_eq!(clamp_box(b, 200, 100), Some(b));
    }

    #[test]
    fn clamp_box_clamps_each_coordinate() {
        let b = PixelBox::new(-5, -5, 500, 500);
        assert_eq!(clamp_box(b, 200, 100), Some(PixelBox::new(0, 0, 200, 100)));
    }

    #[test]
    fn clamp_box_rejects_inverted_x() {
        assert_eq!(clamp_box(PixelBox::new(10, 0, 5, 10), 200, 100), None);
    }

    #[test]
    fn clamp_box_rejects_inverted_y() {
        assert_eq!(clamp_box(PixelBox::new(0, 10, 5, 5), 200, 100), None);
    }

    #[test]
    fn clamp_box_outside_bounds_collapses() {
        let b = clamp_box(PixelBox::new(300, 150, 400, 250), 200, 100).unwrap();
        assert_eq!(b, PixelBox::new(200, 100, 200, 100));
        assert!(b.is_empty());
    }

    #[test]
    fn clamp_box_is_idempotent() {
        let boxes = [
            PixelBox::new(0, 0, 0, 0),
            PixelBox::new(-100, -100, 1000, 1000),
            PixelBox::new(10, 20, 30, 40),
            PixelBox::new(150, 50, 900, 99),
            PixelBox::new(500, 500, 600, 600),
        ];
        for b in boxes {
            let once = clamp_box(b, 200, 100).unwrap();
            assert_eq!(clamp_box(once, 200, 100), Some(once), "box {b:?}");
        }
    }

    #[test]
    fn clamp_box_zero_area_is_valid() {
        let b = PixelBox::new(20, 20, 20, 20);
        assert_eq!(clamp_box(b, 200, 100), Some(b));
    }

    // =========================================================================
    // percent_to_pixels tests
    // =========================================================================

    #[test]
    fn percent_of_dimension() {
        assert_eq!(percent_to_pixels(50.0, 200), 100);
        assert_eq!(percent_to_pixels(25.0, 100), 25);
        assert_eq!(percent_to_pixels(100.0, 333), 333);
    }

    #[test]
    fn percent_rounds_half_away_from_zero() {
        // 1.5 → 2, 2.5 → 3 (not banker's rounding)
        assert_eq!(percent_to_pixels(50.0, 3), 2);
        assert_eq!(percent_to_pixels(12.5, 20), 3);
        assert_eq!(percent_to_pixels(-50.0, 3), -2);
    }

    #[test]
    fn percent_fractional_input() {
        assert_eq!(percent_to_pixels(33.3, 300), 100);
    }

    // =========================================================================
    // derive_aspect tests
    // =========================================================================

    #[test]
    fn derive_aspect_halves() {
        assert_eq!(derive_aspect(200, 100, 100), Some(50));
    }

    #[test]
    fn derive_aspect_upscale() {
        assert_eq!(derive_aspect(100, 50, 300), Some(150));
    }

    #[test]
    fn derive_aspect_rounds() {
        // 3 * 2 / 4 = 1.5 → 2
        assert_eq!(derive_aspect(4, 3, 2), Some(2));
    }

    #[test]
    fn derive_aspect_zero_known_is_none() {
        assert_eq!(derive_aspect(0, 100, 50), None);
    }

    // =========================================================================
    // fit_within tests
    // =========================================================================

    #[test]
    fn fit_landscape_into_square() {
        assert_eq!(fit_within((400, 200), (100, 100)), (100, 50));
    }

    #[test]
    fn fit_portrait_into_square() {
        assert_eq!(fit_within((200, 400), (100, 100)), (50, 100));
    }

    #[test]
    fn fit_never_enlarges() {
        assert_eq!(fit_within((80, 60), (800, 600)), (80, 60));
    }

    #[test]
    fn fit_stays_inside_box() {
        let (w, h) = fit_within((1000, 333), (299, 100));
        assert!(w <= 299 && h <= 100);
    }

    // =========================================================================
    // size_target tests
    // =========================================================================

    #[test]
    fn size_target_each_variant() {
        let dims = (200, 100);
        assert_eq!(size_target(&SizeOp::Full, dims), Some((200, 100)));
        assert_eq!(size_target(&SizeOp::ScaleToWidth(100), dims), Some((100, 50)));
        assert_eq!(size_target(&SizeOp::ScaleToHeight(25), dims), Some((50, 25)));
        assert_eq!(size_target(&SizeOp::ScalePercent(50.0), dims), Some((100, 50)));
        assert_eq!(size_target(&SizeOp::FitBox(50, 50), dims), Some((50, 25)));
        assert_eq!(size_target(&SizeOp::Absolute(7, 9), dims), Some((7, 9)));
    }

    #[test]
    fn size_target_uses_given_dimensions() {
        // A 200x200 crop of a 400x200 source scales to 100x100, not 100x50
        assert_eq!(size_target(&SizeOp::ScaleToWidth(100), (200, 200)), Some((100, 100)));
    }

    #[test]
    fn size_target_zero_source_is_none() {
        assert_eq!(size_target(&SizeOp::ScaleToWidth(100), (0, 0)), None);
        assert_eq!(size_target(&SizeOp::FitBox(10, 10), (0, 5)), None);
    }

    // =========================================================================
    // rotated_canvas tests
    // =========================================================================

    #[test]
    fn canvas_right_angles_are_exact() {
        assert_eq!(rotated_canvas((200, 100), 0), (200, 100));
        assert_eq!(rotated_canvas((200, 100), 90), (100, 200));
        assert_eq!(rotated_canvas((200, 100), 180), (200, 100));
        assert_eq!(rotated_canvas((200, 100), 270), (100, 200));
        assert_eq!(rotated_canvas((200, 100), 360), (200, 100));
    }

    #[test]
    fn canvas_45_degrees_expands() {
        // 100 * (cos 45 + sin 45) = 141.42 → 142
        assert_eq!(rotated_canvas((100, 100), 45), (142, 142));
    }

    #[test]
    fn canvas_never_smaller_than_rotated_content() {
        for d in [1, 10, 30, 60, 89, 91, 135, 200, 359] {
            let (w, h) = rotated_canvas((300, 120), d);
            assert!(w >= 120 && h >= 120, "degrees {d}: {w}x{h}");
        }
    }
}
