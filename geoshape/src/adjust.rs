//! Scale/stroke adjuster - fit a shape group into a target box.
//!
//! The group is scaled uniformly to fit the target box shrunk by a margin
//! factor, then centered on it. Because the host scales strokes along with
//! geometry, the stroke width is divided by the same factor so the result
//! renders at the intended width.
//!
//! Zero or non-finite sizes are refused with an `AdjustError`; nothing here
//! ever divides by zero.

use serde::{Deserialize, Serialize};

use crate::error::AdjustError;
use crate::geometry::Bounds;

/// Where a group ends up: uniform scale plus its new top-left and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub scale: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Placement {
    pub fn bounds(&self) -> Bounds {
        Bounds::from_rect(self.x, self.y, self.width, self.height)
    }
}

fn usable(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Compute the placement of `group` inside `target` scaled by `margin`.
pub fn fit_to_target(group: Bounds, target: Bounds, margin: f64) -> Result<Placement, AdjustError> {
    let (gw, gh) = (group.width(), group.height());
    if !usable(gw) || !usable(gh) {
        return Err(AdjustError::EmptyGroup { width: gw, height: gh });
    }
    let (tw, th) = (target.width(), target.height());
    if !usable(tw) || !usable(th) {
        return Err(AdjustError::EmptyTarget { width: tw, height: th });
    }
    if !(margin > 0.0 && margin <= 1.0) {
        return Err(AdjustError::InvalidMargin(margin));
    }

    let scale = (tw * margin / gw).min(th * margin / gh);
    let (width, height) = (gw * scale, gh * scale);
    let center = target.center();
    Ok(Placement {
        scale,
        x: center.x - width / 2.0,
        y: center.y - height / 2.0,
        width,
        height,
    })
}

/// Stroke width that renders as `base` after the group is scaled by `scale`.
pub fn adjusted_stroke_width(base: f64, scale: f64) -> Result<f64, AdjustError> {
    if !usable(scale) {
        return Err(AdjustError::DegenerateScale(scale));
    }
    Ok(base / scale)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_min_ratio_and_group_is_centered() {
        let group = Bounds::from_rect(0.0, 0.0, 100.0, 50.0);
        let target = Bounds::from_rect(0.0, 0.0, 1000.0, 1000.0);
        let p = fit_to_target(group, target, 0.8).unwrap();
        assert!((p.scale - 8.0).abs() < 1e-12, "800/100 beats 800/50, got {}", p.scale);
        assert!((p.width - 800.0).abs() < 1e-9);
        assert!((p.height - 400.0).abs() < 1e-9);
        assert_eq!(p.bounds().center(), target.center());
    }

    #[test]
    fn shrinking_works_too() {
        let group = Bounds::from_rect(-500.0, -500.0, 2000.0, 1000.0);
        let target = Bounds::from_rect(100.0, 100.0, 200.0, 200.0);
        let p = fit_to_target(group, target, 1.0).unwrap();
        assert!((p.scale - 0.1).abs() < 1e-12);
        assert!((p.x - 100.0).abs() < 1e-9);
        assert!((p.y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn stroke_inverse_law() {
        for (w, s) in [(1.0, 8.0), (0.5, 0.1), (2.0, 1.0), (1.0, 3.7)] {
            let adjusted = adjusted_stroke_width(w, s).unwrap();
            assert!((s * adjusted - w).abs() < 1e-12, "w={} s={}", w, s);
        }
    }

    #[test]
    fn zero_sizes_are_refused() {
        let target = Bounds::from_rect(0.0, 0.0, 100.0, 100.0);
        let flat = Bounds::from_rect(0.0, 0.0, 100.0, 0.0);
        assert!(matches!(fit_to_target(flat, target, 0.8), Err(AdjustError::EmptyGroup { .. })));
        assert!(matches!(fit_to_target(target, flat, 0.8), Err(AdjustError::EmptyTarget { .. })));
        assert_eq!(fit_to_target(target, target, 0.0), Err(AdjustError::InvalidMargin(0.0)));
    }

    #[test]
    fn degenerate_scale_is_refused() {
        assert_eq!(adjusted_stroke_width(1.0, 0.0), Err(AdjustError::DegenerateScale(0.0)));
        assert!(adjusted_stroke_width(1.0, f64::NAN).is_err());
        assert!(adjusted_stroke_width(1.0, -2.0).is_err());
    }
}
