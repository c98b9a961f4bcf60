//! Bounding boxes of path data.
//!
//! `svgtypes` resolves relative, shorthand and arc commands into absolute
//! move/line/cubic/quadratic segments; `lyon_geom` gives tight curve
//! bounds (extrema, not control points).

use lyon_geom::{point, CubicBezierSegment, QuadraticBezierSegment};
use svgtypes::{SimplePathSegment, SimplifyingPathParser};

use crate::error::PathError;
use crate::geometry::{Bounds, Point};

/// Bounding box of one path string. `Ok(None)` if it draws nothing.
pub fn path_bounds(d: &str) -> Result<Option<Bounds>, PathError> {
    let mut bounds: Option<Bounds> = None;
    let mut include = |p: Point| match bounds.as_mut() {
        Some(b) => b.include(p),
        None => bounds = Some(Bounds::new(p.x, p.y, p.x, p.y)),
    };

    let mut current = Point::new(0.0, 0.0);
    for segment in SimplifyingPathParser::from(d) {
        let segment = segment.map_err(|e| PathError::Parse(e.to_string()))?;
        match segment {
            SimplePathSegment::MoveTo { x, y } | SimplePathSegment::LineTo { x, y } => {
                current = Point::new(x, y);
                include(current);
            }
            SimplePathSegment::CurveTo { x1, y1, x2, y2, x, y } => {
                let curve = CubicBezierSegment {
                    from: point(current.x, current.y),
                    ctrl1: point(x1, y1),
                    ctrl2: point(x2, y2),
                    to: point(x, y),
                };
                let b = curve.bounding_box();
                include(Point::new(b.min.x, b.min.y));
                include(Point::new(b.max.x, b.max.y));
                current = Point::new(x, y);
            }
            SimplePathSegment::Quadratic { x1, y1, x, y } => {
                let curve = QuadraticBezierSegment {
                    from: point(current.x, current.y),
                    ctrl: point(x1, y1),
                    to: point(x, y),
                };
                let b = curve.bounding_box();
                include(Point::new(b.min.x, b.min.y));
                include(Point::new(b.max.x, b.max.y));
                current = Point::new(x, y);
            }
            SimplePathSegment::ClosePath => {}
        }
    }
    Ok(bounds)
}

/// Union of the bounds of several paths.
pub fn union_bounds<'a, I>(paths: I) -> Result<Option<Bounds>, PathError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut total: Option<Bounds> = None;
    for d in paths {
        if let Some(b) = path_bounds(d)? {
            total = Some(match total {
                Some(t) => t.union(&b),
                None => b,
            });
        }
    }
    Ok(total)
}

// ============================================================================
// TESTS
// ============================================================================
