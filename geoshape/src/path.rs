//! Path generator - projected geometry to path strings.
//!
//! Output is the dense form: command letters glued to comma-separated
//! coordinates, e.g. `M10,10L20,10L20,20Z`. Every ring becomes one closed
//! subpath. `normalize` turns this into the spaced form a document host reads.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::geometry::{Feature, FeatureCollection, LonLat, Point};
use crate::projection::Projector;

/// Format a coordinate: rounded to `precision` digits, no trailing zeros,
/// never `-0`.
pub fn format_number(value: f64, precision: usize) -> String {
    let mut s = format!("{:.*}", precision, value);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s.remove(0);
    }
    s
}

/// Serializes features through a projector.
#[derive(Clone, Debug)]
pub struct PathGenerator<'a> {
    projector: &'a Projector,
    precision: usize,
}

impl<'a> PathGenerator<'a> {
    pub fn new(projector: &'a Projector, precision: usize) -> Self {
        Self { projector, precision }
    }

    fn push_point(&self, out: &mut String, command: char, p: Point) {
        let _ = write!(
            out,
            "{}{},{}",
            command,
            format_number(p.x, self.precision),
            format_number(p.y, self.precision)
        );
    }

    fn push_ring(&self, out: &mut String, ring: &[LonLat]) {
        let mut points = self.projector.project_ring(ring);
        // The closing point is implied by Z.
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            return;
        }
        for (i, p) in points.into_iter().enumerate() {
            self.push_point(out, if i == 0 { 'M' } else { 'L' }, p);
        }
        out.push('Z');
    }

    /// Path for one feature, `None` if nothing projects.
    pub fn feature(&self, feature: &Feature) -> Option<String> {
        let mut out = String::new();
        for polygon in feature.geometry.polygons() {
            for ring in &polygon.rings {
                self.push_ring(&mut out, ring);
            }
        }
        (!out.is_empty()).then_some(out)
    }

    /// One path covering every feature, `None` for an empty collection.
    pub fn collection(&self, collection: &FeatureCollection) -> Option<String> {
        let out: String = collection.iter().filter_map(|f| self.feature(f)).collect();
        (!out.is_empty()).then_some(out)
    }

    /// One path per group, groups in key order. Empty groups are skipped.
    pub fn grouped<K, F>(&self, collection: &FeatureCollection, key: F) -> BTreeMap<K, String>
    where
        K: Ord,
        F: Fn(&Feature) -> K,
    {
        let mut groups: BTreeMap<K, String> = BTreeMap::new();
        for feature in collection.iter() {
            if let Some(d) = self.feature(feature) {
                groups.entry(key(feature)).or_default().push_str(&d);
            }
        }
        groups
    }

    /// Open polylines (no `Z`), split wherever the projection hides them.
    pub fn lines(&self, lines: &[Vec<LonLat>]) -> Option<String> {
        let mut out = String::new();
        for line in lines {
            for run in self.projector.project_line(line) {
                for (i, p) in run.into_iter().enumerate() {
                    self.push_point(&mut out, if i == 0 { 'M' } else { 'L' }, p);
                }
            }
        }
        (!out.is_empty()).then_some(out)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoundaryGeometry, Polygon};
    use crate::projection::Projection;

    fn unit_projector() -> Projector {
        // Equirectangular, scale 180/π: one degree = one unit, y flipped
        Projector::new(Projection::Equirectangular).with_scale(180.0 / std::f64::consts::PI)
    }

    fn square(id: &str, lon: f64, lat: f64) -> Feature {
        let ring = vec![
            LonLat::new(lon, lat),
            LonLat::new(lon + 10.0, lat),
            LonLat::new(lon + 10.0, lat + 10.0),
            LonLat::new(lon, lat + 10.0),
        ];
        Feature::new(Some(id.into()), id, BoundaryGeometry::Polygon(Polygon::new(ring)))
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(10.0, 3), "10");
        assert_eq!(format_number(1.23456, 3), "1.235");
        assert_eq!(format_number(1.5, 3), "1.5");
        assert_eq!(format_number(-0.0001, 3), "0");
        assert_eq!(format_number(-2.4, 0), "-2");
        assert_eq!(format_number(150.0, 0), "150");
    }

    #[test]
    fn ring_is_dense_and_closed() {
        let p = unit_projector();
        let d = PathGenerator::new(&p, 3).feature(&square("a", 0.0, 0.0)).unwrap();
        assert_eq!(d, "M0,0L10,0L10,-10L0,-10Z");
    }

    #[test]
    fn collection_concatenates_rings() {
        let p = unit_projector();
        let fc = FeatureCollection::new(vec![square("a", 0.0, 0.0), square("b", 20.0, 0.0)]);
        let d = PathGenerator::new(&p, 3).collection(&fc).unwrap();
        assert_eq!(d.matches('M').count(), 2);
        assert_eq!(d.matches('Z').count(), 2);
    }

    #[test]
    fn empty_collection_has_no_path() {
        let p = unit_projector();
        assert_eq!(PathGenerator::new(&p, 3).collection(&FeatureCollection::default()), None);
    }

    #[test]
    fn grouping_by_key() {
        let p = unit_projector();
        let fc = FeatureCollection::new(vec![
            square("a1", 0.0, 0.0),
            square("b1", 20.0, 0.0),
            square("a2", 40.0, 0.0),
        ]);
        let groups = PathGenerator::new(&p, 3).grouped(&fc, |f| f.label().chars().next());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&Some('a')].matches('M').count(), 2);
    }

    #[test]
    fn lines_stay_open() {
        let p = unit_projector();
        let d = PathGenerator::new(&p, 3)
            .lines(&[vec![LonLat::new(0.0, 0.0), LonLat::new(5.0, 0.0)]])
            .unwrap();
        assert_eq!(d, "M0,0L5,0");
    }
}
