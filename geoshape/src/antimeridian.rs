//! Antimeridian filter - drop components that wrapped around the globe.
//!
//! Merged or wide geometries sometimes carry rings from the far side of the
//! ±180° seam. Projected naively they smear across the whole map. We keep
//! the principal landmass (largest spherical area) plus every component whose
//! centroid lies within a threshold angle of it, and drop the rest.
//!
//! All spherical math works on unit vectors; angles are radians internally
//! and degrees at the API surface.

use std::f64::consts::{FRAC_PI_4, PI, TAU};

use tracing::debug;

use crate::geometry::{BoundaryGeometry, Feature, FeatureCollection, LonLat, Polygon};

/// Default maximum separation between a component and the principal one.
pub const DEFAULT_THRESHOLD_DEGREES: f64 = 40.0;

const EPSILON2: f64 = 1e-12;

/// Great-circle angle between two positions, in radians (haversine).
pub fn angular_distance(a: LonLat, b: LonLat) -> f64 {
    let (lon0, lat0) = (a.lon.to_radians(), a.lat.to_radians());
    let (lon1, lat1) = (b.lon.to_radians(), b.lat.to_radians());
    let sin_dlat = ((lat1 - lat0) / 2.0).sin();
    let sin_dlon = ((lon1 - lon0) / 2.0).sin();
    let h = sin_dlat * sin_dlat + lat0.cos() * lat1.cos() * sin_dlon * sin_dlon;
    2.0 * h.sqrt().min(1.0).asin()
}

/// Spherical area of a polygon in steradians.
///
/// Uses the spherical-excess sum over every ring, holes included. The
/// result is folded to the smaller of the two regions the rings bound, so
/// clockwise and counter-clockwise datasets give the same answer.
pub fn spherical_area(polygon: &Polygon) -> f64 {
    let sum: f64 = polygon.rings.iter().map(|r| ring_excess(r)).sum();
    let area = 2.0 * if sum < 0.0 { TAU + sum } else { sum };
    area.min(4.0 * PI - area).max(0.0)
}

fn ring_excess(ring: &[LonLat]) -> f64 {
    let Some(&first) = ring.first() else {
        return 0.0;
    };
    let closing = (ring.last() != Some(&first)).then_some(first);

    let mut sum = 0.0;
    let mut lambda0 = first.lon.to_radians();
    let phi = first.lat.to_radians() / 2.0 + FRAC_PI_4;
    let (mut sin_phi0, mut cos_phi0) = phi.sin_cos();

    for p in ring[1..].iter().copied().chain(closing) {
        let lambda = p.lon.to_radians();
        let phi = p.lat.to_radians() / 2.0 + FRAC_PI_4;
        let d_lambda = lambda - lambda0;
        let sd_lambda = if d_lambda >= 0.0 { 1.0 } else { -1.0 };
        let ad_lambda = sd_lambda * d_lambda;
        let (sin_phi, cos_phi) = phi.sin_cos();
        let k = sin_phi0 * sin_phi;
        let u = cos_phi0 * cos_phi + k * ad_lambda.cos();
        let v = k * sd_lambda * ad_lambda.sin();
        sum += v.atan2(u);

        lambda0 = lambda;
        sin_phi0 = sin_phi;
        cos_phi0 = cos_phi;
    }
    sum
}

#[inline]
fn cartesian(p: LonLat) -> [f64; 3] {
    let (lon, lat) = (p.lon.to_radians(), p.lat.to_radians());
    let cos_lat = lat.cos();
    [cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin()]
}

#[inline]
fn spherical([x, y, z]: [f64; 3]) -> LonLat {
    let m = (x * x + y * y + z * z).sqrt();
    LonLat::new(y.atan2(x).to_degrees(), (z / m).clamp(-1.0, 1.0).asin().to_degrees())
}

/// Geodesic centroid of a polygon.
///
/// Area-weighted on the sphere (sum of edge cross products). Falls back to
/// the arc-length weighted centroid of the rings, then to the vertex mean,
/// when the weighted sum degenerates.
pub fn spherical_centroid(polygon: &Polygon) -> Option<LonLat> {
    let mut area = [0.0; 3];
    let mut line = [0.0; 3];
    let mut mean = [0.0; 3];
    let mut count = 0usize;

    for ring in &polygon.rings {
        for w in ring.windows(2) {
            let a = cartesian(w[0]);
            let b = cartesian(w[1]);

            let c = [
                a[1] * b[2] - a[2] * b[1],
                a[2] * b[0] - a[0] * b[2],
                a[0] * b[1] - a[1] * b[0],
            ];
            let m = (c[0] * c[0] + c[1] * c[1] + c[2] * c[2]).sqrt();
            if m > 0.0 {
                let v = -m.min(1.0).asin() / m;
                for i in 0..3 {
                    area[i] += v * c[i];
                }
            }

            let arc = m.atan2(a[0] * b[0] + a[1] * b[1] + a[2] * b[2]);
            for i in 0..3 {
                line[i] += arc * (a[i] + b[i]);
                mean[i] += a[i];
            }
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }

    let norm2 = |v: &[f64; 3]| v[0] * v[0] + v[1] * v[1] + v[2] * v[2];
    if norm2(&area) >= EPSILON2 {
        // The sign of the area sum follows ring winding; point it at the
        // side the polygon's edges are actually on.
        let dot = area[0] * line[0] + area[1] * line[1] + area[2] * line[2];
        if dot < 0.0 {
            area = [-area[0], -area[1], -area[2]];
        }
        return Some(spherical(area));
    }
    if norm2(&line) >= EPSILON2 {
        return Some(spherical(line));
    }
    if norm2(&mean) >= EPSILON2 {
        return Some(spherical(mean));
    }
    None
}

/// Drop components far from the principal landmass.
///
/// Returns `None` when nothing survives, so the caller drops the feature.
pub fn filter_geometry(geometry: BoundaryGeometry, threshold_degrees: f64) -> Option<BoundaryGeometry> {
    let polygons = geometry.into_polygons();

    // A single component is its own reference: distance 0, always kept.
    if polygons.len() <= 1 {
        return BoundaryGeometry::from_polygons(polygons);
    }

    let principal = polygons
        .iter()
        .map(spherical_area)
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, a)| if a > best.1 { (i, a) } else { best })
        .0;
    let Some(reference) = spherical_centroid(&polygons[principal]) else {
        return BoundaryGeometry::from_polygons(polygons);
    };

    let threshold = threshold_degrees.to_radians();
    let before = polygons.len();
    let kept: Vec<Polygon> = polygons
        .into_iter()
        .enumerate()
        .filter(|(i, p)| {
            *i == principal
                || spherical_centroid(p)
                    .map(|c| angular_distance(c, reference) <= threshold)
                    .unwrap_or(false)
        })
        .map(|(_, p)| p)
        .collect();

    if kept.len() < before {
        debug!(dropped = before - kept.len(), kept = kept.len(), "antimeridian filter dropped components");
    }
    BoundaryGeometry::from_polygons(kept)
}

/// Filter one feature; `None` if it has nothing left.
pub fn filter_feature(feature: Feature, threshold_degrees: f64) -> Option<Feature> {
    let Feature { id, name, geometry } = feature;
    filter_geometry(geometry, threshold_degrees).map(|geometry| Feature { id, name, geometry })
}

/// Filter every feature, dropping the ones that end up empty.
pub fn filter_collection(collection: FeatureCollection, threshold_degrees: f64) -> FeatureCollection {
    collection
        .features
        .into_iter()
        .filter_map(|f| filter_feature(f, threshold_degrees))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Square of `size` degrees centred on (lon, lat), counter-clockwise.
    fn square(lon: f64, lat: f64, size: f64) -> Polygon {
        let h = size / 2.0;
        Polygon::new(vec![
            LonLat::new(lon - h, lat - h),
            LonLat::new(lon + h, lat - h),
            LonLat::new(lon + h, lat + h),
            LonLat::new(lon - h, lat + h),
        ])
    }

    fn clockwise(mut p: Polygon) -> Polygon {
        for ring in &mut p.rings {
            ring.reverse();
        }
        p
    }

    #[test]
    fn distance_basics() {
        let d = angular_distance(LonLat::new(0.0, 0.0), LonLat::new(90.0, 0.0));
        assert!((d - PI / 2.0).abs() < 1e-12);
        let d = angular_distance(LonLat::new(179.0, 0.0), LonLat::new(-179.0, 0.0));
        assert!((d.to_degrees() - 2.0).abs() < 1e-9, "seam should not inflate distance, got {}", d.to_degrees());
    }

    #[test]
    fn area_is_winding_independent() {
        let ccw = square(0.0, 0.0, 10.0);
        let cw = clockwise(square(0.0, 0.0, 10.0));
        let a = spherical_area(&ccw);
        let b = spherical_area(&cw);
        assert!((a - b).abs() < 1e-12);
        // ~ (10 deg)^2 in steradians near the equator
        let expected = (10f64.to_radians()).powi(2);
        assert!((a - expected).abs() / expected < 0.01, "area {} vs {}", a, expected);
    }

    #[test]
    fn centroid_of_square() {
        for poly in [square(30.0, 20.0, 4.0), clockwise(square(30.0, 20.0, 4.0))] {
            let c = spherical_centroid(&poly).unwrap();
            assert!((c.lon - 30.0).abs() < 0.01, "lon {}", c.lon);
            assert!((c.lat - 20.0).abs() < 0.05, "lat {}", c.lat);
        }
    }

    #[test]
    fn centroid_across_the_seam() {
        let c = spherical_centroid(&square(180.0, 0.0, 4.0)).unwrap();
        assert!((c.lon.abs() - 180.0).abs() < 0.01, "lon {}", c.lon);
    }

    #[test]
    fn far_component_is_dropped() {
        let geometry = BoundaryGeometry::MultiPolygon(vec![
            square(0.0, 0.0, 10.0),
            square(170.0, 0.0, 2.0),
        ]);
        let filtered = filter_geometry(geometry, DEFAULT_THRESHOLD_DEGREES).unwrap();
        assert_eq!(filtered, BoundaryGeometry::Polygon(square(0.0, 0.0, 10.0)));
    }

    #[test]
    fn near_component_is_kept() {
        let geometry = BoundaryGeometry::MultiPolygon(vec![
            square(0.0, 0.0, 10.0),
            square(10.0, 0.0, 2.0),
        ]);
        let filtered = filter_geometry(geometry.clone(), DEFAULT_THRESHOLD_DEGREES).unwrap();
        assert_eq!(filtered, geometry);
    }

    #[test]
    fn principal_component_need_not_be_first() {
        let geometry = BoundaryGeometry::MultiPolygon(vec![
            square(-100.0, 10.0, 1.0),
            square(100.0, 60.0, 20.0),
            square(110.0, 55.0, 3.0),
        ]);
        let filtered = filter_geometry(geometry, DEFAULT_THRESHOLD_DEGREES).unwrap();
        assert_eq!(filtered.polygons().len(), 2);
        assert_eq!(filtered.polygons()[0], square(100.0, 60.0, 20.0));
    }

    #[test]
    fn single_polygon_passes_through() {
        let geometry = BoundaryGeometry::Polygon(square(120.0, -30.0, 5.0));
        assert_eq!(filter_geometry(geometry.clone(), 1.0), Some(geometry));
    }

    #[test]
    fn collection_drops_only_emptied_features() {
        let fc = FeatureCollection::new(vec![
            Feature::new(Some("a".into()), "A", BoundaryGeometry::Polygon(square(0.0, 0.0, 2.0))),
            Feature::new(
                Some("b".into()),
                "B",
                BoundaryGeometry::MultiPolygon(vec![square(0.0, 0.0, 2.0), square(179.0, 0.0, 1.0)]),
            ),
        ]);
        let out = filter_collection(fc, DEFAULT_THRESHOLD_DEGREES);
        assert_eq!(out.len(), 2);
        assert_eq!(out.features[1].geometry.polygons().len(), 1);
    }
}
