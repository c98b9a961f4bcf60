//! Graticule - the latitude/longitude reference grid.
//!
//! Meridians every `step` degrees run pole-ward to ±80°, except the major
//! meridians (multiples of 90°) which reach the poles. Parallels run from
//! -80° to 80°. Lines are densified so curved projections bend them.

use crate::geometry::LonLat;

/// Spacing between samples along each grid line, in degrees.
const SAMPLE_STEP: f64 = 2.5;

const MINOR_EXTENT: f64 = 80.0;
const MAJOR_EXTENT: f64 = 90.0;

/// Sample `from..=to` every `SAMPLE_STEP` degrees, always including `to`.
fn samples(from: f64, to: f64) -> Vec<f64> {
    let count = ((to - from) / SAMPLE_STEP).ceil().max(1.0) as usize;
    let mut values: Vec<f64> = (0..count).map(|i| from + i as f64 * SAMPLE_STEP).collect();
    values.push(to);
    values
}

/// Grid lines as open polylines of positions.
///
/// A non-positive or non-finite `step` yields no lines.
pub fn graticule_lines(step: f64) -> Vec<Vec<LonLat>> {
    if !(step.is_finite() && step > 0.0) {
        return Vec::new();
    }

    let mut lines = Vec::new();

    let meridians = (360.0 / step).ceil() as usize;
    for i in 0..meridians {
        let lon = -180.0 + i as f64 * step;
        if lon >= 180.0 {
            break;
        }
        let extent = if lon % 90.0 == 0.0 { MAJOR_EXTENT } else { MINOR_EXTENT };
        lines.push(samples(-extent, extent).into_iter().map(|lat| LonLat::new(lon, lat)).collect());
    }

    let first = (-MINOR_EXTENT / step).ceil() * step;
    let mut lat = first;
    while lat <= MINOR_EXTENT {
        lines.push(samples(-180.0, 180.0).into_iter().map(|lon| LonLat::new(lon, lat)).collect());
        lat += step;
    }

    lines
}
