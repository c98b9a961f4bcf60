//! Raw projection formulas and sphere rotation.
//!
//! Every raw projection maps (λ, φ) in radians to unit-scale planar
//! coordinates with y pointing UP. Scaling, translation and the y flip to
//! screen space happen in `Projector`.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

const EPSILON: f64 = 1e-6;

/// Mercator latitude limit, where the square world map ends.
const MERCATOR_MAX_LAT: f64 = 85.05112877980659_f64 * PI / 180.0;

// Equal Earth polynomial coefficients.
const EE_A1: f64 = 1.340264;
const EE_A2: f64 = -0.081106;
const EE_A3: f64 = 0.000893;
const EE_A4: f64 = 0.003796;

/// Which per-point scale function an azimuthal projection uses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Azimuthal {
    EqualArea,
    Equidistant,
    Gnomonic,
    Orthographic,
    Stereographic,
}

/// A raw (unscaled) projection, with any parameters precomputed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Raw {
    Equirectangular,
    Mercator,
    TransverseMercator,
    EqualEarth,
    NaturalEarth,
    Azimuthal(Azimuthal),
    ConicConformal { n: f64, f: f64 },
    ConicEqualArea { n: f64, c: f64, r0: f64 },
    CylindricalEqualArea { cos_phi0: f64 },
    ConicEquidistant { n: f64, g: f64 },
}

#[inline]
fn tan_half(phi: f64) -> f64 {
    ((FRAC_PI_2 + phi) / 2.0).tan()
}

impl Raw {
    /// Conformal conic through two standard parallels (radians).
    ///
    /// Degenerates to Mercator when the cone opens into a cylinder.
    pub fn conic_conformal(phi0: f64, phi1: f64) -> Raw {
        let cy0 = phi0.cos();
        let n = if phi0 == phi1 {
            phi0.sin()
        } else {
            (cy0 / phi1.cos()).ln() / (tan_half(phi1) / tan_half(phi0)).ln()
        };
        if n.abs() < EPSILON || !n.is_finite() {
            return Raw::Mercator;
        }
        let f = cy0 * tan_half(phi0).powf(n) / n;
        Raw::ConicConformal { n, f }
    }

    /// Equal-area conic; cylindrical equal-area when the parallels are symmetric.
    pub fn conic_equal_area(phi0: f64, phi1: f64) -> Raw {
        let sy0 = phi0.sin();
        let n = (sy0 + phi1.sin()) / 2.0;
        if n.abs() < EPSILON {
            return Raw::CylindricalEqualArea { cos_phi0: phi0.cos() };
        }
        let c = 1.0 + sy0 * (2.0 * n - sy0);
        Raw::ConicEqualArea { n, c, r0: c.sqrt() / n }
    }

    /// Equidistant conic; equirectangular when the cone degenerates.
    pub fn conic_equidistant(phi0: f64, phi1: f64) -> Raw {
        let cy0 = phi0.cos();
        let n = if phi0 == phi1 { phi0.sin() } else { (cy0 - phi1.cos()) / (phi1 - phi0) };
        if n.abs() < EPSILON {
            return Raw::Equirectangular;
        }
        Raw::ConicEquidistant { n, g: cy0 / n + phi0 }
    }

    /// Project one rotated point. Non-finite output means "not drawable".
    pub fn project(&self, lambda: f64, phi: f64) -> (f64, f64) {
        match *self {
            Raw::Equirectangular => (lambda, phi),
            Raw::Mercator => {
                let phi = phi.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT);
                (lambda, tan_half(phi).ln())
            }
            Raw::TransverseMercator => {
                let phi = phi.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT);
                (tan_half(phi).ln(), -lambda)
            }
            Raw::EqualEarth => {
                let m = 3f64.sqrt() / 2.0;
                let l = (m * phi.sin()).asin();
                let l2 = l * l;
                let l6 = l2 * l2 * l2;
                (
                    lambda * l.cos() / (m * (EE_A1 + 3.0 * EE_A2 * l2 + l6 * (7.0 * EE_A3 + 9.0 * EE_A4 * l2))),
                    l * (EE_A1 + EE_A2 * l2 + l6 * (EE_A3 + EE_A4 * l2)),
                )
            }
            Raw::NaturalEarth => {
                let phi2 = phi * phi;
                let phi4 = phi2 * phi2;
                (
                    lambda * (0.8707 - 0.131979 * phi2 + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4))),
                    phi * (1.007226 + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4))),
                )
            }
            Raw::Azimuthal(kind) => azimuthal(kind, lambda, phi),
            Raw::ConicConformal { n, f } => {
                let phi = if f > 0.0 {
                    phi.max(-FRAC_PI_2 + EPSILON)
                } else {
                    phi.min(FRAC_PI_2 - EPSILON)
                };
                let r = f / tan_half(phi).powf(n);
                (r * (n * lambda).sin(), f - r * (n * lambda).cos())
            }
            Raw::ConicEqualArea { n, c, r0 } => {
                let r = (c - 2.0 * n * phi.sin()).max(0.0).sqrt() / n;
                (r * (lambda * n).sin(), r0 - r * (lambda * n).cos())
            }
            Raw::CylindricalEqualArea { cos_phi0 } => (lambda * cos_phi0, phi.sin() / cos_phi0),
            Raw::ConicEquidistant { n, g } => {
                let gy = g - phi;
                let nx = n * lambda;
                (gy * nx.sin(), g - gy * nx.cos())
            }
        }
    }
}

fn azimuthal(kind: Azimuthal, lambda: f64, phi: f64) -> (f64, f64) {
    let (cx, cy) = (lambda.cos(), phi.cos());
    let cxcy = cx * cy;
    let k = match kind {
        Azimuthal::Orthographic => return (cy * lambda.sin(), phi.sin()),
        Azimuthal::EqualArea => (2.0 / (1.0 + cxcy)).sqrt(),
        Azimuthal::Equidistant => {
            let c = cxcy.clamp(-1.0, 1.0).acos();
            if c == 0.0 { 1.0 } else { c / c.sin() }
        }
        Azimuthal::Gnomonic => 1.0 / cxcy,
        Azimuthal::Stereographic => 1.0 / (1.0 + cxcy),
    };
    (k * cy * lambda.sin(), k * phi.sin())
}

/// Sphere rotation by yaw / pitch / roll, all in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
    lambda: f64,
    cos_phi: f64,
    sin_phi: f64,
    cos_gamma: f64,
    sin_gamma: f64,
    tilted: bool,
}

impl Rotation {
    pub fn new(lambda: f64, phi: f64, gamma: f64) -> Self {
        Self {
            lambda: lambda % TAU,
            cos_phi: phi.cos(),
            sin_phi: phi.sin(),
            cos_gamma: gamma.cos(),
            sin_gamma: gamma.sin(),
            tilted: phi != 0.0 || gamma != 0.0,
        }
    }

    /// Rotate a point (radians). Longitude comes back wrapped to [-π, π].
    pub fn apply(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let mut lambda = lambda + self.lambda;
        if lambda.abs() > PI {
            lambda -= (lambda / TAU).round() * TAU;
        }
        if !self.tilted {
            return (lambda, phi);
        }

        let cos_p = phi.cos();
        let x = lambda.cos() * cos_p;
        let y = lambda.sin() * cos_p;
        let z = phi.sin();
        let k = z * self.cos_phi + x * self.sin_phi;
        (
            (y * self.cos_gamma - k * self.sin_gamma).atan2(x * self.cos_phi - z * self.sin_phi),
            (k * self.cos_gamma + y * self.sin_gamma).clamp(-1.0, 1.0).asin(),
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
