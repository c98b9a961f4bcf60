//! Projection engine - spherical (lon, lat) onto a bounded drawing surface.
//!
//! A `Projection` names one entry of a fixed catalog. A `Projector` is an
//! instance of it: raw formula + rotation + clip angle + scale/translate.
//! Projectors are usually fitted so a feature collection exactly fills a
//! square target box; the graticule uses a fixed, non-fitted projector.
//!
//! ## Rust Lesson #15: Lookup tables over string dispatch
//!
//! Instead of matching on projection names all over the code, each variant
//! has one row in `CATALOG`. `Projection::info()` finds it, and every
//! property (name, family, clip angle, parallels) comes from that row.

mod graticule;
mod raw;

pub use graticule::graticule_lines;
pub use raw::{Azimuthal, Raw, Rotation};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{Bounds, FeatureCollection, LonLat, Point};
use crate::regions::{self, Continent, ALASKA_STATE_CODE, US_COUNTRY_CODE};

/// Seam rotation applied to regions that straddle ±180°.
pub const SEAM_ROTATION_DEGREES: f64 = 160.0;

/// Russia (ISO numeric), which crosses the antimeridian at Chukotka.
const RUSSIA_COUNTRY_CODE: &str = "643";

/// Every projection the engine can build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Projection {
    AzimuthalEqualArea,
    AzimuthalEquidistant,
    Gnomonic,
    Orthographic,
    Stereographic,
    ConicConformal,
    ConicEqualArea,
    ConicEquidistant,
    AlbersUsa,
    Equirectangular,
    #[default]
    Mercator,
    TransverseMercator,
    EqualEarth,
    NaturalEarth,
}

/// Projection families, as grouped in pickers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Azimuthal,
    Conic,
    Cylindrical,
}

impl Family {
    pub fn name(&self) -> &'static str {
        match self {
            Family::Azimuthal => "Azimuthal",
            Family::Conic => "Conic",
            Family::Cylindrical => "Cylindrical",
        }
    }
}

/// One catalog row.
#[derive(Clone, Copy, Debug)]
pub struct ProjectionInfo {
    pub projection: Projection,
    /// CLI / config name
    pub name: &'static str,
    /// Name used by d3-geo and by saved selections from web front ends
    pub d3_name: &'static str,
    pub label: &'static str,
    pub family: Family,
    /// Small-circle clip radius in degrees, for azimuthal projections
    pub clip_angle: Option<f64>,
    /// Standard parallels in degrees, for conics
    pub parallels: Option<(f64, f64)>,
    /// Base rotation (yaw, pitch, roll) in degrees
    pub rotate: (f64, f64, f64),
}

const fn row(
    projection: Projection,
    name: &'static str,
    d3_name: &'static str,
    label: &'static str,
    family: Family,
) -> ProjectionInfo {
    ProjectionInfo {
        projection,
        name,
        d3_name,
        label,
        family,
        clip_angle: None,
        parallels: None,
        rotate: (0.0, 0.0, 0.0),
    }
}

/// The projection catalog, in picker order.
pub const CATALOG: &[ProjectionInfo] = &[
    ProjectionInfo {
        clip_angle: Some(180.0 - 1e-3),
        ..row(Projection::AzimuthalEqualArea, "azimuthal-equal-area", "geoAzimuthalEqualArea", "Azimuthal Equal-Area", Family::Azimuthal)
    },
    ProjectionInfo {
        clip_angle: Some(180.0 - 1e-3),
        ..row(Projection::AzimuthalEquidistant, "azimuthal-equidistant", "geoAzimuthalEquidistant", "Azimuthal Equidistant", Family::Azimuthal)
    },
    ProjectionInfo {
        clip_angle: Some(60.0),
        ..row(Projection::Gnomonic, "gnomonic", "geoGnomonic", "Gnomonic", Family::Azimuthal)
    },
    ProjectionInfo {
        clip_angle: Some(90.0),
        ..row(Projection::Orthographic, "orthographic", "geoOrthographic", "Orthographic", Family::Azimuthal)
    },
    ProjectionInfo {
        clip_angle: Some(142.0),
        ..row(Projection::Stereographic, "stereographic", "geoStereographic", "Stereographic", Family::Azimuthal)
    },
    ProjectionInfo {
        parallels: Some((30.0, 30.0)),
        ..row(Projection::ConicConformal, "conic-conformal", "geoConicConformal", "Conic Conformal", Family::Conic)
    },
    ProjectionInfo {
        parallels: Some((0.0, 60.0)),
        ..row(Projection::ConicEqualArea, "conic-equal-area", "geoConicEqualArea", "Conic Equal-Area", Family::Conic)
    },
    ProjectionInfo {
        parallels: Some((0.0, 60.0)),
        ..row(Projection::ConicEquidistant, "conic-equidistant", "geoConicEquidistant", "Conic Equidistant", Family::Conic)
    },
    row(Projection::AlbersUsa, "albers-usa", "geoAlbersUsa", "Albers Usa", Family::Conic),
    row(Projection::Equirectangular, "equirectangular", "geoEquirectangular", "Equirectangular", Family::Cylindrical),
    row(Projection::Mercator, "mercator", "geoMercator", "Mercator", Family::Cylindrical),
    ProjectionInfo {
        rotate: (0.0, 0.0, 90.0),
        ..row(Projection::TransverseMercator, "transverse-mercator", "geoTransverseMercator", "Transverse Mercator", Family::Cylindrical)
    },
    row(Projection::EqualEarth, "equal-earth", "geoEqualEarth", "Equal Earth", Family::Cylindrical),
    row(Projection::NaturalEarth, "natural-earth", "geoNaturalEarth1", "Natural Earth 1", Family::Cylindrical),
];

impl Projection {
    /// Get all projections, in catalog order.
    pub fn all() -> Vec<Projection> {
        CATALOG.iter().map(|i| i.projection).collect()
    }

    /// This projection's catalog row.
    pub fn info(&self) -> &'static ProjectionInfo {
        CATALOG
            .iter()
            .find(|i| i.projection == *self)
            .unwrap_or(&CATALOG[10])
    }

    pub fn name(&self) -> &'static str {
        self.info().name
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }

    /// Parse a projection name. Accepts both `mercator` and `geoMercator`.
    pub fn from_name(name: &str) -> Option<Projection> {
        let lower = name.to_lowercase();
        CATALOG
            .iter()
            .find(|i| i.name == lower || i.d3_name.to_lowercase() == lower)
            .map(|i| i.projection)
    }

    fn raw(&self) -> Raw {
        let info = self.info();
        let (p0, p1) = info.parallels.unwrap_or((0.0, 0.0));
        let (p0, p1) = (p0.to_radians(), p1.to_radians());
        match self {
            Projection::AzimuthalEqualArea => Raw::Azimuthal(Azimuthal::EqualArea),
            Projection::AzimuthalEquidistant => Raw::Azimuthal(Azimuthal::Equidistant),
            Projection::Gnomonic => Raw::Azimuthal(Azimuthal::Gnomonic),
            Projection::Orthographic => Raw::Azimuthal(Azimuthal::Orthographic),
            Projection::Stereographic => Raw::Azimuthal(Azimuthal::Stereographic),
            Projection::ConicConformal => Raw::conic_conformal(p0, p1),
            Projection::ConicEqualArea => Raw::conic_equal_area(p0, p1),
            Projection::ConicEquidistant => Raw::conic_equidistant(p0, p1),
            // Only used as a placeholder: Albers USA is composite.
            Projection::AlbersUsa => Raw::conic_equal_area(29.5f64.to_radians(), 45.5f64.to_radians()),
            Projection::Equirectangular => Raw::Equirectangular,
            Projection::Mercator => Raw::Mercator,
            Projection::TransverseMercator => Raw::TransverseMercator,
            Projection::EqualEarth => Raw::EqualEarth,
            Projection::NaturalEarth => Raw::NaturalEarth,
        }
    }
}

/// Swap Mercator for Albers USA where Mercator renders the US badly.
///
/// Applies to the whole US (no state chosen) and to Alaska.
pub fn resolve_projection(requested: Projection, country: Option<&str>, state: Option<&str>) -> Projection {
    if requested != Projection::Mercator {
        return requested;
    }
    let us_whole = country == Some(US_COUNTRY_CODE) && state.is_none();
    let alaska = state == Some(ALASKA_STATE_CODE);
    if us_whole || alaska {
        debug!("using albers-usa instead of mercator");
        Projection::AlbersUsa
    } else {
        requested
    }
}

/// Longitude rotation (degrees) that moves the seam away from a region.
///
/// A chosen country uses its own continent's rotation, so a country that
/// straddles ±180° (New Zealand, Fiji, Kiribati) stays in one piece. Russia
/// is the one country whose rotation differs from its continent's.
///
/// Only meaningful for whole-collection renders; callers skip it when a
/// single state or county is projected on its own.
pub fn seam_rotation(continent: Option<Continent>, country: Option<&str>) -> f64 {
    let continent = match country {
        Some(RUSSIA_COUNTRY_CODE) => return -SEAM_ROTATION_DEGREES,
        Some(code) => Some(regions::continent_of(code)),
        None => continent,
    };
    match continent {
        Some(Continent::Asia) | Some(Continent::Oceania) => -SEAM_ROTATION_DEGREES,
        Some(Continent::NorthAmerica) => SEAM_ROTATION_DEGREES,
        _ => 0.0,
    }
}

// ============================================================================
// PROJECTOR
// ============================================================================

/// One Albers USA inset: its own conic, placed relative to the lower 48.
#[derive(Clone, Copy, Debug)]
struct Inset {
    raw: Raw,
    rotation: Rotation,
    /// raw(center), subtracted so the inset's center lands at `offset`
    origin: (f64, f64),
    factor: f64,
    offset: (f64, f64),
}

impl Inset {
    fn new(yaw: f64, center: (f64, f64), parallels: (f64, f64), factor: f64, offset: (f64, f64)) -> Self {
        let raw = Raw::conic_equal_area(parallels.0.to_radians(), parallels.1.to_radians());
        let origin = raw.project(center.0.to_radians(), center.1.to_radians());
        Self {
            raw,
            rotation: Rotation::new(yaw.to_radians(), 0.0, 0.0),
            origin,
            factor,
            offset,
        }
    }

    fn project(&self, p: LonLat) -> (f64, f64) {
        let (lambda, phi) = self.rotation.apply(p.lon.to_radians(), p.lat.to_radians());
        let (x, y) = self.raw.project(lambda, phi);
        (
            self.factor * (x - self.origin.0) + self.offset.0,
            self.factor * (y - self.origin.1) + self.offset.1,
        )
    }
}

fn albers_usa_insets() -> [Inset; 3] {
    [
        Inset::new(96.0, (-0.6, 38.7), (29.5, 45.5), 1.0, (0.0, 0.0)),
        Inset::new(154.0, (-2.0, 58.5), (55.0, 65.0), 0.35, (-0.307, -0.201)),
        Inset::new(157.0, (-3.0, 19.9), (8.0, 18.0), 1.0, (-0.205, -0.212)),
    ]
}

/// Which Albers USA inset a position belongs to.
fn inset_index(p: LonLat) -> usize {
    if p.lat >= 50.0 && (p.lon <= -129.0 || p.lon > 170.0) {
        1
    } else if p.lat < 30.0 && p.lon > -180.0 && p.lon < -140.0 {
        2
    } else {
        0
    }
}

#[derive(Clone, Debug)]
enum Engine {
    Simple {
        raw: Raw,
        rotation: Rotation,
        /// cos of the clip radius; points with a smaller cos are hidden
        clip: Option<(f64, f64)>,
    },
    Composite([Inset; 3]),
}

/// A configured projection: unit formula, then `screen = translate + k * unit`
/// with the y axis flipped (screen y grows downward).
#[derive(Clone, Debug)]
pub struct Projector {
    projection: Projection,
    engine: Engine,
    yaw: f64,
    scale: f64,
    translate: Point,
}

impl Projector {
    /// Unfitted projector: unit scale, no translation, no seam rotation.
    pub fn new(projection: Projection) -> Self {
        let mut projector = Self {
            projection,
            engine: Engine::Composite(albers_usa_insets()),
            yaw: 0.0,
            scale: 1.0,
            translate: Point::new(0.0, 0.0),
        };
        projector.rebuild();
        projector
    }

    fn rebuild(&mut self) {
        if self.projection == Projection::AlbersUsa {
            self.engine = Engine::Composite(albers_usa_insets());
            return;
        }
        let info = self.projection.info();
        let (yaw, pitch, roll) = info.rotate;
        self.engine = Engine::Simple {
            raw: self.projection.raw(),
            rotation: Rotation::new((yaw + self.yaw).to_radians(), pitch.to_radians(), roll.to_radians()),
            clip: info.clip_angle.map(|a| {
                let r = a.to_radians();
                (r.cos(), r)
            }),
        };
    }

    /// Rotate the globe by `degrees` of longitude before projecting.
    ///
    /// Ignored by Albers USA, whose insets carry fixed rotations.
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.yaw = degrees;
        self.rebuild();
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_translate(mut self, translate: Point) -> Self {
        self.translate = translate;
        self
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> Point {
        self.translate
    }

    /// Fit scale and translation so `collection` fills a `width` x `height`
    /// box, centered, aspect preserved.
    ///
    /// An empty collection leaves the projector unchanged.
    pub fn fit_size(mut self, width: f64, height: f64, collection: &FeatureCollection) -> Self {
        let units = collection.rings().flat_map(|ring| self.unit_ring(ring));
        let Some(b) = Bounds::from_points(units.map(|(x, y)| Point::new(x, y))) else {
            debug!("nothing to fit, projector left unfitted");
            return self;
        };

        let (dx, dy) = (b.width(), b.height());
        let k = match (dx > 0.0, dy > 0.0) {
            (true, true) => (width / dx).min(height / dy),
            (true, false) => width / dx,
            (false, true) => height / dy,
            (false, false) => 1.0,
        };
        self.scale = k;
        self.translate = Point::new(
            (width - k * (b.min_x + b.max_x)) / 2.0,
            (height + k * (b.min_y + b.max_y)) / 2.0,
        );
        debug!(projection = self.projection.name(), scale = k, "fitted projection");
        self
    }

    #[inline]
    fn to_screen(&self, (x, y): (f64, f64)) -> Point {
        Point::new(self.translate.x + self.scale * x, self.translate.y - self.scale * y)
    }

    /// Project one position; `None` when it is hidden or not drawable.
    pub fn project(&self, p: LonLat) -> Option<Point> {
        let unit = match &self.engine {
            Engine::Composite(insets) => insets[inset_index(p)].project(p),
            Engine::Simple { raw, rotation, clip } => {
                let (lambda, phi) = rotation.apply(p.lon.to_radians(), p.lat.to_radians());
                if let Some((cos_clip, _)) = clip {
                    if lambda.cos() * phi.cos() < *cos_clip {
                        return None;
                    }
                }
                raw.project(lambda, phi)
            }
        };
        finite(unit).map(|u| self.to_screen(u))
    }

    /// Project a closed ring to screen points.
    ///
    /// Positions beyond the clip circle are pulled onto the horizon, so the
    /// ring stays closed along the visible edge.
    pub fn project_ring(&self, ring: &[LonLat]) -> Vec<Point> {
        self.unit_ring(ring).into_iter().map(|u| self.to_screen(u)).collect()
    }

    /// Project an open line, splitting it wherever it becomes hidden.
    pub fn project_line(&self, line: &[LonLat]) -> Vec<Vec<Point>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for &p in line {
            let projected = match &self.engine {
                // Lines under Albers USA are drawn in the lower-48 frame.
                Engine::Composite(insets) => finite(insets[0].project(p)).map(|u| self.to_screen(u)),
                Engine::Simple { .. } => self.project(p),
            };
            match projected {
                Some(point) => current.push(point),
                None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs.retain(|run| run.len() >= 2);
        runs
    }

    fn unit_ring(&self, ring: &[LonLat]) -> Vec<(f64, f64)> {
        match &self.engine {
            Engine::Composite(insets) => {
                let Some(&first) = ring.first() else {
                    return Vec::new();
                };
                let inset = &insets[inset_index(first)];
                ring.iter().filter_map(|&p| finite(inset.project(p))).collect()
            }
            Engine::Simple { raw, rotation, clip } => ring
                .iter()
                .filter_map(|p| {
                    let (lambda, phi) = rotation.apply(p.lon.to_radians(), p.lat.to_radians());
                    let (lambda, phi) = match clip {
                        Some((cos_clip, radius)) if lambda.cos() * phi.cos() < *cos_clip => {
                            to_horizon(lambda, phi, *radius)?
                        }
                        _ => (lambda, phi),
                    };
                    finite(raw.project(lambda, phi))
                })
                .collect(),
        }
    }
}

#[inline]
fn finite((x, y): (f64, f64)) -> Option<(f64, f64)> {
    (x.is_finite() && y.is_finite()).then_some((x, y))
}

/// Move a hidden position onto the clip circle along its azimuth from the
/// projection center. The exact antipode has no azimuth and is dropped.
fn to_horizon(lambda: f64, phi: f64, radius: f64) -> Option<(f64, f64)> {
    let cos_phi = phi.cos();
    let (y, z) = (lambda.sin() * cos_phi, phi.sin());
    let m = (y * y + z * z).sqrt();
    if m < 1e-12 {
        return None;
    }
    let (s, c) = radius.sin_cos();
    let (hx, hy, hz) = (c, s * y / m, s * z / m);
    Some((hy.atan2(hx), hz.clamp(-1.0, 1.0).asin()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoundaryGeometry, Feature, Polygon};

    fn rect_feature(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> FeatureCollection {
        let ring = vec![
            LonLat::new(lon0, lat0),
            LonLat::new(lon1, lat0),
            LonLat::new(lon1, lat1),
            LonLat::new(lon0, lat1),
        ];
        Feature::new(Some("1".into()), "r", BoundaryGeometry::Polygon(Polygon::new(ring))).into()
    }

    fn screen_bounds(p: &Projector, fc: &FeatureCollection) -> Bounds {
        Bounds::from_points(fc.rings().flat_map(|r| p.project_ring(r))).unwrap()
    }

    #[test]
    fn catalog_has_fourteen_unique_entries() {
        let all = Projection::all();
        assert_eq!(all.len(), 14);
        for p in &all {
            assert_eq!(p.info().projection, *p);
            assert_eq!(Projection::from_name(p.name()), Some(*p));
            assert_eq!(Projection::from_name(p.info().d3_name), Some(*p));
        }
    }

    #[test]
    fn from_name_rejects_unknown() {
        assert_eq!(Projection::from_name("geoPolyhedral"), None);
    }

    #[test]
    fn fit_fills_the_larger_dimension() {
        let fc = rect_feature(-10.0, 40.0, 30.0, 60.0);
        for projection in Projection::all() {
            let p = Projector::new(projection).fit_size(302.0, 302.0, &fc);
            let b = screen_bounds(&p, &fc);
            let larger = b.width().max(b.height());
            assert!((larger - 302.0).abs() < 1e-6, "{}: larger dimension {}", projection.name(), larger);
            assert!(b.min_x > -1e-6 && b.min_y > -1e-6, "{}: {:?}", projection.name(), b);
            assert!(b.max_x < 302.0 + 1e-6 && b.max_y < 302.0 + 1e-6, "{}: {:?}", projection.name(), b);
        }
    }

    #[test]
    fn fit_centers_the_short_axis() {
        // wide and short: width constrains, height is centered
        let fc = rect_feature(0.0, -5.0, 60.0, 5.0);
        let p = Projector::new(Projection::Equirectangular).fit_size(302.0, 302.0, &fc);
        let b = screen_bounds(&p, &fc);
        assert!((b.width() - 302.0).abs() < 1e-9);
        assert!((b.center().y - 151.0).abs() < 1e-9, "center y {}", b.center().y);
    }

    #[test]
    fn screen_y_points_down() {
        let fc = rect_feature(0.0, 0.0, 10.0, 10.0);
        let p = Projector::new(Projection::Mercator).fit_size(100.0, 100.0, &fc);
        let north = p.project(LonLat::new(5.0, 10.0)).unwrap();
        let south = p.project(LonLat::new(5.0, 0.0)).unwrap();
        assert!(north.y < south.y);
    }

    #[test]
    fn empty_collection_leaves_projector_unfitted() {
        let p = Projector::new(Projection::Mercator).fit_size(302.0, 302.0, &FeatureCollection::default());
        assert_eq!(p.scale(), 1.0);
    }

    #[test]
    fn orthographic_hides_the_far_side() {
        let p = Projector::new(Projection::Orthographic);
        assert!(p.project(LonLat::new(0.0, 0.0)).is_some());
        assert!(p.project(LonLat::new(180.0, 0.0)).is_none());
    }

    #[test]
    fn hidden_ring_points_land_on_the_horizon() {
        let p = Projector::new(Projection::Orthographic);
        let ring = p.project_ring(&[LonLat::new(120.0, 0.0)]);
        let r = (ring[0].x * ring[0].x + ring[0].y * ring[0].y).sqrt();
        assert!((r - 1.0).abs() < 1e-9, "horizon radius {}", r);
    }

    #[test]
    fn rotation_moves_the_seam() {
        let fc = rect_feature(170.0, 50.0, 179.0, 60.0);
        let plain = Projector::new(Projection::Equirectangular).fit_size(100.0, 100.0, &fc);
        let rotated = Projector::new(Projection::Equirectangular)
            .with_rotation(-160.0)
            .fit_size(100.0, 100.0, &fc);
        // Same shape either way: rotation only shifts longitudes
        let a = screen_bounds(&plain, &fc);
        let b = screen_bounds(&rotated, &fc);
        assert!((a.width() - b.width()).abs() < 1e-9);
    }

    #[test]
    fn albers_usa_insets_stay_near_the_lower_48() {
        let fc = rect_feature(-120.0, 30.0, -75.0, 48.0);
        let p = Projector::new(Projection::AlbersUsa).fit_size(302.0, 302.0, &fc);
        let anchorage = p.project(LonLat::new(-149.9, 61.2)).unwrap();
        let honolulu = p.project(LonLat::new(-157.8, 21.3)).unwrap();
        // Both insets sit in the lower-left corner, not thousands of px away
        for (name, pt) in [("alaska", anchorage), ("hawaii", honolulu)] {
            assert!(pt.x > -150.0 && pt.x < 200.0, "{} x {}", name, pt.x);
            assert!(pt.y > 100.0 && pt.y < 450.0, "{} y {}", name, pt.y);
        }
    }

    #[test]
    fn mercator_swaps_to_albers_for_the_us() {
        assert_eq!(resolve_projection(Projection::Mercator, Some("840"), None), Projection::AlbersUsa);
        assert_eq!(resolve_projection(Projection::Mercator, Some("840"), Some("02")), Projection::AlbersUsa);
        assert_eq!(resolve_projection(Projection::Mercator, Some("840"), Some("06")), Projection::Mercator);
        assert_eq!(resolve_projection(Projection::Mercator, Some("250"), None), Projection::Mercator);
        assert_eq!(resolve_projection(Projection::Orthographic, Some("840"), None), Projection::Orthographic);
    }

    #[test]
    fn seam_rotations() {
        assert_eq!(seam_rotation(Some(Continent::Asia), None), -160.0);
        assert_eq!(seam_rotation(Some(Continent::Oceania), None), -160.0);
        assert_eq!(seam_rotation(Some(Continent::NorthAmerica), None), 160.0);
        assert_eq!(seam_rotation(Some(Continent::NorthAmerica), Some("840")), 160.0);
        assert_eq!(seam_rotation(Some(Continent::Europe), Some("643")), -160.0);
        assert_eq!(seam_rotation(Some(Continent::Asia), Some("392")), -160.0);
        assert_eq!(seam_rotation(Some(Continent::Europe), None), 0.0);
        assert_eq!(seam_rotation(Some(Continent::Europe), Some("250")), 0.0);
        assert_eq!(seam_rotation(None, Some("124")), 160.0);
        assert_eq!(seam_rotation(None, None), 0.0);
    }

    #[test]
    fn countries_across_the_seam_rotate_like_their_continent() {
        for code in ["554", "242", "296", "36"] {
            assert_eq!(seam_rotation(None, Some(code)), -160.0, "country {}", code);
        }
    }
}
