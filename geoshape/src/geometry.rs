//! Core geometry types for geoshape.
//!
//! Two coordinate spaces live here:
//! - **Spherical**: `LonLat` positions (degrees) making up boundary rings,
//!   polygons and features, as decoded from topology datasets.
//! - **Planar**: `Point` and `Bounds` on the drawing surface, produced by
//!   the projection engine and consumed by the path generator and the
//!   scale/stroke adjuster.
//!
//! ## Rust Lesson #3: Two Spaces, Two Types
//!
//! `LonLat` and `Point` are both a pair of `f64`, but they are never
//! interchangeable: passing projected pixels where degrees are expected is
//! a type error rather than a wrong map.

use serde::{Deserialize, Serialize};

/// A position on the sphere, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// A closed sequence of positions. First and last positions are equal.
pub type Ring = Vec<LonLat>;

/// A polygon: the first ring is the outer boundary, the rest are holes.
///
/// ## Rust Lesson #4: Rings In, Rings Out
///
/// The antimeridian filter and the arc merger rebuild polygons from decoded
/// rings instead of editing them in place. `BoundaryGeometry::into_polygons`
/// moves the rings out, so dropping a component never clones the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

impl Polygon {
    /// Create a polygon with no holes. The ring is closed if it isn't already.
    pub fn new(outer: Ring) -> Self {
        Self { rings: vec![close_ring(outer)] }
    }

    /// The outer boundary ring (empty slice for a ring-less polygon).
    pub fn outer(&self) -> &[LonLat] {
        self.rings.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every ring is closed and has at least 4 positions.
    pub fn is_valid(&self) -> bool {
        !self.rings.is_empty()
            && self
                .rings
                .iter()
                .all(|r| r.len() >= 4 && r.first() == r.last())
    }
}

/// Close a ring by repeating its first position, and pad it to 4 positions.
pub fn close_ring(mut ring: Ring) -> Ring {
    if let Some(&first) = ring.first() {
        if ring.last() != Some(&first) {
            ring.push(first);
        }
        while ring.len() < 4 {
            ring.push(first);
        }
    }
    ring
}

/// Boundary geometry of a region.
///
/// ## Rust Lesson #10: Enums (Sum Types)
///
/// A tagged union: the compiler forces every `match` to handle both the
/// single-polygon and multi-polygon shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryGeometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl BoundaryGeometry {
    /// Component polygons, whichever variant this is.
    pub fn polygons(&self) -> &[Polygon] {
        match self {
            BoundaryGeometry::Polygon(p) => std::slice::from_ref(p),
            BoundaryGeometry::MultiPolygon(ps) => ps,
        }
    }

    pub fn into_polygons(self) -> Vec<Polygon> {
        match self {
            BoundaryGeometry::Polygon(p) => vec![p],
            BoundaryGeometry::MultiPolygon(ps) => ps,
        }
    }

    /// Build the tightest variant for a list of components.
    ///
    /// Returns `None` for an empty list: an empty geometry is never emitted.
    pub fn from_polygons(mut polygons: Vec<Polygon>) -> Option<Self> {
        match polygons.len() {
            0 => None,
            1 => polygons.pop().map(BoundaryGeometry::Polygon),
            _ => Some(BoundaryGeometry::MultiPolygon(polygons)),
        }
    }

    /// Total number of rings across all components.
    pub fn ring_count(&self) -> usize {
        self.polygons().iter().map(|p| p.rings.len()).sum()
    }
}

/// A boundary geometry plus its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Region code. Missing for a handful of disputed territories until
    /// `regions::patch_missing_ids` assigns a reserved code.
    pub id: Option<String>,
    pub name: String,
    pub geometry: BoundaryGeometry,
}

impl Feature {
    pub fn new(id: Option<String>, name: impl Into<String>, geometry: BoundaryGeometry) -> Self {
        Self { id, name: name.into(), geometry }
    }

    /// The id, or the name for features that still lack one.
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    /// The name a person would read, or the label for unnamed features.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { self.label() } else { &self.name }
    }
}

/// Ordered features; the unit projections are fitted to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Find a feature by id.
    pub fn find(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id.as_deref() == Some(id))
    }

    /// Every ring of every polygon of every feature.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.features
            .iter()
            .flat_map(|f| f.geometry.polygons())
            .flat_map(|p| p.rings.iter())
    }
}

impl From<Feature> for FeatureCollection {
    fn from(feature: Feature) -> Self {
        Self { features: vec![feature] }
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self { features: iter.into_iter().collect() }
    }
}

// ============================================================================
// PLANAR TYPES
// ============================================================================

/// A 2D point on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Box from an origin and a size.
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Smallest box containing every point, `None` when there are none.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut b = Self::new(first.x, first.y, first.x, first.y);
        for p in iter {
            b.include(p);
        }
        Some(b)
    }

    #[inline]
    pub fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }
}

/// Planar signed area of a lon/lat ring, treating degrees as x/y.
pub fn planar_ring_area(ring: &[LonLat]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += ring[i].lon * ring[j].lat - ring[j].lon * ring[i].lat;
    }
    area / 2.0
}

// ============================================================================
// TESTS
// ============================================================================
