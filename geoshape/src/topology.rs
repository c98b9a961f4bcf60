//! TopoJSON topology decoding and shared-arc merging.
//!
//! A topology stores every border once, as an *arc*. Polygons reference arcs
//! by index; a negative index `i` means arc `!i` walked backwards. Two
//! neighbouring countries reference the same arc, one in each direction.
//!
//! ## Merging
//!
//! `merge_polygons` unions polygons along their shared arcs:
//!
//! 1. Index which polygons use each arc
//! 2. Cluster polygons into connected components through shared arcs
//! 3. Per component, keep only arcs used by a single polygon (the outline)
//! 4. Stitch the kept arcs end-to-end into closed rings
//! 5. The largest ring becomes the outer boundary, the rest are holes

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::TopologyError;
use crate::geometry::{
    close_ring, planar_ring_area, BoundaryGeometry, Feature, FeatureCollection, LonLat, Polygon,
    Ring,
};

/// Arc references of one polygon: one `Vec<i64>` per ring.
pub type ArcPolygon = Vec<Vec<i64>>;

#[derive(Debug, Clone, Deserialize)]
struct RawTopology {
    #[serde(default)]
    transform: Option<Transform>,
    arcs: Vec<Vec<Vec<f64>>>,
    objects: HashMap<String, TopoGeometry>,
}

/// Quantization transform: position = delta-sum * scale + translate.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

/// A geometry object inside a topology.
///
/// ## Rust Lesson #22: Internally tagged enums
///
/// `#[serde(tag = "type")]` reads the `"type"` field to pick the variant,
/// so `{"type": "Polygon", "arcs": ...}` becomes `TopoGeometry::Polygon`.
/// `#[serde(other)]` catches every type we don't draw (points, lines).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum TopoGeometry {
    GeometryCollection {
        geometries: Vec<TopoGeometry>,
    },
    Polygon {
        arcs: ArcPolygon,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    MultiPolygon {
        arcs: Vec<ArcPolygon>,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    #[serde(other)]
    Unsupported,
}

/// Identity of an atomic geometry, handed to grouping predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryMeta {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// An atomic polygonal geometry: identity plus its arc polygons.
#[derive(Debug, Clone)]
pub struct ArcGeometry {
    pub meta: GeometryMeta,
    pub polygons: Vec<ArcPolygon>,
}

/// A decoded topology: absolute lon/lat arcs plus the named objects.
#[derive(Debug, Clone)]
pub struct Topology {
    arcs: Vec<Vec<LonLat>>,
    objects: HashMap<String, TopoGeometry>,
}

impl Topology {
    /// Parse and decode a TopoJSON document.
    pub fn from_json(json: &str) -> Result<Self, TopologyError> {
        let raw: RawTopology = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawTopology) -> Result<Self, TopologyError> {
        let mut arcs = Vec::with_capacity(raw.arcs.len());
        for (index, arc) in raw.arcs.iter().enumerate() {
            arcs.push(decode_arc(index, arc, raw.transform.as_ref())?);
        }
        debug!(arcs = arcs.len(), objects = raw.objects.len(), "decoded topology");
        Ok(Self { arcs, objects: raw.objects })
    }

    /// Flatten a named object into its polygonal geometries.
    pub fn geometries(&self, object: &str) -> Result<Vec<ArcGeometry>, TopologyError> {
        let root = self
            .objects
            .get(object)
            .ok_or_else(|| TopologyError::UnknownObject(object.to_string()))?;
        let mut out = Vec::new();
        collect_geometries(root, &mut out);
        Ok(out)
    }

    /// Convert a named object into features.
    pub fn feature_collection(&self, object: &str) -> Result<FeatureCollection, TopologyError> {
        let mut features = Vec::new();
        for geometry in self.geometries(object)? {
            let polygons = geometry
                .polygons
                .iter()
                .map(|p| self.polygon(p))
                .collect::<Result<Vec<_>, _>>()?;
            let Some(boundary) = BoundaryGeometry::from_polygons(polygons) else {
                continue;
            };
            features.push(Feature::new(
                geometry.meta.id,
                geometry.meta.name.unwrap_or_default(),
                boundary,
            ));
        }
        Ok(FeatureCollection::new(features))
    }

    /// Resolve one arc reference to positions, reversing negative references.
    pub fn arc(&self, reference: i64) -> Result<Vec<LonLat>, TopologyError> {
        let (index, reversed) = if reference < 0 { (!reference, true) } else { (reference, false) };
        let points = usize::try_from(index)
            .ok()
            .and_then(|i| self.arcs.get(i))
            .ok_or(TopologyError::ArcIndex { index: reference, count: self.arcs.len() })?;
        let mut points = points.clone();
        if reversed {
            points.reverse();
        }
        Ok(points)
    }

    /// Concatenate arcs into a closed ring. Shared endpoints are not repeated.
    pub fn ring(&self, references: &[i64]) -> Result<Ring, TopologyError> {
        let mut points: Ring = Vec::new();
        for &reference in references {
            let arc = self.arc(reference)?;
            if !points.is_empty() {
                points.pop();
            }
            points.extend(arc);
        }
        Ok(close_ring(points))
    }

    /// Resolve an arc polygon to a lon/lat polygon.
    pub fn polygon(&self, polygon: &ArcPolygon) -> Result<Polygon, TopologyError> {
        let rings = polygon
            .iter()
            .map(|r| self.ring(r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Polygon { rings })
    }

    /// Union polygons along shared arcs, removing internal borders.
    ///
    /// Returns `None` when there is nothing left to draw.
    pub fn merge_polygons(
        &self,
        polygons: &[&ArcPolygon],
    ) -> Result<Option<BoundaryGeometry>, TopologyError> {
        // Step 1: arc -> polygons using it (one entry per use)
        let mut polygons_by_arc: HashMap<usize, Vec<usize>> = HashMap::new();
        for (pi, polygon) in polygons.iter().enumerate() {
            for &reference in polygon.iter().flatten() {
                polygons_by_arc.entry(arc_index(reference)).or_default().push(pi);
            }
        }

        // Step 2: connected components
        let mut visited = vec![false; polygons.len()];
        let mut components: Vec<Vec<usize>> = Vec::new();
        for start in 0..polygons.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            let mut component = Vec::new();
            let mut stack = vec![start];
            while let Some(pi) = stack.pop() {
                component.push(pi);
                for &reference in polygons[pi].iter().flatten() {
                    for &neighbor in &polygons_by_arc[&arc_index(reference)] {
                        if !visited[neighbor] {
                            visited[neighbor] = true;
                            stack.push(neighbor);
                        }
                    }
                }
            }
            components.push(component);
        }

        // Steps 3-5
        let mut merged = Vec::with_capacity(components.len());
        for component in components {
            let outline: Vec<i64> = component
                .iter()
                .flat_map(|&pi| polygons[pi].iter().flatten().copied())
                .filter(|&reference| polygons_by_arc[&arc_index(reference)].len() < 2)
                .collect();

            let mut rings = Vec::new();
            for references in self.stitch(&outline)? {
                rings.push(self.ring(&references)?);
            }
            if rings.is_empty() {
                continue;
            }

            let largest = rings
                .iter()
                .enumerate()
                .map(|(i, r)| (i, planar_ring_area(r).abs()))
                .fold((0, f64::NEG_INFINITY), |best, cur| if cur.1 > best.1 { cur } else { best })
                .0;
            rings.swap(0, largest);
            merged.push(Polygon { rings });
        }

        debug!(input = polygons.len(), output = merged.len(), "merged polygons along shared arcs");
        Ok(BoundaryGeometry::from_polygons(merged))
    }

    /// Chain directed arcs into closed rings by matching endpoints.
    ///
    /// Endpoints are hashed by exact bit pattern: shared arcs reference the
    /// same decoded positions, so no tolerance is needed.
    fn stitch(&self, references: &[i64]) -> Result<Vec<Vec<i64>>, TopologyError> {
        let mut ends = Vec::with_capacity(references.len());
        let mut by_start: HashMap<(u64, u64), Vec<usize>> = HashMap::new();
        for (i, &reference) in references.iter().enumerate() {
            let arc = self.arc(reference)?;
            let (Some(&first), Some(&last)) = (arc.first(), arc.last()) else {
                ends.push((LonLat::new(0.0, 0.0), LonLat::new(0.0, 0.0)));
                continue;
            };
            by_start.entry(key(first)).or_default().push(i);
            ends.push((first, last));
        }

        let mut used = vec![false; references.len()];
        let mut rings = Vec::new();
        for start in 0..references.len() {
            if used[start] {
                continue;
            }
            used[start] = true;
            let mut ring = vec![references[start]];
            let origin = key(ends[start].0);
            let mut end = key(ends[start].1);

            while end != origin {
                let next = by_start
                    .get(&end)
                    .and_then(|candidates| candidates.iter().copied().find(|&c| !used[c]));
                match next {
                    Some(n) => {
                        used[n] = true;
                        ring.push(references[n]);
                        end = key(ends[n].1);
                    }
                    // Open chain: close it as-is
                    None => break,
                }
            }
            rings.push(ring);
        }
        Ok(rings)
    }
}

fn collect_geometries(geometry: &TopoGeometry, out: &mut Vec<ArcGeometry>) {
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for g in geometries {
                collect_geometries(g, out);
            }
        }
        TopoGeometry::Polygon { arcs, id, properties } => out.push(ArcGeometry {
            meta: meta(id, properties),
            polygons: vec![arcs.clone()],
        }),
        TopoGeometry::MultiPolygon { arcs, id, properties } => out.push(ArcGeometry {
            meta: meta(id, properties),
            polygons: arcs.clone(),
        }),
        TopoGeometry::Unsupported => debug!("skipping non-polygonal geometry"),
    }
}

fn meta(id: &Option<Value>, properties: &Option<Map<String, Value>>) -> GeometryMeta {
    let id = match id {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.as_u64().map_or_else(|| n.to_string(), |v| v.to_string())),
        _ => None,
    };
    let name = properties
        .as_ref()
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string);
    GeometryMeta { id, name }
}

fn decode_arc(
    index: usize,
    arc: &[Vec<f64>],
    transform: Option<&Transform>,
) -> Result<Vec<LonLat>, TopologyError> {
    let mut out = Vec::with_capacity(arc.len());
    let (mut x, mut y) = (0.0, 0.0);
    for position in arc {
        let [px, py] = match position.as_slice() {
            [px, py, ..] => [*px, *py],
            _ => return Err(TopologyError::ShortPosition(index)),
        };
        match transform {
            // Quantized arcs are delta-encoded
            Some(t) => {
                x += px;
                y += py;
                out.push(LonLat::new(
                    x * t.scale[0] + t.translate[0],
                    y * t.scale[1] + t.translate[1],
                ));
            }
            None => out.push(LonLat::new(px, py)),
        }
    }
    Ok(out)
}

#[inline]
fn arc_index(reference: i64) -> usize {
    (if reference < 0 { !reference } else { reference }) as usize
}

#[inline]
fn key(p: LonLat) -> (u64, u64) {
    (p.lon.to_bits(), p.lat.to_bits())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Two unit squares side by side sharing arc 1 (the edge x=1).
    /// Both rings are clockwise, so each walks arc 1 in opposite directions.
    const TWO_SQUARES: &str = r#"{
        "type": "Topology",
        "arcs": [
            [[1,0],[0,0],[0,1],[1,1]],
            [[1,1],[1,0]],
            [[1,1],[2,1],[2,0],[1,0]]
        ],
        "objects": {
            "cells": {
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Polygon", "id": "left", "properties": {"name": "Left"}, "arcs": [[0, 1]]},
                    {"type": "Polygon", "id": 7, "arcs": [[2, -2]]},
                    {"type": "Point", "coordinates": [5, 5]}
                ]
            }
        }
    }"#;

    #[test]
    fn decodes_quantized_arcs() {
        let json = r#"{
            "type": "Topology",
            "transform": {"scale": [0.5, 2.0], "translate": [-10, 5]},
            "arcs": [[[0,0],[2,0],[0,1],[-2,0]]],
            "objects": {}
        }"#;
        let topo = Topology::from_json(json).unwrap();
        let arc = topo.arc(0).unwrap();
        assert_eq!(arc[0], LonLat::new(-10.0, 5.0));
        assert_eq!(arc[1], LonLat::new(-9.0, 5.0));
        assert_eq!(arc[2], LonLat::new(-9.0, 7.0));
        assert_eq!(arc[3], LonLat::new(-10.0, 7.0));
    }

    #[test]
    fn negative_reference_reverses_arc() {
        let topo = Topology::from_json(TWO_SQUARES).unwrap();
        let forward = topo.arc(1).unwrap();
        let backward = topo.arc(-2).unwrap();
        assert_eq!(forward.len(), backward.len());
        assert_eq!(forward[0], backward[1]);
    }

    #[test]
    fn bad_arc_index_is_an_error() {
        let topo = Topology::from_json(TWO_SQUARES).unwrap();
        assert!(matches!(topo.arc(9), Err(TopologyError::ArcIndex { index: 9, count: 3 })));
    }

    #[test]
    fn unknown_object_is_an_error() {
        let topo = Topology::from_json(TWO_SQUARES).unwrap();
        assert!(matches!(
            topo.feature_collection("nope"),
            Err(TopologyError::UnknownObject(name)) if name == "nope"
        ));
    }

    #[test]
    fn feature_collection_reads_ids_and_names() {
        let topo = Topology::from_json(TWO_SQUARES).unwrap();
        let fc = topo.feature_collection("cells").unwrap();

        // Point geometry is skipped
        assert_eq!(fc.len(), 2);
        assert_eq!(fc.features[0].id.as_deref(), Some("left"));
        assert_eq!(fc.features[0].name, "Left");
        assert_eq!(fc.features[1].id.as_deref(), Some("7"));
        assert_eq!(fc.features[1].name, "");

        for f in fc.iter() {
            for p in f.geometry.polygons() {
                assert!(p.is_valid(), "{} should have closed rings", f.label());
            }
        }
    }

    #[test]
    fn merge_removes_shared_border() {
        let topo = Topology::from_json(TWO_SQUARES).unwrap();
        let geometries = topo.geometries("cells").unwrap();
        let polygons: Vec<&ArcPolygon> = geometries.iter().flat_map(|g| g.polygons.iter()).collect();

        let merged = topo.merge_polygons(&polygons).unwrap().unwrap();
        let BoundaryGeometry::Polygon(poly) = merged else {
            panic!("two adjacent squares should merge into one polygon");
        };
        assert_eq!(poly.rings.len(), 1);
        // 2x1 rectangle
        assert!((planar_ring_area(poly.outer()).abs() - 2.0).abs() < 1e-10);
        // The shared vertical edge x=1 no longer appears as a full edge
        let interior_edge = poly
            .outer()
            .windows(2)
            .any(|w| w[0].lon == 1.0 && w[1].lon == 1.0);
        assert!(!interior_edge, "shared border should be gone: {:?}", poly.outer());
    }

    #[test]
    fn merge_keeps_disjoint_components() {
        let json = r#"{
            "type": "Topology",
            "arcs": [
                [[0,0],[1,0],[1,1],[0,0]],
                [[5,5],[6,5],[6,6],[5,5]]
            ],
            "objects": {"islands": {"type": "GeometryCollection", "geometries": [
                {"type": "Polygon", "arcs": [[0]]},
                {"type": "Polygon", "arcs": [[1]]}
            ]}}
        }"#;
        let topo = Topology::from_json(json).unwrap();
        let geometries = topo.geometries("islands").unwrap();
        let polygons: Vec<&ArcPolygon> = geometries.iter().flat_map(|g| g.polygons.iter()).collect();
        let merged = topo.merge_polygons(&polygons).unwrap().unwrap();
        assert_eq!(merged.polygons().len(), 2);
    }

    #[test]
    fn merge_of_nothing_is_none() {
        let topo = Topology::from_json(TWO_SQUARES).unwrap();
        assert!(topo.merge_polygons(&[]).unwrap().is_none());
    }
}
