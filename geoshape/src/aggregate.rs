//! Geometry aggregation - merge region fragments into one boundary per group.
//!
//! Every atomic geometry of a topology object is assigned to exactly one
//! group by a classifier; each group is then unioned along shared arcs so
//! internal borders between members disappear.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::TopologyError;
use crate::geometry::BoundaryGeometry;
use crate::regions::{self, Continent};
use crate::topology::{ArcPolygon, GeometryMeta, Topology};

/// Merge the geometries of `object`, grouped by `classify`.
///
/// The classifier is total (it returns a key for every geometry), so the
/// grouping is a strict partition: nothing is silently dropped. Groups whose
/// merge yields no rings are omitted rather than emitted empty.
///
/// ## Rust Lesson #14: Generic closures
///
/// `F: Fn(&GeometryMeta) -> K` accepts any closure with that shape, and the
/// compiler generates a specialised copy per closure type (no dynamic
/// dispatch). `K: Ord` lets us use a `BTreeMap`, which keeps the output in
/// a deterministic key order.
pub fn aggregate<K, F>(
    topology: &Topology,
    object: &str,
    classify: F,
) -> Result<BTreeMap<K, BoundaryGeometry>, TopologyError>
where
    K: Ord + Clone + std::fmt::Debug,
    F: Fn(&GeometryMeta) -> K,
{
    let geometries = topology.geometries(object)?;

    let mut members: BTreeMap<K, Vec<&ArcPolygon>> = BTreeMap::new();
    for geometry in &geometries {
        members
            .entry(classify(&geometry.meta))
            .or_default()
            .extend(geometry.polygons.iter());
    }

    let mut merged = BTreeMap::new();
    for (key, polygons) in members {
        match topology.merge_polygons(&polygons)? {
            Some(boundary) => {
                debug!(group = ?key, members = polygons.len(), rings = boundary.ring_count(), "merged group");
                merged.insert(key, boundary);
            }
            None => debug!(group = ?key, "group merged to nothing, omitted"),
        }
    }
    Ok(merged)
}

/// Merge a world countries object into one boundary per continent.
///
/// Missing ids are patched by name; anything still unplaceable goes to
/// `Continent::Unknown`.
pub fn aggregate_continents(
    topology: &Topology,
    object: &str,
) -> Result<BTreeMap<Continent, BoundaryGeometry>, TopologyError> {
    aggregate(topology, object, |meta| {
        regions::classify(meta.id.as_deref(), meta.name.as_deref())
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Three unit squares in a row: France (250) | Germany (276) | Brazil (076),
    /// plus an unidentified island nobody can classify.
    const ROW: &str = r#"{
        "type": "Topology",
        "arcs": [
            [[1,0],[0,0],[0,1],[1,1]],
            [[1,1],[1,0]],
            [[1,1],[2,1],[2,0]],
            [[2,0],[1,0]],
            [[2,1],[2,0]],
            [[2,1],[3,1],[3,0],[2,0]],
            [[9,9],[10,9],[10,10],[9,9]]
        ],
        "objects": {"countries": {"type": "GeometryCollection", "geometries": [
            {"type": "Polygon", "id": "250", "properties": {"name": "France"}, "arcs": [[0, 1]]},
            {"type": "Polygon", "id": "276", "properties": {"name": "Germany"}, "arcs": [[2, 3, -2]]},
            {"type": "Polygon", "id": "076", "properties": {"name": "Brazil"}, "arcs": [[5, -5]]},
            {"type": "Polygon", "properties": {"name": "Nowhere"}, "arcs": [[6]]}
        ]}}
    }"#;

    #[test]
    fn groups_by_continent() {
        let topo = Topology::from_json(ROW).unwrap();
        let groups = aggregate_continents(&topo, "countries").unwrap();

        let keys: Vec<Continent> = groups.keys().copied().collect();
        assert_eq!(keys, vec![Continent::Europe, Continent::SouthAmerica, Continent::Unknown]);

        // France + Germany share arc 1, so Europe merges into one polygon
        let europe = &groups[&Continent::Europe];
        assert_eq!(europe.polygons().len(), 1);
        assert_eq!(europe.ring_count(), 1);
    }

    #[test]
    fn every_geometry_lands_in_exactly_one_group() {
        let topo = Topology::from_json(ROW).unwrap();
        let groups = aggregate(&topo, "countries", |meta| meta.id.is_some()).unwrap();
        // Identified: 3 squares (Europe pair merged + Brazil) ; unidentified: island
        assert_eq!(groups[&true].polygons().len(), 2);
        assert_eq!(groups[&false].polygons().len(), 1);
    }

    #[test]
    fn unknown_object_propagates() {
        let topo = Topology::from_json(ROW).unwrap();
        assert!(aggregate_continents(&topo, "states").is_err());
    }
}
