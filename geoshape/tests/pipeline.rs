//! End-to-end: topology in, placed shapes out.

use geoshape::host::NodeKind;
use geoshape::{
    materialize, normalize_and_split, path_bounds, render, Atlas, Bounds, Continent, MemoryHost, PipelineConfig,
    Projection, Rgb, Selection, Topology,
};

/// Quantized fixture: two neighbouring squares, plus a country whose small
/// second part sits far across the antimeridian.
const WORLD: &str = r#"{
    "type": "Topology",
    "transform": {"scale": [0.01, 0.01], "translate": [-180, -90]},
    "arcs": [
        [[18000, 13500], [0, 500], [500, 0], [0, -500], [-500, 0]],
        [[18500, 13500], [0, 500], [500, 0], [0, -500], [-500, 0]],
        [[21000, 14000], [0, 500], [500, 0], [0, -500], [-500, 0]],
        [[500, 14000], [0, 200], [200, 0], [0, -200], [-200, 0]]
    ],
    "objects": {
        "countries": {"type": "GeometryCollection", "geometries": [
            {"type": "Polygon", "id": "250", "properties": {"name": "France"}, "arcs": [[0]]},
            {"type": "Polygon", "id": "276", "properties": {"name": "Germany"}, "arcs": [[1]]},
            {"type": "MultiPolygon", "id": "643", "properties": {"name": "Russia"}, "arcs": [[[2]], [[3]]]}
        ]}
    }
}"#;

fn atlas() -> Atlas {
    Atlas::new(Topology::from_json(WORLD).expect("fixture parses"))
}

fn square_document() -> MemoryHost {
    MemoryHost::new(Bounds::from_rect(0.0, 0.0, 400.0, 400.0), Rgb::from_hex("#1e1e1e").unwrap())
}

#[test]
fn country_render_fits_the_target_box() {
    let mut selection = Selection::new();
    assert!(selection.set_country(Some("250")));
    let config = PipelineConfig::default();
    let out = render(&selection, &atlas(), &config).unwrap();

    assert_eq!(out.projection, Projection::Mercator);
    let b = path_bounds(&out.preview[0]).unwrap().unwrap();
    let larger = b.width().max(b.height());
    assert!((larger - config.target_size).abs() < 1e-2, "larger side {} should fill the box", larger);
}

#[test]
fn far_component_is_dropped_before_projection() {
    let mut selection = Selection::new();
    assert!(selection.set_country(Some("643")));
    let out = render(&selection, &atlas(), &PipelineConfig::default()).unwrap();
    assert_eq!(out.preview.len(), 1);
    assert_eq!(
        normalize_and_split(&out.preview[0]).len(),
        1,
        "the sliver across the antimeridian is gone"
    );
}

#[test]
fn render_then_materialize_keeps_apparent_stroke() {
    let selection = Selection::new().with_continent(Some(Continent::Europe));
    let config = PipelineConfig::default().with_stroke_width(2.0);
    let out = render(&selection, &atlas(), &config).unwrap();

    let mut host = square_document();
    let done = materialize(&mut host, out.request.as_ref().unwrap(), &config).unwrap().unwrap();

    assert!((done.stroke_width * done.placement.scale - 2.0).abs() < 1e-9);
    let largest = done.placement.width.max(done.placement.height);
    assert!((largest - 400.0 * config.fit_margin).abs() < 1e-6);

    let fills: Vec<Rgb> = host
        .nodes()
        .iter()
        .filter_map(|n| match &n.kind {
            NodeKind::Vector { style, .. } => Some(style.fill),
            NodeKind::Group { .. } => None,
        })
        .collect();
    assert!(!fills.is_empty());
    assert!(fills.iter().all(|f| *f == Rgb::WHITE), "dark document gets white shapes");
}

#[test]
fn bordered_world_groups_every_country() {
    let mut selection = Selection::new();
    selection.include_country_borders = true;
    let out = render(&selection, &atlas(), &PipelineConfig::default()).unwrap();
    assert_eq!(out.preview.len(), 3);

    let mut host = square_document();
    let done = materialize(&mut host, out.request.as_ref().unwrap(), &PipelineConfig::default())
        .unwrap()
        .unwrap();
    // Russia's far part is filtered here too
    assert_eq!(done.vectors, 3);
    let svg = host.to_svg(done.root).unwrap();
    assert!(svg.contains(r#"<g id="Europe""#), "{}", svg);
    assert!(svg.contains(r#"fill-rule="evenodd""#));
}

/// Oceania with numeric ids, as some world datasets ship them. New Zealand's
/// Chatham Islands sit just east of the 180th meridian.
const OCEANIA: &str = r#"{
    "type": "Topology",
    "arcs": [
        [[172, -46], [178, -46], [178, -35], [172, -35], [172, -46]],
        [[-177, -44.5], [-176, -44.5], [-176, -43.5], [-177, -43.5], [-177, -44.5]],
        [[115, -35], [150, -35], [150, -12], [115, -12], [115, -35]]
    ],
    "objects": {
        "countries": {"type": "GeometryCollection", "geometries": [
            {"type": "MultiPolygon", "id": 554, "properties": {"name": "New Zealand"}, "arcs": [[[0]], [[1]]]},
            {"type": "Polygon", "id": 36, "properties": {"name": "Australia"}, "arcs": [[2]]}
        ]}
    }
}"#;

fn oceania() -> Atlas {
    Atlas::new(Topology::from_json(OCEANIA).expect("fixture parses"))
}

#[test]
fn country_across_the_antimeridian_stays_compact() {
    let mut selection = Selection::new();
    assert!(selection.set_country(Some("554")));
    let config = PipelineConfig::default();
    let out = render(&selection, &oceania(), &config).unwrap();

    assert_eq!(out.rotation, -160.0, "rotated like the rest of Oceania");
    assert_eq!(normalize_and_split(&out.preview[0]).len(), 2, "Chatham Islands are kept");

    let b = path_bounds(&out.preview[0]).unwrap().unwrap();
    assert!((b.width().max(b.height()) - config.target_size).abs() < 1e-2);
    assert!(b.width() < 2.0 * b.height(), "{}x{} is stretched across the globe", b.width(), b.height());
}

#[test]
fn numeric_country_ids_are_selectable() {
    let mut selection = Selection::new();
    assert!(selection.set_country(Some("036")));
    let out = render(&selection, &oceania(), &PipelineConfig::default()).unwrap();
    assert_eq!(out.preview.len(), 1, "id 36 matches code 036");

    let mut selection = Selection::new().with_continent(Some(Continent::Oceania));
    selection.include_country_borders = true;
    let out = render(&selection, &oceania(), &PipelineConfig::default()).unwrap();
    assert_eq!(out.preview.len(), 2);

    let mut host = square_document();
    let done = materialize(&mut host, out.request.as_ref().unwrap(), &PipelineConfig::default())
        .unwrap()
        .unwrap();
    let svg = host.to_svg(done.root).unwrap();
    assert!(svg.contains(r#"<g id="Oceania""#), "{}", svg);
    assert!(svg.contains(r#"<g id="Australia""#), "{}", svg);
    assert!(svg.contains(r#"<g id="New Zealand""#), "{}", svg);
}
