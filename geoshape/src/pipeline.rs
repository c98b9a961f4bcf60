//! Pipeline glue - from a full selection state to renderable paths.
//!
//! `render` is a pure function: it reads the selection and the decoded
//! datasets and returns fresh preview paths, a materialize request and the
//! optional graticule. Nothing is cached between calls, so a newer
//! selection simply replaces an older result.
//!
//! Which geometry gets drawn depends on how deep the selection goes:
//!
//! | Selection            | Borders on                  | Drawn                        |
//! |----------------------|-----------------------------|------------------------------|
//! | county               | -                           | that county                  |
//! | state                | county                      | the state's counties         |
//! | state                | -                           | the state                    |
//! | US                   | county / state              | all counties / all states    |
//! | country              | -                           | the country                  |
//! | continent            | country                     | its countries, grouped       |
//! | continent            | -                           | the merged continent         |
//! | all                  | country                     | every country, by continent  |
//! | all                  | -                           | one merged shape per continent |

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::aggregate::aggregate_continents;
use crate::antimeridian::filter_collection;
use crate::config::PipelineConfig;
use crate::error::{Result, TopologyError};
use crate::geometry::{Feature, FeatureCollection};
use crate::host::{MaterializeRequest, PathGroup};
use crate::path::PathGenerator;
use crate::projection::{graticule_lines, resolve_projection, seam_rotation, Projection, Projector};
use crate::regions::{self, Continent, COUNTRY_CODE_WIDTH, COUNTY_CODE_WIDTH, STATE_CODE_WIDTH};
use crate::selection::{county_in_state, Selection};
use crate::topology::Topology;

/// Topology object holding world countries.
pub const COUNTRIES_OBJECT: &str = "countries";
/// Topology object holding US states.
pub const STATES_OBJECT: &str = "states";
/// Topology object holding US counties.
pub const COUNTIES_OBJECT: &str = "counties";

/// The decoded boundary datasets.
#[derive(Debug, Clone)]
pub struct Atlas {
    pub world: Topology,
    /// States and counties; only needed below the country level.
    pub us: Option<Topology>,
}

impl Atlas {
    pub fn new(world: Topology) -> Self {
        Self { world, us: None }
    }

    pub fn with_us(mut self, us: Topology) -> Self {
        self.us = Some(us);
        self
    }

    /// States or counties, ids padded to their FIPS width.
    fn us_features(&self, object: &str) -> std::result::Result<FeatureCollection, TopologyError> {
        let width = if object == COUNTIES_OBJECT { COUNTY_CODE_WIDTH } else { STATE_CODE_WIDTH };
        let mut features = self
            .us
            .as_ref()
            .ok_or_else(|| TopologyError::UnknownObject(object.to_string()))?
            .feature_collection(object)?;
        regions::canonicalize_ids(&mut features, width);
        Ok(features)
    }

    /// World countries, ids padded to three digits and missing ids patched.
    fn countries(&self) -> std::result::Result<FeatureCollection, TopologyError> {
        let mut countries = self.world.feature_collection(COUNTRIES_OBJECT)?;
        regions::canonicalize_ids(&mut countries, COUNTRY_CODE_WIDTH);
        let patched = regions::patch_missing_ids(&mut countries);
        if patched > 0 {
            debug!(patched, "patched missing country ids");
        }
        Ok(countries)
    }
}

/// Result of one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    /// Projection actually used (Mercator may have been swapped out)
    pub projection: Projection,
    /// Seam rotation applied, in degrees
    pub rotation: f64,
    /// One path per drawn leaf, for previews
    pub preview: Vec<String>,
    /// `None` when nothing drawable was selected
    pub request: Option<MaterializeRequest>,
    pub graticule: Option<String>,
}

/// How drawn features map onto request groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// Everything in one path
    Single,
    /// Continent groups holding one leaf per country
    Countries,
    /// One leaf per merged continent
    Continents,
}

fn keep(collection: FeatureCollection, pred: impl Fn(&Feature) -> bool) -> FeatureCollection {
    collection.features.into_iter().filter(|f| pred(f)).collect()
}

fn continent_of_feature(feature: &Feature) -> Continent {
    regions::classify(feature.id.as_deref(), Some(&feature.name))
}

fn scene(selection: &Selection, atlas: &Atlas) -> std::result::Result<(Layout, FeatureCollection), TopologyError> {
    let borders = selection.effective_borders();

    if let Some(county) = selection.county() {
        let counties = atlas.us_features(COUNTIES_OBJECT)?;
        return Ok((Layout::Single, keep(counties, |f| f.id.as_deref() == Some(county))));
    }

    if let Some(state) = selection.state() {
        let fc = if borders.county {
            keep(atlas.us_features(COUNTIES_OBJECT)?, |f| {
                f.id.as_deref().is_some_and(|id| county_in_state(id, state))
            })
        } else {
            keep(atlas.us_features(STATES_OBJECT)?, |f| f.id.as_deref() == Some(state))
        };
        return Ok((Layout::Single, fc));
    }

    if let Some(country) = selection.country() {
        let fc = if selection.is_us() && borders.county {
            atlas.us_features(COUNTIES_OBJECT)?
        } else if selection.is_us() && borders.state {
            atlas.us_features(STATES_OBJECT)?
        } else {
            keep(atlas.countries()?, |f| f.id.as_deref() == Some(country))
        };
        return Ok((Layout::Single, fc));
    }

    let wanted = selection.continent();
    if borders.country {
        let countries = keep(atlas.countries()?, |f| wanted.is_none_or(|c| continent_of_feature(f) == c));
        return Ok((Layout::Countries, countries));
    }

    let merged: FeatureCollection = aggregate_continents(&atlas.world, COUNTRIES_OBJECT)?
        .into_iter()
        .filter(|(c, _)| wanted.is_none_or(|w| w == *c))
        .map(|(c, geometry)| Feature::new(Some(c.code().to_string()), c.name(), geometry))
        .collect();
    let layout = if wanted.is_some() { Layout::Single } else { Layout::Continents };
    Ok((layout, merged))
}

/// Render a selection.
pub fn render(selection: &Selection, atlas: &Atlas, config: &PipelineConfig) -> Result<RenderOutput> {
    let projection = resolve_projection(selection.projection, selection.country(), selection.state());
    let rotation = if selection.is_whole_collection() {
        seam_rotation(selection.continent(), selection.country())
    } else {
        0.0
    };

    let (layout, features) = scene(selection, atlas)?;
    let before = features.len();
    let features = filter_collection(features, config.antimeridian_threshold);
    debug!(before, after = features.len(), ?layout, "selected features");

    let projector = Projector::new(projection)
        .with_rotation(rotation)
        .fit_size(config.target_size, config.target_size, &features);
    let generator = PathGenerator::new(&projector, config.precision);

    let (preview, request) = match layout {
        Layout::Single => match generator.collection(&features) {
            Some(d) => (vec![d.clone()], Some(MaterializeRequest::single(d))),
            None => (Vec::new(), None),
        },
        Layout::Countries => {
            let mut by_continent: BTreeMap<Continent, Vec<PathGroup>> = BTreeMap::new();
            for feature in features.iter() {
                if let Some(d) = generator.feature(feature) {
                    by_continent
                        .entry(continent_of_feature(feature))
                        .or_default()
                        .push(PathGroup::leaf(feature.display_name(), d));
                }
            }
            let groups: Vec<PathGroup> = by_continent
                .into_iter()
                .map(|(c, leaves)| PathGroup::branch(c.name(), leaves))
                .collect();
            grouped_output(groups)
        }
        Layout::Continents => {
            let groups: Vec<PathGroup> = features
                .iter()
                .filter_map(|f| generator.feature(f).map(|d| PathGroup::leaf(f.display_name(), d)))
                .collect();
            grouped_output(groups)
        }
    };

    let graticule = if selection.graticule {
        let fixed = Projector::new(projection)
            .with_rotation(rotation)
            .with_scale(config.graticule_scale)
            .with_translate(config.graticule_translate);
        PathGenerator::new(&fixed, config.precision).lines(&graticule_lines(config.graticule_step))
    } else {
        None
    };

    info!(
        projection = projection.name(),
        rotation,
        paths = preview.len(),
        "rendered selection"
    );
    Ok(RenderOutput { projection, rotation, preview, request, graticule })
}

fn leaf_paths(groups: &[PathGroup], out: &mut Vec<String>) {
    for group in groups {
        if let Some(d) = &group.path_data {
            out.push(d.clone());
        }
        leaf_paths(&group.children, out);
    }
}

fn grouped_output(groups: Vec<PathGroup>) -> (Vec<String>, Option<MaterializeRequest>) {
    let mut preview = Vec::new();
    leaf_paths(&groups, &mut preview);
    if preview.is_empty() {
        (preview, None)
    } else {
        (preview, Some(MaterializeRequest::grouped(groups)))
    }
}

// ============================================================================
// TESTS
// ============================================================================
