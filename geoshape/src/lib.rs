//! # geoshape
//!
//! Turns boundary topology (continents, countries, US states and counties)
//! into flat, screen-sized path data that a vector editor can take in as
//! editable shapes.
//!
//! Pipeline, top to bottom:
//!
//! 1. `aggregate` - merge region fragments along shared arcs
//! 2. `antimeridian` - drop components that wrapped around the globe
//! 3. `projection` - project and fit to the target box
//! 4. `path` - serialize to dense path strings
//! 5. `normalize` - canonical spacing, one subpath per ring
//! 6. `adjust` - fit the shape group and keep the stroke width constant
//!
//! `pipeline::render` runs steps 1-4 for a `Selection`; `host::materialize`
//! runs 5-6 against a `DocumentHost`.
//!
//! ## Rust Lesson #7: One Stage, One Module
//!
//! Each numbered step above is its own module and only sees the types of
//! the step before it: `path` takes projected `Point`s and never touches
//! `LonLat`, `adjust` takes path strings and never sees a projection. The
//! front ends (the CLI, a plugin host) only need the re-exports below,
//! `render` plus `materialize`, to run the whole chain.

pub mod adjust;
pub mod aggregate;
pub mod antimeridian;
pub mod bounds;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod normalize;
pub mod path;
pub mod pipeline;
pub mod projection;
pub mod regions;
pub mod selection;
pub mod store;
pub mod topology;

// Re-export common types at crate root for convenience.
pub use adjust::{adjusted_stroke_width, fit_to_target, Placement};
pub use aggregate::{aggregate, aggregate_continents};
pub use antimeridian::{filter_collection, filter_geometry};
pub use bounds::path_bounds;
pub use color::{pick_fill, Rgb};
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use geometry::{BoundaryGeometry, Bounds, Feature, FeatureCollection, LonLat, Point, Polygon};
pub use host::{materialize, DocumentHost, FillRule, MaterializeRequest, MemoryHost, PathGroup, Payload};
pub use normalize::{normalize, normalize_and_split, split};
pub use path::PathGenerator;
pub use pipeline::{render, Atlas, RenderOutput};
pub use projection::{Projection, Projector};
pub use regions::Continent;
pub use selection::Selection;
pub use store::{MemoryStore, Resolution, SavedSelection, SelectionStore};
pub use topology::Topology;
