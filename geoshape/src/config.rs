//! Pipeline configuration.
//!
//! Every tunable the pipeline reads lives here with its default. The CLI
//! loads it from JSON (`--config`), missing fields fall back to defaults.
//!
//! # Example
//! ```ignore
//! use geoshape::PipelineConfig;
//!
//! let config = PipelineConfig::default()
//!     .with_target_size(512.0)
//!     .with_stroke_width(0.5);
//! ```

use serde::{Deserialize, Serialize};

use crate::antimeridian::DEFAULT_THRESHOLD_DEGREES;
use crate::geometry::Point;

/// Configuration for one render + materialize pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Side of the square target box projections are fitted to
    pub target_size: f64,
    /// Max angular distance (degrees) a component may sit from the main landmass
    pub antimeridian_threshold: f64,
    /// Fraction of the target box the placed group may occupy (0, 1]
    pub fit_margin: f64,
    /// Stroke width the group should appear with after scaling
    pub stroke_width: f64,
    /// Decimal digits kept in generated path coordinates
    pub precision: usize,
    /// Graticule line spacing in degrees
    pub graticule_step: f64,
    /// Fixed (non-fitted) scale used for the graticule
    pub graticule_scale: f64,
    /// Fixed (non-fitted) translation used for the graticule
    pub graticule_translate: Point,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_size: 302.0,
            antimeridian_threshold: DEFAULT_THRESHOLD_DEGREES,
            fit_margin: 0.8,
            stroke_width: 1.0,
            precision: 3,
            graticule_step: 10.0,
            graticule_scale: 48.0,
            graticule_translate: Point::new(151.0, 151.0),
        }
    }
}

impl PipelineConfig {
    pub fn with_target_size(mut self, size: f64) -> Self {
        self.target_size = size;
        self
    }

    pub fn with_antimeridian_threshold(mut self, degrees: f64) -> Self {
        self.antimeridian_threshold = degrees;
        self
    }

    pub fn with_fit_margin(mut self, margin: f64) -> Self {
        self.fit_margin = margin;
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn with_precision(mut self, digits: usize) -> Self {
        self.precision = digits;
        self
    }

    pub fn with_graticule_step(mut self, degrees: f64) -> Self {
        self.graticule_step = degrees;
        self
    }

    /// Parse a JSON config. Absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// TESTS
// ============================================================================
