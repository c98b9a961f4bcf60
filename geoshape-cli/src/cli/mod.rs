//! CLI command implementations.
//!
//! - `render` - materialize a selection and write it as SVG (or a JSON summary)
//! - `request` - print the materialize request the pipeline produced
//! - `preview` - rasterize the rendered document to PNG
//! - `projections` - list the projection catalog

pub mod common;
pub mod preview;
pub mod render;

pub use preview::cmd_preview;
pub use render::{cmd_render, cmd_request};
