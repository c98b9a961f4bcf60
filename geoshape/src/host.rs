//! Document materialization - turning path data into editable shapes.
//!
//! The pipeline never touches a document directly. It builds a
//! `MaterializeRequest` (serializable, so it can cross a message boundary)
//! and `materialize` replays it against any `DocumentHost`:
//!
//! 1. Normalize and split each path into subpaths
//! 2. One vector node per subpath, grouped following the request hierarchy
//! 3. Fit the group into the host's selection (or viewport) with a margin
//! 4. Set a stroke width that survives the scale
//!
//! `MemoryHost` is a recording host: it keeps nodes in a `Vec` and can
//! write them out as SVG.


use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adjust::{adjusted_stroke_width, fit_to_target, Placement};
use crate::bounds::union_bounds;
use crate::color::{pick_fill, Rgb};
use crate::config::PipelineConfig;
use crate::error::{HostError, Result};
use crate::geometry::{Bounds, Point};
use crate::normalize::normalize_and_split;
use crate::path::format_number;

/// Winding rule for filled shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillRule {
    #[default]
    #[serde(rename = "NONZERO")]
    NonZero,
    #[serde(rename = "EVENODD")]
    EvenOdd,
}

impl FillRule {
    /// SVG `fill-rule` attribute value.
    pub fn svg_name(&self) -> &'static str {
        match self {
            FillRule::NonZero => "nonzero",
            FillRule::EvenOdd => "evenodd",
        }
    }
}

/// One level of a grouped request (a continent, or a country inside one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathGroup {
    pub group_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_data: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PathGroup>,
}

impl PathGroup {
    pub fn leaf(name: impl Into<String>, path_data: String) -> Self {
        Self { group_name: name.into(), path_data: Some(path_data), children: Vec::new() }
    }

    pub fn branch(name: impl Into<String>, children: Vec<PathGroup>) -> Self {
        Self { group_name: name.into(), path_data: None, children }
    }
}

/// Request body: one path, or a hierarchy of named paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Payload {
    Single {
        #[serde(rename = "pathData")]
        path_data: String,
    },
    Grouped { groups: Vec<PathGroup> },
}

/// Everything a host needs to create the shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializeRequest {
    pub payload: Payload,
    pub fill_rule: FillRule,
    /// `None` = choose black or white against the document background
    #[serde(default)]
    pub fill: Option<Rgb>,
    #[serde(default)]
    pub stroke: Option<Rgb>,
}

impl MaterializeRequest {
    pub fn single(path_data: String) -> Self {
        Self {
            payload: Payload::Single { path_data },
            fill_rule: FillRule::NonZero,
            fill: None,
            stroke: None,
        }
    }

    pub fn grouped(groups: Vec<PathGroup>) -> Self {
        Self {
            payload: Payload::Grouped { groups },
            fill_rule: FillRule::EvenOdd,
            fill: None,
            stroke: None,
        }
    }

    pub fn with_fill(mut self, fill: Rgb) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_stroke(mut self, stroke: Rgb) -> Self {
        self.stroke = Some(stroke);
        self
    }
}

/// Handle of a node inside a host document.
pub type NodeId = usize;

/// Paint for a vector node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub fill_rule: FillRule,
    pub fill: Rgb,
    pub stroke: Option<Rgb>,
}

/// The document-editing collaborator.
///
/// ## Rust Lesson #26: Traits as seams
///
/// `materialize` only sees this trait, so the same code drives a real
/// editor binding, the in-memory host in tests, or the CLI's SVG writer.
pub trait DocumentHost {
    fn background(&self) -> Rgb;
    fn viewport(&self) -> Bounds;
    /// Bounds of the user's current selection, if any.
    fn selection_bounds(&self) -> Option<Bounds>;
    fn create_vector(&mut self, name: &str, subpaths: &[String], style: &ShapeStyle) -> std::result::Result<NodeId, HostError>;
    fn group(&mut self, name: &str, children: &[NodeId]) -> std::result::Result<NodeId, HostError>;
    fn bounds(&self, node: NodeId) -> std::result::Result<Bounds, HostError>;
    /// Move and uniformly resize a node so its bounds match the placement.
    fn place(&mut self, node: NodeId, placement: &Placement) -> std::result::Result<(), HostError>;
    /// Set the stroke width of a node and everything below it.
    fn set_stroke_width(&mut self, node: NodeId, width: f64) -> std::result::Result<(), HostError>;
}

/// What `materialize` produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Materialized {
    pub root: NodeId,
    pub vectors: usize,
    pub placement: Placement,
    pub stroke_width: f64,
}

const ROOT_GROUP_NAME: &str = "Geo Shape";

/// Create vectors for one path, one per subpath.
fn vectors_for<H: DocumentHost + ?Sized>(
    host: &mut H,
    name: &str,
    path_data: &str,
    style: &ShapeStyle,
) -> std::result::Result<Vec<NodeId>, HostError> {
    normalize_and_split(path_data)
        .into_iter()
        .map(|subpath| host.create_vector(name, std::slice::from_ref(&subpath), style))
        .collect()
}

fn build_group<H: DocumentHost + ?Sized>(
    host: &mut H,
    group: &PathGroup,
    style: &ShapeStyle,
    vectors: &mut usize,
) -> std::result::Result<Option<NodeId>, HostError> {
    let mut children = match &group.path_data {
        Some(d) => vectors_for(host, &group.group_name, d, style)?,
        None => Vec::new(),
    };
    *vectors += children.len();
    for child in &group.children {
        if let Some(id) = build_group(host, child, style, vectors)? {
            children.push(id);
        }
    }
    if children.is_empty() {
        return Ok(None);
    }
    host.group(&group.group_name, &children).map(Some)
}

/// Replay a request against a host.
///
/// Returns `Ok(None)` without touching the host when the request has no
/// drawable path.
pub fn materialize<H: DocumentHost + ?Sized>(
    host: &mut H,
    request: &MaterializeRequest,
    config: &PipelineConfig,
) -> Result<Option<Materialized>> {
    let style = ShapeStyle {
        fill_rule: request.fill_rule,
        fill: request.fill.unwrap_or_else(|| pick_fill(host.background())),
        stroke: request.stroke,
    };

    let mut vectors = 0;
    let mut top = Vec::new();
    match &request.payload {
        Payload::Single { path_data } => {
            top = vectors_for(host, ROOT_GROUP_NAME, path_data, &style)?;
            vectors = top.len();
        }
        Payload::Grouped { groups } => {
            for group in groups {
                if let Some(id) = build_group(host, group, &style, &mut vectors)? {
                    top.push(id);
                }
            }
        }
    }
    if top.is_empty() {
        debug!("nothing to materialize");
        return Ok(None);
    }

    let root = host.group(ROOT_GROUP_NAME, &top)?;
    let target = host.selection_bounds().unwrap_or_else(|| host.viewport());
    let placement = fit_to_target(host.bounds(root)?, target, config.fit_margin)?;
    host.place(root, &placement)?;
    let stroke_width = adjusted_stroke_width(config.stroke_width, placement.scale)?;
    host.set_stroke_width(root, stroke_width)?;

    debug!(vectors, scale = placement.scale, stroke_width, "materialized shapes");
    Ok(Some(Materialized { root, vectors, placement, stroke_width }))
}

// ============================================================================
// MEMORY HOST
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Vector { subpaths: Vec<String>, style: ShapeStyle },
    Group { children: Vec<NodeId> },
}

/// A recorded node. Its transform maps local `p` to `p * scale + offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub scale: f64,
    pub offset: Point,
    pub stroke_width: f64,
}

/// In-memory document.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    viewport: Bounds,
    background: Rgb,
    selection: Option<Bounds>,
    nodes: Vec<Node>,
}

impl MemoryHost {
    pub fn new(viewport: Bounds, background: Rgb) -> Self {
        Self { viewport, background, selection: None, nodes: Vec::new() }
    }

    pub fn with_selection(mut self, bounds: Bounds) -> Self {
        self.selection = Some(bounds);
        self
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn get(&self, id: NodeId) -> std::result::Result<&Node, HostError> {
        self.nodes.get(id).ok_or(HostError::UnknownNode(id))
    }

    /// Bounds before the node's own transform.
    fn local_bounds(&self, id: NodeId) -> std::result::Result<Option<Bounds>, HostError> {
        match &self.get(id)?.kind {
            NodeKind::Vector { subpaths, .. } => Ok(union_bounds(subpaths.iter().map(String::as_str))?),
            NodeKind::Group { children } => {
                let mut total: Option<Bounds> = None;
                for &child in children {
                    let b = self.bounds(child)?;
                    total = Some(total.map_or(b, |t| t.union(&b)));
                }
                Ok(total)
            }
        }
    }

    fn push(&mut self, name: &str, kind: NodeKind) -> NodeId {
        self.nodes.push(Node {
            name: name.to_string(),
            kind,
            scale: 1.0,
            offset: Point::new(0.0, 0.0),
            stroke_width: 1.0,
        });
        self.nodes.len() - 1
    }

    /// Render a node and its subtree as a standalone SVG document sized to
    /// the viewport.
    pub fn to_svg(&self, root: NodeId) -> std::result::Result<String, HostError> {
        let v = self.viewport;
        let mut svg = String::new();
        svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\">\n",
            format_number(v.width(), 3),
            format_number(v.height(), 3),
            format_number(v.min_x, 3),
            format_number(v.min_y, 3),
            format_number(v.width(), 3),
            format_number(v.height(), 3),
        ));
        svg.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
            format_number(v.min_x, 3),
            format_number(v.min_y, 3),
            format_number(v.width(), 3),
            format_number(v.height(), 3),
            self.background.to_hex()
        ));
        self.write_node(&mut svg, root, 0)?;
        svg.push_str("</svg>\n");
        Ok(svg)
    }

    fn write_node(&self, svg: &mut String, id: NodeId, depth: usize) -> std::result::Result<(), HostError> {
        let node = self.get(id)?;
        let indent = "  ".repeat(depth);
        let transform = format!(
            "translate({} {}) scale({})",
            format_number(node.offset.x, 4),
            format_number(node.offset.y, 4),
            format_number(node.scale, 6)
        );
        match &node.kind {
            NodeKind::Group { children } => {
                svg.push_str(&format!(
                    "{}<g id=\"{}\" transform=\"{}\">\n",
                    indent,
                    xml_escape(&node.name),
                    transform
                ));
                for &child in children {
                    self.write_node(svg, child, depth + 1)?;
                }
                svg.push_str(&format!("{}</g>\n", indent));
            }
            NodeKind::Vector { subpaths, style } => {
                let stroke = match style.stroke {
                    Some(c) => format!(
                        r#" stroke="{}" stroke-width="{}""#,
                        c.to_hex(),
                        format_number(node.stroke_width, 6)
                    ),
                    None => String::new(),
                };
                svg.push_str(&format!(
                    "{}<path transform=\"{}\" fill=\"{}\" fill-rule=\"{}\"{} d=\"{}\"/>\n",
                    indent,
                    transform,
                    style.fill.to_hex(),
                    style.fill_rule.svg_name(),
                    stroke,
                    subpaths.join(" ")
                ));
            }
        }
        Ok(())
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

impl DocumentHost for MemoryHost {
    fn background(&self) -> Rgb {
        self.background
    }

    fn viewport(&self) -> Bounds {
        self.viewport
    }

    fn selection_bounds(&self) -> Option<Bounds> {
        self.selection
    }

    fn create_vector(&mut self, name: &str, subpaths: &[String], style: &ShapeStyle) -> std::result::Result<NodeId, HostError> {
        if subpaths.is_empty() {
            return Err(HostError::Rejected(format!("vector '{}' has no paths", name)));
        }
        Ok(self.push(name, NodeKind::Vector { subpaths: subpaths.to_vec(), style: *style }))
    }

    fn group(&mut self, name: &str, children: &[NodeId]) -> std::result::Result<NodeId, HostError> {
        for &child in children {
            self.get(child)?;
        }
        Ok(self.push(name, NodeKind::Group { children: children.to_vec() }))
    }

    fn bounds(&self, node: NodeId) -> std::result::Result<Bounds, HostError> {
        let local = self.local_bounds(node)?.ok_or(HostError::NoBounds(node))?;
        let n = self.get(node)?;
        Ok(Bounds::new(
            local.min_x * n.scale + n.offset.x,
            local.min_y * n.scale + n.offset.y,
            local.max_x * n.scale + n.offset.x,
            local.max_y * n.scale + n.offset.y,
        ))
    }

    fn place(&mut self, node: NodeId, placement: &Placement) -> std::result::Result<(), HostError> {
        let local = self.local_bounds(node)?.ok_or(HostError::NoBounds(node))?;
        let scale = if local.width() > 0.0 {
            placement.width / local.width()
        } else if local.height() > 0.0 {
            placement.height / local.height()
        } else {
            return Err(HostError::NoBounds(node));
        };
        let n = self.nodes.get_mut(node).ok_or(HostError::UnknownNode(node))?;
        n.scale = scale;
        n.offset = Point::new(placement.x - local.min_x * scale, placement.y - local.min_y * scale);
        Ok(())
    }

    fn set_stroke_width(&mut self, node: NodeId, width: f64) -> std::result::Result<(), HostError> {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let n = self.nodes.get_mut(id).ok_or(HostError::UnknownNode(id))?;
            n.stroke_width = width;
            if let NodeKind::Group { children } = &n.kind {
                stack.extend(children.iter().copied());
            }
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
