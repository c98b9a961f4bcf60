//! `render` and `request` commands.

use serde::Serialize;

use geoshape::host::Materialized;
use geoshape::{materialize, MaterializeRequest, MemoryHost, Selection};

use super::common::{fail, parse_render_args, run_pipeline, viewport, write_output, OutputFormat, RenderArgs, Session};

/// Render summary in JSON output format.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonRender<'a> {
    selection: &'a Selection,
    projection: &'static str,
    rotation: f64,
    paths: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    graticule: Option<&'a str>,
    vectors: usize,
    scale: f64,
    stroke_width: f64,
    bounds: [f64; 4],
}

/// The request with command-line colours applied.
pub fn colored_request(args: &RenderArgs, session: &Session) -> Result<MaterializeRequest, String> {
    let mut request = session
        .output
        .request
        .clone()
        .ok_or_else(|| "nothing to draw for this selection".to_string())?;
    if let Some(fill) = args.fill {
        request = request.with_fill(fill);
    }
    if let Some(stroke) = args.stroke {
        request = request.with_stroke(stroke);
    }
    Ok(request)
}

/// Replay the render into an in-memory document.
pub fn materialize_document(args: &RenderArgs, session: &Session) -> Result<(MemoryHost, Materialized), String> {
    let request = colored_request(args, session)?;
    let mut host = MemoryHost::new(viewport(args), args.background);
    let done = materialize(&mut host, &request, &session.config)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "nothing to draw for this selection".to_string())?;
    Ok((host, done))
}

/// Render the selection to a standalone SVG document.
pub fn render_svg(args: &RenderArgs, session: &Session) -> Result<String, String> {
    let (host, done) = materialize_document(args, session)?;
    host.to_svg(done.root).map_err(|e| e.to_string())
}

fn render_json(args: &RenderArgs, session: &Session) -> Result<String, String> {
    let (_, done) = materialize_document(args, session)?;
    let b = done.placement.bounds();
    let summary = JsonRender {
        selection: &session.selection,
        projection: session.output.projection.name(),
        rotation: session.output.rotation,
        paths: &session.output.preview,
        graticule: session.output.graticule.as_deref(),
        vectors: done.vectors,
        scale: done.placement.scale,
        stroke_width: done.stroke_width,
        bounds: [b.min_x, b.min_y, b.max_x, b.max_y],
    };
    serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())
}

/// Execute the render command.
pub fn cmd_render(args: &[String]) {
    let args = parse_render_args(args).unwrap_or_else(|e| fail(e));
    let session = run_pipeline(&args).unwrap_or_else(|e| fail(e));

    let contents = match args.format {
        OutputFormat::Svg => render_svg(&args, &session),
        OutputFormat::Json => render_json(&args, &session).map(|json| json + "\n"),
    }
    .unwrap_or_else(|e| fail(e));

    write_output(args.output.as_deref(), &contents).unwrap_or_else(|e| fail(e));
}

/// Execute the request command: print the materialize request as JSON.
pub fn cmd_request(args: &[String]) {
    let args = parse_render_args(args).unwrap_or_else(|e| fail(e));
    let session = run_pipeline(&args).unwrap_or_else(|e| fail(e));

    let request = colored_request(&args, &session).unwrap_or_else(|e| fail(e));
    let json = serde_json::to_string_pretty(&request).unwrap_or_else(|e| fail(e));
    write_output(args.output.as_deref(), &(json + "\n")).unwrap_or_else(|e| fail(e));
}
