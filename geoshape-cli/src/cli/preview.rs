//! `preview` command: rasterize the rendered document to PNG.

use resvg::usvg;
use tiny_skia::Pixmap;

use super::common::{fail, parse_render_args, run_pipeline};
use super::render::render_svg;

/// Rasterize an SVG document at `scale` times its size.
pub fn rasterize(svg: &str, width: f64, height: f64, scale: f64) -> Result<Pixmap, String> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| format!("invalid SVG: {}", e))?;

    let pixmap_width = (width * scale).round() as u32;
    let pixmap_height = (height * scale).round() as u32;
    let mut pixmap = Pixmap::new(pixmap_width, pixmap_height)
        .ok_or_else(|| format!("could not create a {}x{} pixmap", pixmap_width, pixmap_height))?;

    let transform = tiny_skia::Transform::from_scale(scale as f32, scale as f32);
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Execute the preview command.
pub fn cmd_preview(args: &[String]) {
    // --scale is preview-only; strip it before the shared parser sees it.
    let mut scale = 1.0;
    let mut rest = Vec::with_capacity(args.len());
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--scale" {
            i += 1;
            scale = match args.get(i).and_then(|s| s.parse::<f64>().ok()) {
                Some(s) if s > 0.0 => s,
                _ => fail("--scale needs a positive number"),
            };
        } else {
            rest.push(args[i].clone());
        }
        i += 1;
    }

    let args = parse_render_args(&rest).unwrap_or_else(|e| fail(e));
    let png_path = match args.output.as_deref() {
        Some(path) if path != "-" => path.to_string(),
        _ => fail("preview needs -o <file.png>"),
    };

    let session = run_pipeline(&args).unwrap_or_else(|e| fail(e));
    let svg = render_svg(&args, &session).unwrap_or_else(|e| fail(e));
    let pixmap = rasterize(&svg, args.width, args.height, scale).unwrap_or_else(|e| fail(e));

    match pixmap.save_png(&png_path) {
        Ok(_) => eprintln!("Wrote: {} ({}x{})", png_path, pixmap.width(), pixmap.height()),
        Err(e) => fail(format!("failed to write {}: {}", png_path, e)),
    }
}

// ============================================================================
// TESTS
// ============================================================================
