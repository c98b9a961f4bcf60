//! geoshape - turn boundary topology into editable vector shapes
//!
//! Usage:
//!   geoshape render <world.json> [options]    Write the selection as SVG
//!   geoshape request <world.json> [options]   Print the materialize request
//!   geoshape preview <world.json> -o <png>    Rasterize the selection
//!   geoshape projections                      List available projections

mod cli;

use std::env;

use tracing_subscriber::EnvFilter;

use geoshape::Projection;

use cli::{cmd_preview, cmd_render, cmd_request};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let args: Vec<String> = env::args().collect();
    let prog = args.first().map(String::as_str).unwrap_or("geoshape");

    if args.len() < 2 {
        print_usage(prog);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "render" => cmd_render(&args[2..]),
        "request" => cmd_request(&args[2..]),
        "preview" => cmd_preview(&args[2..]),
        "projections" => cmd_projections(&args[2..]),
        "help" | "--help" | "-h" => print_usage(prog),
        other => {
            eprintln!("error: unknown command: {}", other);
            eprintln!();
            print_usage(prog);
            std::process::exit(1);
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("geoshape - boundary topology to editable vector shapes");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} render <world.json|dir> [options]", prog);
    eprintln!("  {} request <world.json|dir> [options]", prog);
    eprintln!("  {} preview <world.json|dir> -o <file.png> [--scale <n>] [options]", prog);
    eprintln!("  {} projections [--json]", prog);
    eprintln!();
    eprintln!("Selection:");
    eprintln!("  --continent <code|name|all>   AF, AN, AS, EU, NA, OC, SA");
    eprintln!("  --country <iso-numeric|all>   e.g. 250 (France), 840 (US)");
    eprintln!("  --state <fips|all>            US only, needs --us");
    eprintln!("  --county <fips|all>           US only, needs --us and --state");
    eprintln!("  --borders                     Keep country borders");
    eprintln!("  --state-borders               Keep US state borders");
    eprintln!("  --county-borders              Keep US county borders");
    eprintln!("  -p, --projection <name>       Projection (default: mercator)");
    eprintln!("  --graticule                   Also build the lat/lon grid");
    eprintln!();
    eprintln!("Data and state:");
    eprintln!("  --us <file>                   US states/counties topology");
    eprintln!("  -r, --resolution <res>        110m, 50m, 10m (picks the file in a directory)");
    eprintln!("  --config <file>               Pipeline config JSON");
    eprintln!("  --state-file <file>           Restore and save the last selection");
    eprintln!();
    eprintln!("Document:");
    eprintln!("  --width <n> --height <n>      Document size (default: 800x600)");
    eprintln!("  --background <hex>            Document background (default: #ffffff)");
    eprintln!("  --fill <hex> --stroke <hex>   Shape colours (fill defaults by contrast)");
    eprintln!("  --size <n>                    Projection target box (default: 302)");
    eprintln!("  --margin <f>                  Fit margin in (0, 1] (default: 0.8)");
    eprintln!("  --stroke-width <n>            Apparent stroke width (default: 1)");
    eprintln!("  --precision <n>               Path decimal digits (default: 3)");
    eprintln!();
    eprintln!("Output:");
    eprintln!("  -o, --output <file>           Output file (- for stdout, default: stdout)");
    eprintln!("  -f, --format <fmt>            svg or json (render only, default: svg)");
    eprintln!();
    eprintln!("Logging: set RUST_LOG (e.g. RUST_LOG=geoshape=debug).");
}

fn cmd_projections(args: &[String]) {
    if args.iter().any(|a| a == "--json") {
        let rows: Vec<serde_json::Value> = Projection::all()
            .iter()
            .map(|p| {
                let info = p.info();
                serde_json::json!({
                    "name": info.name,
                    "label": info.label,
                    "d3": info.d3_name,
                    "family": info.family.name(),
                })
            })
            .collect();
        match serde_json::to_string_pretty(&rows) {
            Ok(json) => println!("{}", json),
            Err(e) => cli::common::fail(e),
        }
        return;
    }

    println!("Available projections:");
    for projection in Projection::all() {
        let info = projection.info();
        println!("  {:<24} {:<24} {}", info.name, info.label, info.family.name());
    }
}
