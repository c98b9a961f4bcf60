//! Common plumbing shared by the render-style commands: flag parsing, dataset
//! and config loading, and the on-disk selection store.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use geoshape::error::StoreError;
use geoshape::regions;
use geoshape::{
    render, Atlas, Bounds, Continent, PipelineConfig, Projection, RenderOutput, Resolution, Rgb,
    SavedSelection, Selection, SelectionStore, Topology,
};

/// Output format for render results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Svg,
    Json,
}

/// Print `error: ...` and exit with status 1.
pub fn fail(message: impl Display) -> ! {
    eprintln!("error: {}", message);
    std::process::exit(1);
}

/// Flags accepted by `render`, `request` and `preview`.
#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub world: Option<String>,
    pub us: Option<String>,
    pub config: Option<String>,
    pub state_file: Option<String>,
    pub output: Option<String>,
    pub format: OutputFormat,
    pub resolution: Option<Resolution>,
    pub continent: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
    pub country_borders: bool,
    pub state_borders: bool,
    pub county_borders: bool,
    pub projection: Option<Projection>,
    pub graticule: bool,
    pub background: Rgb,
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    pub width: f64,
    pub height: f64,
    pub target_size: Option<f64>,
    pub margin: Option<f64>,
    pub stroke_width: Option<f64>,
    pub precision: Option<usize>,
}

impl Default for RenderArgs {
    fn default() -> Self {
        Self {
            world: None,
            us: None,
            config: None,
            state_file: None,
            output: None,
            format: OutputFormat::Svg,
            resolution: None,
            continent: None,
            country: None,
            state: None,
            county: None,
            country_borders: false,
            state_borders: false,
            county_borders: false,
            projection: None,
            graticule: false,
            background: Rgb::WHITE,
            fill: None,
            stroke: None,
            width: 800.0,
            height: 600.0,
            target_size: None,
            margin: None,
            stroke_width: None,
            precision: None,
        }
    }
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i).map(String::as_str).ok_or_else(|| format!("{} needs a value", flag))
}

fn number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    let raw = value(args, i, flag)?;
    raw.parse().map_err(|_| format!("{}: '{}' is not a valid number", flag, raw))
}

fn color(args: &[String], i: usize, flag: &str) -> Result<Rgb, String> {
    let raw = value(args, i, flag)?;
    Rgb::from_hex(raw).ok_or_else(|| format!("{}: '{}' is not a hex colour", flag, raw))
}

/// Parse the flags of a render-style command.
pub fn parse_render_args(args: &[String]) -> Result<RenderArgs, String> {
    let mut parsed = RenderArgs::default();

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--us" => {
                i += 1;
                parsed.us = Some(value(args, i, flag)?.to_string());
            }
            "--config" => {
                i += 1;
                parsed.config = Some(value(args, i, flag)?.to_string());
            }
            "--state-file" => {
                i += 1;
                parsed.state_file = Some(value(args, i, flag)?.to_string());
            }
            "-o" | "--output" => {
                i += 1;
                parsed.output = Some(value(args, i, flag)?.to_string());
            }
            "-f" | "--format" => {
                i += 1;
                parsed.format = match value(args, i, flag)?.to_lowercase().as_str() {
                    "svg" => OutputFormat::Svg,
                    "json" => OutputFormat::Json,
                    other => return Err(format!("unknown format: {}. Use 'svg' or 'json'.", other)),
                };
            }
            "--json" => parsed.format = OutputFormat::Json,
            "-r" | "--resolution" => {
                i += 1;
                let raw = value(args, i, flag)?;
                parsed.resolution = Some(
                    Resolution::from_name(raw)
                        .ok_or_else(|| format!("unknown resolution: {}. Use 110m, 50m or 10m.", raw))?,
                );
            }
            "--continent" => {
                i += 1;
                parsed.continent = Some(value(args, i, flag)?.to_string());
            }
            "--country" => {
                i += 1;
                parsed.country = Some(value(args, i, flag)?.to_string());
            }
            "--state" => {
                i += 1;
                parsed.state = Some(value(args, i, flag)?.to_string());
            }
            "--county" => {
                i += 1;
                parsed.county = Some(value(args, i, flag)?.to_string());
            }
            "--borders" => parsed.country_borders = true,
            "--state-borders" => parsed.state_borders = true,
            "--county-borders" => parsed.county_borders = true,
            "-p" | "--projection" => {
                i += 1;
                let raw = value(args, i, flag)?;
                parsed.projection = Some(Projection::from_name(raw).ok_or_else(|| {
                    format!("unknown projection: {}. Run 'geoshape projections' for the list.", raw)
                })?);
            }
            "--graticule" => parsed.graticule = true,
            "--background" => {
                i += 1;
                parsed.background = color(args, i, flag)?;
            }
            "--fill" => {
                i += 1;
                parsed.fill = Some(color(args, i, flag)?);
            }
            "--stroke" => {
                i += 1;
                parsed.stroke = Some(color(args, i, flag)?);
            }
            "--width" => {
                i += 1;
                parsed.width = number(args, i, flag)?;
            }
            "--height" => {
                i += 1;
                parsed.height = number(args, i, flag)?;
            }
            "--size" => {
                i += 1;
                parsed.target_size = Some(number(args, i, flag)?);
            }
            "--margin" => {
                i += 1;
                parsed.margin = Some(number(args, i, flag)?);
            }
            "--stroke-width" => {
                i += 1;
                parsed.stroke_width = Some(number(args, i, flag)?);
            }
            "--precision" => {
                i += 1;
                parsed.precision = Some(number(args, i, flag)?);
            }
            other if other.starts_with('-') => return Err(format!("unknown option: {}", other)),
            other => {
                if parsed.world.is_some() {
                    return Err(format!("unexpected argument: {}", other));
                }
                parsed.world = Some(other.to_string());
            }
        }
        i += 1;
    }

    if !(parsed.width > 0.0 && parsed.height > 0.0) {
        return Err("document width and height must be positive".to_string());
    }
    Ok(parsed)
}

fn parse_continent(raw: &str) -> Result<Option<Continent>, String> {
    if raw.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    Continent::from_code(raw)
        .or_else(|| Continent::all().iter().copied().find(|c| c.name().eq_ignore_ascii_case(raw)))
        .map(Some)
        .ok_or_else(|| format!("unknown continent: {}", raw))
}

fn level(raw: &str) -> Option<&str> {
    if raw.eq_ignore_ascii_case("all") { None } else { Some(raw) }
}

/// Apply the command-line choices on top of a (possibly restored) selection.
pub fn build_selection(args: &RenderArgs, base: Selection) -> Result<Selection, String> {
    let mut selection = base;

    if let Some(raw) = &args.continent {
        selection.set_continent(parse_continent(raw)?);
    }
    if let Some(raw) = &args.country {
        // A country is picked from inside its continent, as the panel does.
        if let (None, Some(code)) = (selection.continent(), level(raw)) {
            selection.set_continent(Some(regions::continent_of(code)));
        }
        if !selection.set_country(level(raw)) {
            let continent = selection.continent().map_or("all", |c| c.name());
            return Err(format!("country {} is not in {}", raw, continent));
        }
    }
    if let Some(raw) = &args.state {
        if !selection.set_state(level(raw)) {
            return Err(format!("state {} needs --country 840", raw));
        }
    }
    if let Some(raw) = &args.county {
        if !selection.set_county(level(raw)) {
            return Err(format!("county {} is not in the chosen state", raw));
        }
    }

    selection.include_country_borders |= args.country_borders;
    selection.include_state_borders |= args.state_borders;
    selection.include_county_borders |= args.county_borders;
    if let Some(projection) = args.projection {
        selection.projection = projection;
    }
    selection.graticule |= args.graticule;
    Ok(selection)
}

/// Load `--config` (if any) and apply flag overrides.
pub fn load_config(args: &RenderArgs) -> Result<PipelineConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path, e))?;
            PipelineConfig::from_json(&json).map_err(|e| format!("invalid config {}: {}", path, e))?
        }
        None => PipelineConfig::default(),
    };
    if let Some(size) = args.target_size {
        config = config.with_target_size(size);
    }
    if let Some(margin) = args.margin {
        config = config.with_fit_margin(margin);
    }
    if let Some(width) = args.stroke_width {
        config = config.with_stroke_width(width);
    }
    if let Some(digits) = args.precision {
        config = config.with_precision(digits);
    }
    Ok(config)
}

fn load_topology(path: &Path) -> Result<Topology, String> {
    let json = fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    Topology::from_json(&json).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Resolve the world dataset path. A directory means "the file for this
/// resolution inside it".
pub fn world_path(world: &str, resolution: Resolution) -> PathBuf {
    let path = PathBuf::from(world);
    if path.is_dir() {
        path.join(resolution.world_file())
    } else {
        path
    }
}

/// Load the world topology and, when given, the US one.
pub fn load_atlas(args: &RenderArgs, resolution: Resolution) -> Result<Atlas, String> {
    let world = args
        .world
        .as_deref()
        .ok_or_else(|| "missing world topology file".to_string())?;
    let path = world_path(world, resolution);
    debug!(path = %path.display(), "loading world topology");
    let mut atlas = Atlas::new(load_topology(&path)?);
    if let Some(us) = &args.us {
        atlas = atlas.with_us(load_topology(Path::new(us))?);
    }
    Ok(atlas)
}

// ============================================================================
// FILE STORE
// ============================================================================

/// Selection store backed by one JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(&self.path)?;
        if json.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&json)?)
    }
}

impl SelectionStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries()?.remove(key))
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        let mut entries = self.entries()?;
        entries.insert(key.to_string(), blob.to_string());
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}

// ============================================================================
// RUN
// ============================================================================

/// A finished render plus what it was rendered from.
pub struct Session {
    pub selection: Selection,
    pub config: PipelineConfig,
    pub output: RenderOutput,
}

/// Document the CLI materializes into.
pub fn viewport(args: &RenderArgs) -> Bounds {
    Bounds::from_rect(0.0, 0.0, args.width, args.height)
}

/// Restore the saved selection, apply flags, render, and save the selection
/// back.
pub fn run_pipeline(args: &RenderArgs) -> Result<Session, String> {
    let mut store = args.state_file.as_deref().map(FileStore::new);

    let saved = match &store {
        Some(s) => SavedSelection::load(s).map_err(|e| e.to_string())?,
        None => None,
    };
    let resolution = args
        .resolution
        .or_else(|| saved.as_ref().map(|s| s.resolution))
        .unwrap_or_default();
    let base = saved.as_ref().map(SavedSelection::restore).unwrap_or_default();

    let selection = build_selection(args, base)?;
    let config = load_config(args)?;
    let atlas = load_atlas(args, resolution)?;

    let output = render(&selection, &atlas, &config).map_err(|e| e.to_string())?;

    if let Some(store) = store.as_mut() {
        SavedSelection::capture(&selection, resolution)
            .save(store)
            .map_err(|e| e.to_string())?;
        info!(resolution = resolution.name(), "saved selection");
    }

    Ok(Session { selection, config, output })
}

/// Write to `-o <file>`, or stdout for none or `-`.
pub fn write_output(output: Option<&str>, contents: &str) -> Result<(), String> {
    match output {
        Some(path) if path != "-" => {
            fs::write(path, contents).map_err(|e| format!("failed to write {}: {}", path, e))?;
            eprintln!("Wrote: {}", path);
            Ok(())
        }
        _ => {
            print!("{}", contents);
            Ok(())
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
