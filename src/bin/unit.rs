use clap::Parser;
use panelabel::cli::{init_logging, load_settings, read_input};
use panelabel::export::write_output;
use panelabel::session::validate_unit;
use panelabel::{DirectoryResolver, Renderer, Unit};
use std::path::PathBuf;
use tracing::info;

/// Preview of a single label unit (SVG/PNG/PDF)
#[derive(Parser, Debug)]
#[command(name = "panelabel-unit")]
#[command(version)]
#[command(about = "Render one panel label unit with cut marks", long_about = None)]
struct Args {
    /// Unit as JSON (use "-" for stdin)
    #[arg(value_name = "UNIT")]
    input: PathBuf,

    /// Output file path (extension determines format: .svg, .png or .pdf)
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Settings file (TOML, JSON or YAML)
    #[arg(short, long, value_name = "SETTINGS")]
    settings: Option<PathBuf>,

    /// Paper size preset; only matters for settings validation
    #[arg(short, long, value_name = "PRESET")]
    page: Option<String>,

    /// Directory holding built-in icons as <name>.svg
    #[arg(long, value_name = "DIR", default_value = "icons")]
    icons: PathBuf,

    /// Embed icon markup exactly as stored
    #[arg(long)]
    no_normalize: bool,

    /// Raster scale multiplier for PNG output
    #[arg(long, default_value_t = 4.0)]
    png_scale: f32,
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    init_logging();

    let unit: Unit = serde_json::from_str(&read_input(&args.input)?)
        .map_err(|e| format!("Invalid unit file: {}", e))?;
    validate_unit(&unit, 0, 0).map_err(|e| format!("Invalid unit file: {}", e))?;

    let settings = load_settings(args.settings.as_deref(), args.page.as_deref(), None)?;
    let mut renderer = Renderer::new(settings, DirectoryResolver::new(&args.icons))
        .map_err(|e| format!("Invalid settings: {}", e))?
        .normalize_icons(!args.no_normalize);

    let svg = renderer.render_unit(&unit);

    let format = write_output(&svg, &args.output, args.png_scale).map_err(|e| e.to_string())?;
    info!(
        path = %args.output.display(),
        format = ?format,
        unit = %unit.id,
        "unit preview saved"
    );

    Ok(())
}
