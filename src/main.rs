use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use panelabel::cli::{init_logging, load_settings, read_input};
use panelabel::export::write_output;
use panelabel::fonts::CosmicTextMeasure;
use panelabel::{CachedResolver, DirectoryResolver, GlobalSettings, Renderer, Session};
use std::path::PathBuf;
use tracing::info;

/// Icons kept in memory while rendering one sheet.
const ICON_CACHE_SIZE: usize = 64;

/// Electrical panel label sheets as SVG, PNG or PDF
#[derive(Parser, Debug)]
#[command(name = "panelabel")]
#[command(version)]
#[command(about = "Render electrical panel labels to print-ready SVG, PNG or PDF", long_about = None)]
struct Args {
    /// Session file exported by the label editor (use "-" for stdin)
    #[arg(value_name = "INPUT", required_unless_present_any = ["completions", "list_presets"])]
    input: Option<PathBuf>,

    /// Output file path (extension determines format: .svg, .png or .pdf)
    #[arg(short, long, value_name = "OUTPUT", required_unless_present_any = ["completions", "list_presets"])]
    output: Option<PathBuf>,

    /// Settings file (TOML, JSON or YAML); overrides settings in the session
    #[arg(short, long, value_name = "SETTINGS")]
    settings: Option<PathBuf>,

    /// Paper size preset, e.g. a4-landscape or letter-portrait
    #[arg(short, long, value_name = "PRESET")]
    page: Option<String>,

    /// Directory holding built-in icons as <name>.svg
    #[arg(long, value_name = "DIR", default_value = "icons")]
    icons: PathBuf,

    /// Embed icon markup exactly as stored
    #[arg(long)]
    no_normalize: bool,

    /// Raster scale multiplier for PNG output (e.g. 2.0 for sharper output)
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,

    /// Print the available paper size presets and exit
    #[arg(long)]
    list_presets: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL", value_enum)]
    completions: Option<Shell>,
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(
            shell,
            &mut Args::command(),
            "panelabel",
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    if args.list_presets {
        for preset in GlobalSettings::list_presets() {
            println!("{}", preset.replace('_', "-"));
        }
        return Ok(());
    }

    init_logging();

    let (Some(input), Some(output)) = (args.input.as_deref(), args.output.as_deref()) else {
        return Err("INPUT and --output are required".to_string());
    };

    let session = Session::from_json(&read_input(input)?)
        .map_err(|e| format!("Invalid session file: {}", e))?;
    session
        .validate()
        .map_err(|e| format!("Invalid session file: {}", e))?;

    let settings = load_settings(
        args.settings.as_deref(),
        args.page.as_deref(),
        session.global_settings.clone(),
    )?;

    let resolver = CachedResolver::new(DirectoryResolver::new(&args.icons), ICON_CACHE_SIZE);
    let mut renderer = Renderer::new(settings, resolver)
        .map_err(|e| format!("Invalid settings: {}", e))?
        .normalize_icons(!args.no_normalize)
        .with_measure(CosmicTextMeasure::new());

    let svg = renderer.render_document(&session.rows);

    let format = write_output(&svg, output, args.png_scale).map_err(|e| e.to_string())?;
    info!(
        path = %output.display(),
        format = ?format,
        units = session.unit_count(),
        "sheet saved"
    );

    Ok(())
}
