use thiserror::Error;

/// Settings that cannot produce a sensible layout. Raised before any
/// rendering starts.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{field} must be a finite number greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be a finite, non-negative number (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must not be empty")]
    EmptyColor { field: &'static str },

    #[error("Unknown page preset '{name}'. Available: {available}")]
    UnknownPreset { name: String, available: String },

    #[error("Failed to parse settings: {0}")]
    Parse(String),
}

/// Malformed session or unit data, rejected at the input boundary.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("row {row}, unit {index} ('{id}'): size must be a finite number greater than zero (got {size})")]
    InvalidSize {
        row: usize,
        index: usize,
        id: String,
        size: f64,
    },

    #[error("row {row}, unit {index} ('{id}'): sidebar width must be finite and non-negative (got {width})")]
    InvalidSidebar {
        row: usize,
        index: usize,
        id: String,
        width: f64,
    },

    #[error("row {row}, unit {index} ('{id}'): font size must be a finite number greater than zero (got {size})")]
    InvalidFontSize {
        row: usize,
        index: usize,
        id: String,
        size: f64,
    },

    #[error("Failed to parse input: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Failures while writing a rendered document to disk.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Output file has no extension")]
    MissingExtension,

    #[error("Unsupported output format: .{0} (use .svg, .png or .pdf)")]
    UnsupportedFormat(String),

    #[error("Invalid --png-scale value: {0}")]
    InvalidScale(f32),

    #[error("Failed to parse SVG: {0}")]
    Parse(String),

    #[error("Failed to create a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("Failed to encode PNG: {0}")]
    Encode(String),

    #[error("Failed to convert SVG to PDF: {0}")]
    Pdf(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
