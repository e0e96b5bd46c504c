mod normalize;
mod resolve;
mod transform;

use thiserror::Error;

use crate::unit::Unit;

pub use normalize::normalize;
pub use resolve::{
    CachedResolver, DirectoryResolver, IconResolver, MemoryResolver, decode_data_uri,
};
pub use transform::{DEFAULT_EXTENT, Extent, IconFit, ParsedIcon, place_icon};

/// Icons shipped with the application, by file stem.
pub const BUILTIN_ICONS: &[&str] = &[
    "air-conditioner",
    "boiler",
    "car-charger",
    "circuit-breaker",
    "differential-switch",
    "dishwasher",
    "doorbell",
    "dryer",
    "freezer",
    "fridge",
    "hood",
    "impulse-relay",
    "intercom",
    "lighting",
    "lightning-protection",
    "microwave",
    "modular-switch",
    "off-peak-contactor",
    "oven",
    "radiator",
    "shutters",
    "socket-plug",
    "stove",
    "ventilation",
    "washing-machine",
    "water-heater",
];

#[derive(Debug, Error)]
pub enum IconError {
    #[error("invalid icon name '{0}'")]
    InvalidName(String),

    #[error("icon '{0}' not found")]
    NotFound(String),

    #[error("failed to read icon '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data URI")]
    InvalidDataUri,

    #[error("failed to decode base64 icon data: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("icon data is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("malformed icon markup: {0}")]
    Markup(String),

    #[error("icon markup has no <svg> root element")]
    MissingRoot,

    #[error("invalid viewBox '{0}'")]
    InvalidViewBox(String),
}

/// What a unit points at for its icon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IconRef {
    /// Built-in or stored icon, looked up by name.
    Named(String),
    /// Custom icon carried inline as a `data:` URI.
    Embedded { name: String, data_uri: String },
}

impl IconRef {
    /// Inline data wins over the name, which for custom icons is only an id.
    pub fn from_unit(unit: &Unit) -> Option<Self> {
        let name = unit.logo.as_deref().map(str::trim).unwrap_or_default();
        let data = unit
            .logo_data
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        match data {
            Some(data_uri) => Some(IconRef::Embedded {
                name: name.to_string(),
                data_uri: data_uri.to_string(),
            }),
            None if !name.is_empty() => Some(IconRef::Named(name.to_string())),
            None => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            IconRef::Named(name) => name,
            IconRef::Embedded { name, .. } => name,
        }
    }
}

pub fn is_builtin(name: &str) -> bool {
    BUILTIN_ICONS.contains(&name)
}

/// File stem for a stored custom icon: lowercase, anything outside
/// `[a-z0-9-]` becomes `-`, runs collapse, no leading or trailing dash.
pub fn sanitize_icon_name(name: &str) -> Result<String, IconError> {
    let mut sanitized = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '-'
        };
        if c == '-' && sanitized.ends_with('-') {
            continue;
        }
        sanitized.push(c);
    }

    let trimmed = sanitized.trim_matches('-');
    if trimmed.is_empty() {
        return Err(IconError::InvalidName(name.to_string()));
    }
    Ok(trimmed.to_string())
}
