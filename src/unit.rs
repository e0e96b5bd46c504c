use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::settings::GlobalSettings;

pub const MAX_SIZE: f64 = 18.0;

const DESCRIPTION_COLOR: &str = "#000000";
const DESCRIPTION_FONT_SIZE: f64 = 15.0;
const SIDEBAR_COLOR: &str = "#009e4d";
const SIDEBAR_WIDTH: f64 = 1.0;
const BOTTOM_COLOR: &str = "#f0f0f0";

/// One breaker or module on the panel.
///
/// `size` counts module widths; a size 2 unit is twice as wide as a
/// size 1 unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default = "default_size")]
    pub size: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_description_color")]
    pub description_color: String,
    #[serde(default = "default_description_font_size")]
    pub description_font_size: f64,
    /// Built-in icon name or custom icon id.
    #[serde(default)]
    pub logo: Option<String>,
    /// Inline `data:` URI carrying a custom icon.
    #[serde(default, rename = "logoData", alias = "logo_data")]
    pub logo_data: Option<String>,
    #[serde(default = "default_sidebar_color")]
    pub sidebar_color: String,
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width: f64,
    #[serde(default = "default_bottom_color")]
    pub bottom_color: String,
}

pub type Row = Vec<Unit>;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}
fn default_size() -> f64 {
    1.0
}
fn default_description_color() -> String {
    DESCRIPTION_COLOR.to_string()
}
fn default_description_font_size() -> f64 {
    DESCRIPTION_FONT_SIZE
}
fn default_sidebar_color() -> String {
    SIDEBAR_COLOR.to_string()
}
fn default_sidebar_width() -> f64 {
    SIDEBAR_WIDTH
}
fn default_bottom_color() -> String {
    BOTTOM_COLOR.to_string()
}

impl Default for Unit {
    fn default() -> Self {
        Self {
            id: new_id(),
            size: default_size(),
            description: String::new(),
            description_color: default_description_color(),
            description_font_size: DESCRIPTION_FONT_SIZE,
            logo: None,
            logo_data: None,
            sidebar_color: default_sidebar_color(),
            sidebar_width: SIDEBAR_WIDTH,
            bottom_color: default_bottom_color(),
        }
    }
}

impl Unit {
    pub fn with_size(size: f64) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    /// Copy of this unit under a fresh id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_id(),
            ..self.clone()
        }
    }

    /// Rendered width in millimeters.
    pub fn width(&self, settings: &GlobalSettings) -> f64 {
        settings.unit_width_for(self.size)
    }

    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

/// Snaps a requested size to the editor grid: whole modules, or half
/// modules when `allow_half` is set, between one step and [`MAX_SIZE`].
pub fn clamp_size(size: f64, allow_half: bool) -> f64 {
    let step = if allow_half { 0.5 } else { 1.0 };
    if !size.is_finite() {
        return step;
    }

    let snapped = (size / step).round() * step;
    snapped.clamp(step, MAX_SIZE)
}
