use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

const UNIT_HEIGHT: f64 = 27.0;
const UNIT_WIDTH: f64 = 17.9;
const PAGE_WIDTH: f64 = 297.0;
const PAGE_HEIGHT: f64 = 209.0;
const BORDER_MARGIN: f64 = 10.0;
const CROSS_SIZE: f64 = 5.0;
const TOP_COLOR: &str = "#ffffff";

/// Paper sizes as (width, height) in millimeters.
const PAGE_PRESETS: &[(&str, (f64, f64))] = &[
    ("a4_landscape", (PAGE_WIDTH, PAGE_HEIGHT)),
    ("a4_portrait", (210.0, 297.0)),
    ("a3_landscape", (420.0, 297.0)),
    ("letter_landscape", (279.4, 215.9)),
    ("letter_portrait", (215.9, 279.4)),
];

/// Dimensions shared by every unit and page of a sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(alias = "UNIT_HEIGHT", default = "default_unit_height")]
    pub unit_height: f64,
    #[serde(alias = "UNIT_WIDTH", default = "default_unit_width")]
    pub unit_width: f64,
    #[serde(alias = "PAGE_WIDTH", default = "default_page_width")]
    pub page_width: f64,
    #[serde(alias = "PAGE_HEIGHT", default = "default_page_height")]
    pub page_height: f64,
    #[serde(alias = "BORDER_MARGIN", default = "default_border_margin")]
    pub border_margin: f64,
    #[serde(alias = "CROSS_SIZE", default = "default_cross_size")]
    pub cross_size: f64,
    #[serde(alias = "TOP_COLOR", default = "default_top_color")]
    pub top_color: String,
}

fn default_unit_height() -> f64 {
    UNIT_HEIGHT
}
fn default_unit_width() -> f64 {
    UNIT_WIDTH
}
fn default_page_width() -> f64 {
    PAGE_WIDTH
}
fn default_page_height() -> f64 {
    PAGE_HEIGHT
}
fn default_border_margin() -> f64 {
    BORDER_MARGIN
}
fn default_cross_size() -> f64 {
    CROSS_SIZE
}
fn default_top_color() -> String {
    TOP_COLOR.to_string()
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            unit_height: UNIT_HEIGHT,
            unit_width: UNIT_WIDTH,
            page_width: PAGE_WIDTH,
            page_height: PAGE_HEIGHT,
            border_margin: BORDER_MARGIN,
            cross_size: CROSS_SIZE,
            top_color: TOP_COLOR.to_string(),
        }
    }
}

impl GlobalSettings {
    /// Default settings on one of the built-in paper sizes.
    pub fn from_preset(name: &str) -> Result<Self, SettingsError> {
        let mut settings = Self::default();
        settings.apply_preset(name)?;
        Ok(settings)
    }

    /// Replaces the page size with a built-in paper size, keeping every
    /// other field.
    pub fn apply_preset(&mut self, name: &str) -> Result<(), SettingsError> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        let (width, height) = PAGE_PRESETS
            .iter()
            .find(|(n, _)| *n == normalized)
            .map(|(_, size)| *size)
            .ok_or_else(|| SettingsError::UnknownPreset {
                name: name.to_string(),
                available: Self::list_presets().join(", "),
            })?;

        self.page_width = width;
        self.page_height = height;
        Ok(())
    }

    pub fn list_presets() -> Vec<&'static str> {
        PAGE_PRESETS.iter().map(|(n, _)| *n).collect()
    }

    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        toml::from_str(content)
            .map_err(|e| SettingsError::Parse(format!("Failed to parse settings TOML: {}", e)))
    }

    pub fn from_yaml(content: &str) -> Result<Self, SettingsError> {
        serde_yaml::from_str(content)
            .map_err(|e| SettingsError::Parse(format!("Failed to parse settings YAML: {}", e)))
    }

    pub fn from_json(content: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(content)
            .map_err(|e| SettingsError::Parse(format!("Failed to parse settings JSON: {}", e)))
    }

    /// Tries TOML, then JSON, then YAML.
    pub fn from_any(content: &str) -> Result<Self, SettingsError> {
        if let Ok(settings) = Self::from_toml(content) {
            return Ok(settings);
        }
        if let Ok(settings) = Self::from_json(content) {
            return Ok(settings);
        }
        // YAML last: it also accepts most JSON and would mask better errors
        Self::from_yaml(content).map_err(|_| {
            SettingsError::Parse("Failed to parse settings as TOML, JSON or YAML".to_string())
        })
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("unit_height", self.unit_height),
            ("unit_width", self.unit_width),
            ("page_width", self.page_width),
            ("page_height", self.page_height),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("border_margin", self.border_margin),
            ("cross_size", self.cross_size),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::Negative { field, value });
            }
        }

        if self.top_color.trim().is_empty() {
            return Err(SettingsError::EmptyColor { field: "top_color" });
        }

        Ok(())
    }

    /// Width of a unit of the given size.
    pub fn unit_width_for(&self, size: f64) -> f64 {
        self.unit_width * size
    }

    /// Room left for units on one line, between the two side margins.
    pub fn printable_width(&self) -> f64 {
        self.page_width - self.border_margin * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::GlobalSettings;
    use crate::error::SettingsError;

    #[test]
    fn preset_names_accept_hyphens_and_case() {
        let underscore = GlobalSettings::from_preset("a4_portrait").expect("underscore variant");
        let hyphen = GlobalSettings::from_preset("A4-Portrait").expect("hyphen variant");

        assert_eq!(underscore, hyphen);
        assert_eq!(hyphen.page_width, 210.0);
        assert_eq!(hyphen.page_height, 297.0);
    }

    #[test]
    fn unknown_preset_lists_alternatives() {
        let err = GlobalSettings::from_preset("tabloid").unwrap_err();
        assert!(matches!(err, SettingsError::UnknownPreset { .. }));
        assert!(err.to_string().contains("a4_landscape"));
    }

    #[test]
    fn json_accepts_original_key_names() {
        let json = r##"{"UNIT_HEIGHT": 30, "UNIT_WIDTH": 18, "PAGE_WIDTH": 297,
            "PAGE_HEIGHT": 210, "BORDER_MARGIN": 8, "CROSS_SIZE": 4, "TOP_COLOR": "#eeeeee"}"##;
        let settings = GlobalSettings::from_json(json).expect("json settings");

        assert_eq!(settings.unit_height, 30.0);
        assert_eq!(settings.unit_width, 18.0);
        assert_eq!(settings.page_height, 210.0);
        assert_eq!(settings.border_margin, 8.0);
        assert_eq!(settings.top_color, "#eeeeee");
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let settings = GlobalSettings::from_any("unit_height = 40\n").expect("toml settings");

        assert_eq!(settings.unit_height, 40.0);
        assert_eq!(settings.unit_width, 17.9);
        assert_eq!(settings.top_color, "#ffffff");
    }

    #[test]
    fn yaml_is_accepted() {
        let settings =
            GlobalSettings::from_any("page_width: 420\npage_height: 297\n").expect("yaml");
        assert_eq!(settings.page_width, 420.0);
    }

    #[test]
    fn rejects_impossible_dimensions() {
        let mut settings = GlobalSettings::default();
        settings.page_height = 0.0;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::NotPositive {
                field: "page_height",
                ..
            })
        ));

        let mut settings = GlobalSettings::default();
        settings.border_margin = -1.0;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Negative {
                field: "border_margin",
                ..
            })
        ));

        let mut settings = GlobalSettings::default();
        settings.unit_width = f64::NAN;
        assert!(settings.validate().is_err());

        assert!(GlobalSettings::default().validate().is_ok());
    }
}
