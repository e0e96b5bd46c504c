use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::settings::GlobalSettings;
use crate::unit::{Row, Unit};

/// A saved label sheet as exported by the editor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default, rename = "globalSettings", alias = "global_settings")]
    pub global_settings: Option<GlobalSettings>,
}

impl Session {
    pub fn from_json(content: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn unit_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Checks every unit and the embedded settings, if any.
    pub fn validate(&self) -> Result<(), InputError> {
        for (row, units) in self.rows.iter().enumerate() {
            for (index, unit) in units.iter().enumerate() {
                validate_unit(unit, row, index)?;
            }
        }

        if let Some(settings) = &self.global_settings {
            settings.validate()?;
        }

        Ok(())
    }
}

/// Shape checks for a unit coming from outside the process. The
/// renderer itself never rejects a unit.
pub fn validate_unit(unit: &Unit, row: usize, index: usize) -> Result<(), InputError> {
    if !unit.size.is_finite() || unit.size <= 0.0 {
        return Err(InputError::InvalidSize {
            row,
            index,
            id: unit.id.clone(),
            size: unit.size,
        });
    }

    if !unit.sidebar_width.is_finite() || unit.sidebar_width < 0.0 {
        return Err(InputError::InvalidSidebar {
            row,
            index,
            id: unit.id.clone(),
            width: unit.sidebar_width,
        });
    }

    if !unit.description_font_size.is_finite() || unit.description_font_size <= 0.0 {
        return Err(InputError::InvalidFontSize {
            row,
            index,
            id: unit.id.clone(),
            size: unit.description_font_size,
        });
    }

    Ok(())
}
