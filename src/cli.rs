use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::settings::GlobalSettings;

/// Logs to stderr. `RUST_LOG` overrides the default `panelabel=info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", env!("CARGO_PKG_NAME"))));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Reads a file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String, String> {
    if path.to_str() == Some("-") {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read input file {}: {}", path.display(), e))
    }
}

/// Settings for a run: the settings file wins over settings embedded in
/// the input, which win over defaults. A page preset then replaces the
/// page size.
pub fn load_settings(
    settings_path: Option<&Path>,
    page: Option<&str>,
    embedded: Option<GlobalSettings>,
) -> Result<GlobalSettings, String> {
    let mut settings = match settings_path {
        Some(path) => {
            if !path.is_file() {
                return Err(format!("Settings file not found: {}", path.display()));
            }
            let content = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read settings file: {}", e))?;
            GlobalSettings::from_any(&content).map_err(|e| e.to_string())?
        }
        None => embedded.unwrap_or_default(),
    };

    if let Some(name) = page {
        settings.apply_preset(name).map_err(|e| e.to_string())?;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_file_overrides_embedded_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("labels.toml");
        std::fs::write(&path, "unit_height = 30.0\nborder_margin = 8.0\n").expect("write settings");

        let embedded = GlobalSettings {
            unit_height: 20.0,
            ..GlobalSettings::default()
        };
        let settings = load_settings(Some(&path), None, Some(embedded)).expect("settings");

        assert_eq!(settings.unit_height, 30.0);
        assert_eq!(settings.border_margin, 8.0);
        assert_eq!(settings.unit_width, 17.9);
    }

    #[test]
    fn embedded_settings_and_page_preset() {
        let embedded = GlobalSettings {
            unit_height: 20.0,
            ..GlobalSettings::default()
        };
        let settings = load_settings(None, Some("A4-Portrait"), Some(embedded)).expect("settings");

        assert_eq!(settings.unit_height, 20.0);
        assert_eq!((settings.page_width, settings.page_height), (210.0, 297.0));
    }

    #[test]
    fn missing_settings_file_and_unknown_preset_fail() {
        assert!(load_settings(Some(Path::new("/nonexistent/labels.toml")), None, None).is_err());

        let err = load_settings(None, Some("tabloid"), None).expect_err("unknown preset");
        assert!(err.contains("tabloid"));
    }
}
