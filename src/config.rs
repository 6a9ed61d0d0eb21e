use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::locate::MarkerRule;

/// Optional settings file. The hook works without one; the file exists so
/// new release-group markers can be taught without a rebuild.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Extra release-group markers, checked before the built-in table.
    #[serde(default)]
    pub markers: Vec<MarkerRule>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path();
        if config_path.exists() {
            let config_content = fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            let settings = toml::from_str(&config_content)
                .with_context(|| format!("failed to parse {}", config_path.display()))?;
            return Ok(settings);
        }
        Ok(Settings::default())
    }
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("sub-import"))
        // If the standard path could not be found (e.g. `$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}

fn get_config_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::Strategy;

    #[test]
    fn test_parse_marker_rules() {
        let settings: Settings = toml::from_str(
            r#"
            [[markers]]
            marker = "yts"
            strategy = "by-size"

            [[markers]]
            marker = "rarbg"
            strategy = "by-name"
            "#,
        )
        .unwrap();

        assert_eq!(settings.markers.len(), 2);
        assert_eq!(settings.markers[0].marker, "yts");
        assert_eq!(settings.markers[0].strategy, Strategy::BySize);
        assert_eq!(settings.markers[1].strategy, Strategy::ByName);
    }

    #[test]
    fn test_empty_settings() {
        let settings: Settings = toml::from_str("").unwrap();
        assert!(settings.markers.is_empty());
    }
}
