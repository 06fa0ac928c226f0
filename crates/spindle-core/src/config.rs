use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::mapper::Zones;
use super::platform;
use super::scroll::ScrollConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub zones: Zones,
    #[serde(default)]
    pub debounce: DebounceConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Quiet period (ms) after the last scroll before the record plays.
    #[serde(default = "default_idle_ms")]
    pub idle_ms: u64,
}

impl DebounceConfig {
    pub fn idle_window(&self) -> Duration {
        Duration::from_millis(self.idle_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Animation frame rate while something is moving.
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_show_keys_bar")]
    pub show_keys_bar: bool,
    /// Film grain over the backdrop.
    #[serde(default = "default_grain")]
    pub grain: bool,
}

/// Where the track list comes from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// TOML file with `[[tracks]]` entries.  Unset = built-in record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            idle_ms: default_idle_ms(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            show_keys_bar: default_show_keys_bar(),
            grain: default_grain(),
        }
    }
}

fn default_idle_ms() -> u64 {
    500
}

fn default_fps() -> u32 {
    30
}

fn default_show_keys_bar() -> bool {
    true
}

fn default_grain() -> bool {
    true
}

impl Config {
    /// Load the user config, writing the defaults out on first run.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }

    /// Frame interval for the animation tick.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.ui.fps.clamp(1, 120)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.zones.hero_threshold, 0.1);
        assert_eq!(config.zones.track_zone_start, 0.15);
        assert_eq!(config.debounce.idle_window(), Duration::from_millis(500));
        assert_eq!(config.scroll.screens, 12);
        assert!(config.catalog.path.is_none());
        assert_eq!(config.frame_interval(), Duration::from_millis(33));
        assert!(Config::config_path().ends_with("spindle/config.toml"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [debounce]
            idle_ms = 250

            [catalog]
            path = "/tmp/lp.toml"
            "#,
        )
        .unwrap();
        assert_eq!(config.debounce.idle_ms, 250);
        assert_eq!(config.catalog.path, Some(PathBuf::from("/tmp/lp.toml")));
        assert_eq!(config.ui.fps, 30);
        assert_eq!(config.zones.track_zone_start, 0.15);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.ui.grain = false;
        config.scroll.wheel_step = 4;
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert!(!back.ui.grain);
        assert_eq!(back.scroll.wheel_step, 4);
    }
}
