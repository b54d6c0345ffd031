use arcstep::days::LeaveDays;
use arcstep::reveal::RevealTiming;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::Srgb;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An `#rrggbb` (or `#rgb`) color from the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub struct HexColor(pub Srgb<u8>);

impl HexColor {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }
}

impl FromStr for HexColor {
    type Err = palette::rgb::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Srgb::<u8>::from_str(s.trim()).map(Self)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.0.into_components();
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ColorConfig {
    pub arc_start: HexColor,
    pub arc_end: HexColor,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            arc_start: HexColor::rgb(0x03, 0x46, 0xaa),
            arc_end: HexColor::rgb(0x93, 0xc5, 0xfd),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub total_days: u32,
    pub days_left: u32,
    pub timing: RevealTiming,
    pub colors: ColorConfig,
}

impl Default for Config {
    fn default() -> Self {
        let days = LeaveDays::default();
        Self {
            total_days: days.total(),
            days_left: days.left(),
            timing: RevealTiming::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl Config {
    pub fn leave_days(&self) -> LeaveDays {
        LeaveDays::new(self.total_days, self.days_left)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "sickleave", "sickleave").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("SICKLEAVE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_deserialization() {
        let cases = vec![
            ("\"#0346aa\"", HexColor::rgb(0x03, 0x46, 0xaa)),
            ("\"#93C5FD\"", HexColor::rgb(0x93, 0xc5, 0xfd)),
            ("\"93c5fd\"", HexColor::rgb(0x93, 0xc5, 0xfd)),
            ("\"#fff\"", HexColor::rgb(0xff, 0xff, 0xff)),
        ];

        for (json, expected) in cases {
            let deserialized: HexColor = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_hex_color_rejects_garbage() {
        assert!(serde_json::from_str::<HexColor>("\"#12345\"").is_err());
        assert!(serde_json::from_str::<HexColor>("\"blue\"").is_err());
    }

    #[test]
    fn test_hex_color_serializes_lowercase() {
        let json = serde_json::to_string(&HexColor::rgb(0x03, 0x46, 0xAA)).unwrap();
        assert_eq!(json, "\"#0346aa\"");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"total_days": 10, "timing": {"stagger_ms": 80}}"#).unwrap();
        assert_eq!(config.total_days, 10);
        assert_eq!(config.days_left, 3);
        assert_eq!(config.timing.stagger_ms, 80);
        assert_eq!(config.timing.first_reveal_ms, 600);
        assert_eq!(config.colors, ColorConfig::default());
    }

    #[test]
    fn test_default_config_file_matches_defaults() {
        let parsed = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize::<Config>()
            .unwrap();
        let defaults = Config::default();

        assert_eq!(parsed.leave_days(), defaults.leave_days());
        assert_eq!(parsed.timing, defaults.timing);
        assert_eq!(parsed.colors, defaults.colors);
    }

    #[test]
    fn test_leave_days_are_sanitized() {
        let config = Config {
            total_days: 2,
            days_left: 9,
            ..Config::default()
        };
        assert_eq!(config.leave_days(), LeaveDays::new(2, 2));
    }
}
