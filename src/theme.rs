//! Droptable - Light/dark display preference
//!
//! The chosen mode is stored as JSON in `<config dir>/droptable/preferences.json`.
//! When nothing is stored the default follows the terminal background, as
//! reported by `COLORFGBG`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Two-valued display preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggle(&mut self) {
        *self = match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        };
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThemeMode::Light => "LIGHT",
            ThemeMode::Dark => "DARK",
        }
    }

    /// Guess from a `COLORFGBG` value such as `15;0`: the last field is the
    /// background palette index, 7 and 15 being the light greys.
    pub fn from_colorfgbg(value: Option<&str>) -> Self {
        let background = value
            .and_then(|v| v.rsplit(';').next())
            .and_then(|bg| bg.trim().parse::<u8>().ok());

        match background {
            Some(7) | Some(15) => ThemeMode::Light,
            _ => ThemeMode::Dark,
        }
    }

    /// Mode suggested by the terminal environment
    pub fn system_default() -> Self {
        Self::from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
    }

    pub fn palette(&self) -> Palette {
        match self {
            ThemeMode::Dark => Palette::dark(),
            ThemeMode::Light => Palette::light(),
        }
    }
}

impl std::str::FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown theme '{}' (expected light or dark)", other)),
        }
    }
}

/// Colors for the UI
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub error: Color,
    pub warning: Color,
    pub border: Color,
    pub highlight: Color,
    pub muted: Color,
    pub selected: Color,
}

impl Palette {
    /// Dracula-inspired dark palette
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(40, 42, 54),
            fg: Color::Rgb(248, 248, 242),
            accent: Color::Rgb(139, 233, 253),
            error: Color::Rgb(255, 85, 85),
            warning: Color::Rgb(255, 184, 108),
            border: Color::Rgb(98, 114, 164),
            highlight: Color::Rgb(68, 71, 90),
            muted: Color::Rgb(98, 114, 164),
            selected: Color::Rgb(80, 250, 123),
        }
    }

    /// Solarized-light palette
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(253, 246, 227),
            fg: Color::Rgb(88, 110, 117),
            accent: Color::Rgb(38, 139, 210),
            error: Color::Rgb(220, 50, 47),
            warning: Color::Rgb(181, 137, 0),
            border: Color::Rgb(147, 161, 161),
            highlight: Color::Rgb(238, 232, 213),
            muted: Color::Rgb(147, 161, 161),
            selected: Color::Rgb(133, 153, 0),
        }
    }
}

/// Persisted user preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeMode>,
}

impl Preferences {
    /// Default location of the preferences file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("droptable").join("preferences.json"))
    }

    /// Read preferences; a missing or unreadable file means nothing stored.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!("Ignoring malformed preferences {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                debug!("No preferences at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Stored mode, or the system default when nothing is stored
    pub fn theme_or_default(&self) -> ThemeMode {
        self.theme.unwrap_or_else(ThemeMode::system_default)
    }
}

/// Theme mode plus where to persist changes to it.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    pub mode: ThemeMode,
    path: Option<PathBuf>,
}

impl ThemeStore {
    /// Resolve the mode from stored preferences at `path`.
    pub fn open(path: Option<PathBuf>) -> Self {
        let mode = path
            .as_deref()
            .map(Preferences::load)
            .unwrap_or_default()
            .theme_or_default();
        Self { mode, path }
    }

    /// Session-only mode that is never written back
    pub fn ephemeral(mode: ThemeMode) -> Self {
        Self { mode, path: None }
    }

    /// Flip the mode and persist it. Save failures are logged only.
    pub fn toggle(&mut self) {
        self.mode.toggle();
        if let Some(ref path) = self.path {
            let prefs = Preferences {
                theme: Some(self.mode),
            };
            if let Err(e) = prefs.save(path) {
                warn!("Could not save theme preference: {:#}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_colorfgbg() {
        assert_eq!(ThemeMode::from_colorfgbg(Some("0;15")), ThemeMode::Light);
        assert_eq!(ThemeMode::from_colorfgbg(Some("0;default;7")), ThemeMode::Light);
        assert_eq!(ThemeMode::from_colorfgbg(Some("15;0")), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_colorfgbg(Some("garbage")), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_colorfgbg(None), ThemeMode::Dark);
    }

    #[test]
    fn test_toggle() {
        let mut mode = ThemeMode::Dark;
        mode.toggle();
        assert_eq!(mode, ThemeMode::Light);
        mode.toggle();
        assert_eq!(mode, ThemeMode::Dark);
    }

    #[test]
    fn test_preferences_round_trip() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested").join("preferences.json");

        let prefs = Preferences {
            theme: Some(ThemeMode::Light),
        };
        prefs.save(&path)?;
        assert!(fs::read_to_string(&path)?.contains("\"light\""));
        assert_eq!(Preferences::load(&path), prefs);
        Ok(())
    }

    #[test]
    fn test_missing_or_malformed_preferences() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("preferences.json");
        assert_eq!(Preferences::load(&path), Preferences::default());

        fs::write(&path, "{not json")?;
        assert_eq!(Preferences::load(&path), Preferences::default());
        Ok(())
    }

    #[test]
    fn test_store_toggle_persists() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("preferences.json");
        Preferences {
            theme: Some(ThemeMode::Dark),
        }
        .save(&path)?;

        let mut store = ThemeStore::open(Some(path.clone()));
        assert_eq!(store.mode, ThemeMode::Dark);
        store.toggle();
        assert_eq!(ThemeStore::open(Some(path)).mode, ThemeMode::Light);
        Ok(())
    }

    #[test]
    fn test_ephemeral_store_does_not_write() {
        let mut store = ThemeStore::ephemeral(ThemeMode::Light);
        store.toggle();
        assert_eq!(store.mode, ThemeMode::Dark);
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!("Dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert!("blue".parse::<ThemeMode>().is_err());
    }
}
