//! Typed app settings on top of the kv table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Database;
use crate::error::{Result, ValidationError};

const KEY_ACTIVE_PRESET: &str = "active_preset";
const KEY_THEME_MODE: &str = "theme_mode";
const KEY_KEEP_SCREEN_ON: &str = "keep_screen_on";

/// Keys accepted by [`Settings::get`] and [`Settings::set`].
pub const SETTING_KEYS: [&str; 3] = [KEY_ACTIVE_PRESET, KEY_THEME_MODE, KEY_KEEP_SCREEN_ON];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ThemeMode::System => "system",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        })
    }
}

impl FromStr for ThemeMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "system" => Ok(ThemeMode::System),
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(ValidationError::invalid(
                KEY_THEME_MODE,
                format!("expected system, light or dark, got '{other}'"),
            )),
        }
    }
}

/// Read/write access to persisted app settings.
pub struct Settings<'a> {
    db: &'a Database,
}

impl<'a> Settings<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Stored active preset id; `None` when unset or unreadable.
    pub fn active_preset(&self) -> Result<Option<i64>> {
        Ok(self
            .db
            .kv_get(KEY_ACTIVE_PRESET)?
            .and_then(|v| v.parse().ok()))
    }

    pub fn set_active_preset(&self, id: i64) -> Result<()> {
        self.db.kv_set(KEY_ACTIVE_PRESET, &id.to_string())
    }

    pub fn theme(&self) -> Result<ThemeMode> {
        Ok(self
            .db
            .kv_get(KEY_THEME_MODE)?
            .and_then(|v| v.parse().ok())
            .unwrap_or_default())
    }

    pub fn set_theme(&self, theme: ThemeMode) -> Result<()> {
        self.db.kv_set(KEY_THEME_MODE, &theme.to_string())
    }

    pub fn keep_screen_on(&self) -> Result<bool> {
        Ok(self
            .db
            .kv_get(KEY_KEEP_SCREEN_ON)?
            .and_then(|v| v.parse().ok())
            .unwrap_or(false))
    }

    pub fn set_keep_screen_on(&self, on: bool) -> Result<()> {
        self.db.kv_set(KEY_KEEP_SCREEN_ON, &on.to_string())
    }

    /// Get a setting as text by key.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(match key {
            KEY_ACTIVE_PRESET => self.active_preset()?.map(|id| id.to_string()),
            KEY_THEME_MODE => Some(self.theme()?.to_string()),
            KEY_KEEP_SCREEN_ON => Some(self.keep_screen_on()?.to_string()),
            _ => None,
        })
    }

    /// Set a setting from text, validating it against the key's type.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        match key {
            KEY_ACTIVE_PRESET => {
                let id = value.parse().map_err(|_| {
                    ValidationError::invalid(KEY_ACTIVE_PRESET, format!("'{value}' is not an id"))
                })?;
                self.set_active_preset(id)
            }
            KEY_THEME_MODE => self.set_theme(value.parse()?),
            KEY_KEEP_SCREEN_ON => {
                let on = value.parse().map_err(|_| {
                    ValidationError::invalid(KEY_KEEP_SCREEN_ON, format!("'{value}' is not a bool"))
                })?;
                self.set_keep_screen_on(on)
            }
            _ => Err(ValidationError::invalid("key", format!("unknown setting: {key}")).into()),
        }
    }

    /// Every setting with its current value.
    pub fn list(&self) -> Result<Vec<(&'static str, Option<String>)>> {
        SETTING_KEYS
            .iter()
            .map(|&key| Ok((key, self.get(key)?)))
            .collect()
    }
}
