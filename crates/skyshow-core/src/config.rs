//! Mission settings: home position, default speed and safety radius.

use crate::error::SettingsError;
use crate::geo::HomePosition;
use serde::{Deserialize, Serialize};
use std::env;

/// Speed used for waypoints that do not carry their own (m/s).
pub const DEFAULT_SPEED_MPS: f64 = 5.0;
pub const DEFAULT_SAFETY_RADIUS_M: f64 = 2.0;

/// Externally supplied export configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionSettings {
    pub home: HomePosition,
    pub default_speed: f64,
    pub safety_radius: f64,
}

impl Default for MissionSettings {
    fn default() -> Self {
        Self {
            home: HomePosition::default(),
            default_speed: DEFAULT_SPEED_MPS,
            safety_radius: DEFAULT_SAFETY_RADIUS_M,
        }
    }
}

/// Editable settings fields, by the names the settings panel uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    HomeLat,
    HomeLon,
    HomeAlt,
    DefaultSpeed,
    SafetyRadius,
}

impl SettingsField {
    pub fn name(self) -> &'static str {
        match self {
            SettingsField::HomeLat => "homeLat",
            SettingsField::HomeLon => "homeLon",
            SettingsField::HomeAlt => "homeAlt",
            SettingsField::DefaultSpeed => "defaultSpeed",
            SettingsField::SafetyRadius => "safetyRadius",
        }
    }

    fn bounds(self) -> (f64, f64) {
        match self {
            SettingsField::HomeLat => (-90.0, 90.0),
            SettingsField::HomeLon => (-180.0, 180.0),
            SettingsField::HomeAlt => (-500.0, 10_000.0),
            SettingsField::DefaultSpeed => (0.1, 50.0),
            SettingsField::SafetyRadius => (0.0, 1_000.0),
        }
    }
}

impl std::str::FromStr for SettingsField {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "homeLat" | "home_lat" => Ok(SettingsField::HomeLat),
            "homeLon" | "home_lon" => Ok(SettingsField::HomeLon),
            "homeAlt" | "home_alt" => Ok(SettingsField::HomeAlt),
            "defaultSpeed" | "default_speed" => Ok(SettingsField::DefaultSpeed),
            "safetyRadius" | "safety_radius" => Ok(SettingsField::SafetyRadius),
            other => Err(SettingsError::UnknownField(other.to_string())),
        }
    }
}

impl MissionSettings {
    /// Load settings from `SKYSHOW_*` environment variables.
    ///
    /// Missing or invalid values keep their defaults.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        let vars = [
            ("SKYSHOW_HOME_LAT", SettingsField::HomeLat),
            ("SKYSHOW_HOME_LON", SettingsField::HomeLon),
            ("SKYSHOW_HOME_ALT", SettingsField::HomeAlt),
            ("SKYSHOW_DEFAULT_SPEED", SettingsField::DefaultSpeed),
            ("SKYSHOW_SAFETY_RADIUS", SettingsField::SafetyRadius),
        ];
        for (key, field) in vars {
            if let Ok(raw) = env::var(key) {
                if let Err(err) = settings.apply(field, &raw) {
                    tracing::warn!("Ignoring {}: {}", key, err);
                }
            }
        }
        settings
    }

    /// Apply a raw text update to one field.
    ///
    /// On error the current value is left untouched.
    pub fn apply(&mut self, field: SettingsField, raw: &str) -> Result<(), SettingsError> {
        let value: f64 = raw
            .trim()
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| SettingsError::NotANumber {
                field: field.name(),
                value: raw.to_string(),
            })?;

        let (min, max) = field.bounds();
        if !(min..=max).contains(&value) {
            return Err(SettingsError::OutOfRange {
                field: field.name(),
                value,
                min,
                max,
            });
        }

        match field {
            SettingsField::HomeLat => self.home.latitude = value,
            SettingsField::HomeLon => self.home.longitude = value,
            SettingsField::HomeAlt => self.home.altitude = value,
            SettingsField::DefaultSpeed => self.default_speed = value,
            SettingsField::SafetyRadius => self.safety_radius = value,
        }
        Ok(())
    }

    /// Apply an update by field name, as received from a form.
    pub fn apply_named(&mut self, field: &str, raw: &str) -> Result<(), SettingsError> {
        self.apply(field.parse()?, raw)
    }
}
