//! Preference document shape, defaults, and write-time validation.
//!
//! The stored value is the raw JSON document a client sent; this module
//! only decides whether a document is acceptable and what the defaults
//! are. Storage never sees these types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_TIMEZONE: &str = "Africa/Tunis";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub notifications: NotificationPrefs,
    pub units: UnitPrefs,
    pub language: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications: NotificationPrefs::default(),
            units: UnitPrefs::default(),
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPrefs {
    pub email: bool,
    pub push: bool,
    pub product_updates: bool,
    /// When set, only critical notifications are delivered.
    pub critical_only: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            product_updates: true,
            critical_only: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitPrefs {
    pub temperature: TemperatureUnit,
    pub distance: DistanceUnit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Metric,
    Imperial,
}

/// Check an incoming preferences document. Known fields must match the
/// typed shape (the unit enums in particular); unknown keys pass through
/// untouched since the stored value is the raw document.
pub fn validate(value: &Value) -> Result<(), String> {
    if !value.is_object() {
        return Err("preferences must be an object".to_string());
    }
    serde_json::from_value::<Preferences>(value.clone())
        .map(|_| ())
        .map_err(|e| format!("invalid preferences: {e}"))
}
