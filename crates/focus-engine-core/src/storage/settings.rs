//! User settings.
//!
//! Stores:
//! - Study-day boundaries (`dayStartTime`, `dayEndTime`, `HH:MM`)
//! - Notification toggles per category group
//! - End-of-session sound and colour theme
//! - Remote backend credentials
//!
//! Settings travel inside the persisted snapshot. Keys are camelCase and
//! addressable by dot path, e.g. `notifications.brainFog`.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::clock::parse_hhmm;
use crate::error::ConfigError;
use crate::notify::NotificationCategory;

/// Notification toggles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default)]
    pub study: bool,
    #[serde(default)]
    pub brain_fog: bool,
    #[serde(default)]
    pub evening: bool,
    #[serde(default)]
    pub personal: bool,
}

impl NotificationSettings {
    /// Whether the toggle governing `category` is on.
    pub fn allows(&self, category: NotificationCategory) -> bool {
        match category {
            NotificationCategory::Morning
            | NotificationCategory::Inactivity
            | NotificationCategory::Consistency => self.study,
            NotificationCategory::BrainFog => self.brain_fog,
            NotificationCategory::Evening => self.evening,
            NotificationCategory::Personal => self.personal,
        }
    }

    pub fn any_enabled(&self) -> bool {
        self.study || self.brain_fog || self.evening || self.personal
    }
}

/// Remote backend credentials. Empty strings mean "not configured".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSettings {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub vapid_public_key: String,
}

impl RemoteSettings {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.key.trim().is_empty()
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_day_end")]
    pub day_end_time: String,
    #[serde(default = "default_day_start")]
    pub day_start_time: String,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default = "default_true")]
    pub sound: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default, alias = "supabase")]
    pub remote: RemoteSettings,
}

// Default functions
fn default_day_end() -> String {
    "23:00".into()
}
fn default_day_start() -> String {
    "06:00".into()
}
fn default_true() -> bool {
    true
}
fn default_theme() -> String {
    "focus".into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            day_end_time: default_day_end(),
            day_start_time: default_day_start(),
            notifications: NotificationSettings::default(),
            sound: true,
            theme: default_theme(),
            remote: RemoteSettings::default(),
        }
    }
}

impl Settings {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) => {
                        return Err(invalid("cannot overwrite a section".into()))
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Get a setting as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a setting by key. The caller persists the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Settings = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("dayStartTime", &self.day_start_time),
            ("dayEndTime", &self.day_end_time),
        ] {
            parse_hhmm(value).map_err(|e| ConfigError::InvalidValue {
                key: key.into(),
                message: e.to_string(),
            })?;
        }
        if self.theme.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "theme".into(),
                message: "theme must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Day boundaries, falling back to the defaults for unparsable values.
    pub fn day_bounds(&self) -> (NaiveTime, NaiveTime) {
        let start = parse_hhmm(&self.day_start_time)
            .unwrap_or_else(|_| NaiveTime::from_hms_opt(6, 0, 0).unwrap_or_default());
        let end = parse_hhmm(&self.day_end_time)
            .unwrap_or_else(|_| NaiveTime::from_hms_opt(23, 0, 0).unwrap_or_default());
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let s = Settings::default();
        assert_eq!(s.day_end_time, "23:00");
        assert_eq!(s.day_start_time, "06:00");
        assert!(s.sound);
        assert_eq!(s.theme, "focus");
        assert!(!s.notifications.any_enabled());
        assert!(!s.remote.is_configured());
    }

    #[test]
    fn keys_are_camel_case() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert!(json.get("dayEndTime").is_some());
        assert!(json["notifications"].get("brainFog").is_some());
        assert!(json["remote"].get("vapidPublicKey").is_some());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let s = Settings::default();
        assert_eq!(s.get("dayEndTime").as_deref(), Some("23:00"));
        assert_eq!(s.get("notifications.study").as_deref(), Some("false"));
        assert!(s.get("notifications.missing").is_none());
    }

    #[test]
    fn set_updates_nested_bool() {
        let mut s = Settings::default();
        s.set("notifications.brainFog", "true").unwrap();
        assert!(s.notifications.brain_fog);
        assert!(s.notifications.allows(NotificationCategory::BrainFog));
        assert!(!s.notifications.allows(NotificationCategory::Morning));
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut s = Settings::default();
        assert!(matches!(
            s.set("sound", "loud").unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
        assert!(matches!(
            s.set("dayEndTime", "late").unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
        assert!(matches!(
            s.set("nonexistent", "x").unwrap_err(),
            ConfigError::UnknownKey(_)
        ));
        assert!(matches!(
            s.set("notifications", "x").unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn set_remote_credentials() {
        let mut s = Settings::default();
        s.set("remote.url", "https://example.supabase.co").unwrap();
        s.set("remote.key", "anon-key").unwrap();
        assert!(s.remote.is_configured());
    }

    #[test]
    fn legacy_supabase_section_is_read() {
        let s: Settings =
            serde_json::from_str(r#"{"supabase":{"url":"https://x.co","key":"k"}}"#).unwrap();
        assert!(s.remote.is_configured());
        assert_eq!(s.day_end_time, "23:00");
    }
}
