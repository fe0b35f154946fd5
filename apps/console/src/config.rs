use std::{fs, path::Path};

use client_core::{AppSettings, CalendarPlatform};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "confusion.toml";

/// Defaults, then the TOML file if present, then `APP__*` environment
/// variables.
pub fn load_settings(path: &Path) -> AppSettings {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => parse_settings(&raw).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "ignoring malformed config file");
            AppSettings::default()
        }),
        Err(_) => AppSettings::default(),
    };
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub fn parse_settings(raw: &str) -> Result<AppSettings, toml::de::Error> {
    toml::from_str(raw)
}

pub fn apply_env_overrides(settings: &mut AppSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("APP__BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = lookup("APP__CALENDAR_PLATFORM") {
        match v.parse::<CalendarPlatform>() {
            Ok(platform) => settings.reservation.calendar_platform = platform,
            Err(err) => warn!(error = %err, "ignoring APP__CALENDAR_PLATFORM"),
        }
    }
    if let Some(v) = lookup("APP__TIMEZONE") {
        settings.reservation.timezone = v;
    }
    if let Some(v) = lookup("APP__LOCATION") {
        settings.reservation.location = v;
    }
    if let Some(v) = lookup("APP__EVENT_TITLE") {
        settings.reservation.event_title = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
