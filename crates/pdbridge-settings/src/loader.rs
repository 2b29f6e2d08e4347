//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`PdbridgeSettings::default()`]
//! 2. If `~/.pdbridge/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `PDBRIDGE_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, SettingsError};
use crate::types::PdbridgeSettings;

/// Directory holding pdbridge configuration and data (`~/.pdbridge`).
pub fn config_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".pdbridge")
}

/// Resolve the path to the settings file (`~/.pdbridge/settings.json`).
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<PdbridgeSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults; invalid JSON or out-of-range values are errors.
pub fn load_settings_from_path(path: &Path) -> Result<PdbridgeSettings> {
    let defaults = serde_json::to_value(PdbridgeSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: PdbridgeSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    validate(&settings)?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides. Invalid values are ignored with a warning.
pub fn apply_env_overrides(settings: &mut PdbridgeSettings) {
    if let Some(v) = read_env_string("PDBRIDGE_HISTORY_DB") {
        settings.history.db_path = PathBuf::from(v);
    }
    if let Some(v) = read_env_usize("PDBRIDGE_HISTORY_MAX", 1, 100_000) {
        settings.history.max_entries = v;
    }
    if let Some(v) = read_env_string("PDBRIDGE_PROMPT") {
        settings.debugger.prompt = v;
    }
    if let Some(v) = read_env_string("PDBRIDGE_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = read_env_bool("PDBRIDGE_LOG_JSON") {
        settings.logging.json = v;
    }
}

fn validate(settings: &PdbridgeSettings) -> Result<()> {
    if settings.history.max_entries == 0 {
        return Err(SettingsError::InvalidValue(
            "history.maxEntries must be at least 1".into(),
        ));
    }
    if settings.debugger.prompt.is_empty() {
        return Err(SettingsError::InvalidValue(
            "debugger.prompt must not be empty".into(),
        ));
    }
    Ok(())
}

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_bool(name: &str) -> Option<bool> {
    let val = std::env::var(name).ok()?;
    let result = parse_bool(&val);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid boolean env var, ignoring");
    }
    result
}

fn read_env_usize(name: &str, min: usize, max: usize) -> Option<usize> {
    let val = std::env::var(name).ok()?;
    let result = parse_usize_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid integer env var, ignoring");
    }
    result
}
