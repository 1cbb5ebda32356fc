//! Accessibility settings validation
//!
//! Takes an untyped settings mapping from the caller and returns a
//! sanitized configuration plus the set of keys that survived. Malformed
//! individual fields are dropped, never raised; the only error is an
//! input that is not a mapping at all.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

/// Clamp ranges and the language allow-list, as one immutable structure
/// passed into the validator rather than process-wide globals.
#[derive(Debug, Clone)]
pub struct AccessibilityLimits {
    pub font_size: (i64, i64),
    pub line_height: (f64, f64),
    pub voice_speed: (f64, f64),
    pub voice_pitch: (f64, f64),
    pub languages: &'static [&'static str],
}

pub const SUPPORTED_LANGUAGES: &[&str] =
    &["en", "es", "fr", "de", "it", "pt", "ru", "ja", "ko", "zh"];

impl Default for AccessibilityLimits {
    fn default() -> Self {
        Self {
            font_size: (12, 32),
            line_height: (1.0, 3.0),
            voice_speed: (0.5, 2.0),
            voice_pitch: (0.5, 2.0),
            languages: SUPPORTED_LANGUAGES,
        }
    }
}

/// Sanitized accessibility preferences.
///
/// Absent keys stay `None`: defaults are the caller's responsibility,
/// this layer only validates what was present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityConfig {
    pub screen_reader_enabled: Option<bool>,
    pub high_contrast: Option<bool>,
    pub large_text: Option<bool>,
    pub focus_mode: Option<bool>,
    pub reduced_motion: Option<bool>,
    pub voice_commands: Option<bool>,
    pub auto_read: Option<bool>,
    pub font_size: Option<i64>,
    pub line_height: Option<f64>,
    pub voice_speed: Option<f64>,
    pub voice_pitch: Option<f64>,
    pub voice_language: Option<String>,
}

/// Validation output: the sanitized config and which keys were accepted.
#[derive(Debug, Clone)]
pub struct SanitizedAccessibility {
    pub config: AccessibilityConfig,
    pub accepted: BTreeSet<String>,
}

/// Sanitize an untyped settings mapping.
///
/// Unrecognized keys and non-coercible values are dropped silently;
/// numeric values are clamped to the ranges in `limits`.
pub fn validate_accessibility_config(
    raw: &Value,
    limits: &AccessibilityLimits,
) -> Result<SanitizedAccessibility> {
    let map = raw
        .as_object()
        .ok_or_else(|| Error::Config("accessibility settings must be an object".to_string()))?;

    let mut config = AccessibilityConfig::default();
    let mut accepted = BTreeSet::new();

    for (key, value) in map {
        let slot: Option<&mut Option<bool>> = match key.as_str() {
            "screen_reader_enabled" => Some(&mut config.screen_reader_enabled),
            "high_contrast" => Some(&mut config.high_contrast),
            "large_text" => Some(&mut config.large_text),
            "focus_mode" => Some(&mut config.focus_mode),
            "reduced_motion" => Some(&mut config.reduced_motion),
            "voice_commands" => Some(&mut config.voice_commands),
            "auto_read" => Some(&mut config.auto_read),
            _ => None,
        };
        if let Some(slot) = slot {
            *slot = Some(truthy(value));
            accepted.insert(key.clone());
            continue;
        }

        match key.as_str() {
            "font_size" => {
                if let Some(v) = coerce_int(value) {
                    config.font_size = Some(v.clamp(limits.font_size.0, limits.font_size.1));
                    accepted.insert(key.clone());
                } else {
                    debug!(key = %key, "dropping non-coercible accessibility field");
                }
            }
            "line_height" => {
                if let Some(v) = coerce_float(value) {
                    config.line_height = Some(v.clamp(limits.line_height.0, limits.line_height.1));
                    accepted.insert(key.clone());
                } else {
                    debug!(key = %key, "dropping non-coercible accessibility field");
                }
            }
            "voice_speed" => {
                if let Some(v) = coerce_float(value) {
                    config.voice_speed = Some(v.clamp(limits.voice_speed.0, limits.voice_speed.1));
                    accepted.insert(key.clone());
                } else {
                    debug!(key = %key, "dropping non-coercible accessibility field");
                }
            }
            "voice_pitch" => {
                if let Some(v) = coerce_float(value) {
                    config.voice_pitch = Some(v.clamp(limits.voice_pitch.0, limits.voice_pitch.1));
                    accepted.insert(key.clone());
                } else {
                    debug!(key = %key, "dropping non-coercible accessibility field");
                }
            }
            "voice_language" => match value.as_str() {
                Some(lang) if limits.languages.contains(&lang) => {
                    config.voice_language = Some(lang.to_string());
                    accepted.insert(key.clone());
                }
                _ => debug!(key = %key, "dropping unsupported voice_language"),
            },
            other => {
                debug!(key = other, "dropping unrecognized accessibility key");
            }
        }
    }

    Ok(SanitizedAccessibility { config, accepted })
}

/// Truthiness in the loose sense the settings callers expect: false-y
/// values are false/null, zero, empty strings and collections, and the
/// literal strings "false" and "0".
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty() && s != "false" && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
