//! Fill policy configuration.
//!
//! The optional `--config` file is a JSON object. Only `numeric_fill` and
//! `text_fill` are read; unknown keys are ignored and a malformed key falls
//! back to its default with a warning.

use std::{fs, path::Path, str::FromStr};

use log::warn;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use crate::error::{NormalizeError, NormalizeResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillConfig {
    pub numeric_fill: Decimal,
    pub text_fill: String,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            numeric_fill: Decimal::ZERO,
            text_fill: String::new(),
        }
    }
}

impl FillConfig {
    /// Loads the config file. A missing path yields the defaults; a file that
    /// is not a JSON object is an error.
    pub fn load(path: &Path) -> NormalizeResult<Self> {
        if !path.exists() {
            warn!("Config file {path:?} not found; using default fill values");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| NormalizeError::io(path, source))?;
        let document: JsonValue =
            serde_json::from_str(&contents).map_err(|err| NormalizeError::Config {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        if !document.is_object() {
            return Err(NormalizeError::Config {
                path: path.to_path_buf(),
                message: "expected a JSON object".to_string(),
            });
        }
        Ok(Self::from_json(&document))
    }

    pub fn from_json(document: &JsonValue) -> Self {
        let defaults = Self::default();
        let numeric_fill = match document.get("numeric_fill") {
            None => defaults.numeric_fill,
            Some(value) => numeric_setting(value).unwrap_or_else(|| {
                warn!("Ignoring malformed numeric_fill {value}; using {}", defaults.numeric_fill);
                defaults.numeric_fill
            }),
        };
        let text_fill = match document.get("text_fill") {
            None => defaults.text_fill,
            Some(value) => text_setting(value).unwrap_or_else(|| {
                warn!("Ignoring malformed text_fill {value}; using empty string");
                defaults.text_fill.clone()
            }),
        };
        Self {
            numeric_fill,
            text_fill,
        }
    }
}

fn numeric_setting(value: &JsonValue) -> Option<Decimal> {
    let parsed = match value {
        JsonValue::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        JsonValue::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    };
    parsed.map(|d| d.normalize())
}

fn text_setting(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
