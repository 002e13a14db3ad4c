//! Shared named variables and colors
//!
//! Animations read these every frame; the HTTP control surface writes them.
//! Every access takes the lock for just that one get or set.

use crate::colors::Rgb;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

/// Var read by the render loop as the output brightness
pub const BRIGHTNESS_VAR: &str = "brightness";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Params {
    #[serde(rename = "Vars", default)]
    vars: BTreeMap<String, f64>,
    /// 6 digit hex strings without the leading '#'
    #[serde(rename = "Colors", default)]
    colors: BTreeMap<String, String>,
}

#[derive(Clone, Default)]
pub struct ParamStore {
    inner: Arc<Mutex<Params>>,
}

impl ParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Params> {
        // A panicked writer cannot leave the maps half-updated
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Unknown names read as 0.0
    pub fn get_var(&self, name: &str) -> f64 {
        self.lock().vars.get(name).copied().unwrap_or(0.0)
    }

    pub fn set_var(&self, name: &str, value: f64) {
        self.lock().vars.insert(name.to_string(), value);
    }

    /// Unknown names read as black; a malformed stored value is logged and reads as black
    pub fn get_color(&self, name: &str) -> Rgb {
        let hex = match self.lock().colors.get(name) {
            Some(hex) => hex.clone(),
            None => return Rgb::BLACK,
        };
        Rgb::from_hex(&hex).unwrap_or_else(|e| {
            warn!(name, error = %e, "unparseable color in parameter store");
            Rgb::BLACK
        })
    }

    pub fn set_color(&self, name: &str, color: Rgb) {
        self.set_color_hex(name, &color.to_hex());
    }

    /// Expects a 6 digit hex color without the leading '#'
    pub fn set_color_hex(&self, name: &str, hex: &str) {
        self.lock().colors.insert(name.to_string(), hex.to_string());
    }

    pub fn get_color_hex(&self, name: &str) -> String {
        self.lock().colors.get(name).cloned().unwrap_or_default()
    }

    /// Whole store as JSON: `{"Vars":{..},"Colors":{..}}`
    pub fn state(&self) -> Result<String> {
        Ok(serde_json::to_string(&*self.lock())?)
    }

    /// Replace the store contents from JSON produced by [`ParamStore::state`]
    pub fn load(&self, json: &str) -> Result<()> {
        let params: Params = serde_json::from_str(json)?;
        *self.lock() = params;
        Ok(())
    }
}
