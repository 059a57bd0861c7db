//! Gesturizer configuration
//!
//! Usually built in code, but can also be read from a `[gestures]`-style TOML
//! table:
//!
//! ```toml
//! split_on_pointer_set_change = false
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Construction-time settings of a [`Gesturizer`](crate::Gesturizer)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GesturizerConfig {
    /// End the current gesture and start a new one when its pointer set
    /// changes, instead of rebasing it in place
    #[serde(default = "default_true")]
    pub split_on_pointer_set_change: bool,
}

fn default_true() -> bool {
    true
}

impl Default for GesturizerConfig {
    fn default() -> Self {
        Self {
            split_on_pointer_set_change: default_true(),
        }
    }
}

impl GesturizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether pointer set changes split the gesture
    pub fn split_on_pointer_set_change(mut self, split: bool) -> Self {
        self.split_on_pointer_set_change = split;
        self
    }

    /// Parse a configuration from TOML, missing fields taking their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GesturizerConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
