//! Render Mode
//!
//! The one process-wide signal deciding whether sources get rewritten.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::render::RenderError;

/// Environment variable holding the render mode.
pub const MODE_ENV_VAR: &str = "CFIMAGE_MODE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Sources are rewritten to the resizing proxy
    Production,
    /// Sources pass through unless forced
    Development,
}

impl Default for RenderMode {
    fn default() -> Self {
        Self::Development
    }
}

impl RenderMode {
    /// Read the mode from `CFIMAGE_MODE`.
    ///
    /// Unset or unrecognized values fall back to development.
    pub fn from_env() -> Self {
        match env::var(MODE_ENV_VAR) {
            Ok(value) => value.parse().unwrap_or_else(|e: RenderError| {
                warn!(value = %value, error = %e, "Falling back to development mode");
                Self::Development
            }),
            Err(_) => Self::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl FromStr for RenderMode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" | "test" => Ok(Self::Development),
            _ => Err(RenderError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Development => f.write_str("development"),
        }
    }
}
