//! Engine configuration supplied by the host application.
//!
//! Every field has a default, so a host only spells out what it changes:
//!
//! ```
//! use live_chess::config::{EngineConfig, PromotionPolicy};
//!
//! let config = EngineConfig::from_json(r#"{ "promotion": "auto_queen" }"#).unwrap();
//! assert_eq!(config.promotion, PromotionPolicy::AutoQueen);
//! assert!(config.draw_rules.threefold_repetition);
//! assert!(config.recorder.is_none());
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::recorder::FlushPolicy;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub draw_rules: DrawRules,
    pub promotion: PromotionPolicy,
    /// Where and how finished games are written; `None` disables recording
    pub recorder: Option<RecorderConfig>,
}

impl EngineConfig {
    /// Parse a configuration from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid JSON for this shape.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(ConfigError)
    }
}

/// Which automatic draw rules end the game. All are on by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawRules {
    /// Halfmove clock reaches 100
    pub fifty_move: bool,
    pub threefold_repetition: bool,
    pub insufficient_material: bool,
}

impl Default for DrawRules {
    fn default() -> Self {
        DrawRules {
            fifty_move: true,
            threefold_repetition: true,
            insufficient_material: true,
        }
    }
}

/// How submitted pawn promotions are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionPolicy {
    /// Promotion moves are refused with `GameError::PromotionUnsupported`
    #[default]
    Reject,
    /// A promotion request without a piece becomes a queen promotion
    AutoQueen,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderConfig {
    pub games_dir: PathBuf,
    #[serde(default)]
    pub flush: FlushPolicy,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        RecorderConfig {
            games_dir: PathBuf::from("games"),
            flush: FlushPolicy::default(),
        }
    }
}

/// Configuration text could not be parsed
#[derive(Debug)]
pub struct ConfigError(serde_json::Error);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid engine configuration: {}", self.0)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}
