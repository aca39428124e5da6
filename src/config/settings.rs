//! User settings for splitledger
//!
//! Every field has a serde default so older or hand-edited config files keep
//! loading.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::paths::LedgerPaths;
use crate::error::LedgerError;

/// What happens to the minor units left over by an equal split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RemainderPolicy {
    /// One extra unit each to the first participants, in the order given
    #[default]
    Distribute,
    /// The whole remainder goes to the payer's share
    Payer,
    /// Amounts that do not divide evenly are refused
    Reject,
}

impl RemainderPolicy {
    /// Parse remainder policy from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "distribute" | "first" => Some(Self::Distribute),
            "payer" => Some(Self::Payer),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for RemainderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Distribute => write!(f, "distribute"),
            Self::Payer => write!(f, "payer"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// User settings for splitledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when displaying amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Remainder handling for equal splits
    #[serde(default)]
    pub remainder_policy: RemainderPolicy,

    /// Whether a member may pay for an expense they take no share in
    #[serde(default = "default_allow_external_payer")]
    pub allow_external_payer: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_allow_external_payer() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            remainder_policy: RemainderPolicy::default(),
            allow_external_payer: default_allow_external_payer(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not saved here; `init` decides when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
