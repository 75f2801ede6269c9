//! # Progression Configuration
//!
//! Tuning constants for XP rewards, kept in one place so balance passes
//! never touch the engine code.
//!
//! ```rust
//! use party_core::config::ProgressionConfig;
//!
//! let config = ProgressionConfig::default();
//! assert_eq!(config.win_xp, 40);
//! let casual = ProgressionConfig::casual();
//! assert!(casual.loss_xp > config.loss_xp);
//! ```

use std::path::Path;
use std::{env, fs};

use serde::{Deserialize, Serialize};

use crate::error::{ProgressionError, Result};
use crate::progression::formulas::MAX_STAT_LEVEL;

pub const CONFIG_PATH_ENV: &str = "PARTY_PROGRESSION_CONFIG_PATH";

/// XP reward table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// XP for winning a hand, split across all stats (default: 40)
    pub win_xp: u32,
    /// XP for losing a hand (default: 10)
    pub loss_xp: u32,
    /// XP for landing a sabotage (default: 20)
    pub sabotage_xp: u32,
    /// Composure XP for getting hit by a sabotage (default: 5)
    pub resilience_xp_reward: u32,
    /// Award operations stop leveling here, 1..=3 (default: 3)
    pub max_stat_level: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            win_xp: 40,
            loss_xp: 10,
            sabotage_xp: 20,
            resilience_xp_reward: 5,
            max_stat_level: MAX_STAT_LEVEL,
        }
    }
}

impl ProgressionConfig {
    /// Shipping balance
    pub fn standard() -> Self {
        Self::default()
    }

    /// Short sessions: losers keep up, stats climb faster
    pub fn casual() -> Self {
        Self {
            win_xp: 60,
            loss_xp: 30,
            sabotage_xp: 30,
            resilience_xp_reward: 10,
            ..Self::default()
        }
    }

    /// Scripted onboarding, every action levels something quickly
    pub fn tutorial() -> Self {
        Self {
            win_xp: 150,
            loss_xp: 150,
            sabotage_xp: 50,
            resilience_xp_reward: 50,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_STAT_LEVEL).contains(&self.max_stat_level) {
            return Err(ProgressionError::InvalidConfig(format!(
                "max_stat_level must be in 1..={}, got {}",
                MAX_STAT_LEVEL, self.max_stat_level
            )));
        }
        if self.win_xp < self.loss_xp {
            return Err(ProgressionError::InvalidConfig(format!(
                "win_xp ({}) must not be lower than loss_xp ({})",
                self.win_xp, self.loss_xp
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: ProgressionConfig = serde_json::from_str(json)
            .map_err(|e| ProgressionError::Config(format!("invalid JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ProgressionConfig = serde_yaml::from_str(yaml)
            .map_err(|e| ProgressionError::Config(format!("invalid YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ProgressionError::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Config named by `PARTY_PROGRESSION_CONFIG_PATH`, or defaults when unset
    pub fn from_env() -> Result<Self> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        let config = Self::from_file(Path::new(path))?;
        log::info!("Loaded progression config from {CONFIG_PATH_ENV}='{path}'");
        Ok(config)
    }
}
