//! Stat & Sabotage Kinds
//!
//! Closed enumerations for the three player stats and the two sabotage
//! actions. String parsing exists only for the JSON/Godot boundary; the
//! engine itself takes these types directly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProgressionError;

/// Player stat driven by XP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    /// Splat coverage and egg capacity
    ThrowPower,
    /// Movement speed
    MoveSpeed,
    /// Resistance to stink-bomb blur
    Composure,
}

impl StatKind {
    pub const ALL: [StatKind; 3] = [StatKind::ThrowPower, StatKind::MoveSpeed, StatKind::Composure];

    /// Label shown in the HUD
    pub fn display_name(&self) -> &'static str {
        match self {
            StatKind::ThrowPower => "Throw Power",
            StatKind::MoveSpeed => "Move Speed",
            StatKind::Composure => "Composure",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for StatKind {
    type Err = ProgressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String =
            s.chars().filter(|c| !matches!(c, '_' | ' ' | '-')).collect::<String>().to_lowercase();
        match key.as_str() {
            "throwpower" | "throw" => Ok(StatKind::ThrowPower),
            "movespeed" | "speed" => Ok(StatKind::MoveSpeed),
            "composure" => Ok(StatKind::Composure),
            _ => Err(ProgressionError::UnknownStat(s.to_string())),
        }
    }
}

/// Sabotage action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SabotageKind {
    EggThrow,
    StinkBomb,
}

impl SabotageKind {
    pub const ALL: [SabotageKind; 2] = [SabotageKind::EggThrow, SabotageKind::StinkBomb];

    /// Stat that earns XP when this sabotage lands.
    ///
    /// StinkBomb trains MoveSpeed: placing the bomb and escaping is a speed play.
    pub fn performer_stat(&self) -> StatKind {
        match self {
            SabotageKind::EggThrow => StatKind::ThrowPower,
            SabotageKind::StinkBomb => StatKind::MoveSpeed,
        }
    }
}

impl fmt::Display for SabotageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for SabotageKind {
    type Err = ProgressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String =
            s.chars().filter(|c| !matches!(c, '_' | ' ' | '-')).collect::<String>().to_lowercase();
        match key.as_str() {
            "eggthrow" | "egg" => Ok(SabotageKind::EggThrow),
            "stinkbomb" | "stink" => Ok(SabotageKind::StinkBomb),
            _ => Err(ProgressionError::UnknownSabotageKind(s.to_string())),
        }
    }
}

/// Result of a resolved hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Won,
    Lost,
}

impl GameOutcome {
    pub fn from_won(won: bool) -> Self {
        if won {
            GameOutcome::Won
        } else {
            GameOutcome::Lost
        }
    }
}
