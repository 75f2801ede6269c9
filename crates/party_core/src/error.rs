use thiserror::Error;

use crate::progression::StatKind;

#[derive(Error, Debug)]
pub enum ProgressionError {
    #[error("Negative XP award rejected: {amount} XP for {stat}")]
    NegativeXp { stat: StatKind, amount: i64 },

    #[error("XP counter overflow for {stat}")]
    XpOverflow { stat: StatKind },

    #[error("Total XP counter overflow")]
    TotalXpOverflow,

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Unknown sabotage kind: {0}")]
    UnknownSabotageKind(String),

    #[error("Unknown stat: {0}")]
    UnknownStat(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config load error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProgressionError {
    /// Caller supplied something the engine refuses to apply.
    pub fn is_input_error(&self) -> bool {
        match self {
            ProgressionError::NegativeXp { .. } => true,
            ProgressionError::UnknownSabotageKind(_) => true,
            ProgressionError::UnknownStat(_) => true,
            ProgressionError::InvalidProfile(_) => true,
            ProgressionError::XpOverflow { .. } => false,
            ProgressionError::TotalXpOverflow => false,
            ProgressionError::InvalidConfig(_) => false,
            ProgressionError::Config(_) => false,
            ProgressionError::Serialization(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProgressionError>;
