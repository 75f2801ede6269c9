//! # party_core - Party Minigame Progression Engine
//!
//! Player stats (ThrowPower, MoveSpeed, Composure), XP accumulation, leveling
//! and the derived gameplay values that rendering and movement code consume.
//!
//! ## Features
//! - Plain-data `PlayerProfile`, mutated only through `ProgressionEngine`
//! - Pure derived-value formulas (coverage, speed, blur, egg capacity)
//! - Observer hook for award / level-up events
//! - JSON API for easy integration with Godot

pub mod api;
pub mod config;
pub mod error;
pub mod progression;

pub use api::{
    apply_progression_json, profile_summary_json, ProgressionRequest, ProgressionResponse,
};
pub use config::ProgressionConfig;
pub use error::{ProgressionError, Result};
pub use progression::{
    DerivedValues, GameOutcome, GameplayEvent, LogObserver, PlayerProfile, ProgressionEngine,
    ProgressionEvent, ProgressionObserver, SabotageKind, StatKind, StatProgress,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
