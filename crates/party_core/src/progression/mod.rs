//! Player Progression
//!
//! Stats, XP and leveling for one player.
//!
//! ## Module layout
//! - `stat`: StatKind, SabotageKind, GameOutcome
//! - `formulas`: leveling thresholds and derived values
//! - `profile`: PlayerProfile data aggregate and read-only views
//! - `engine`: ProgressionEngine, the only place XP is applied
//! - `events`: ProgressionEvent and observers
//!
//! ## Flow
//! 1. Session start: `ProgressionEngine::new_profile()` per player
//! 2. Gameplay event: `engine.apply(&mut profile, &event)`
//! 3. Rendering / physics: `profile.derived_values()`

pub mod engine;
pub mod events;
pub mod formulas;
pub mod profile;
pub mod stat;

pub use engine::{GameplayEvent, ProgressionEngine};
pub use events::{LogObserver, ProgressionEvent, ProgressionObserver};
pub use formulas::{
    blur_multiplier, level_from_total_xp, max_eggs, movement_speed, throw_coverage,
    xp_required_for_next_level, xp_to_reach_level, MAX_LOOKUP_LEVEL, MAX_STAT_LEVEL,
};
pub use profile::{DerivedValues, PlayerProfile, StatProgress, DEFAULT_RESILIENCE_XP_REWARD};
pub use stat::{GameOutcome, SabotageKind, StatKind};
