//! Player Profile
//!
//! Plain data aggregate for one participant. All XP-driven mutation goes
//! through [`ProgressionEngine`]; the `award_*` helpers here run the default
//! rules for callers that never customize the reward table.

use serde::{Deserialize, Serialize};

use super::engine::ProgressionEngine;
use super::formulas::{
    blur_multiplier, level_from_total_xp, max_eggs, movement_speed, throw_coverage,
    xp_required_for_next_level, MAX_STAT_LEVEL,
};
use super::stat::{GameOutcome, SabotageKind, StatKind};
use crate::error::{ProgressionError, Result};

/// Default Composure XP for surviving a sabotage hit
pub const DEFAULT_RESILIENCE_XP_REWARD: u32 = 5;

/// Progression state of one player for the length of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfile {
    player_id: i64,
    pub player_name: String,

    // Stat levels (1..=3 under XP rules)
    pub throw_power: u32,
    pub move_speed: u32,
    pub composure: u32,

    // XP banked toward each stat's next level
    pub throw_power_xp: u64,
    pub move_speed_xp: u64,
    pub composure_xp: u64,

    /// Every XP point ever awarded, never drained by level-ups
    pub total_xp: u64,

    pub games_won: u32,
    pub games_lost: u32,
    pub successful_sabotages: u32,
    pub times_egged: u32,
    pub times_stink_bombed: u32,

    /// Composure XP granted per sabotage hit taken
    pub resilience_xp_reward: u32,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self::new(0, "")
    }
}

impl PlayerProfile {
    pub fn new(player_id: i64, player_name: impl Into<String>) -> Self {
        Self {
            player_id,
            player_name: player_name.into(),
            throw_power: 1,
            move_speed: 1,
            composure: 1,
            throw_power_xp: 0,
            move_speed_xp: 0,
            composure_xp: 0,
            total_xp: 0,
            games_won: 0,
            games_lost: 0,
            successful_sabotages: 0,
            times_egged: 0,
            times_stink_bombed: 0,
            resilience_xp_reward: DEFAULT_RESILIENCE_XP_REWARD,
        }
    }

    pub fn player_id(&self) -> i64 {
        self.player_id
    }

    pub fn level(&self, stat: StatKind) -> u32 {
        match stat {
            StatKind::ThrowPower => self.throw_power,
            StatKind::MoveSpeed => self.move_speed,
            StatKind::Composure => self.composure,
        }
    }

    pub fn stat_xp(&self, stat: StatKind) -> u64 {
        match stat {
            StatKind::ThrowPower => self.throw_power_xp,
            StatKind::MoveSpeed => self.move_speed_xp,
            StatKind::Composure => self.composure_xp,
        }
    }

    /// Every stat must sit at level 1 or above. Levels past the cap are
    /// left alone; only award operations are bounded.
    pub fn validate(&self) -> Result<()> {
        for stat in StatKind::ALL {
            if self.level(stat) < 1 {
                return Err(ProgressionError::InvalidProfile(format!(
                    "{} level must be >= 1, got {}",
                    stat,
                    self.level(stat)
                )));
            }
        }
        Ok(())
    }

    /// Level and banked XP of one stat, for the engine
    pub(crate) fn stat_slots_mut(&mut self, stat: StatKind) -> (&mut u32, &mut u64) {
        match stat {
            StatKind::ThrowPower => (&mut self.throw_power, &mut self.throw_power_xp),
            StatKind::MoveSpeed => (&mut self.move_speed, &mut self.move_speed_xp),
            StatKind::Composure => (&mut self.composure, &mut self.composure_xp),
        }
    }

    // ========== Default-rule awards ==========

    pub fn add_stat_xp(&mut self, stat: StatKind, amount: i64) -> Result<bool> {
        ProgressionEngine::default().award_stat_xp(self, stat, amount)
    }

    pub fn add_throw_power_xp(&mut self, amount: i64) -> Result<bool> {
        self.add_stat_xp(StatKind::ThrowPower, amount)
    }

    pub fn add_move_speed_xp(&mut self, amount: i64) -> Result<bool> {
        self.add_stat_xp(StatKind::MoveSpeed, amount)
    }

    pub fn add_composure_xp(&mut self, amount: i64) -> Result<bool> {
        self.add_stat_xp(StatKind::Composure, amount)
    }

    pub fn award_game_xp(&mut self, won: bool) -> Result<bool> {
        ProgressionEngine::default().award_game_outcome(self, GameOutcome::from_won(won))
    }

    pub fn award_sabotage_xp(&mut self, kind: SabotageKind) -> Result<bool> {
        ProgressionEngine::default().award_sabotage_performed(self, kind)
    }

    pub fn receive_sabotage(&mut self, kind: SabotageKind) -> Result<bool> {
        ProgressionEngine::default().record_sabotage_received(self, kind)
    }

    // ========== Derived values ==========

    pub fn get_throw_coverage(&self) -> f32 {
        throw_coverage(self.throw_power)
    }

    pub fn get_movement_speed(&self) -> f32 {
        movement_speed(self.move_speed)
    }

    pub fn get_blur_multiplier(&self) -> f32 {
        blur_multiplier(self.composure)
    }

    pub fn get_max_eggs(&self) -> u32 {
        max_eggs(self.throw_power)
    }

    pub fn derived_values(&self) -> DerivedValues {
        DerivedValues {
            throw_coverage: self.get_throw_coverage(),
            movement_speed: self.get_movement_speed(),
            blur_multiplier: self.get_blur_multiplier(),
            max_eggs: self.get_max_eggs(),
        }
    }

    // ========== Display helpers ==========

    pub fn stat_progress(&self, stat: StatKind) -> StatProgress {
        self.stat_progress_capped(stat, MAX_STAT_LEVEL)
    }

    /// Progress against a configured cap, e.g. `ProgressionConfig::max_stat_level`
    pub fn stat_progress_capped(&self, stat: StatKind, max_level: u32) -> StatProgress {
        StatProgress::new(stat, self.level(stat), self.stat_xp(stat), max_level)
    }

    pub fn all_stat_progress(&self) -> Vec<StatProgress> {
        self.all_stat_progress_capped(MAX_STAT_LEVEL)
    }

    pub fn all_stat_progress_capped(&self, max_level: u32) -> Vec<StatProgress> {
        StatKind::ALL.iter().map(|stat| self.stat_progress_capped(*stat, max_level)).collect()
    }

    pub fn games_played(&self) -> u32 {
        self.games_won.saturating_add(self.games_lost)
    }

    pub fn win_rate(&self) -> f32 {
        let played = self.games_played();
        if played == 0 {
            0.0
        } else {
            self.games_won as f32 / played as f32
        }
    }

    pub fn times_sabotaged(&self) -> u32 {
        self.times_egged.saturating_add(self.times_stink_bombed)
    }

    /// Reporting-only level over the lifetime XP total
    pub fn overall_level(&self) -> u32 {
        level_from_total_xp(i64::try_from(self.total_xp).unwrap_or(i64::MAX))
    }
}

/// Rendering snapshot of every derived value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedValues {
    pub throw_coverage: f32,
    pub movement_speed: f32,
    pub blur_multiplier: f32,
    pub max_eggs: u32,
}

/// One stat's position on its leveling curve, for XP bars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatProgress {
    pub stat: StatKind,
    pub level: u32,
    pub xp: u64,
    /// None once the stat stops leveling
    pub xp_to_next: Option<u64>,
    /// 0.0..=1.0, pinned at 1.0 at max level
    pub progress: f32,
    pub is_max_level: bool,
}

impl StatProgress {
    pub fn new(stat: StatKind, level: u32, xp: u64, max_level: u32) -> Self {
        let is_max_level = level >= max_level;
        let (xp_to_next, progress) = if is_max_level {
            (None, 1.0)
        } else {
            let threshold = xp_required_for_next_level(level);
            let progress =
                if threshold == 0 { 1.0 } else { (xp as f64 / threshold as f64).min(1.0) as f32 };
            (Some(threshold), progress)
        };

        Self { stat, level, xp, xp_to_next, progress, is_max_level }
    }

    /// HUD label, e.g. "Throw Power Lv 2 (30/200 XP)"
    pub fn label(&self) -> String {
        match self.xp_to_next {
            Some(next) => {
                format!("{} Lv {} ({}/{} XP)", self.stat.display_name(), self.level, self.xp, next)
            }
            None => format!("{} Lv {} (MAX)", self.stat.display_name(), self.level),
        }
    }
}
