//! Progression Engine
//!
//! Applies gameplay events to a [`PlayerProfile`] borrowed for the duration
//! of one call.
//!
//! ## Leveling rule
//! An award adds to the stat counter and to `total_xp`. If the stat is below
//! the max level and the counter reaches the threshold, the threshold is
//! drained and the level goes up by one. At most one level-up happens per
//! call: an award large enough to cross two thresholds leaves the excess
//! banked until the next award.
//!
//! ## Usage
//! 1. Event producer calls `award_game_outcome` / `award_sabotage_performed`
//!    / `record_sabotage_received` (or `apply` with a [`GameplayEvent`])
//! 2. Rendering reads `profile.derived_values()`
//! 3. An attached [`ProgressionObserver`] sees every award and level-up

use serde::{Deserialize, Serialize};

use super::events::{ProgressionEvent, ProgressionObserver};
use super::formulas::xp_required_for_next_level;
use super::profile::PlayerProfile;
use super::stat::{GameOutcome, SabotageKind, StatKind};
use crate::config::ProgressionConfig;
use crate::error::{ProgressionError, Result};

/// Gameplay event as delivered by producers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameplayEvent {
    HandResolved { won: bool },
    SabotagePerformed { kind: SabotageKind },
    SabotageReceived { kind: SabotageKind },
    /// Direct stat award (debug menus, scripted rewards)
    AwardStatXp { stat: StatKind, amount: i64 },
}

#[derive(Default)]
pub struct ProgressionEngine {
    config: ProgressionConfig,
    observer: Option<Box<dyn ProgressionObserver>>,
}

impl ProgressionEngine {
    pub fn new(config: ProgressionConfig) -> Self {
        Self { config, observer: None }
    }

    pub fn with_observer(mut self, observer: impl ProgressionObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn set_observer(&mut self, observer: Option<Box<dyn ProgressionObserver>>) {
        self.observer = observer;
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    /// Fresh profile carrying the configured resilience reward
    pub fn new_profile(&self, player_id: i64, player_name: impl Into<String>) -> PlayerProfile {
        let mut profile = PlayerProfile::new(player_id, player_name);
        profile.resilience_xp_reward = self.config.resilience_xp_reward;
        profile
    }

    /// Add XP to one stat. Returns true if the stat leveled up.
    pub fn award_stat_xp(
        &mut self,
        profile: &mut PlayerProfile,
        stat: StatKind,
        amount: i64,
    ) -> Result<bool> {
        let amount = self.checked_amount(profile, stat, amount)?;
        Ok(self.apply_stat_xp(profile, stat, amount))
    }

    /// Split the hand reward across all stats, remainder to ThrowPower.
    /// Returns true if any stat leveled up.
    pub fn award_game_outcome(
        &mut self,
        profile: &mut PlayerProfile,
        outcome: GameOutcome,
    ) -> Result<bool> {
        let amount = match outcome {
            GameOutcome::Won => self.config.win_xp,
            GameOutcome::Lost => self.config.loss_xp,
        };
        let share = (amount / 3) as u64;
        let remainder = (amount % 3) as u64;

        self.check_profile(profile)?;
        if profile.total_xp.checked_add(amount as u64).is_none() {
            return Err(self.reject(ProgressionError::TotalXpOverflow));
        }
        self.ensure_room(profile, StatKind::ThrowPower, share + remainder)?;
        self.ensure_room(profile, StatKind::MoveSpeed, share)?;
        self.ensure_room(profile, StatKind::Composure, share)?;

        let throw_up = self.apply_stat_xp(profile, StatKind::ThrowPower, share + remainder);
        let move_up = self.apply_stat_xp(profile, StatKind::MoveSpeed, share);
        let composure_up = self.apply_stat_xp(profile, StatKind::Composure, share);

        match outcome {
            GameOutcome::Won => profile.games_won = profile.games_won.saturating_add(1),
            GameOutcome::Lost => profile.games_lost = profile.games_lost.saturating_add(1),
        }
        self.emit(ProgressionEvent::GameRecorded { outcome, xp: amount });

        Ok(throw_up || move_up || composure_up)
    }

    pub fn award_game_outcome_xp(
        &mut self,
        profile: &mut PlayerProfile,
        won: bool,
    ) -> Result<bool> {
        self.award_game_outcome(profile, GameOutcome::from_won(won))
    }

    /// Reward the attacker: ThrowPower for eggs, MoveSpeed for stink bombs
    pub fn award_sabotage_performed(
        &mut self,
        profile: &mut PlayerProfile,
        kind: SabotageKind,
    ) -> Result<bool> {
        let stat = kind.performer_stat();
        let amount = self.config.sabotage_xp as u64;
        self.check_profile(profile)?;
        self.ensure_room(profile, stat, amount)?;

        let leveled_up = self.apply_stat_xp(profile, stat, amount);
        profile.successful_sabotages = profile.successful_sabotages.saturating_add(1);
        self.emit(ProgressionEvent::SabotagePerformed { kind });

        Ok(leveled_up)
    }

    /// Count the hit and grant Composure XP. Returns true if Composure leveled up.
    pub fn record_sabotage_received(
        &mut self,
        profile: &mut PlayerProfile,
        kind: SabotageKind,
    ) -> Result<bool> {
        let amount = profile.resilience_xp_reward as u64;
        self.check_profile(profile)?;
        self.ensure_room(profile, StatKind::Composure, amount)?;

        match kind {
            SabotageKind::EggThrow => profile.times_egged = profile.times_egged.saturating_add(1),
            SabotageKind::StinkBomb => {
                profile.times_stink_bombed = profile.times_stink_bombed.saturating_add(1)
            }
        }
        let leveled_up = self.apply_stat_xp(profile, StatKind::Composure, amount);
        self.emit(ProgressionEvent::SabotageReceived { kind });

        Ok(leveled_up)
    }

    pub fn apply(&mut self, profile: &mut PlayerProfile, event: &GameplayEvent) -> Result<bool> {
        match *event {
            GameplayEvent::HandResolved { won } => self.award_game_outcome_xp(profile, won),
            GameplayEvent::SabotagePerformed { kind } => {
                self.award_sabotage_performed(profile, kind)
            }
            GameplayEvent::SabotageReceived { kind } => {
                self.record_sabotage_received(profile, kind)
            }
            GameplayEvent::AwardStatXp { stat, amount } => {
                self.award_stat_xp(profile, stat, amount)
            }
        }
    }

    // ========== Internals ==========

    /// Negative awards never touch counters
    fn checked_amount(
        &mut self,
        profile: &PlayerProfile,
        stat: StatKind,
        amount: i64,
    ) -> Result<u64> {
        if amount < 0 {
            return Err(self.reject(ProgressionError::NegativeXp { stat, amount }));
        }
        let amount = amount as u64;
        self.check_profile(profile)?;
        self.ensure_room(profile, stat, amount)?;
        Ok(amount)
    }

    /// Level 0 has a zero threshold and would level up on any award
    fn check_profile(&mut self, profile: &PlayerProfile) -> Result<()> {
        profile.validate().map_err(|err| self.reject(err))
    }

    fn ensure_room(&mut self, profile: &PlayerProfile, stat: StatKind, amount: u64) -> Result<()> {
        if profile.stat_xp(stat).checked_add(amount).is_none() {
            return Err(self.reject(ProgressionError::XpOverflow { stat }));
        }
        if profile.total_xp.checked_add(amount).is_none() {
            return Err(self.reject(ProgressionError::TotalXpOverflow));
        }
        Ok(())
    }

    /// Caller has already checked for overflow
    fn apply_stat_xp(&mut self, profile: &mut PlayerProfile, stat: StatKind, amount: u64) -> bool {
        let max_level = self.config.max_stat_level;
        profile.total_xp += amount;
        let total_xp = profile.total_xp;

        let (level, xp) = profile.stat_slots_mut(stat);
        *xp += amount;

        let mut new_level = None;
        if *level < max_level {
            let threshold = xp_required_for_next_level(*level);
            if *xp >= threshold {
                *xp -= threshold;
                *level += 1;
                new_level = Some(*level);
            }
        }
        let stat_xp = *xp;

        self.emit(ProgressionEvent::XpAwarded { stat, amount, stat_xp, total_xp });
        if let Some(new_level) = new_level {
            self.emit(ProgressionEvent::LevelUp { stat, new_level });
        }

        new_level.is_some()
    }

    fn reject(&mut self, err: ProgressionError) -> ProgressionError {
        self.emit(ProgressionEvent::Rejected { reason: err.to_string() });
        err
    }

    fn emit(&mut self, event: ProgressionEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_engine() -> (ProgressionEngine, Rc<RefCell<Vec<ProgressionEvent>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let engine = ProgressionEngine::default().with_observer(Rc::clone(&log));
        (engine, log)
    }

    #[test]
    fn test_exact_threshold_levels_up_and_drains() {
        for stat in StatKind::ALL {
            let mut engine = ProgressionEngine::default();
            let mut profile = PlayerProfile::new(1, "P1");

            assert!(engine.award_stat_xp(&mut profile, stat, 50).unwrap());
            assert_eq!(profile.level(stat), 2);
            assert_eq!(profile.stat_xp(stat), 0);

            assert!(engine.award_stat_xp(&mut profile, stat, 200).unwrap());
            assert_eq!(profile.level(stat), 3);
            assert_eq!(profile.stat_xp(stat), 0);
        }
    }

    #[test]
    fn test_below_threshold_banks() {
        let mut profile = PlayerProfile::new(1, "P1");
        assert!(!profile.add_move_speed_xp(49).unwrap());
        assert_eq!(profile.move_speed, 1);
        assert_eq!(profile.move_speed_xp, 49);

        assert!(profile.add_move_speed_xp(1).unwrap());
        assert_eq!(profile.move_speed, 2);
        assert_eq!(profile.move_speed_xp, 0);
    }

    #[test]
    fn test_single_level_up_per_call() {
        // 50 + 200 would cover two levels, but only one is taken per award
        let mut profile = PlayerProfile::new(1, "P1");
        assert!(profile.add_throw_power_xp(300).unwrap());
        assert_eq!(profile.throw_power, 2);
        assert_eq!(profile.throw_power_xp, 250);

        // Banked excess converts on the next award, even a zero one
        assert!(profile.add_throw_power_xp(0).unwrap());
        assert_eq!(profile.throw_power, 3);
        assert_eq!(profile.throw_power_xp, 50);
    }

    #[test]
    fn test_max_level_keeps_banking() {
        let mut profile = PlayerProfile::new(1, "P1");
        profile.composure = 3;
        assert!(!profile.add_composure_xp(10_000).unwrap());
        assert_eq!(profile.composure, 3);
        assert_eq!(profile.composure_xp, 10_000);
    }

    #[test]
    fn test_negative_award_rejected_without_mutation() {
        let (mut engine, log) = recording_engine();
        let mut profile = PlayerProfile::new(1, "P1");
        profile.composure_xp = 20;
        let before = profile.clone();

        let err = engine.award_stat_xp(&mut profile, StatKind::Composure, -5).unwrap_err();
        assert!(matches!(err, ProgressionError::NegativeXp { amount: -5, .. }));
        assert_eq!(profile, before);
        assert!(matches!(log.borrow()[0], ProgressionEvent::Rejected { .. }));
    }

    #[test]
    fn test_overflow_rejected_without_mutation() {
        let mut profile = PlayerProfile::new(1, "P1");
        profile.composure = 3;
        profile.composure_xp = u64::MAX - 1;
        profile.total_xp = u64::MAX - 1;
        let before = profile.clone();

        let err = profile.receive_sabotage(SabotageKind::EggThrow).unwrap_err();
        assert!(matches!(err, ProgressionError::XpOverflow { stat: StatKind::Composure }));
        assert_eq!(profile, before);
    }

    #[test]
    fn test_win_split() {
        let mut profile = PlayerProfile::new(1, "P1");
        assert!(!profile.award_game_xp(true).unwrap());

        assert_eq!(profile.throw_power_xp, 14);
        assert_eq!(profile.move_speed_xp, 13);
        assert_eq!(profile.composure_xp, 13);
        assert_eq!(profile.total_xp, 40);
        assert_eq!(profile.games_won, 1);
        assert_eq!(profile.games_lost, 0);
    }

    #[test]
    fn test_loss_split() {
        let mut profile = PlayerProfile::new(1, "P1");
        assert!(!profile.award_game_xp(false).unwrap());

        assert_eq!(profile.throw_power_xp, 4);
        assert_eq!(profile.move_speed_xp, 3);
        assert_eq!(profile.composure_xp, 3);
        assert_eq!(profile.total_xp, 10);
        assert_eq!(profile.games_lost, 1);
    }

    #[test]
    fn test_four_wins_level_all_stats() {
        let mut profile = PlayerProfile::new(1, "P1");
        let mut leveled = Vec::new();
        for _ in 0..4 {
            leveled.push(profile.award_game_xp(true).unwrap());
        }
        // ThrowPower hits 56 on the 4th win, the others 52
        assert_eq!(leveled, vec![false, false, false, true]);
        assert_eq!(profile.throw_power, 2);
        assert_eq!(profile.throw_power_xp, 6);
        assert_eq!(profile.move_speed, 2);
        assert_eq!(profile.move_speed_xp, 2);
        assert_eq!(profile.composure, 2);
        assert_eq!(profile.total_xp, 160);
    }

    #[test]
    fn test_sabotage_performed_targets() {
        let mut profile = PlayerProfile::new(1, "P1");
        profile.award_sabotage_xp(SabotageKind::StinkBomb).unwrap();
        assert_eq!(profile.move_speed_xp, 20);
        assert_eq!(profile.throw_power_xp, 0);
        assert_eq!(profile.successful_sabotages, 1);

        profile.award_sabotage_xp(SabotageKind::EggThrow).unwrap();
        assert_eq!(profile.throw_power_xp, 20);
        assert_eq!(profile.successful_sabotages, 2);
        assert_eq!(profile.total_xp, 40);
    }

    #[test]
    fn test_received_uses_profile_reward() {
        let mut profile = PlayerProfile::new(1, "P1");
        profile.resilience_xp_reward = 50;
        assert!(profile.receive_sabotage(SabotageKind::EggThrow).unwrap());
        assert_eq!(profile.times_egged, 1);
        assert_eq!(profile.composure, 2);
        assert_eq!(profile.composure_xp, 0);
    }

    #[test]
    fn test_new_profile_takes_configured_reward() {
        let engine = ProgressionEngine::new(ProgressionConfig::casual());
        let profile = engine.new_profile(3, "Lee");
        assert_eq!(profile.resilience_xp_reward, 10);
        assert_eq!(profile.player_id(), 3);
    }

    #[test]
    fn test_lower_max_level_caps_early() {
        let config = ProgressionConfig { max_stat_level: 2, ..Default::default() };
        let mut engine = ProgressionEngine::new(config);
        let mut profile = PlayerProfile::new(1, "P1");
        profile.move_speed = 2;

        assert!(!engine.award_stat_xp(&mut profile, StatKind::MoveSpeed, 450).unwrap());
        assert_eq!(profile.move_speed, 2);
        assert_eq!(profile.move_speed_xp, 450);
    }

    #[test]
    fn test_max_level_above_three_never_reaches_engine() {
        let config = ProgressionConfig { max_stat_level: 9, ..Default::default() };
        assert!(matches!(config.validate(), Err(ProgressionError::InvalidConfig(_))));

        // Default engine stops at 3 no matter how much XP is banked
        let mut profile = PlayerProfile::new(1, "P1");
        profile.throw_power = 3;
        profile.throw_power_xp = 440;
        assert!(!profile.award_sabotage_xp(SabotageKind::EggThrow).unwrap());
        assert_eq!(profile.throw_power, 3);
        assert_eq!(profile.throw_power_xp, 460);
    }

    #[test]
    fn test_level_zero_profile_rejected_without_mutation() {
        let (mut engine, log) = recording_engine();
        let mut profile = PlayerProfile::new(1, "P1");
        profile.composure = 0;
        let before = profile.clone();

        let err = engine.award_stat_xp(&mut profile, StatKind::Composure, 0).unwrap_err();
        assert!(matches!(err, ProgressionError::InvalidProfile(_)));
        assert_eq!(profile, before);
        assert!(matches!(log.borrow()[0], ProgressionEvent::Rejected { .. }));

        assert!(profile.award_game_xp(true).is_err());
        assert!(profile.receive_sabotage(SabotageKind::StinkBomb).is_err());
        assert!(profile.award_sabotage_xp(SabotageKind::EggThrow).is_err());
        assert_eq!(profile, before);
    }

    #[test]
    fn test_total_overflow_blames_total() {
        let mut profile = PlayerProfile::new(1, "P1");
        profile.total_xp = u64::MAX - 5;
        let before = profile.clone();

        let err = profile.award_game_xp(false).unwrap_err();
        assert!(matches!(err, ProgressionError::TotalXpOverflow));
        assert_eq!(profile, before);

        let err = profile.add_move_speed_xp(10).unwrap_err();
        assert!(matches!(err, ProgressionError::TotalXpOverflow));
        assert_eq!(profile, before);
    }

    #[test]
    fn test_event_order() {
        let (mut engine, log) = recording_engine();
        let mut profile = PlayerProfile::new(1, "P1");
        profile.throw_power_xp = 40;

        engine.award_sabotage_performed(&mut profile, SabotageKind::EggThrow).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                ProgressionEvent::XpAwarded {
                    stat: StatKind::ThrowPower,
                    amount: 20,
                    stat_xp: 10,
                    total_xp: 20,
                },
                ProgressionEvent::LevelUp { stat: StatKind::ThrowPower, new_level: 2 },
                ProgressionEvent::SabotagePerformed { kind: SabotageKind::EggThrow },
            ]
        );
    }

    #[test]
    fn test_received_event_follows_award() {
        let (mut engine, log) = recording_engine();
        let mut profile = PlayerProfile::new(1, "P1");
        profile.composure_xp = 45;

        assert!(engine.record_sabotage_received(&mut profile, SabotageKind::StinkBomb).unwrap());

        assert_eq!(
            *log.borrow(),
            vec![
                ProgressionEvent::XpAwarded {
                    stat: StatKind::Composure,
                    amount: 5,
                    stat_xp: 0,
                    total_xp: 5,
                },
                ProgressionEvent::LevelUp { stat: StatKind::Composure, new_level: 2 },
                ProgressionEvent::SabotageReceived { kind: SabotageKind::StinkBomb },
            ]
        );
    }

    #[test]
    fn test_apply_dispatch() {
        let mut engine = ProgressionEngine::default();
        let mut profile = PlayerProfile::new(1, "P1");
        let received = GameplayEvent::SabotageReceived { kind: SabotageKind::StinkBomb };
        let direct = GameplayEvent::AwardStatXp { stat: StatKind::MoveSpeed, amount: 7 };

        engine.apply(&mut profile, &GameplayEvent::HandResolved { won: false }).unwrap();
        engine.apply(&mut profile, &received).unwrap();
        engine.apply(&mut profile, &direct).unwrap();

        assert_eq!(profile.games_lost, 1);
        assert_eq!(profile.times_stink_bombed, 1);
        assert_eq!(profile.composure_xp, 8);
        assert_eq!(profile.move_speed_xp, 10);
        assert_eq!(profile.total_xp, 22);
    }

    #[test]
    fn test_gameplay_event_json_shape() {
        let event: GameplayEvent =
            serde_json::from_str(r#"{"type":"SabotagePerformed","kind":"StinkBomb"}"#).unwrap();
        assert_eq!(event, GameplayEvent::SabotagePerformed { kind: SabotageKind::StinkBomb });

        let bad = r#"{"type":"SabotagePerformed","kind":"Sink"}"#;
        assert!(serde_json::from_str::<GameplayEvent>(bad).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_stat() -> impl Strategy<Value = StatKind> {
            prop_oneof![
                Just(StatKind::ThrowPower),
                Just(StatKind::MoveSpeed),
                Just(StatKind::Composure),
            ]
        }

        fn any_event() -> impl Strategy<Value = GameplayEvent> {
            let kind = prop_oneof![Just(SabotageKind::EggThrow), Just(SabotageKind::StinkBomb)];
            prop_oneof![
                any::<bool>().prop_map(|won| GameplayEvent::HandResolved { won }),
                kind.clone().prop_map(|kind| GameplayEvent::SabotagePerformed { kind }),
                kind.prop_map(|kind| GameplayEvent::SabotageReceived { kind }),
                (any_stat(), 0i64..600)
                    .prop_map(|(stat, amount)| GameplayEvent::AwardStatXp { stat, amount }),
            ]
        }

        fn event_xp(event: &GameplayEvent, profile: &PlayerProfile) -> u64 {
            match event {
                GameplayEvent::HandResolved { won: true } => 40,
                GameplayEvent::HandResolved { won: false } => 10,
                GameplayEvent::SabotagePerformed { .. } => 20,
                GameplayEvent::SabotageReceived { .. } => profile.resilience_xp_reward as u64,
                GameplayEvent::AwardStatXp { amount, .. } => *amount as u64,
            }
        }

        proptest! {
            /// threshold + k levels up once and leaves k banked
            #[test]
            fn prop_threshold_plus_k(
                stat in any_stat(),
                start in 1u32..=2,
                k_seed in any::<u64>(),
            ) {
                let threshold = xp_required_for_next_level(start);
                let k = k_seed % xp_required_for_next_level(start + 1);

                let mut profile = PlayerProfile::new(1, "P1");
                *profile.stat_slots_mut(stat).0 = start;

                let leveled = profile.add_stat_xp(stat, (threshold + k) as i64).unwrap();
                prop_assert!(leveled);
                prop_assert_eq!(profile.level(stat), start + 1);
                prop_assert_eq!(profile.stat_xp(stat), k);
            }

            /// Levels stay in 1..=3, never retreat, and total_xp tracks every award
            #[test]
            fn prop_event_sequences(events in proptest::collection::vec(any_event(), 0..80)) {
                let mut engine = ProgressionEngine::default();
                let mut profile = PlayerProfile::new(1, "P1");
                let mut expected_total = 0u64;

                for event in &events {
                    let before: Vec<u32> =
                        StatKind::ALL.iter().map(|s| profile.level(*s)).collect();
                    expected_total += event_xp(event, &profile);
                    engine.apply(&mut profile, event).unwrap();

                    for (stat, old) in StatKind::ALL.iter().zip(before) {
                        let level = profile.level(*stat);
                        prop_assert!((1..=3).contains(&level));
                        prop_assert!(level == old || level == old + 1);
                    }
                }

                prop_assert_eq!(profile.total_xp, expected_total);
                prop_assert!(profile.get_blur_multiplier() >= 0.20);
            }
        }
    }
}
