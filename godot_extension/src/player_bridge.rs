//! PlayerData Bridge for Godot
//!
//! One instance per player node. Wraps a `PlayerProfile` and the engine that
//! mutates it; GDScript calls in on gameplay events and reads derived values
//! back for movement and HUD code.

use std::cell::RefCell;

use godot::prelude::*;
use party_core::progression::{
    PlayerProfile, ProgressionEngine, ProgressionEvent, ProgressionObserver, SabotageKind,
    StatKind,
};
use party_core::{api::ProfileSummary, ProgressionConfig, ProgressionError};

/// Routes engine events to the Godot output panel
struct GodotLogObserver {
    tag: String,
}

impl ProgressionObserver for GodotLogObserver {
    fn on_event(&mut self, event: &ProgressionEvent) {
        match event {
            ProgressionEvent::LevelUp { stat, new_level } => {
                godot_print!("[{}] {} leveled up to {}", self.tag, stat.display_name(), new_level);
            }
            ProgressionEvent::XpAwarded { stat, amount, stat_xp, total_xp } => {
                godot_print!(
                    "[{}] +{} {} XP (stat xp {}, total {})",
                    self.tag,
                    amount,
                    stat,
                    stat_xp,
                    total_xp
                );
            }
            ProgressionEvent::Rejected { reason } => {
                godot_error!("[{}] award rejected: {}", self.tag, reason);
            }
            _ => {}
        }
    }
}

fn make_engine(config: ProgressionConfig, tag: &str) -> ProgressionEngine {
    ProgressionEngine::new(config).with_observer(GodotLogObserver { tag: tag.to_string() })
}

fn load_config() -> ProgressionConfig {
    match ProgressionConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            godot_error!("Falling back to default progression config: {}", e);
            ProgressionConfig::default()
        }
    }
}

/// Player progression - GDExtension wrapper for party_core
#[derive(GodotClass)]
#[class(base=RefCounted)]
pub struct PlayerDataBridge {
    base: Base<RefCounted>,
    profile: RefCell<PlayerProfile>,
    engine: RefCell<ProgressionEngine>,
}

#[godot_api]
impl IRefCounted for PlayerDataBridge {
    fn init(base: Base<RefCounted>) -> Self {
        crate::install_panic_hook();

        let config = load_config();
        let engine = make_engine(config, "player");
        let profile = engine.new_profile(0, "player");

        Self { base, profile: RefCell::new(profile), engine: RefCell::new(engine) }
    }
}

impl PlayerDataBridge {
    fn parse_kind(&self, kind: &GString) -> Option<SabotageKind> {
        match kind.to_string().parse::<SabotageKind>() {
            Ok(kind) => Some(kind),
            Err(e) => {
                godot_error!("{}", e);
                None
            }
        }
    }

    fn parse_stat(&self, stat: &GString) -> Option<StatKind> {
        match stat.to_string().parse::<StatKind>() {
            Ok(stat) => Some(stat),
            Err(e) => {
                godot_error!("{}", e);
                None
            }
        }
    }

    fn run<F>(&self, op: F) -> bool
    where
        F: FnOnce(&mut ProgressionEngine, &mut PlayerProfile) -> party_core::Result<bool>,
    {
        let mut engine = self.engine.borrow_mut();
        let mut profile = self.profile.borrow_mut();
        match op(&mut *engine, &mut *profile) {
            Ok(leveled_up) => leveled_up,
            Err(e) => {
                godot_error!("Progression error: {}", e);
                false
            }
        }
    }
}

#[godot_api]
impl PlayerDataBridge {
    /// Connection test - returns build info to confirm the extension loaded
    #[func]
    pub fn test_connection(&self) -> GString {
        GString::from(&format!("PlayerDataBridge {} - OK", crate::build_info()))
    }

    /// Reset to a fresh level-1 profile for a new session
    #[func]
    pub fn setup(&self, player_id: i64, player_name: GString) {
        let name = player_name.to_string();
        let config = self.engine.borrow().config().clone();
        let engine = make_engine(config, &name);
        *self.profile.borrow_mut() = engine.new_profile(player_id, name);
        *self.engine.borrow_mut() = engine;
    }

    /// Returns true if any stat leveled up
    #[func]
    pub fn award_game_outcome(&self, won: bool) -> bool {
        self.run(|engine, profile| engine.award_game_outcome_xp(profile, won))
    }

    /// `kind`: "EggThrow" or "StinkBomb"
    #[func]
    pub fn award_sabotage_performed(&self, kind: GString) -> bool {
        let Some(kind) = self.parse_kind(&kind) else {
            return false;
        };
        self.run(|engine, profile| engine.award_sabotage_performed(profile, kind))
    }

    /// Returns true if Composure leveled up
    #[func]
    pub fn record_sabotage_received(&self, kind: GString) -> bool {
        let Some(kind) = self.parse_kind(&kind) else {
            return false;
        };
        self.run(|engine, profile| engine.record_sabotage_received(profile, kind))
    }

    /// Debug menu award
    #[func]
    pub fn award_stat_xp(&self, stat: GString, amount: i64) -> bool {
        let Some(stat) = self.parse_stat(&stat) else {
            return false;
        };
        self.run(|engine, profile| engine.award_stat_xp(profile, stat, amount))
    }

    // ========== Derived values ==========

    #[func]
    pub fn get_throw_coverage(&self) -> f32 {
        self.profile.borrow().get_throw_coverage()
    }

    /// Velocity magnitude in px/s
    #[func]
    pub fn get_movement_speed(&self) -> f32 {
        self.profile.borrow().get_movement_speed()
    }

    #[func]
    pub fn get_blur_multiplier(&self) -> f32 {
        self.profile.borrow().get_blur_multiplier()
    }

    #[func]
    pub fn get_max_eggs(&self) -> i64 {
        self.profile.borrow().get_max_eggs() as i64
    }

    // ========== Raw counters ==========

    #[func]
    pub fn get_player_id(&self) -> i64 {
        self.profile.borrow().player_id()
    }

    #[func]
    pub fn get_player_name(&self) -> GString {
        GString::from(self.profile.borrow().player_name.as_str())
    }

    /// -1 for an unknown stat name
    #[func]
    pub fn get_stat_level(&self, stat: GString) -> i64 {
        match self.parse_stat(&stat) {
            Some(stat) => self.profile.borrow().level(stat) as i64,
            None => -1,
        }
    }

    /// -1 for an unknown stat name
    #[func]
    pub fn get_stat_xp(&self, stat: GString) -> i64 {
        match self.parse_stat(&stat) {
            Some(stat) => i64::try_from(self.profile.borrow().stat_xp(stat)).unwrap_or(i64::MAX),
            None => -1,
        }
    }

    #[func]
    pub fn get_total_xp(&self) -> i64 {
        i64::try_from(self.profile.borrow().total_xp).unwrap_or(i64::MAX)
    }

    /// Counters and derived values in one Dictionary for the HUD
    #[func]
    pub fn get_stats_dict(&self) -> Dictionary {
        let profile = self.profile.borrow();
        let mut dict = Dictionary::new();
        dict.set("games_won", profile.games_won as i64);
        dict.set("games_lost", profile.games_lost as i64);
        dict.set("successful_sabotages", profile.successful_sabotages as i64);
        dict.set("times_egged", profile.times_egged as i64);
        dict.set("times_stink_bombed", profile.times_stink_bombed as i64);
        dict.set("throw_coverage", profile.get_throw_coverage());
        dict.set("movement_speed", profile.get_movement_speed());
        dict.set("blur_multiplier", profile.get_blur_multiplier());
        dict.set("max_eggs", profile.get_max_eggs() as i64);
        let max_level = self.engine.borrow().config().max_stat_level;
        for progress in profile.all_stat_progress_capped(max_level) {
            let key = format!("{}_label", progress.stat);
            dict.set(GString::from(key.as_str()), GString::from(progress.label().as_str()));
        }
        dict
    }

    /// Full summary as JSON (see `party_core::api::ProfileSummary`)
    #[func]
    pub fn get_summary_json(&self) -> GString {
        let summary = ProfileSummary::from_profile(&self.profile.borrow());
        match serde_json::to_string(&summary) {
            Ok(json) => GString::from(json.as_str()),
            Err(e) => {
                godot_error!("get_summary_json: {}", e);
                GString::new()
            }
        }
    }

    // ========== Persistence hand-off ==========

    /// Profile fields as JSON for the save system
    #[func]
    pub fn to_json(&self) -> GString {
        match serde_json::to_string(&*self.profile.borrow()) {
            Ok(json) => GString::from(json.as_str()),
            Err(e) => {
                godot_error!("to_json: {}", e);
                GString::new()
            }
        }
    }

    /// Replace the profile with one written by `to_json`
    #[func]
    pub fn load_json(&self, json: GString) -> bool {
        let parsed = serde_json::from_str::<PlayerProfile>(&json.to_string())
            .map_err(ProgressionError::from)
            .and_then(|profile| profile.validate().map(|()| profile));
        match parsed {
            Ok(profile) => {
                let config = self.engine.borrow().config().clone();
                *self.engine.borrow_mut() = make_engine(config, &profile.player_name);
                *self.profile.borrow_mut() = profile;
                true
            }
            Err(e) => {
                godot_error!("load_json: {}", e);
                false
            }
        }
    }

    /// Stateless JSON entry point, same contract as `party_core::apply_progression_json`
    #[func]
    pub fn apply_progression_json(&self, request_json: GString) -> GString {
        match party_core::apply_progression_json(&request_json.to_string()) {
            Ok(json) => GString::from(json.as_str()),
            Err(e) => {
                godot_error!("apply_progression_json: {}", e);
                let response = serde_json::json!({ "success": false, "error_message": e });
                GString::from(response.to_string().as_str())
            }
        }
    }
}
