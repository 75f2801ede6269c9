// Progression JSON API - called from the Godot bridge
use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::ProgressionConfig;
use crate::progression::{
    DerivedValues, GameplayEvent, LogObserver, PlayerProfile, ProgressionEngine, ProgressionEvent,
    ProgressionObserver, StatProgress,
};
use crate::SCHEMA_VERSION;

/// Progression request - sent from Godot
#[derive(Debug, Deserialize)]
pub struct ProgressionRequest {
    pub schema_version: u8,
    pub profile: PlayerProfile,
    pub event: GameplayEvent,
    /// Falls back to the standard reward table
    #[serde(default)]
    pub config: Option<ProgressionConfig>,
}

/// Progression response - sent back to Godot
#[derive(Debug, Serialize)]
pub struct ProgressionResponse {
    pub schema_version: u8,
    pub success: bool,
    pub leveled_up: bool,
    pub profile: PlayerProfile,
    pub derived: DerivedValues,
    pub stats: Vec<StatProgress>,
    pub events: Vec<ProgressionEvent>,
    pub error_message: Option<String>,
}

/// Read-only view for HUD refreshes
#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub schema_version: u8,
    pub player_id: i64,
    pub player_name: String,
    pub total_xp: u64,
    pub overall_level: u32,
    pub games_played: u32,
    pub win_rate: f32,
    pub successful_sabotages: u32,
    pub times_sabotaged: u32,
    pub derived: DerivedValues,
    pub stats: Vec<StatProgress>,
}

impl ProfileSummary {
    pub fn from_profile(profile: &PlayerProfile) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            player_id: profile.player_id(),
            player_name: profile.player_name.clone(),
            total_xp: profile.total_xp,
            overall_level: profile.overall_level(),
            games_played: profile.games_played(),
            win_rate: profile.win_rate(),
            successful_sabotages: profile.successful_sabotages,
            times_sabotaged: profile.times_sabotaged(),
            derived: profile.derived_values(),
            stats: profile.all_stat_progress(),
        }
    }
}

/// Collects events for the response while still logging them
struct ResponseRecorder {
    events: Rc<RefCell<Vec<ProgressionEvent>>>,
    log: LogObserver,
}

impl ProgressionObserver for ResponseRecorder {
    fn on_event(&mut self, event: &ProgressionEvent) {
        self.log.on_event(event);
        self.events.borrow_mut().push(event.clone());
    }
}

/// Apply one gameplay event to a profile.
///
/// Malformed JSON, unsupported schema versions, invalid configs and profiles
/// with a stat below level 1 are `Err`. Rule violations (negative XP,
/// overflow) come back as `success: false` with the profile unchanged.
pub fn apply_progression_json(request_json: &str) -> Result<String, String> {
    let request: ProgressionRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {}", e))?;

    if request.schema_version != SCHEMA_VERSION {
        return Err(format!("Unsupported schema version: {}", request.schema_version));
    }

    let config = request.config.unwrap_or_default();
    config.validate().map_err(|e| e.to_string())?;
    request.profile.validate().map_err(|e| e.to_string())?;

    let max_level = config.max_stat_level;
    let mut profile = request.profile;
    let events = Rc::new(RefCell::new(Vec::new()));
    let recorder = ResponseRecorder {
        events: Rc::clone(&events),
        log: LogObserver::new(profile.player_name.clone()),
    };
    let mut engine = ProgressionEngine::new(config).with_observer(recorder);

    let (success, leveled_up, error_message) = match engine.apply(&mut profile, &request.event) {
        Ok(leveled_up) => (true, leveled_up, None),
        Err(e) => (false, false, Some(e.to_string())),
    };
    drop(engine);

    let events = events.borrow().clone();
    let response = ProgressionResponse {
        schema_version: SCHEMA_VERSION,
        success,
        leveled_up,
        derived: profile.derived_values(),
        stats: profile.all_stat_progress_capped(max_level),
        profile,
        events,
        error_message,
    };

    serde_json::to_string(&response).map_err(|e| format!("Failed to serialize response: {}", e))
}

/// Summarize a profile without mutating it
pub fn profile_summary_json(profile_json: &str) -> Result<String, String> {
    let profile: PlayerProfile =
        serde_json::from_str(profile_json).map_err(|e| format!("Invalid profile JSON: {}", e))?;
    profile.validate().map_err(|e| e.to_string())?;

    serde_json::to_string(&ProfileSummary::from_profile(&profile))
        .map_err(|e| format!("Failed to serialize summary: {}", e))
}
