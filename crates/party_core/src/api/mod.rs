pub mod progression_json;

pub use progression_json::{
    apply_progression_json, profile_summary_json, ProfileSummary, ProgressionRequest,
    ProgressionResponse,
};
