//! Godot bridge for the party minigame
//!
//! Scene scripts keep node wiring, input and rendering; every progression rule
//! runs in `party_core`.

use godot::prelude::*;
use std::sync::Once;

mod player_bridge;
pub use player_bridge::PlayerDataBridge;

struct PartyRustExtension;

#[gdextension]
unsafe impl ExtensionLibrary for PartyRustExtension {}

// Panic Hook
static PANIC_HOOK: Once = Once::new();
pub(crate) fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(s) = info.payload().downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = info.payload().downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            let loc = if let Some(l) = info.location() {
                format!("{}:{}:{}", l.file(), l.line(), l.column())
            } else {
                "unknown".to_string()
            };
            godot_error!("Rust panic at {}: {}", loc, msg);
        }));
    });
}

/// Build string shown in the debug overlay
pub(crate) fn build_info() -> String {
    format!(
        "party_rust v{} (core v{}, {} @ {})",
        env!("CARGO_PKG_VERSION"),
        party_core::VERSION,
        env!("GIT_HASH"),
        env!("BUILD_TIME_UTC")
    )
}
