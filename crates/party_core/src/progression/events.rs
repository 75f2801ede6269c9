//! Progression Events
//!
//! Structured notifications the engine emits while applying awards. Nothing
//! in the engine depends on them; collaborators attach an observer to log,
//! animate or record what happened.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::stat::{GameOutcome, SabotageKind, StatKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProgressionEvent {
    /// XP landed on a stat (after any level-up drain)
    XpAwarded { stat: StatKind, amount: u64, stat_xp: u64, total_xp: u64 },
    LevelUp { stat: StatKind, new_level: u32 },
    GameRecorded { outcome: GameOutcome, xp: u32 },
    SabotagePerformed { kind: SabotageKind },
    SabotageReceived { kind: SabotageKind },
    /// An award was refused and nothing changed
    Rejected { reason: String },
}

/// Receives engine events in emission order
pub trait ProgressionObserver {
    fn on_event(&mut self, event: &ProgressionEvent);
}

impl<F> ProgressionObserver for F
where
    F: FnMut(&ProgressionEvent),
{
    fn on_event(&mut self, event: &ProgressionEvent) {
        self(event)
    }
}

impl ProgressionObserver for Vec<ProgressionEvent> {
    fn on_event(&mut self, event: &ProgressionEvent) {
        self.push(event.clone());
    }
}

/// Shared recorder the caller can still read after handing it to an engine
impl<O> ProgressionObserver for Rc<RefCell<O>>
where
    O: ProgressionObserver + ?Sized,
{
    fn on_event(&mut self, event: &ProgressionEvent) {
        self.borrow_mut().on_event(event);
    }
}

/// Forwards events to the `log` facade
#[derive(Debug, Clone, Default)]
pub struct LogObserver {
    /// Prefix for every line, usually the player name
    pub tag: String,
}

impl LogObserver {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl ProgressionObserver for LogObserver {
    fn on_event(&mut self, event: &ProgressionEvent) {
        match event {
            ProgressionEvent::XpAwarded { stat, amount, stat_xp, total_xp } => {
                log::debug!(
                    "[{}] +{} {} XP (stat xp {}, total {})",
                    self.tag,
                    amount,
                    stat,
                    stat_xp,
                    total_xp
                );
            }
            ProgressionEvent::LevelUp { stat, new_level } => {
                log::info!("[{}] {} leveled up to {}", self.tag, stat.display_name(), new_level);
            }
            ProgressionEvent::GameRecorded { outcome, xp } => {
                log::info!("[{}] hand {:?}, {} XP awarded", self.tag, outcome, xp);
            }
            ProgressionEvent::SabotagePerformed { kind } => {
                log::debug!("[{}] sabotage performed: {}", self.tag, kind);
            }
            ProgressionEvent::SabotageReceived { kind } => {
                log::debug!("[{}] sabotage received: {}", self.tag, kind);
            }
            ProgressionEvent::Rejected { reason } => {
                log::warn!("[{}] award rejected: {}", self.tag, reason);
            }
        }
    }
}
