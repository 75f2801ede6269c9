//! Leveling & Derived-Value Formulas
//!
//! Pure functions of a stat level. Nothing here looks at XP counters except
//! the threshold lookups themselves.
//!
//! ## Leveling curve
//!
//! | Level | XP to next level | Cumulative XP to reach |
//! |-------|------------------|------------------------|
//! | 1     | 50               | 0                      |
//! | 2     | 200              | 50                     |
//! | 3     | 450              | 250                    |
//!
//! Per-stat leveling drains the counter by the per-level threshold. The
//! cumulative table assumes XP is never reset and is for reporting only;
//! the two models must not be mixed.
//!
//! ## Derived values
//!
//! | Stat       | Lv 1 | Lv 2 | Lv 3 | Beyond 3                          |
//! |------------|------|------|------|-----------------------------------|
//! | Coverage   | 0.20 | 0.50 | 0.80 | `0.80 + (lv-3) * 0.02`            |
//! | Speed px/s | 80   | 110  | 140  | `140 + (lv-3) * 5`                |
//! | Blur mult. | 1.00 | 0.75 | 0.50 | `0.50 - (lv-3) * 0.05`, floor 0.2 |
//! | Max eggs   | 3    | 4    | 5    | `2 + lv`                          |

/// Highest level any award operation will reach.
pub const MAX_STAT_LEVEL: u32 = 3;

/// Ceiling of the total-XP level lookup.
pub const MAX_LOOKUP_LEVEL: u32 = 10;

const XP_CURVE_FACTOR: u64 = 50;
const MIN_BLUR_MULTIPLIER: f32 = 0.20;

/// XP gap between `current_level` and `current_level + 1`
pub fn xp_required_for_next_level(current_level: u32) -> u64 {
    let level = current_level as u64;
    XP_CURVE_FACTOR * level * level
}

/// Cumulative XP needed to reach `level` from level 1 without resets
pub fn xp_to_reach_level(level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }
    (1..level).map(xp_required_for_next_level).sum()
}

/// Level implied by a raw XP total (1..=10)
pub fn level_from_total_xp(xp: i64) -> u32 {
    if xp <= 0 {
        return 1;
    }
    let xp = xp as u64;
    (1..=MAX_LOOKUP_LEVEL).rev().find(|&level| xp_to_reach_level(level) <= xp).unwrap_or(1)
}

/// Fraction of the target area an egg splat covers
pub fn throw_coverage(throw_power: u32) -> f32 {
    match throw_power {
        0 | 1 => 0.20,
        2 => 0.50,
        3 => 0.80,
        lv => 0.80 + (lv - 3) as f32 * 0.02,
    }
}

/// Movement speed in px/s
pub fn movement_speed(move_speed: u32) -> f32 {
    match move_speed {
        0 | 1 => 80.0,
        2 => 110.0,
        3 => 140.0,
        lv => 140.0 + (lv - 3) as f32 * 5.0,
    }
}

/// Stink-bomb blur multiplier (lower is better), never below 0.20
pub fn blur_multiplier(composure: u32) -> f32 {
    let raw = match composure {
        0 | 1 => 1.00,
        2 => 0.75,
        3 => 0.50,
        lv => 0.50 - (lv - 3) as f32 * 0.05,
    };
    raw.max(MIN_BLUR_MULTIPLIER)
}

/// Eggs a player can carry at once
pub fn max_eggs(throw_power: u32) -> u32 {
    2 + throw_power.max(1)
}
