//! Brick Rally - A brick-breaker arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (paddle, ball, bricks, match controller)
//! - `config`: Immutable match configuration supplied at construction
//! - `input`: Mapping from raw key/pointer events to gameplay intents
//! - `highscores`: Leaderboard cache and score request types
//! - `persistence`: Score storage collaborators
//! - `platform`: Logging, time and frame scheduling

pub mod config;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use highscores::{HighScores, ScoreEntry, ScoreRequest};
pub use input::{Intent, RawInput};
pub use sim::{GameEvent, GamePhase, GameState};

/// Game tuning constants that are not part of the configuration
pub mod consts {
    /// Fixed simulation timestep (60 Hz frame tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum ticks run per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Gap between the paddle's bottom edge and the canvas bottom
    pub const PADDLE_BOTTOM_OFFSET: f32 = 30.0;

    /// Speed multiplier applied on every paddle bounce
    pub const PADDLE_BOUNCE_SPEEDUP: f32 = 1.02;
    /// Outgoing angle range off the paddle: hit offset in [-0.5, 0.5] times this (~±63°)
    pub const PADDLE_BOUNCE_SPREAD: f32 = std::f32::consts::PI * 0.7;

    /// Launch deviation from straight up, either side (radians, 30°)
    pub const LAUNCH_MAX_DEVIATION: f32 = std::f32::consts::FRAC_PI_6;

    /// Combo needed for the ×1.5 multiplier
    pub const COMBO_TIER_LOW: u32 = 5;
    /// Combo needed for the ×2 multiplier
    pub const COMBO_TIER_HIGH: u32 = 10;
}

/// Score multiplier for the given combo count
#[inline]
pub fn combo_multiplier(combo: u32) -> f64 {
    use consts::{COMBO_TIER_HIGH, COMBO_TIER_LOW};

    if combo >= COMBO_TIER_HIGH {
        2.0
    } else if combo >= COMBO_TIER_LOW {
        1.5
    } else {
        1.0
    }
}

/// Points awarded for a brick worth `base` at the given combo
#[inline]
pub fn combo_points(base: u32, combo: u32) -> u64 {
    (base as f64 * combo_multiplier(combo)).floor() as u64
}
