//! Input mapping
//!
//! The host captures key and pointer events; this module turns them into
//! gameplay intents. Unknown keys map to nothing.

use crate::sim::{GamePhase, GameState};

/// Raw event delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    KeyDown(String),
    KeyUp(String),
    /// Absolute pointer x in canvas coordinates
    PointerMove(f32),
    PointerClick,
}

/// What the player wants to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    ReleaseLeft,
    ReleaseRight,
    /// Center the paddle under this x
    PointTo(f32),
    /// Start a match from idle, or launch the ball
    Launch,
    /// Pause or resume
    Pause,
    /// Pause while playing, resume while paused, close the scoreboard
    Cancel,
    Quit,
    Restart,
    ToggleScores,
}

/// Map a key code (DOM `KeyboardEvent.code` naming) to an intent
pub fn map_key(code: &str, pressed: bool) -> Option<Intent> {
    let intent = match (code, pressed) {
        ("ArrowLeft" | "KeyA", true) => Intent::MoveLeft,
        ("ArrowLeft" | "KeyA", false) => Intent::ReleaseLeft,
        ("ArrowRight" | "KeyD", true) => Intent::MoveRight,
        ("ArrowRight" | "KeyD", false) => Intent::ReleaseRight,
        (_, false) => return None,
        ("Space" | "Enter", true) => Intent::Launch,
        ("KeyP", true) => Intent::Pause,
        ("Escape", true) => Intent::Cancel,
        ("KeyQ", true) => Intent::Quit,
        ("KeyR", true) => Intent::Restart,
        ("KeyS", true) => Intent::ToggleScores,
        _ => return None,
    };
    Some(intent)
}

/// Map any raw event to an intent
pub fn map_input(input: &RawInput) -> Option<Intent> {
    match input {
        RawInput::KeyDown(code) => map_key(code, true),
        RawInput::KeyUp(code) => map_key(code, false),
        RawInput::PointerMove(x) if x.is_finite() => Some(Intent::PointTo(*x)),
        RawInput::PointerMove(_) => None,
        RawInput::PointerClick => Some(Intent::Launch),
    }
}

/// Demo/attract mode: intents that keep the paddle under the ball
///
/// Aims slightly off-center using the tick counter so rallies do not loop.
pub fn autopilot(state: &GameState) -> Vec<Intent> {
    match state.phase {
        GamePhase::Idle => vec![Intent::Launch],
        GamePhase::Playing if !state.ball.launched => vec![Intent::Launch],
        GamePhase::Playing => {
            let t = state.time_ticks as f32 * 0.02;
            let offset = t.sin() * state.paddle.width * 0.3;
            // Lead the ball a little when it is falling
            let lead = if state.ball.vel.y > 0.0 {
                state.ball.vel.x * 4.0
            } else {
                0.0
            };
            vec![Intent::PointTo(state.ball.pos.x + lead + offset)]
        }
        _ => Vec::new(),
    }
}
