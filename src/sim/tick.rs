//! Match controller
//!
//! `tick` advances one fixed frame while playing; `handle_intent` drives every
//! other transition. Both return the events produced so the host can render,
//! play sounds and service score requests.

use super::ball::BallStep;
use super::state::{GameEvent, GamePhase, GameState};
use crate::combo_points;
use crate::highscores::ScoreRequest;
use crate::input::Intent;

/// Advance the match by one frame
///
/// Does nothing unless the phase is `Playing`.
pub fn tick(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Playing {
        return events;
    }

    state.time_ticks += 1;
    state.paddle.update();

    match state.ball.update(&state.paddle) {
        BallStep::Attached => return events,
        BallStep::Lost => {
            ball_lost(state, &mut events);
            return events;
        }
        BallStep::PaddleBounce => events.push(GameEvent::PaddleBounce),
        BallStep::Moving => {}
    }

    // At most one brick per tick: the scan stops at the first overlap
    let ball = &mut state.ball;
    let hit = state
        .bricks
        .active_bricks()
        .map(|(i, b)| (i, b.rect()))
        .find(|(_, rect)| ball.check_brick_collision(rect))
        .map(|(i, _)| i);

    if let Some(index) = hit {
        brick_hit(state, index, &mut events);
    }

    events
}

fn brick_hit(state: &mut GameState, index: usize, events: &mut Vec<GameEvent>) {
    let Some(kind) = state.bricks.get(index).map(|b| b.kind) else {
        return;
    };
    events.push(GameEvent::BrickHit { index });
    if !state.bricks.hit(index) {
        return;
    }

    state.combo += 1;
    let points = combo_points(kind.score(), state.combo);
    state.score += points;
    log::debug!(
        "Brick {} destroyed: +{} (combo {}, score {})",
        index,
        points,
        state.combo,
        state.score
    );
    events.push(GameEvent::BrickDestroyed {
        index,
        points,
        combo: state.combo,
    });

    if state.bricks.remaining_count() == 0 {
        stage_cleared(state, events);
    }
}

fn stage_cleared(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.is_last_stage() {
        log::info!("All {} stages cleared, score {}", state.stage, state.score);
        state.finish_match();
        state.set_phase(GamePhase::Clear, events);
        events.push(GameEvent::ScoreRequested(ScoreRequest::Refresh));
    } else {
        let next = state.stage + 1;
        state.start_stage(next, events);
    }
}

fn ball_lost(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.lives = state.lives.saturating_sub(1);
    state.combo = 0;
    log::debug!("Ball lost, {} lives left", state.lives);
    events.push(GameEvent::BallLost {
        lives_left: state.lives,
    });

    if state.lives > 0 {
        state.ball.reset(&state.paddle);
    } else {
        log::info!("Game over, score {}", state.score);
        state.finish_match();
        state.set_phase(GamePhase::GameOver, events);
        events.push(GameEvent::ScoreRequested(ScoreRequest::Refresh));
    }
}

/// Apply one player intent
///
/// Intents that make no sense in the current phase are ignored.
pub fn handle_intent(state: &mut GameState, intent: Intent) -> Vec<GameEvent> {
    use GamePhase::*;

    let mut events = Vec::new();
    match (state.phase, intent) {
        (Idle, Intent::Launch) => {
            state.set_phase(Playing, &mut events);
            state.start_stage(1, &mut events);
        }

        (Playing, Intent::Launch) => {
            if !state.ball.launched {
                state.ball.launch(&mut state.rng);
                events.push(GameEvent::BallLaunched);
            }
        }
        (Playing, Intent::MoveLeft) => state.paddle.set_direction(-1),
        (Playing, Intent::MoveRight) => state.paddle.set_direction(1),
        (Playing, Intent::PointTo(x)) => state.paddle.set_position_x(x),
        (Playing | Paused, Intent::ReleaseLeft) => release(state, -1),
        (Playing | Paused, Intent::ReleaseRight) => release(state, 1),
        (Playing, Intent::Pause | Intent::Cancel) => state.set_phase(Paused, &mut events),

        (Paused, Intent::Pause | Intent::Cancel) => state.set_phase(Playing, &mut events),

        (Paused | GameOver | Clear, Intent::Quit) | (GameOver | Clear, Intent::Restart) => {
            state.reset_match();
            state.set_phase(Idle, &mut events);
            events.push(GameEvent::ScoreRequested(ScoreRequest::Refresh));
        }

        (Idle | GameOver | Clear, Intent::ToggleScores) => {
            state.previous_phase = state.phase;
            state.set_phase(Scores, &mut events);
        }
        (Scores, Intent::ToggleScores | Intent::Cancel) => {
            let back = state.previous_phase;
            state.set_phase(back, &mut events);
        }

        _ => {}
    }
    events
}

/// Stop keyboard movement if the released key is the one steering
fn release(state: &mut GameState, direction: i8) {
    if state.paddle.direction == direction {
        state.paddle.set_direction(0);
    }
}
