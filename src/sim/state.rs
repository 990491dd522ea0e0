//! Match state and core simulation types
//!
//! `GameState` exclusively owns the paddle, ball, brick field and all scalar
//! match state. Only the controller in `tick.rs` mutates it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::bricks::{Brick, BrickField};
use super::paddle::Paddle;
use crate::config::{ConfigError, GameConfig};
use crate::highscores::{HighScores, ScoreEntry, ScoreRequest};
use crate::persistence::ScoreError;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    #[default]
    Idle,
    /// Active gameplay, ticked every frame
    Playing,
    /// Game is paused
    Paused,
    /// Out of lives
    GameOver,
    /// Final stage cleared
    Clear,
    /// Leaderboard overlay; returns to the phase it was opened from
    Scores,
}

/// Something the host may want to render, play or act on
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    BallLaunched,
    PaddleBounce,
    BrickHit { index: usize },
    BrickDestroyed { index: usize, points: u64, combo: u32 },
    BallLost { lives_left: u8 },
    StageStarted { stage: u32 },
    /// Fire-and-forget work for the score store
    ScoreRequested(ScoreRequest),
}

/// Read-only view for rendering and comparisons
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub stage: u32,
    pub combo: u32,
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Phase to return to when the scoreboard closes
    pub previous_phase: GamePhase,
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: BrickField,
    pub score: u64,
    pub lives: u8,
    /// Current stage (1-based)
    pub stage: u32,
    /// Consecutive brick destructions since the last lost ball or stage start
    pub combo: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Score captured when the match ended
    pub final_score: Option<u64>,
    /// Latest leaderboard fetched from the score store
    pub leaderboard: HighScores,
    awaiting_submit: bool,
}

impl GameState {
    /// Create an idle match. Fails when the configuration is unusable.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let paddle = Paddle::new(&config);
        let ball = Ball::new(&config);
        let bricks = BrickField::new(config.brick, config.canvas.width);
        let lives = config.lives;

        let mut state = Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            previous_phase: GamePhase::Idle,
            paddle,
            ball,
            bricks,
            score: 0,
            lives,
            stage: 1,
            combo: 0,
            time_ticks: 0,
            final_score: None,
            leaderboard: HighScores::new(),
            awaiting_submit: false,
        };
        state.reset_match();
        Ok(state)
    }

    /// Whether the frame loop should be ticking
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_last_stage(&self) -> bool {
        self.stage >= self.config.max_stage
    }

    /// Move to a new phase, reporting the change
    pub(crate) fn set_phase(&mut self, to: GamePhase, events: &mut Vec<GameEvent>) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        log::info!("Phase {:?} -> {:?}", from, to);
        events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Lay out a stage and put paddle and ball back at the start
    pub(crate) fn start_stage(&mut self, stage: u32, events: &mut Vec<GameEvent>) {
        self.stage = stage;
        self.bricks.create_bricks(stage);
        self.paddle.reset();
        self.ball.reset(&self.paddle);
        self.combo = 0;
        log::info!("Stage {} of {}", stage, self.config.max_stage);
        events.push(GameEvent::StageStarted { stage });
    }

    /// Back to initial values: score, lives, stage 1 layout, combo, paddle and ball
    pub(crate) fn reset_match(&mut self) {
        self.score = 0;
        self.lives = self.config.lives;
        self.stage = 1;
        self.combo = 0;
        self.final_score = None;
        self.awaiting_submit = false;
        self.bricks.create_bricks(1);
        self.paddle.reset();
        self.ball.reset(&self.paddle);
    }

    /// Freeze the score at the end of a match
    pub(crate) fn finish_match(&mut self) {
        self.final_score = Some(self.score);
        self.awaiting_submit = self.score > 0;
    }

    /// Request storing the finished match under `name`
    ///
    /// Yields a request at most once per finished match, only for a positive
    /// score and a non-blank name.
    pub fn submit_score(&mut self, name: &str) -> Option<ScoreRequest> {
        let name = name.trim();
        if !self.awaiting_submit || name.is_empty() {
            return None;
        }
        let score = self.final_score?;
        self.awaiting_submit = false;
        Some(ScoreRequest::Submit {
            name: name.to_string(),
            score,
        })
    }

    /// Feed a completed fetch into the leaderboard cache
    ///
    /// Failures leave an empty board; gameplay state is never touched.
    pub fn apply_scores(&mut self, result: Result<Vec<ScoreEntry>, ScoreError>) {
        match result {
            Ok(entries) => {
                log::debug!("Leaderboard refreshed ({} entries)", entries.len());
                self.leaderboard.replace_all(entries);
            }
            Err(e) => {
                log::warn!("Failed to fetch scores: {}", e);
                self.leaderboard.clear();
            }
        }
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            phase: self.phase,
            score: self.score,
            lives: self.lives,
            stage: self.stage,
            combo: self.combo,
            paddle: self.paddle.clone(),
            ball: self.ball.clone(),
            bricks: self.bricks.bricks.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle_stage_one() {
        let state = GameState::new(GameConfig::default(), 1).expect("valid config");
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.stage, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.bricks.remaining_count(), 50);
        assert!(!state.ball.launched);
        assert_eq!(state.ball.pos.x, state.paddle.center_x());
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let mut config = GameConfig::default();
        config.canvas.height = -1.0;
        assert!(GameState::new(config, 1).is_err());
    }

    #[test]
    fn test_submit_only_once_with_name() {
        let mut state = GameState::new(GameConfig::default(), 1).expect("valid config");
        assert_eq!(state.submit_score("ann"), None);

        state.score = 120;
        state.finish_match();
        assert_eq!(state.submit_score("   "), None);
        assert_eq!(
            state.submit_score(" ann "),
            Some(ScoreRequest::Submit {
                name: "ann".to_string(),
                score: 120
            })
        );
        assert_eq!(state.submit_score("ann"), None);
    }

    #[test]
    fn test_zero_score_is_not_submitted() {
        let mut state = GameState::new(GameConfig::default(), 1).expect("valid config");
        state.finish_match();
        assert_eq!(state.final_score, Some(0));
        assert_eq!(state.submit_score("ann"), None);
    }

    #[test]
    fn test_apply_scores_failure_empties_board() {
        let mut state = GameState::new(GameConfig::default(), 1).expect("valid config");
        state.apply_scores(Ok(vec![ScoreEntry {
            name: "ann".to_string(),
            score: 50,
            date: 0.0,
        }]));
        assert_eq!(state.leaderboard.top_score(), Some(50));

        state.apply_scores(Err(ScoreError::Unavailable));
        assert!(state.leaderboard.is_empty());
        assert_eq!(state.phase, GamePhase::Idle);
    }
}
