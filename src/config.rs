//! Match configuration
//!
//! A single immutable structure handed to [`GameState::new`](crate::GameState::new).
//! Partial JSON files are accepted; missing fields fall back to defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canvas (playfield) dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Paddle size and keyboard speed (pixels per tick)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleConfig {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl Default for PaddleConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 15.0,
            speed: 8.0,
        }
    }
}

/// Ball radius and speed bounds (pixels per tick)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    pub initial_speed: f32,
    pub max_speed: f32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 8.0,
            initial_speed: 5.0,
            max_speed: 10.0,
        }
    }
}

/// Brick grid layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrickConfig {
    pub width: f32,
    pub height: f32,
    pub rows: u32,
    pub cols: u32,
    pub gap: f32,
    pub top_offset: f32,
}

impl Default for BrickConfig {
    fn default() -> Self {
        Self {
            width: 70.0,
            height: 20.0,
            rows: 5,
            cols: 10,
            gap: 5.0,
            top_offset: 60.0,
        }
    }
}

impl BrickConfig {
    /// Total width of one row including inner gaps
    pub fn grid_width(&self) -> f32 {
        let cols = self.cols as f32;
        cols * self.width + (cols - 1.0).max(0.0) * self.gap
    }

    /// Total height of the grid including inner gaps
    pub fn grid_height(&self) -> f32 {
        let rows = self.rows as f32;
        rows * self.height + (rows - 1.0).max(0.0) * self.gap
    }
}

/// Complete match configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas: CanvasConfig,
    pub paddle: PaddleConfig,
    pub ball: BallConfig,
    pub brick: BrickConfig,
    /// Lives at the start of a match
    pub lives: u8,
    /// Number of stages; clearing the last one ends the match
    pub max_stage: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            paddle: PaddleConfig::default(),
            ball: BallConfig::default(),
            brick: BrickConfig::default(),
            lives: 3,
            max_stage: 3,
        }
    }
}

/// Reasons a configuration is rejected at construction
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Canvas missing or degenerate
    InvalidCanvas { width: f32, height: f32 },
    /// Paddle dimensions unusable or wider than the canvas
    InvalidPaddle(&'static str),
    /// Ball radius or speed bounds unusable
    InvalidBall(&'static str),
    /// Brick layout unusable or does not fit the canvas
    InvalidBricks(&'static str),
    /// Zero lives
    NoLives,
    /// Zero stages
    NoStages,
    /// Configuration text could not be parsed
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidCanvas { width, height } => {
                write!(f, "invalid canvas size {}x{}", width, height)
            }
            ConfigError::InvalidPaddle(why) => write!(f, "invalid paddle: {}", why),
            ConfigError::InvalidBall(why) => write!(f, "invalid ball: {}", why),
            ConfigError::InvalidBricks(why) => write!(f, "invalid brick layout: {}", why),
            ConfigError::NoLives => write!(f, "lives must be at least 1"),
            ConfigError::NoStages => write!(f, "max_stage must be at least 1"),
            ConfigError::Parse(msg) => write!(f, "could not parse config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

impl GameConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field; the first problem found is returned
    pub fn validate(&self) -> Result<(), ConfigError> {
        let CanvasConfig { width, height } = self.canvas;
        if !positive(width) || !positive(height) {
            return Err(ConfigError::InvalidCanvas { width, height });
        }

        let paddle = &self.paddle;
        if !positive(paddle.width) || !positive(paddle.height) {
            return Err(ConfigError::InvalidPaddle("size must be positive"));
        }
        if paddle.width > width {
            return Err(ConfigError::InvalidPaddle("wider than the canvas"));
        }
        if !positive(paddle.speed) {
            return Err(ConfigError::InvalidPaddle("speed must be positive"));
        }

        let ball = &self.ball;
        if !positive(ball.radius) || ball.radius * 2.0 > width.min(height) {
            return Err(ConfigError::InvalidBall("radius out of range"));
        }
        if !positive(ball.initial_speed) || !positive(ball.max_speed) {
            return Err(ConfigError::InvalidBall("speeds must be positive"));
        }
        if ball.initial_speed > ball.max_speed {
            return Err(ConfigError::InvalidBall("initial speed exceeds max speed"));
        }

        let brick = &self.brick;
        if brick.rows == 0 || brick.cols == 0 {
            return Err(ConfigError::InvalidBricks("grid needs at least one cell"));
        }
        if !positive(brick.width) || !positive(brick.height) {
            return Err(ConfigError::InvalidBricks("brick size must be positive"));
        }
        if !brick.gap.is_finite() || brick.gap < 0.0 || !brick.top_offset.is_finite() {
            return Err(ConfigError::InvalidBricks("gap and offset must be finite"));
        }
        if brick.grid_width() > width {
            return Err(ConfigError::InvalidBricks("grid wider than the canvas"));
        }
        if brick.top_offset + brick.grid_height() > height {
            return Err(ConfigError::InvalidBricks("grid taller than the canvas"));
        }

        if self.lives == 0 {
            return Err(ConfigError::NoLives);
        }
        if self.max_stage == 0 {
            return Err(ConfigError::NoStages);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_default_grid_fits() {
        let brick = BrickConfig::default();
        assert_eq!(brick.grid_width(), 745.0);
        assert_eq!(brick.grid_height(), 120.0);
    }

    #[test]
    fn test_rejects_missing_canvas() {
        let mut config = GameConfig::default();
        config.canvas.width = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCanvas { .. })
        ));

        config.canvas.width = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_speeds() {
        let mut config = GameConfig::default();
        config.ball.initial_speed = 12.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBall(_))));
    }

    #[test]
    fn test_rejects_oversized_grid() {
        let mut config = GameConfig::default();
        config.brick.cols = 20;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBricks(_))
        ));
    }

    #[test]
    fn test_rejects_zero_lives_and_stages() {
        let mut config = GameConfig::default();
        config.lives = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoLives));

        let mut config = GameConfig::default();
        config.max_stage = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoStages));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{ "lives": 5, "ball": { "radius": 6.0 } }"#)
            .expect("valid config");
        assert_eq!(config.lives, 5);
        assert_eq!(config.ball.radius, 6.0);
        assert_eq!(config.ball.max_speed, BallConfig::default().max_speed);
        assert_eq!(config.brick, BrickConfig::default());
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(
            GameConfig::from_json("{ lives: "),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(
            GameConfig::from_json(r#"{ "max_stage": 0 }"#),
            Err(ConfigError::NoStages)
        );
    }
}
