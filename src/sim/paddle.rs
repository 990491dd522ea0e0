//! The player's paddle
//!
//! Keyboard input sets a direction applied during `update`; pointer input
//! writes the position directly. Either way x stays inside the canvas.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::PADDLE_BOTTOM_OFFSET;

/// Horizontal paddle (position is its top-left corner)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Pixels moved per tick while a direction is held
    pub speed: f32,
    /// Movement intent: -1 left, 0 still, 1 right
    pub direction: i8,
    canvas_width: f32,
    canvas_height: f32,
}

impl Paddle {
    pub fn new(config: &GameConfig) -> Self {
        let mut paddle = Self {
            pos: Vec2::ZERO,
            width: config.paddle.width,
            height: config.paddle.height,
            speed: config.paddle.speed,
            direction: 0,
            canvas_width: config.canvas.width,
            canvas_height: config.canvas.height,
        };
        paddle.reset();
        paddle
    }

    /// Re-center near the bottom and drop any movement intent
    pub fn reset(&mut self) {
        self.pos = Vec2::new(
            (self.canvas_width - self.width) / 2.0,
            self.canvas_height - self.height - PADDLE_BOTTOM_OFFSET,
        );
        self.direction = 0;
    }

    /// Keyboard mode. Values other than -1/0/1 are ignored.
    pub fn set_direction(&mut self, direction: i8) {
        if (-1..=1).contains(&direction) {
            self.direction = direction;
        }
    }

    /// Pointer mode: center the paddle under an absolute x
    pub fn set_position_x(&mut self, x: f32) {
        if !x.is_finite() {
            return;
        }
        // Pointer wins over any held key until the next key press
        self.direction = 0;
        self.pos.x = x - self.width / 2.0;
        self.clamp();
    }

    pub fn update(&mut self) {
        self.pos.x += self.direction as f32 * self.speed;
        self.clamp();
    }

    fn clamp(&mut self) {
        self.pos.x = self.pos.x.clamp(0.0, self.max_x());
    }

    /// Rightmost legal x
    #[inline]
    pub fn max_x(&self) -> f32 {
        (self.canvas_width - self.width).max(0.0)
    }

    /// Horizontal center
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Top edge y
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    /// Relative hit position of an x coordinate: 0 = left edge, 1 = right edge
    #[inline]
    pub fn hit_fraction(&self, x: f32) -> f32 {
        ((x - self.pos.x) / self.width).clamp(0.0, 1.0)
    }

    /// Whether x lies within the paddle's horizontal span
    #[inline]
    pub fn spans_x(&self, x: f32) -> bool {
        x >= self.pos.x && x <= self.pos.x + self.width
    }
}
