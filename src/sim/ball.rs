//! The ball: attached to the paddle until launched, then free-moving
//!
//! One Euler step per tick with no substepping. Side and top edges reflect;
//! the bottom edge is open and signals a lost ball.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Axis, Rect, circle_rect_collision};
use super::paddle::Paddle;
use crate::config::GameConfig;
use crate::consts::*;

/// Outcome of one ball update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallStep {
    /// Riding on the paddle, waiting for launch
    Attached,
    /// Moved freely this tick
    Moving,
    /// Bounced off the paddle this tick
    PaddleBounce,
    /// Bottom edge passed the canvas; no further physics ran
    Lost,
}

/// A ball entity (position is its center)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub launched: bool,
    pub initial_speed: f32,
    pub max_speed: f32,
    canvas_width: f32,
    canvas_height: f32,
}

impl Ball {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: config.ball.radius,
            launched: false,
            initial_speed: config.ball.initial_speed,
            max_speed: config.ball.max_speed,
            canvas_width: config.canvas.width,
            canvas_height: config.canvas.height,
        }
    }

    /// Re-attach to the paddle with zero velocity
    pub fn reset(&mut self, paddle: &Paddle) {
        self.launched = false;
        self.vel = Vec2::ZERO;
        self.follow(paddle);
    }

    /// Sit on top of the paddle, centered
    fn follow(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(paddle.center_x(), paddle.top() - self.radius);
    }

    /// Launch upward within 30° of vertical, mirrored left/right at random
    ///
    /// No-op when already launched.
    pub fn launch<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.launched {
            return;
        }
        let deviation = rng.random_range(0.0..=LAUNCH_MAX_DEVIATION);
        let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.vel = Vec2::new(
            side * deviation.sin() * self.initial_speed,
            -deviation.cos() * self.initial_speed,
        );
        self.launched = true;
    }

    /// Current speed magnitude
    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    pub fn update(&mut self, paddle: &Paddle) -> BallStep {
        if !self.launched {
            self.follow(paddle);
            return BallStep::Attached;
        }

        self.pos += self.vel;

        // Side walls
        if self.pos.x - self.radius < 0.0 {
            self.pos.x = self.radius;
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x + self.radius > self.canvas_width {
            self.pos.x = self.canvas_width - self.radius;
            self.vel.x = -self.vel.x.abs();
        }

        // Ceiling
        if self.pos.y - self.radius < 0.0 {
            self.pos.y = self.radius;
            self.vel.y = self.vel.y.abs();
        }

        if self.pos.y + self.radius > self.canvas_height {
            return BallStep::Lost;
        }

        if self.check_paddle_collision(paddle) {
            BallStep::PaddleBounce
        } else {
            BallStep::Moving
        }
    }

    /// Bounce off the paddle when falling onto it
    ///
    /// The outgoing angle follows where the ball struck the paddle, speed grows
    /// by a fixed factor up to the maximum, and the ball is placed on the
    /// paddle's top edge so it cannot hit again next tick.
    fn check_paddle_collision(&mut self, paddle: &Paddle) -> bool {
        if self.vel.y <= 0.0 {
            return false;
        }
        let bottom = self.pos.y + self.radius;
        if bottom < paddle.top() || bottom > paddle.top() + paddle.height {
            return false;
        }
        if !paddle.spans_x(self.pos.x) {
            return false;
        }

        let hit = paddle.hit_fraction(self.pos.x);
        let angle = (hit - 0.5) * PADDLE_BOUNCE_SPREAD;
        let speed = (self.speed() * PADDLE_BOUNCE_SPEEDUP)
            .clamp(self.initial_speed, self.max_speed);

        self.vel = Vec2::new(angle.sin() * speed, -angle.cos() * speed);
        self.pos.y = paddle.top() - self.radius;
        true
    }

    /// Circle-vs-rectangle test against one brick
    ///
    /// On overlap, flips the velocity component on the axis of smaller
    /// penetration and pushes the ball out along it. Damage is the caller's job.
    pub fn check_brick_collision(&mut self, rect: &Rect) -> bool {
        let Some(hit) = circle_rect_collision(self.pos, self.radius, self.vel, rect) else {
            return false;
        };

        match hit.axis {
            Axis::Horizontal => {
                self.vel.x = -self.vel.x;
                self.pos.x += hit.sign * hit.penetration;
            }
            Axis::Vertical => {
                self.vel.y = -self.vel.y;
                self.pos.y += hit.sign * hit.penetration;
            }
        }
        true
    }
}
