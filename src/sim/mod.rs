//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per frame, no variable timestep
//! - Seeded RNG only
//! - Stable iteration order (row-major bricks)
//! - No rendering or platform dependencies

pub mod ball;
pub mod bricks;
pub mod collision;
pub mod paddle;
pub mod state;
pub mod tick;

pub use ball::{Ball, BallStep};
pub use bricks::{Brick, BrickField, BrickKind, BrickTier};
pub use collision::{Axis, CollisionResult, Rect, circle_rect_collision};
pub use paddle::Paddle;
pub use state::{GameEvent, GamePhase, GameState, MatchSnapshot};
pub use tick::{handle_intent, tick};
