//! Brick field: a fixed grid of destructible bricks regenerated per stage

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::config::BrickConfig;

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrickKind {
    #[default]
    Normal,
    Hard,
    Special,
}

impl BrickKind {
    /// Hits needed to destroy
    pub fn durability(&self) -> u8 {
        match self {
            BrickKind::Normal => 1,
            BrickKind::Hard => 2,
            BrickKind::Special => 1,
        }
    }

    /// Base points for destroying one
    pub fn score(&self) -> u32 {
        match self {
            BrickKind::Normal => 10,
            BrickKind::Hard => 20,
            BrickKind::Special => 50,
        }
    }

    /// Layout rule: type is a pure function of stage (1-based) and row
    pub fn for_cell(stage: u32, row: u32) -> Self {
        match stage {
            0 | 1 => BrickKind::Normal,
            2 if row < 2 => BrickKind::Hard,
            2 => BrickKind::Normal,
            _ => match row {
                0 => BrickKind::Special,
                1 => BrickKind::Hard,
                _ => BrickKind::Normal,
            },
        }
    }
}

/// Colour tier a renderer should use for a brick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickTier {
    Normal,
    Hard,
    /// Hard brick down to its last hit point
    Cracked,
    Special,
}

/// A single brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: BrickKind,
    pub durability: u8,
    pub destroyed: bool,
}

impl Brick {
    pub fn new(pos: Vec2, size: Vec2, kind: BrickKind) -> Self {
        Self {
            pos,
            size,
            kind,
            durability: kind.durability(),
            destroyed: false,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Take one hit. Returns true when this hit destroyed the brick.
    ///
    /// Hitting a destroyed brick changes nothing.
    pub fn hit(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.durability = self.durability.saturating_sub(1);
        if self.durability == 0 {
            self.destroyed = true;
        }
        self.destroyed
    }

    pub fn tier(&self) -> BrickTier {
        match self.kind {
            BrickKind::Normal => BrickTier::Normal,
            BrickKind::Hard if self.durability <= 1 => BrickTier::Cracked,
            BrickKind::Hard => BrickTier::Hard,
            BrickKind::Special => BrickTier::Special,
        }
    }
}

/// The stage's grid of bricks in row-major order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickField {
    pub bricks: Vec<Brick>,
    layout: BrickConfig,
    canvas_width: f32,
}

impl BrickField {
    pub fn new(layout: BrickConfig, canvas_width: f32) -> Self {
        Self {
            bricks: Vec::new(),
            layout,
            canvas_width,
        }
    }

    /// Discard all bricks and lay out a fresh grid for `stage`
    ///
    /// The grid is centered horizontally and starts at the configured top offset.
    pub fn create_bricks(&mut self, stage: u32) {
        let l = &self.layout;
        let offset_x = (self.canvas_width - l.grid_width()) / 2.0;
        let size = Vec2::new(l.width, l.height);

        self.bricks.clear();
        self.bricks.reserve((l.rows * l.cols) as usize);
        for row in 0..l.rows {
            let kind = BrickKind::for_cell(stage, row);
            let y = l.top_offset + row as f32 * (l.height + l.gap);
            for col in 0..l.cols {
                let x = offset_x + col as f32 * (l.width + l.gap);
                self.bricks.push(Brick::new(Vec2::new(x, y), size, kind));
            }
        }
        log::debug!(
            "Stage {} bricks: {} ({}x{})",
            stage,
            self.bricks.len(),
            l.rows,
            l.cols
        );
    }

    /// Hit the brick at `index`. Returns true when it was destroyed by this hit.
    pub fn hit(&mut self, index: usize) -> bool {
        self.bricks.get_mut(index).is_some_and(Brick::hit)
    }

    /// Bricks still in play, with their index
    pub fn active_bricks(&self) -> impl Iterator<Item = (usize, &Brick)> {
        self.bricks.iter().enumerate().filter(|(_, b)| !b.destroyed)
    }

    /// Number of bricks still in play; zero means the stage is clear
    pub fn remaining_count(&self) -> usize {
        self.bricks.iter().filter(|b| !b.destroyed).count()
    }

    pub fn get(&self, index: usize) -> Option<&Brick> {
        self.bricks.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(stage: u32) -> BrickField {
        let mut f = BrickField::new(BrickConfig::default(), 800.0);
        f.create_bricks(stage);
        f
    }

    fn row_kinds(f: &BrickField) -> Vec<BrickKind> {
        f.bricks.chunks(10).map(|row| row[0].kind).collect()
    }

    #[test]
    fn test_grid_layout_centered() {
        let f = field(1);
        assert_eq!(f.bricks.len(), 50);
        assert_eq!(f.remaining_count(), 50);

        let first = &f.bricks[0];
        assert_eq!(first.pos, Vec2::new(27.5, 60.0));
        let last = &f.bricks[49];
        assert_eq!(last.pos, Vec2::new(27.5 + 9.0 * 75.0, 60.0 + 4.0 * 25.0));
        // Symmetric margins
        assert_eq!(800.0 - (last.pos.x + last.size.x), first.pos.x);
    }

    #[test]
    fn test_stage_layouts() {
        use BrickKind::*;
        assert_eq!(row_kinds(&field(1)), vec![Normal; 5]);
        assert_eq!(
            row_kinds(&field(2)),
            vec![Hard, Hard, Normal, Normal, Normal]
        );
        assert_eq!(
            row_kinds(&field(3)),
            vec![Special, Hard, Normal, Normal, Normal]
        );
        assert_eq!(row_kinds(&field(7)), row_kinds(&field(3)));
    }

    #[test]
    fn test_every_cell_in_row_shares_kind() {
        let f = field(3);
        for row in f.bricks.chunks(10) {
            assert!(row.iter().all(|b| b.kind == row[0].kind));
        }
    }

    #[test]
    fn test_hard_brick_destroyed_on_final_hit() {
        let mut b = Brick::new(Vec2::ZERO, Vec2::ONE, BrickKind::Hard);
        assert_eq!(b.tier(), BrickTier::Hard);
        assert!(!b.hit());
        assert!(!b.destroyed);
        assert_eq!(b.tier(), BrickTier::Cracked);
        assert!(b.hit());
        assert!(b.destroyed);
    }

    #[test]
    fn test_hit_after_destroy_is_inert() {
        let mut b = Brick::new(Vec2::ZERO, Vec2::ONE, BrickKind::Normal);
        assert!(b.hit());
        assert!(!b.hit());
        assert!(b.destroyed);
        assert_eq!(b.durability, 0);
    }

    #[test]
    fn test_destroyed_excluded_from_active() {
        let mut f = field(1);
        assert!(f.hit(3));
        assert!(!f.hit(3));
        assert_eq!(f.remaining_count(), 49);
        assert!(f.active_bricks().all(|(i, _)| i != 3));
        assert!(!f.hit(999));
    }

    #[test]
    fn test_create_bricks_replaces_field() {
        let mut f = field(1);
        for i in 0..50 {
            f.hit(i);
        }
        assert_eq!(f.remaining_count(), 0);
        f.create_bricks(2);
        assert_eq!(f.remaining_count(), 50);
        assert_eq!(f.bricks[0].durability, 2);
    }

    #[test]
    fn test_scores_by_kind() {
        assert_eq!(BrickKind::Normal.score(), 10);
        assert_eq!(BrickKind::Hard.score(), 20);
        assert_eq!(BrickKind::Special.score(), 50);
    }
}
