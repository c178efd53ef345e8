/// LevelState: the complete snapshot of a level in play.
///
/// ## Camera / Viewport
///
/// World (pixel) coordinates and screen coordinates are separate:
///   - `offset` is the world position of the viewport's top-left corner,
///     recomputed every tick as `tracked - viewport/2` (snap follow,
///     no smoothing, no clamping to the map edge)
///   - `world_to_screen(p) = p - offset`
///   - `tile_to_screen(col, row) = (col, row) * tile_size - offset`

use rand_chacha::ChaCha8Rng;

use crate::domain::entity::{Enemy, Player};
use crate::domain::grid::TileGrid;
use crate::domain::physics::CollisionMode;
use crate::domain::tile::TILE_SIZE;

/// Viewport size in world pixels (the original 800x600 window).
pub const VIEW_W: f32 = 800.0;
pub const VIEW_H: f32 = 600.0;

#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub offset_x: f32,
    pub offset_y: f32,
    pub view_w: f32,
    pub view_h: f32,
}

impl Camera {
    pub fn new(view_w: f32, view_h: f32) -> Self {
        Camera { offset_x: 0.0, offset_y: 0.0, view_w, view_h }
    }

    /// Snap the viewport center onto the tracked position.
    /// Runs every tick, unconditionally.
    pub fn update(&mut self, tracked_x: f32, tracked_y: f32) {
        self.offset_x = tracked_x - self.view_w / 2.0;
        self.offset_y = tracked_y - self.view_h / 2.0;
    }

    pub fn world_to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (x - self.offset_x, y - self.offset_y)
    }

    pub fn tile_to_screen(&self, col: usize, row: usize) -> (f32, f32) {
        self.world_to_screen(col as f32 * TILE_SIZE, row as f32 * TILE_SIZE)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Victory,
    Defeat,
}

/// Produced when a level ends; consumed by the end screen and, on
/// victory, by the progress store.
#[derive(Clone, Debug)]
pub struct LevelResult {
    pub outcome: Outcome,
    pub elapsed_seconds: u64,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LevelStatus {
    Running,
    Ended(Outcome),
}

pub struct LevelState {
    pub id: String,
    pub grid: TileGrid,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub camera: Camera,
    pub status: LevelStatus,
    pub elapsed_ms: u64,
    pub collision_mode: CollisionMode,
    pub hitbox_inset: f32,
    pub rng: ChaCha8Rng,
}

impl LevelState {
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_ms / 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_tracked_minus_half_viewport() {
        let mut cam = Camera::new(VIEW_W, VIEW_H);
        for (tx, ty) in [(0.0, 0.0), (400.0, 300.0), (-35.5, 1234.0), (60.0, 20.0)] {
            cam.update(tx, ty);
            assert_eq!(cam.offset_x, tx - VIEW_W / 2.0);
            assert_eq!(cam.offset_y, ty - VIEW_H / 2.0);
        }
    }

    #[test]
    fn world_to_screen_subtracts_the_offset() {
        let mut cam = Camera::new(VIEW_W, VIEW_H);
        cam.update(400.0, 300.0); // offset (0, 0)
        assert_eq!(cam.world_to_screen(120.0, 80.0), (120.0, 80.0));
        cam.update(500.0, 300.0); // offset (100, 0)
        assert_eq!(cam.world_to_screen(120.0, 80.0), (20.0, 80.0));
    }

    #[test]
    fn tile_to_screen_scales_then_subtracts() {
        let mut cam = Camera::new(VIEW_W, VIEW_H);
        cam.update(440.0, 340.0); // offset (40, 40)
        assert_eq!(cam.tile_to_screen(3, 2), (80.0, 40.0));
    }

    #[test]
    fn camera_may_show_beyond_grid_space() {
        // No clamping: a tracked position near the origin goes negative.
        let mut cam = Camera::new(VIEW_W, VIEW_H);
        cam.update(60.0, 60.0);
        assert!(cam.offset_x < 0.0);
        assert!(cam.offset_y < 0.0);
    }
}
