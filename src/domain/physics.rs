/// Collision layer — single source of truth for movement blocking.
///
/// ## Architecture
///
/// Two distinct checks, used by different callers:
///   1. CORNER SAMPLING — the entity's box is shrunk by the hitbox inset
///      and its four corners are mapped to grid cells (integer division
///      by tile size). Blocked iff any sampled cell is a wall. Used for
///      player movement; tolerant of near-wall motion at tile seams.
///   2. FULL-GRID AABB SWEEP — the unshrunk box is intersected against
///      every wall tile. Used for enemy wandering. O(rows x cols) per
///      query, fine at this map scale; a spatial index would cut it down
///      if maps ever grow.
///
/// ## Resolution
///
/// Movement is axis-separated: the X component is tested and applied (or
/// rejected) independently of the Y component, so an entity moving
/// diagonally into a wall slides along it instead of stopping dead.
///
/// Two resolution modes:
///   - `Discrete`       — a blocked step is rejected whole.
///   - `SlideToContact` — a blocked step advances one pixel at a time up
///     to the point of contact, for smoother wall-hugging.
///
/// An out-of-grid corner sample counts as blocked; that is what keeps
/// entities inside the grid without per-tick bounds checks.

use super::grid::TileGrid;
use super::tile::TILE_SIZE;

/// Axis-aligned box in continuous pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect { x, y, w, h }
    }

    /// The world-space box of the tile at (col, row).
    pub fn tile(col: usize, row: usize) -> Rect {
        Rect {
            x: col as f32 * TILE_SIZE,
            y: row as f32 * TILE_SIZE,
            w: TILE_SIZE,
            h: TILE_SIZE,
        }
    }

    /// Shrink by `margin` on every side.
    pub fn inset(self, margin: f32) -> Rect {
        Rect {
            x: self.x + margin,
            y: self.y + margin,
            w: self.w - 2.0 * margin,
            h: self.h - 2.0 * margin,
        }
    }

    pub fn center(self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    fn corners(self) -> [(f32, f32); 4] {
        [
            (self.x, self.y),
            (self.x + self.w, self.y),
            (self.x, self.y + self.h),
            (self.x + self.w, self.y + self.h),
        ]
    }

    /// Point-in-box test (right/bottom edges exclusive).
    pub fn contains(self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    /// Strict AABB overlap: boxes that merely touch do not intersect.
    pub fn intersects(self, other: Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// How a blocked step is resolved. Selected in config.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CollisionMode {
    Discrete,
    SlideToContact,
}

/// Result of one resolved move: final position plus which axes hit a wall.
#[derive(Clone, Copy, Debug)]
pub struct Moved {
    pub x: f32,
    pub y: f32,
    #[allow(dead_code)]
    pub hit_x: bool,
    #[allow(dead_code)]
    pub hit_y: bool,
}

/// Corner-sampled wall test for a nominal bounding box.
/// The box is shrunk by `inset` before sampling.
pub fn is_blocked(grid: &TileGrid, bbox: Rect, inset: f32) -> bool {
    let probe = bbox.inset(inset);
    probe.corners().iter().any(|&(x, y)| {
        if x < 0.0 || y < 0.0 {
            return true;
        }
        let col = (x / TILE_SIZE) as usize;
        let row = (y / TILE_SIZE) as usize;
        match grid.cell_at(col, row) {
            Ok(cell) => cell.is_solid(),
            Err(_) => true, // out of grid = wall
        }
    })
}

/// Axis-separated movement resolution.
/// Applies the X component, then the Y component, each independently
/// tested with corner sampling. Zero velocity is always a no-op.
pub fn resolve_move(
    grid: &TileGrid,
    bbox: Rect,
    vx: f32,
    vy: f32,
    mode: CollisionMode,
    inset: f32,
) -> Moved {
    let (dx, hit_x) = step_axis(grid, bbox, vx, Axis::X, mode, inset);
    let shifted = Rect { x: bbox.x + dx, ..bbox };
    let (dy, hit_y) = step_axis(grid, shifted, vy, Axis::Y, mode, inset);
    Moved {
        x: bbox.x + dx,
        y: bbox.y + dy,
        hit_x,
        hit_y,
    }
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn step_axis(
    grid: &TileGrid,
    bbox: Rect,
    delta: f32,
    axis: Axis,
    mode: CollisionMode,
    inset: f32,
) -> (f32, bool) {
    if delta == 0.0 {
        return (0.0, false);
    }
    let shifted = |d: f32| match axis {
        Axis::X => Rect { x: bbox.x + d, ..bbox },
        Axis::Y => Rect { y: bbox.y + d, ..bbox },
    };
    if !is_blocked(grid, shifted(delta), inset) {
        return (delta, false);
    }
    match mode {
        CollisionMode::Discrete => (0.0, true),
        CollisionMode::SlideToContact => {
            // Advance one pixel at a time up to the point of contact.
            let dir = delta.signum();
            let mut moved = 0.0;
            while (moved + dir).abs() <= delta.abs()
                && !is_blocked(grid, shifted(moved + dir), inset)
            {
                moved += dir;
            }
            (moved, true)
        }
    }
}

/// Full-grid wall sweep: does `bbox` overlap any wall tile?
/// Also true when the box reaches outside the grid.
pub fn intersects_any_wall(grid: &TileGrid, bbox: Rect) -> bool {
    if bbox.x < 0.0
        || bbox.y < 0.0
        || bbox.x + bbox.w > grid.width() as f32 * TILE_SIZE
        || bbox.y + bbox.h > grid.height() as f32 * TILE_SIZE
    {
        return true;
    }
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let solid = grid
                .cell_at(col, row)
                .map(|c| c.is_solid())
                .unwrap_or(true);
            if solid && bbox.intersects(Rect::tile(col, row)) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::ENTITY_SIZE;

    const INSET: f32 = 5.0;

    /// Helper: grid from a string diagram, rows of '1'/'0'/'2'/'@'/'*'.
    fn grid_from(rows: &[&str]) -> TileGrid {
        TileGrid::parse(&rows.join("\n")).unwrap()
    }

    fn entity_box(x: f32, y: f32) -> Rect {
        Rect::new(x, y, ENTITY_SIZE, ENTITY_SIZE)
    }

    // -- Rect --

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 40.0, 40.0);
        let b = Rect::new(40.0, 0.0, 40.0, 40.0);
        assert!(!a.intersects(b));
        let c = Rect::new(39.0, 0.0, 40.0, 40.0);
        assert!(a.intersects(c));
    }

    #[test]
    fn inset_shrinks_every_side() {
        let r = Rect::new(10.0, 20.0, 40.0, 40.0).inset(5.0);
        assert_eq!(r, Rect::new(15.0, 25.0, 30.0, 30.0));
    }

    // -- is_blocked --

    #[test]
    fn blocked_iff_a_corner_sample_lands_on_a_wall() {
        // 3x3 open room inside a wall ring; walls at cols/rows 0 and 4
        let g = grid_from(&["11111", "1000@", "10001", "10001", "11111"]);
        // Fully inside the open 3x3 area: free
        assert!(!is_blocked(&g, entity_box(80.0, 80.0), INSET));
        // Nominal box overlaps the left wall by less than the inset: still free
        assert!(!is_blocked(&g, entity_box(36.0, 80.0), INSET));
        // Inset corner reaches into the left wall: blocked
        assert!(is_blocked(&g, entity_box(34.0, 80.0), INSET));
        // Same for the bottom wall
        assert!(is_blocked(&g, entity_box(80.0, 126.0), INSET));
    }

    #[test]
    fn out_of_grid_counts_as_blocked() {
        let g = grid_from(&["0@0", "000"]);
        assert!(is_blocked(&g, entity_box(-20.0, 0.0), INSET));
        assert!(is_blocked(&g, entity_box(0.0, 100.0), INSET));
    }

    // -- resolve_move --

    #[test]
    fn zero_velocity_never_moves() {
        let g = grid_from(&["11111", "1@001", "11111"]);
        for mode in [CollisionMode::Discrete, CollisionMode::SlideToContact] {
            let m = resolve_move(&g, entity_box(50.0, 40.0), 0.0, 0.0, mode, INSET);
            assert_eq!((m.x, m.y), (50.0, 40.0));
            assert!(!m.hit_x && !m.hit_y);
        }
    }

    #[test]
    fn diagonal_into_wall_slides_along_it() {
        // Corridor one tile tall: up is walled, right is open.
        // y=36 is the resting position against the top wall: the inset top
        // edge sits at 41, one more 4 px step would sample into row 0.
        let g = grid_from(&["11111", "1@001", "11111"]);
        let m = resolve_move(&g, entity_box(45.0, 36.0), 4.0, -4.0, CollisionMode::Discrete, INSET);
        // Y rejected, X applied: the entity slides along the wall
        assert_eq!((m.x, m.y), (49.0, 36.0));
        assert!(!m.hit_x);
        assert!(m.hit_y);
    }

    #[test]
    fn discrete_rejects_a_blocked_step_whole() {
        let g = grid_from(&["11111", "1@001", "11111"]);
        // 2 px short of contact; a 6 px step would cross into the wall
        let m = resolve_move(&g, entity_box(123.0, 40.0), 6.0, 0.0, CollisionMode::Discrete, INSET);
        assert_eq!(m.x, 123.0);
        assert!(m.hit_x);
    }

    #[test]
    fn slide_to_contact_stops_at_the_wall() {
        let g = grid_from(&["11111", "1@001", "11111"]);
        // Right wall tile starts at x=160; inset box right edge = x + 35.
        // x=124 is the point of contact: at x=125 the edge sample hits
        // exactly 160 and lands in the wall column.
        let m = resolve_move(
            &g,
            entity_box(123.0, 40.0),
            6.0,
            0.0,
            CollisionMode::SlideToContact,
            INSET,
        );
        assert_eq!(m.x, 124.0);
        assert!(m.hit_x);
        // From the contact point, a further step moves nothing
        let m2 = resolve_move(
            &g,
            entity_box(m.x, 40.0),
            6.0,
            0.0,
            CollisionMode::SlideToContact,
            INSET,
        );
        assert_eq!(m2.x, 124.0);
    }

    // -- intersects_any_wall --

    #[test]
    fn wall_sweep_uses_the_full_box() {
        let g = grid_from(&["11111", "1@001", "11111"]);
        // Overlapping the top wall by 1 px: the full-box sweep reports a hit
        // even though corner sampling (with inset) would not.
        assert!(intersects_any_wall(&g, entity_box(60.0, 39.0)));
        assert!(!intersects_any_wall(&g, entity_box(60.0, 40.0)));
    }

    #[test]
    fn wall_sweep_rejects_out_of_grid() {
        let g = grid_from(&["0@0", "000"]);
        assert!(intersects_any_wall(&g, entity_box(90.0, 0.0)));
    }
}
