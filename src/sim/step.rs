/// The step function: advances a running level by one tick.
///
/// Fixed processing order:
///   1. Player movement (axis-separated collision resolution)
///   2. Camera snap-follow
///   3. Enemy movement (wander + redirect on wall contact)
///   4. Defeat check (enemy box overlaps player box)
///   5. Victory check (player's occupied tile is the exit)
///
/// Defeat is evaluated before victory, so reaching the exit in the same
/// tick an enemy catches you still loses. Once the level has ended the
/// step is a no-op: the simulation stays frozen until the end screen is
/// acknowledged.

use crate::domain::ai;
use crate::domain::entity::{Dir, ENTITY_SIZE};
use crate::domain::physics::{self, Rect};
use crate::sim::world::{LevelResult, LevelState, LevelStatus, Outcome};

/// Per-tick input: the held movement direction, if any.
#[derive(Clone, Copy, Debug)]
pub struct TickInput {
    pub movement: Option<Dir>,
}

pub fn step(level: &mut LevelState, input: TickInput, dt_ms: u64) -> Option<LevelResult> {
    if matches!(level.status, LevelStatus::Ended(_)) {
        return None;
    }
    level.elapsed_ms += dt_ms;

    resolve_player(level, input.movement, dt_ms);
    let (cx, cy) = level.player.bounds().center();
    level.camera.update(cx, cy);
    resolve_enemies(level, dt_ms);

    if let Some(result) = resolve_defeat(level) {
        return Some(result);
    }
    resolve_victory(level)
}

fn resolve_player(level: &mut LevelState, movement: Option<Dir>, dt_ms: u64) {
    let player = &mut level.player;
    player.set_direction(movement);
    let moved = physics::resolve_move(
        &level.grid,
        player.bounds(),
        player.vx,
        player.vy,
        level.collision_mode,
        level.hitbox_inset,
    );
    player.x = moved.x;
    player.y = moved.y;
    player.anim.advance(dt_ms, movement);
}

fn resolve_enemies(level: &mut LevelState, dt_ms: u64) {
    let LevelState { grid, enemies, rng, .. } = level;
    for enemy in enemies.iter_mut() {
        let (dx, dy) = enemy.dir.velocity(enemy.speed);
        let candidate = Rect::new(enemy.x + dx, enemy.y + dy, ENTITY_SIZE, ENTITY_SIZE);
        if physics::intersects_any_wall(grid, candidate) {
            enemy.dir = ai::redirect(rng, enemy.dir);
        } else {
            enemy.x += dx;
            enemy.y += dy;
        }
        let dir = enemy.dir;
        enemy.anim.advance(dt_ms, Some(dir));
    }
}

fn resolve_defeat(level: &mut LevelState) -> Option<LevelResult> {
    let player_box = level.player.bounds();
    if level.enemies.iter().any(|e| e.bounds().intersects(player_box)) {
        return Some(end(level, Outcome::Defeat));
    }
    None
}

fn resolve_victory(level: &mut LevelState) -> Option<LevelResult> {
    let (col, row) = level.player.occupied_tile();
    let on_exit = level
        .grid
        .cell_at(col, row)
        .map(|c| c.is_exit())
        .unwrap_or(false);
    if on_exit {
        return Some(end(level, Outcome::Victory));
    }
    None
}

fn end(level: &mut LevelState, outcome: Outcome) -> LevelResult {
    level.status = LevelStatus::Ended(outcome);
    LevelResult {
        outcome,
        elapsed_seconds: level.elapsed_seconds(),
    }
}
