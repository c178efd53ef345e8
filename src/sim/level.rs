/// Level loading.
///
/// ## Sources (priority order):
///   1. `maps/<id>.txt` under the configured maps directory
///   2. Built-in embedded maps
///
/// A present-but-unreadable map file is a startup-fatal error; a missing
/// file silently falls back to the embedded copy.
///
/// Known levels are fixed: "Desert", "Ocean", "Hell". The menu unlocks
/// them linearly via the completed-levels set.

use std::io;
use std::path::PathBuf;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::config::GameConfig;
use crate::domain::ai;
use crate::domain::entity::{Enemy, Player};
use crate::domain::grid::{MapError, TileGrid};
use crate::domain::tile::{Cell, TILE_SIZE};
use crate::sim::world::{Camera, LevelState, LevelStatus, VIEW_H, VIEW_W};

/// Known level identifiers, in unlock order.
pub const LEVELS: [&str; 3] = ["Desert", "Ocean", "Hell"];

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("unknown level index {0}")]
    UnknownLevel(usize),
    #[error("could not read map {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("map for {id:?} is malformed: {source}")]
    Map {
        id: String,
        #[source]
        source: MapError,
    },
}

/// Load a level by registry index, seeding enemy wander from OS entropy.
pub fn load_level(index: usize, config: &GameConfig) -> Result<LevelState, LevelError> {
    let id = *LEVELS.get(index).ok_or(LevelError::UnknownLevel(index))?;
    let text = read_map_text(id, config)?;
    build_level(id, &text, config, ChaCha8Rng::from_entropy()).map_err(|source| {
        LevelError::Map { id: id.to_string(), source }
    })
}

fn read_map_text(id: &str, config: &GameConfig) -> Result<String, LevelError> {
    let path = config.maps_dir.join(format!("{}.txt", id.to_lowercase()));
    if path.is_file() {
        std::fs::read_to_string(&path).map_err(|source| LevelError::Read { path, source })
    } else {
        Ok(embedded_map(id).to_string())
    }
}

/// Build a level from map text. Spawn markers are consumed: each is
/// cleared to Path once its entity (if any) is instantiated.
pub fn build_level(
    id: &str,
    text: &str,
    config: &GameConfig,
    mut rng: ChaCha8Rng,
) -> Result<LevelState, MapError> {
    let mut grid = TileGrid::parse(text)?;

    let mut player_cell = (0, 0);
    let mut enemy_cells = Vec::new();
    let mut item_cells = Vec::new();
    for (col, row, cell) in grid.iter() {
        match cell {
            Cell::SpawnPlayer => player_cell = (col, row),
            Cell::SpawnEnemy => enemy_cells.push((col, row)),
            Cell::SpawnItem => item_cells.push((col, row)),
            _ => {}
        }
    }

    grid.set_cell(player_cell.0, player_cell.1, Cell::Path)?;
    for &(col, row) in enemy_cells.iter().chain(item_cells.iter()) {
        grid.set_cell(col, row, Cell::Path)?;
    }

    let cadence = config.speed.anim_cadence_ms;
    let player = Player::new(
        player_cell.0 as f32 * TILE_SIZE,
        player_cell.1 as f32 * TILE_SIZE,
        config.speed.player_speed,
        cadence,
    );
    let enemies = enemy_cells
        .iter()
        .map(|&(col, row)| {
            Enemy::new(
                col as f32 * TILE_SIZE,
                row as f32 * TILE_SIZE,
                ai::spawn_direction(&mut rng),
                config.speed.enemy_speed,
                cadence,
            )
        })
        .collect();

    let mut camera = Camera::new(VIEW_W, VIEW_H);
    let (cx, cy) = player.bounds().center();
    camera.update(cx, cy);

    Ok(LevelState {
        id: id.to_string(),
        grid,
        player,
        enemies,
        camera,
        status: LevelStatus::Running,
        elapsed_ms: 0,
        collision_mode: config.collision.mode,
        hitbox_inset: config.collision.hitbox_inset,
        rng,
    })
}

// -- Embedded fallback maps --
//
// Rows alternate open corridors and broken wall runs, so every path
// cell stays reachable from the spawn.

pub fn embedded_map(id: &str) -> &'static str {
    match id {
        "Ocean" => OCEAN,
        "Hell" => HELL,
        _ => DESERT,
    }
}

const DESERT: &str = "\
11111111111111111111
10000000000000000021
10110111011101101101
10000000000000000001
10101101110110110101
10000000000000000001
11011011011011011011
10000000*00000000001
10110110110110110101
10000000000000000001
10101101101101101011
1000*000000000*00001
10110110110110110101
1@000000000000000001
11111111111111111111";

const OCEAN: &str = "\
11111111111111111111
1@000000000000000001
10111011101110111001
10000000000000000001
10011011011011011101
1000000000000*000001
10110110110110110101
10000000000000000001
10101101101101101101
100000*0000000000001
10110110111011011011
10000000000000000001
10111011011011011101
10000000000*00000021
11111111111111111111";

const HELL: &str = "\
11111111111111111111
10000000000000000001
10110111011101101101
1000000*000000000001
10101101110110110101
10000000000000000001
11011011011011011011
1*0000000@0000000*01
10110110110110110101
10000000000000000001
10101101101101101011
10000000*00000000001
10110110110110110101
10000000020000000001
11111111111111111111";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::physics::CollisionMode;

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn build_consumes_spawn_markers() {
        let cfg = GameConfig::default();
        let level = build_level("Desert", "111\n1@*\n111\n", &cfg, test_rng()).unwrap();
        // Both markers cleared to Path
        assert_eq!(level.grid.cell_at(1, 1).unwrap(), Cell::Path);
        assert_eq!(level.grid.cell_at(2, 1).unwrap(), Cell::Path);
        assert_eq!(level.enemies.len(), 1);
        assert_eq!((level.player.x, level.player.y), (40.0, 40.0));
        assert_eq!((level.enemies[0].x, level.enemies[0].y), (80.0, 40.0));
        assert_eq!(level.status, LevelStatus::Running);
    }

    #[test]
    fn build_centers_the_camera_on_the_player() {
        let cfg = GameConfig::default();
        let level = build_level("Desert", "111\n1@1\n111\n", &cfg, test_rng()).unwrap();
        let (cx, cy) = level.player.bounds().center();
        assert_eq!(level.camera.offset_x, cx - VIEW_W / 2.0);
        assert_eq!(level.camera.offset_y, cy - VIEW_H / 2.0);
    }

    #[test]
    fn build_applies_collision_config() {
        let mut cfg = GameConfig::default();
        cfg.collision.mode = CollisionMode::SlideToContact;
        cfg.collision.hitbox_inset = 3.0;
        let level = build_level("Desert", "1@1\n111\n", &cfg, test_rng()).unwrap();
        assert_eq!(level.collision_mode, CollisionMode::SlideToContact);
        assert_eq!(level.hitbox_inset, 3.0);
    }

    #[test]
    fn embedded_maps_are_well_formed() {
        let cfg = GameConfig::default();
        for (i, id) in LEVELS.iter().enumerate() {
            let level = build_level(id, embedded_map(id), &cfg, test_rng())
                .unwrap_or_else(|e| panic!("embedded map {} broken: {}", id, e));
            assert_eq!(level.id, LEVELS[i]);
            assert!(!level.enemies.is_empty());
            // Every embedded map keeps an exit cell after spawn consumption
            assert!(level.grid.iter().any(|(_, _, c)| c.is_exit()));
        }
    }

    #[test]
    fn unknown_level_index_is_an_error() {
        let cfg = GameConfig::default();
        assert!(matches!(
            load_level(99, &cfg),
            Err(LevelError::UnknownLevel(99))
        ));
    }
}
