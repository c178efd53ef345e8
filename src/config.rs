/// Configuration: `config.toml` next to the executable, in the CWD, or
/// in the XDG data home. Every key is optional; a missing file, missing
/// keys, or an unparsable file all degrade to the defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::physics::CollisionMode;

// -- Public Config Struct --

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub collision: CollisionConfig,
    pub maps_dir: PathBuf,
    pub progress_path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    /// Tick period; 16 ms approximates the 60 Hz target.
    pub tick_rate_ms: u64,
    /// Player speed in pixels per tick.
    pub player_speed: f32,
    /// Enemy wander speed in pixels per tick.
    pub enemy_speed: f32,
    /// Walk-animation frame period.
    pub anim_cadence_ms: u64,
}

#[derive(Clone, Debug)]
pub struct CollisionConfig {
    pub mode: CollisionMode,
    /// Margin shaved off the bounding box before corner sampling.
    pub hitbox_inset: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            speed: SpeedConfig {
                tick_rate_ms: default_tick_rate(),
                player_speed: default_player_speed(),
                enemy_speed: default_enemy_speed(),
                anim_cadence_ms: default_anim_cadence(),
            },
            collision: CollisionConfig {
                mode: CollisionMode::Discrete,
                hitbox_inset: default_hitbox_inset(),
            },
            maps_dir: PathBuf::from(default_maps_dir()),
            progress_path: PathBuf::from(default_progress_path()),
        }
    }
}

// -- TOML Schema (with serde defaults) --

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    collision: TomlCollision,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_player_speed")]
    player_speed: f32,
    #[serde(default = "default_enemy_speed")]
    enemy_speed: f32,
    #[serde(default = "default_anim_cadence")]
    anim_cadence_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlCollision {
    #[serde(default = "default_collision_mode")]
    mode: String,
    #[serde(default = "default_hitbox_inset")]
    hitbox_inset: f32,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_maps_dir")]
    maps_dir: String,
    #[serde(default = "default_progress_path")]
    progress_path: String,
}

// -- Defaults --

fn default_tick_rate() -> u64 { 16 }
fn default_player_speed() -> f32 { 4.0 }
fn default_enemy_speed() -> f32 { 2.0 }
fn default_anim_cadence() -> u64 { 200 }
fn default_collision_mode() -> String { "discrete".into() }
fn default_hitbox_inset() -> f32 { 5.0 }
fn default_maps_dir() -> String { "maps".into() }
fn default_progress_path() -> String { "data/progress.txt".into() }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            player_speed: default_player_speed(),
            enemy_speed: default_enemy_speed(),
            anim_cadence_ms: default_anim_cadence(),
        }
    }
}

impl Default for TomlCollision {
    fn default() -> Self {
        TomlCollision {
            mode: default_collision_mode(),
            hitbox_inset: default_hitbox_inset(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            maps_dir: default_maps_dir(),
            progress_path: default_progress_path(),
        }
    }
}

// -- Loading --

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) XDG data home. Missing file or missing keys fall back to
    /// defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);

        let mode = parse_collision_mode(&toml_cfg.collision.mode);

        GameConfig {
            speed: SpeedConfig {
                tick_rate_ms: toml_cfg.speed.tick_rate_ms.max(1),
                player_speed: toml_cfg.speed.player_speed,
                enemy_speed: toml_cfg.speed.enemy_speed,
                anim_cadence_ms: toml_cfg.speed.anim_cadence_ms.max(1),
            },
            collision: CollisionConfig {
                mode,
                hitbox_inset: toml_cfg.collision.hitbox_inset,
            },
            maps_dir: resolve_dir(&search_dirs, &toml_cfg.general.maps_dir),
            progress_path: resolve_file(&search_dirs, &toml_cfg.general.progress_path),
        }
    }
}

fn parse_collision_mode(text: &str) -> CollisionMode {
    match text {
        "discrete" => CollisionMode::Discrete,
        "slide-to-contact" => CollisionMode::SlideToContact,
        other => {
            eprintln!("Warning: unknown collision.mode {other:?}, using \"discrete\".");
            CollisionMode::Discrete
        }
    }
}

/// Resolve a possibly-relative directory against the candidate dirs,
/// preferring one that actually exists.
fn resolve_dir(search_dirs: &[PathBuf], value: &str) -> PathBuf {
    let raw = PathBuf::from(value);
    if raw.is_absolute() {
        return raw;
    }
    search_dirs
        .iter()
        .map(|d| d.join(value))
        .find(|p| p.is_dir())
        .unwrap_or(raw)
}

/// Resolve a possibly-relative file path, preferring an existing file,
/// falling back to CWD-relative for the write path.
fn resolve_file(search_dirs: &[PathBuf], value: &str) -> PathBuf {
    let raw = PathBuf::from(value);
    if raw.is_absolute() {
        return raw;
    }
    search_dirs
        .iter()
        .map(|d| d.join(value))
        .find(|p| p.is_file())
        .unwrap_or(raw)
}

/// Candidate directories, most specific first: the running executable's
/// directory (symlinks resolved), the CWD, and the per-user data home.
fn candidate_dirs() -> Vec<PathBuf> {
    let exe_dir = std::env::current_exe().ok().and_then(|exe| {
        let resolved = exe.canonicalize().unwrap_or(exe);
        resolved.parent().map(Path::to_path_buf)
    });
    let data_home = std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".local/share/lost-ghost"))
        .filter(|p| p.is_dir());

    let mut dirs: Vec<PathBuf> = Vec::with_capacity(3);
    for dir in [exe_dir, std::env::current_dir().ok(), data_home]
        .into_iter()
        .flatten()
    {
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }
    dirs
}

/// Parse the first `config.toml` found among the candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    let found = search_dirs
        .iter()
        .map(|dir| dir.join("config.toml"))
        .find(|p| p.exists());
    let path = match found {
        Some(path) => path,
        None => return TomlConfig::default(),
    };
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Warning: could not read {}: {e}", path.display());
            return TomlConfig::default();
        }
    };
    toml::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Warning: {} is invalid: {e}", path.display());
        eprintln!("Using default settings.");
        TomlConfig::default()
    })
}
