/// Entry point and game loop.
///
/// One thread owns a fixed-rate tick: drain input events, route them to
/// the active screen, advance that screen's simulation, render, sleep.
/// Screens request state changes by returning a `Transition`; this loop
/// is the only place transitions are applied, so no screen ever holds a
/// reference to its owner.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use config::GameConfig;
use domain::entity::Dir;
use sim::level::{load_level, LevelError};
use sim::progress::CompletedLevels;
use sim::screen::{EndScreen, FrameInput, MenuScreen, Screen, Transition};
use sim::world::Outcome;
use ui::input::{Action, InputState};
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(2);

/// The one top-level state struct: constructed at startup, threaded
/// through the loop by parameter.
struct Game {
    config: GameConfig,
    completed: CompletedLevels,
    screen: Screen,
}

fn main() {
    let config = GameConfig::load();
    let completed = CompletedLevels::load(&config.progress_path);

    let mut game = Game {
        screen: Screen::Menu(MenuScreen::new(&completed)),
        completed,
        config,
    };

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut game, &mut renderer);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
        std::process::exit(1);
    }
}

fn game_loop(
    game: &mut Game,
    renderer: &mut Renderer,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = InputState::new();
    let tick_ms = game.config.speed.tick_rate_ms;
    let tick_rate = Duration::from_millis(tick_ms);
    let mut last_tick = Instant::now();

    loop {
        input.poll_frame();
        if input.quit_requested() {
            break;
        }

        let frame = translate_input(&input, renderer);

        if let Some(transition) = game.screen.handle(&frame) {
            if apply_transition(game, transition)? {
                break;
            }
            last_tick = Instant::now();
            continue;
        }

        if last_tick.elapsed() >= tick_rate {
            if let Some(transition) = game.screen.tick(&frame, tick_ms) {
                if apply_transition(game, transition)? {
                    break;
                }
            }
            last_tick = Instant::now();
        }

        renderer.render(&game.screen)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Apply a screen-requested transition. Returns true to quit.
fn apply_transition(game: &mut Game, transition: Transition) -> Result<bool, LevelError> {
    match transition {
        Transition::StartLevel(index) => {
            let state = load_level(index, &game.config)?;
            game.screen = Screen::Level { index, state };
        }
        Transition::LevelEnded { id, result } => {
            let mut save_warning = None;
            if result.outcome == Outcome::Victory && game.completed.record(&id) {
                // Newly completed: persist once. A failed write is
                // reported on the end screen, never fatal.
                if let Err(e) = game.completed.save(&game.config.progress_path) {
                    save_warning = Some(e.to_string());
                }
            }
            game.screen = Screen::End(EndScreen::new(id, result, save_warning));
        }
        Transition::ToMenu => {
            game.screen = Screen::Menu(MenuScreen::new(&game.completed));
        }
        Transition::Quit => return Ok(true),
    }
    Ok(false)
}

/// Translate raw terminal input into the screen-agnostic frame input.
fn translate_input(input: &InputState, renderer: &Renderer) -> FrameInput {
    FrameInput {
        movement: input.movement(),
        confirm: input.pressed(Action::Confirm),
        cancel: input.pressed(Action::Cancel),
        restart: input.pressed(Action::Restart),
        menu_up: input.tapped(Dir::Up),
        menu_down: input.tapped(Dir::Down),
        click: input
            .clicks()
            .first()
            .map(|&(col, row)| renderer.menu_cell_to_point(col, row)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::LevelResult;

    #[test]
    fn victory_is_persisted_exactly_once() {
        let mut config = GameConfig::default();
        config.progress_path = std::env::temp_dir()
            .join(format!("lost-ghost-victory-{}.txt", std::process::id()));
        let completed = CompletedLevels::default();
        let mut game = Game {
            screen: Screen::Menu(MenuScreen::new(&completed)),
            completed,
            config,
        };

        // Winning the same level twice writes its id once
        for _ in 0..2 {
            let transition = Transition::LevelEnded {
                id: "Desert".into(),
                result: LevelResult { outcome: Outcome::Victory, elapsed_seconds: 3 },
            };
            assert!(!apply_transition(&mut game, transition).unwrap());
            assert!(matches!(game.screen, Screen::End(_)));
        }

        let text = std::fs::read_to_string(&game.config.progress_path).unwrap();
        assert_eq!(text, "Desert\n");
        let _ = std::fs::remove_file(&game.config.progress_path);
    }
}
