/// Top-level screens: Menu, Level, EndScreen.
///
/// One tagged enum dispatched through a uniform handle/tick surface.
/// Screens never reach back into their owner: a screen returns an
/// optional `Transition` and the outer loop applies it. The end screen
/// is a first-class state handled by the same loop, not a nested pump.

use crate::domain::entity::Dir;
use crate::domain::physics::Rect;
use crate::sim::level::LEVELS;
use crate::sim::progress::CompletedLevels;
use crate::sim::step::{self, TickInput};
use crate::sim::world::{LevelResult, LevelState};

/// One frame's worth of translated input, screen-agnostic.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    /// Held movement direction (continuous while key held).
    pub movement: Option<Dir>,
    /// Confirm / acknowledge (edge-triggered).
    pub confirm: bool,
    /// Back out (edge-triggered).
    pub cancel: bool,
    /// Restart the current level (edge-triggered).
    pub restart: bool,
    pub menu_up: bool,
    pub menu_down: bool,
    /// Pointer click in menu-canvas pixel coordinates.
    pub click: Option<(f32, f32)>,
}

/// Requested by a screen, applied by the game loop.
#[derive(Clone, Debug)]
pub enum Transition {
    StartLevel(usize),
    LevelEnded { id: String, result: LevelResult },
    ToMenu,
    Quit,
}

pub enum Screen {
    Menu(MenuScreen),
    Level { index: usize, state: LevelState },
    End(EndScreen),
}

impl Screen {
    /// Route discrete input to the active screen.
    pub fn handle(&mut self, input: &FrameInput) -> Option<Transition> {
        match self {
            Screen::Menu(menu) => menu.handle(input),
            Screen::Level { index, .. } => {
                if input.cancel {
                    Some(Transition::ToMenu)
                } else if input.restart {
                    Some(Transition::StartLevel(*index))
                } else {
                    None
                }
            }
            Screen::End(end) => end.handle(input),
        }
    }

    /// Advance the active screen by one simulation tick.
    pub fn tick(&mut self, input: &FrameInput, dt_ms: u64) -> Option<Transition> {
        match self {
            Screen::Level { state, .. } => {
                let result = step::step(state, TickInput { movement: input.movement }, dt_ms)?;
                Some(Transition::LevelEnded {
                    id: state.id.clone(),
                    result,
                })
            }
            _ => None,
        }
    }
}

// -- Menu --

pub struct MenuButton {
    pub label: &'static str,
    /// Hit region in menu-canvas pixels.
    pub rect: Rect,
    pub enabled: bool,
}

pub struct MenuScreen {
    pub buttons: Vec<MenuButton>,
    pub cursor: usize,
}

impl MenuScreen {
    /// Buttons stack below the title; a button is interactive only when
    /// its level is the first one or already completed (linear unlock).
    pub fn new(completed: &CompletedLevels) -> Self {
        let buttons = LEVELS
            .iter()
            .enumerate()
            .map(|(i, &label)| MenuButton {
                label,
                rect: Rect::new(350.0, 285.0 + i as f32 * 50.0, 100.0, 30.0),
                enabled: i == 0 || completed.contains(label),
            })
            .collect();
        MenuScreen { buttons, cursor: 0 }
    }

    fn handle(&mut self, input: &FrameInput) -> Option<Transition> {
        if let Some((x, y)) = input.click {
            for (i, button) in self.buttons.iter().enumerate() {
                if button.enabled && button.rect.contains(x, y) {
                    return Some(Transition::StartLevel(i));
                }
            }
            // Clicks elsewhere (including disabled buttons) change nothing
        }
        if input.menu_up {
            self.cursor = self.cursor.saturating_sub(1);
        }
        if input.menu_down {
            self.cursor = (self.cursor + 1).min(self.buttons.len() - 1);
        }
        if input.confirm && self.buttons[self.cursor].enabled {
            return Some(Transition::StartLevel(self.cursor));
        }
        if input.cancel {
            return Some(Transition::Quit);
        }
        None
    }
}

// -- End screen --

pub struct EndScreen {
    pub level_id: String,
    pub result: LevelResult,
    /// Set when recording the victory failed; shown, never fatal.
    pub save_warning: Option<String>,
}

impl EndScreen {
    pub fn new(level_id: String, result: LevelResult, save_warning: Option<String>) -> Self {
        EndScreen { level_id, result, save_warning }
    }

    fn handle(&mut self, input: &FrameInput) -> Option<Transition> {
        if input.confirm || input.cancel {
            return Some(Transition::ToMenu);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::Outcome;

    fn click(x: f32, y: f32) -> FrameInput {
        FrameInput { click: Some((x, y)), ..Default::default() }
    }

    fn confirm() -> FrameInput {
        FrameInput { confirm: true, ..Default::default() }
    }

    #[test]
    fn fresh_menu_enables_only_the_first_level() {
        let menu = MenuScreen::new(&CompletedLevels::default());
        let enabled: Vec<bool> = menu.buttons.iter().map(|b| b.enabled).collect();
        assert_eq!(enabled, vec![true, false, false]);
        assert_eq!(menu.buttons[0].label, "Desert");
    }

    #[test]
    fn clicking_a_disabled_button_changes_nothing() {
        let mut menu = MenuScreen::new(&CompletedLevels::default());
        // Centers of the Ocean and Hell buttons
        assert!(menu.handle(&click(400.0, 350.0)).is_none());
        assert!(menu.handle(&click(400.0, 400.0)).is_none());
        // And a click on empty background
        assert!(menu.handle(&click(10.0, 10.0)).is_none());
    }

    #[test]
    fn clicking_an_enabled_button_starts_the_level() {
        let mut menu = MenuScreen::new(&CompletedLevels::default());
        let t = menu.handle(&click(400.0, 300.0));
        assert!(matches!(t, Some(Transition::StartLevel(0))));
    }

    #[test]
    fn completion_unlocks_a_button() {
        let mut completed = CompletedLevels::default();
        completed.record("Ocean");
        let mut menu = MenuScreen::new(&completed);
        assert!(menu.buttons[1].enabled);
        let t = menu.handle(&click(400.0, 350.0));
        assert!(matches!(t, Some(Transition::StartLevel(1))));
    }

    #[test]
    fn confirm_on_a_disabled_cursor_entry_is_ignored() {
        let mut menu = MenuScreen::new(&CompletedLevels::default());
        menu.handle(&FrameInput { menu_down: true, ..Default::default() });
        assert_eq!(menu.cursor, 1);
        assert!(menu.handle(&confirm()).is_none());
        // Back on the first entry it works
        menu.handle(&FrameInput { menu_up: true, ..Default::default() });
        assert!(matches!(menu.handle(&confirm()), Some(Transition::StartLevel(0))));
    }

    #[test]
    fn end_screen_waits_for_acknowledgement() {
        let result = LevelResult { outcome: Outcome::Victory, elapsed_seconds: 12 };
        let mut end = EndScreen::new("Desert".into(), result, None);
        assert!(end.handle(&FrameInput::default()).is_none());
        assert!(matches!(end.handle(&confirm()), Some(Transition::ToMenu)));
    }
}
