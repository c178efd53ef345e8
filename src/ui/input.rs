/// Keyboard and mouse capture.
///
/// Raw terminal events are folded into game-level input once per frame.
/// Directional keys feed two views at once: a held set for continuous
/// movement and a tap set for menu navigation. Action keys (confirm,
/// cancel, restart) are edge-triggered. Left clicks are collected for
/// menu hit testing. A held direction that stops receiving Press/Repeat
/// events expires after a short timeout, covering terminals that never
/// deliver Release.

use std::time::{Duration, Instant};

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

use crate::domain::entity::Dir;

/// A direction without a Press/Repeat event for this long counts as released.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

/// Edge-triggered bindings: fire once per press, never repeat.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Confirm,
    Cancel,
    Restart,
}

/// Arrow keys and WASD both steer.
fn direction_binding(code: KeyCode) -> Option<Dir> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Dir::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Dir::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Dir::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Dir::Right),
        _ => None,
    }
}

fn action_binding(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Restart),
        _ => None,
    }
}

fn slot(dir: Dir) -> usize {
    match dir {
        Dir::Up => 0,
        Dir::Down => 1,
        Dir::Left => 2,
        Dir::Right => 3,
    }
}

pub struct InputState {
    /// Last Press/Repeat per direction; None = not held.
    held: [Option<Instant>; 4],
    /// Directions that went down this frame.
    fresh: [bool; 4],
    /// Actions that went down this frame.
    actions: Vec<Action>,
    /// Left-click positions this frame, as (terminal column, row).
    clicks: Vec<(u16, u16)>,
    /// Ctrl-C seen this frame.
    quit: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            held: [None; 4],
            fresh: [false; 4],
            actions: Vec::with_capacity(4),
            clicks: Vec::with_capacity(4),
            quit: false,
        }
    }

    /// Drain pending terminal events into this frame's input view.
    /// Call once per loop iteration, before dispatching to the screen.
    pub fn poll_frame(&mut self) {
        self.fresh = [false; 4];
        self.actions.clear();
        self.clicks.clear();
        self.quit = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
                    {
                        self.quit = true;
                    } else if let Some(dir) = direction_binding(key.code) {
                        let s = slot(dir);
                        if key.kind == KeyEventKind::Release {
                            self.held[s] = None;
                        } else {
                            if self.held[s].is_none() {
                                self.fresh[s] = true;
                            }
                            self.held[s] = Some(Instant::now());
                        }
                    } else if key.kind != KeyEventKind::Release {
                        if let Some(action) = action_binding(key.code) {
                            self.actions.push(action);
                        }
                    }
                }
                Ok(Event::Mouse(mouse)) => {
                    if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                        self.clicks.push((mouse.column, mouse.row));
                    }
                }
                _ => {}
            }
        }

        // Timeout expiry for terminals without Release events
        for held in self.held.iter_mut() {
            if held.map_or(false, |t| t.elapsed() >= HOLD_TIMEOUT) {
                *held = None;
            }
        }
    }

    /// The held movement direction, if any. With several keys down at
    /// once, Up/Down win over Left/Right.
    pub fn movement(&self) -> Option<Dir> {
        Dir::ALL.into_iter().find(|&d| self.held[slot(d)].is_some())
    }

    /// Did this direction go down this frame? Menu navigation steps on
    /// taps, not on the held state.
    pub fn tapped(&self, dir: Dir) -> bool {
        self.fresh[slot(dir)]
    }

    pub fn pressed(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    /// Left clicks received this frame, as (column, row).
    pub fn clicks(&self) -> &[(u16, u16)] {
        &self.clicks
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}
