/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// Each frame is composed into the `next` buffer, diffed cell-by-cell
/// against `prev` (what the terminal currently shows), and only the
/// changed cells are emitted, batched with `queue!` and flushed once.
/// Resizes and screen switches invalidate `prev` so the whole frame
/// repaints.
///
/// ## Coordinate mapping
///
/// The game world is pixel-based (40 px tiles, 800x600 viewport). One
/// terminal cell stands for 20x40 world pixels, so a tile is 2 cells
/// wide by 1 cell tall and the full viewport needs 40x15 cells. The
/// menu instead scales its 800x600 canvas across the whole terminal;
/// `menu_cell_to_point` is the inverse of that scaling, used to turn
/// mouse clicks back into canvas coordinates for hit testing.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::animation::{enemy_frame, player_frame};
use crate::domain::tile::Cell as TileCell;
use crate::sim::screen::{EndScreen, MenuScreen, Screen};
use crate::sim::world::{LevelState, Outcome, VIEW_H, VIEW_W};

/// World pixels covered by one terminal cell.
const CELL_PX_W: f32 = 20.0;
const CELL_PX_H: f32 = 40.0;

/// Level viewport in terminal cells: the 800x600 camera window at
/// 20x40 px per cell.
const VIEW_COLS: usize = 40;
const VIEW_ROWS: usize = 15;

// -- Cell: the unit of the frame buffers --

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all empty terminal cells, so the
    /// frame color matches Clear() exactly on VTE-based terminals.
    const BASE_BG: Color = Color::Rgb { r: 20, g: 18, b: 28 };

    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Cell::BASE_BG,
    };

    /// Sentinel used to invalidate `prev`: differs from any real cell,
    /// so every position gets diffed.
    const INVALID: Cell = Cell {
        ch: '?',
        fg: Color::Magenta,
        bg: Color::Magenta,
    };

    fn new(ch: char, fg: Color) -> Cell {
        Cell { ch, fg, bg: Cell::BASE_BG }
    }

    fn on(ch: char, fg: Color, bg: Color) -> Cell {
        Cell { ch, fg, bg }
    }
}

// -- FrameBuffer: a 2D grid of Cells --

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(width: usize, height: usize) -> Self {
        FrameBuffer { width, height, cells: vec![Cell::BLANK; width * height] }
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    fn resize(&mut self, width: usize, height: usize) {
        if (self.width, self.height) != (width, height) {
            *self = FrameBuffer::new(width, height);
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn invalidate(&mut self) {
        self.cells.fill(Cell::INVALID);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        self.index(x, y).map_or(Cell::BLANK, |i| self.cells[i])
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i, y, Cell::new(ch, fg));
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color) {
        let x = (self.width.saturating_sub(s.chars().count())) / 2;
        self.put_str(x, y, s, fg);
    }
}

// -- Renderer --

/// Discriminant used to force a full clear on screen changes.
fn screen_tag(screen: &Screen) -> u8 {
    match screen {
        Screen::Menu(_) => 0,
        Screen::Level { .. } => 1,
        Screen::End(_) => 2,
    }
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    next: FrameBuffer,
    prev: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_tag: Option<u8>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            next: FrameBuffer::new(0, 0),
            prev: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_tag: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.fit_to(tw as usize, th as usize);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    fn fit_to(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.next.resize(w, h);
        self.prev.resize(w, h);
        self.prev.invalidate();
    }

    /// Map a terminal click back onto the 800x600 menu canvas.
    pub fn menu_cell_to_point(&self, col: u16, row: u16) -> (f32, f32) {
        let w = self.term_w.max(1) as f32;
        let h = self.term_h.max(1) as f32;
        (
            (col as f32 + 0.5) * VIEW_W / w,
            (row as f32 + 0.5) * VIEW_H / h,
        )
    }

    pub fn render(&mut self, screen: &Screen) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let resized = (tw as usize, th as usize) != (self.term_w, self.term_h);
        if resized {
            self.fit_to(tw as usize, th as usize);
        }

        // A screen switch repaints everything, like a resize
        let tag = screen_tag(screen);
        if resized || self.last_tag != Some(tag) {
            self.prev.invalidate();
            self.last_tag = Some(tag);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.next.clear();
        match screen {
            Screen::Menu(menu) => self.compose_menu(menu),
            Screen::Level { state, .. } => self.compose_level(state),
            Screen::End(end) => self.compose_end(end),
        }

        self.present()?;
        std::mem::swap(&mut self.next, &mut self.prev);
        Ok(())
    }

    // -- Present: emit only the cells that changed --

    fn present(&mut self) -> io::Result<()> {
        // Explicit base colors at frame start; ResetColor would fall
        // back to the terminal default and cause line artifacts.
        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;
        let mut pen_fg = Color::White;
        let mut pen_bg = Cell::BASE_BG;
        // Where the terminal cursor will be after the last Print; a
        // MoveTo is only needed when the next changed cell is elsewhere.
        let mut pen_at: Option<(usize, usize)> = None;

        for y in 0..self.next.height {
            for x in 0..self.next.width {
                let cell = self.next.get(x, y);
                if cell == self.prev.get(x, y) {
                    continue;
                }
                if pen_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if pen_fg != cell.fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    pen_fg = cell.fg;
                }
                if pen_bg != cell.bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    pen_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                pen_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // -- Compose: menu --

    fn compose_menu(&mut self, menu: &MenuScreen) {
        let th = self.term_h.max(1) as f32;

        // Canvas y -> terminal row
        let row = |y: f32| ((y / VIEW_H) * th) as usize;

        self.next.put_str(1, 0, "Developer: UnRobWarrior", Color::DarkGrey);
        self.next.put_centered(row(200.0), "T h e   L o s t   G h o s t", Color::White);

        for (i, button) in menu.buttons.iter().enumerate() {
            let cy = button.rect.y + button.rect.h / 2.0;
            let fg = if button.enabled { Color::White } else { Color::DarkGrey };
            let label = if i == menu.cursor {
                format!("> {} <", button.label)
            } else {
                button.label.to_string()
            };
            self.next.put_centered(row(cy), &label, fg);
        }

        if self.term_h > 2 {
            self.next.put_centered(
                self.term_h - 1,
                "[Up/Down] Select   [Enter] Play   [Click] Play   [Esc] Quit",
                Color::DarkGrey,
            );
        }
    }

    // -- Compose: level --

    fn compose_level(&mut self, level: &LevelState) {
        let view_cols = VIEW_COLS.min(self.term_w);
        let view_rows = VIEW_ROWS.min(self.term_h.saturating_sub(1));
        let origin_x = (self.term_w.saturating_sub(view_cols)) / 2;
        let origin_y = 1 + (self.term_h.saturating_sub(1).saturating_sub(view_rows)) / 2;

        let wall = wall_color(&level.id);
        let cam = &level.camera;

        // Tiles: project each grid tile through the camera; a tile is
        // two cells wide. Beyond-grid space stays blank (no clamping).
        for (col, row, cell) in level.grid.iter() {
            let drawn = match cell {
                TileCell::Wall => Cell::on('█', wall, Cell::BASE_BG),
                TileCell::Exit => Cell::on('▒', Color::Green, Cell::BASE_BG),
                _ => continue,
            };
            let (sx, sy) = cam.tile_to_screen(col, row);
            let vx = (sx / CELL_PX_W).round();
            let vy = (sy / CELL_PX_H).round();
            if vy < 0.0 || vy as usize >= view_rows {
                continue;
            }
            for i in 0..2 {
                let cx = vx + i as f32;
                if cx < 0.0 || cx as usize >= view_cols {
                    continue;
                }
                self.next.set(origin_x + cx as usize, origin_y + vy as usize, drawn);
            }
        }

        // Entities: enemies first, player on top
        for enemy in &level.enemies {
            let frame = enemy_frame(enemy.anim.state(), enemy.anim.frame_index());
            self.draw_sprite(cam, origin_x, origin_y, view_cols, view_rows, enemy.x, enemy.y, frame, Color::Red);
        }
        let frame = player_frame(level.player.anim.state(), level.player.anim.frame_index());
        self.draw_sprite(
            cam, origin_x, origin_y, view_cols, view_rows,
            level.player.x, level.player.y, frame, Color::Cyan,
        );

        // HUD
        let secs = level.elapsed_seconds();
        let hud = format!(
            " {}   Time {}:{:02}   [R] Restart   [Esc] Menu ",
            level.id,
            secs / 60,
            secs % 60
        );
        self.next.put_str(origin_x, 0, &hud, Color::White);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_sprite(
        &mut self,
        cam: &crate::sim::world::Camera,
        origin_x: usize,
        origin_y: usize,
        view_cols: usize,
        view_rows: usize,
        x: f32,
        y: f32,
        frame: [char; 2],
        fg: Color,
    ) {
        let (sx, sy) = cam.world_to_screen(x, y);
        let vx = (sx / CELL_PX_W).round();
        let vy = (sy / CELL_PX_H).round();
        if vy < 0.0 || vy as usize >= view_rows {
            return;
        }
        for (i, ch) in frame.iter().enumerate() {
            let cx = vx + i as f32;
            if cx < 0.0 || cx as usize >= view_cols {
                continue;
            }
            self.next.set(
                origin_x + cx as usize,
                origin_y + vy as usize,
                Cell::new(*ch, fg),
            );
        }
    }

    // -- Compose: end screen --

    fn compose_end(&mut self, end: &EndScreen) {
        let mid = self.term_h / 2;
        let (headline, fg) = match end.result.outcome {
            Outcome::Victory => ("You escaped!", Color::Green),
            Outcome::Defeat => ("The ghost was caught...", Color::Red),
        };
        self.next.put_centered(mid.saturating_sub(2), &end.level_id, Color::DarkGrey);
        self.next.put_centered(mid, headline, fg);
        let secs = end.result.elapsed_seconds;
        self.next.put_centered(
            mid + 1,
            &format!("Time: {}:{:02}", secs / 60, secs % 60),
            Color::White,
        );
        if let Some(warning) = &end.save_warning {
            self.next.put_centered(mid + 3, warning, Color::Yellow);
        }
        self.next.put_centered(mid + 5, "[Enter] Back to menu", Color::DarkGrey);
    }
}

fn wall_color(level_id: &str) -> Color {
    match level_id {
        "Ocean" => Color::Blue,
        "Hell" => Color::DarkRed,
        _ => Color::DarkYellow, // Desert sand
    }
}
