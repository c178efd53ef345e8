/// The level grid: a rectangular 2D array of cell codes.
///
/// Immutable after load except for `set_cell`, which exists solely to
/// clear a consumed spawn marker back to `Path`. Indexed `[row][col]`
/// with row = y, col = x.
///
/// Parsing rules:
///   - one line per row, one character per column
///   - trailing whitespace per line is stripped before interpretation
///   - all rows must have equal length
///   - exactly one player spawn (`@`) must be present

use thiserror::Error;

use super::tile::Cell;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map is empty")]
    Empty,
    #[error("map row {row} has {len} columns, expected {expected}")]
    RaggedRow { row: usize, len: usize, expected: usize },
    #[error("unknown map character {ch:?} at row {row}, column {col}")]
    UnknownCell { ch: char, row: usize, col: usize },
    #[error("map has no player spawn")]
    MissingPlayerSpawn,
    #[error("map has more than one player spawn")]
    DuplicatePlayerSpawn,
    #[error("cell ({col}, {row}) is outside the {width}x{height} grid")]
    OutOfBounds { col: usize, row: usize, width: usize, height: usize },
}

#[derive(Clone, Debug)]
pub struct TileGrid {
    cells: Vec<Vec<Cell>>,
    width: usize,
    height: usize,
}

impl TileGrid {
    /// Parse a map from text. Dimensions are fixed by the result.
    pub fn parse(text: &str) -> Result<TileGrid, MapError> {
        let mut cells: Vec<Vec<Cell>> = Vec::new();
        let mut player_spawns = 0;

        for (row, line) in text.lines().enumerate() {
            let line = line.trim_end();
            let mut parsed = Vec::with_capacity(line.len());
            for (col, ch) in line.chars().enumerate() {
                let cell = Cell::from_char(ch)
                    .ok_or(MapError::UnknownCell { ch, row, col })?;
                if cell == Cell::SpawnPlayer {
                    player_spawns += 1;
                }
                parsed.push(cell);
            }
            cells.push(parsed);
        }

        // Drop trailing blank rows (text files often end with a newline)
        while cells.last().map_or(false, |r| r.is_empty()) {
            cells.pop();
        }

        let height = cells.len();
        if height == 0 {
            return Err(MapError::Empty);
        }
        let width = cells[0].len();
        for (row, r) in cells.iter().enumerate() {
            if r.len() != width {
                return Err(MapError::RaggedRow { row, len: r.len(), expected: width });
            }
        }

        match player_spawns {
            0 => return Err(MapError::MissingPlayerSpawn),
            1 => {}
            _ => return Err(MapError::DuplicatePlayerSpawn),
        }

        Ok(TileGrid { cells, width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at (col, row). Callers are expected to stay in bounds;
    /// collision resolution treats an out-of-bounds probe as a wall.
    pub fn cell_at(&self, col: usize, row: usize) -> Result<Cell, MapError> {
        if col < self.width && row < self.height {
            Ok(self.cells[row][col])
        } else {
            Err(MapError::OutOfBounds {
                col,
                row,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// The only mutation: clear a consumed spawn marker to Path.
    pub fn set_cell(&mut self, col: usize, row: usize, cell: Cell) -> Result<(), MapError> {
        if col < self.width && row < self.height {
            self.cells[row][col] = cell;
            Ok(())
        } else {
            Err(MapError::OutOfBounds {
                col,
                row,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Iterate all cells as (col, row, cell).
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, r)| {
            r.iter().enumerate().map(move |(col, &cell)| (col, row, cell))
        })
    }
}
