use std::fmt;

use super::PlayerId;
use crate::error::{BoardError, MoveError};

/// Standard board height.
pub const ROWS: usize = 6;
/// Standard board width.
pub const COLS: usize = 7;
/// Smallest height or width on which a four-in-a-row fits.
pub const MIN_DIMENSION: usize = 4;
/// Largest height or width a board may have.
pub const MAX_DIMENSION: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Occupied(PlayerId),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn player(self) -> Option<PlayerId> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(id) => Some(id),
        }
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Occupied(PlayerId::One) => '1',
            Cell::Occupied(PlayerId::Two) => '2',
        }
    }
}

/// Grid of cells, stored row-major. Row 0 is the top, row `height - 1` the
/// bottom. Pieces only enter through [`Board::drop_piece`], so every column is
/// filled from the bottom up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board. Each side must be between 4 and 64 cells.
    pub fn new(height: usize, width: usize) -> Result<Self, BoardError> {
        let in_range = |side: usize| (MIN_DIMENSION..=MAX_DIMENSION).contains(&side);
        let len = height
            .checked_mul(width)
            .filter(|_| in_range(height) && in_range(width))
            .ok_or(BoardError::InvalidDimension {
                height,
                width,
                min: MIN_DIMENSION,
                max: MAX_DIMENSION,
            })?;
        Ok(Board {
            height,
            width,
            cells: vec![Cell::Empty; len],
        })
    }

    /// The classic 6x7 board
    pub fn standard() -> Self {
        Board {
            height: ROWS,
            width: COLS,
            cells: vec![Cell::Empty; ROWS * COLS],
        }
    }

    /// Empty board with the same dimensions
    pub fn cleared(&self) -> Self {
        Board {
            height: self.height,
            width: self.width,
            cells: vec![Cell::Empty; self.height * self.width],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the cell at a specific position, or `None` when out of bounds.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.cells[row * self.width + col])
    }

    /// Lowest empty row in `col`, or `None` when the column is full.
    pub fn landing_row(&self, col: usize) -> Result<Option<usize>, MoveError> {
        self.check_column(col)?;
        Ok((0..self.height)
            .rev()
            .find(|&row| self.cells[row * self.width + col].is_empty()))
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        !matches!(self.landing_row(col), Ok(Some(_)))
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, player: PlayerId) -> Result<usize, MoveError> {
        let row = self
            .landing_row(col)?
            .ok_or(MoveError::ColumnFull { column: col })?;
        self.place(row, col, player);
        Ok(row)
    }

    /// Write a piece at a landing position obtained from [`Board::landing_row`]
    /// during the same turn.
    pub(crate) fn place(&mut self, row: usize, col: usize, player: PlayerId) {
        debug_assert_eq!(self.landing_row(col), Ok(Some(row)));
        self.cells[row * self.width + col] = Cell::Occupied(player);
    }

    /// Remove the top piece of `col`, returning its owner.
    pub(crate) fn lift(&mut self, col: usize) -> Option<PlayerId> {
        if col >= self.width {
            return None;
        }
        let index = (0..self.height)
            .map(|row| row * self.width + col)
            .find(|&index| !self.cells[index].is_empty())?;
        std::mem::replace(&mut self.cells[index], Cell::Empty).player()
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// Number of pieces `player` has on the board
    pub fn count(&self, player: PlayerId) -> usize {
        self.cells
            .iter()
            .filter(|&&cell| cell == Cell::Occupied(player))
            .count()
    }

    /// Iterate rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Parse a layout of `.`, `1` and `2`, one line per row from the top.
    /// Blank lines and surrounding whitespace are ignored.
    pub fn from_layout(layout: &str) -> Result<Self, BoardError> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut cells = Vec::with_capacity(height * width);

        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return Err(BoardError::Layout(format!(
                    "row {row} has {} cells, expected {width}",
                    line.chars().count()
                )));
            }
            for (col, ch) in line.chars().enumerate() {
                cells.push(match ch {
                    '.' => Cell::Empty,
                    '1' => Cell::Occupied(PlayerId::One),
                    '2' => Cell::Occupied(PlayerId::Two),
                    other => {
                        return Err(BoardError::Layout(format!(
                            "unexpected character '{other}' at row {row}, column {col}"
                        )))
                    }
                });
            }
        }

        Board::from_cells(height, width, cells)
    }

    /// Build a board from row-major cells, checking dimensions and that no
    /// piece floats above an empty cell.
    pub(crate) fn from_cells(
        height: usize,
        width: usize,
        cells: Vec<Cell>,
    ) -> Result<Self, BoardError> {
        let mut board = Board::new(height, width)?;
        if cells.len() != height * width {
            return Err(BoardError::Layout(format!(
                "expected {} cells, got {}",
                height * width,
                cells.len()
            )));
        }
        board.cells = cells;

        if let Some(col) = board.floating_column() {
            return Err(BoardError::Layout(format!(
                "column {col} has a piece above an empty cell"
            )));
        }
        Ok(board)
    }

    /// First column with an occupied cell sitting above an empty one.
    fn floating_column(&self) -> Option<usize> {
        (0..self.width).find(|&col| {
            let mut seen_piece = false;
            for row in 0..self.height {
                let empty = self.cells[row * self.width + col].is_empty();
                if seen_piece && empty {
                    return true;
                }
                seen_piece |= !empty;
            }
            false
        })
    }

    fn check_column(&self, col: usize) -> Result<(), MoveError> {
        if col >= self.width {
            return Err(MoveError::InvalidColumn {
                column: col,
                width: self.width,
            });
        }
        Ok(())
    }

    /// Raw write that skips the gravity check, for building reflected boards.
    #[cfg(test)]
    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row * self.width + col] = cell;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}
