use rand::Rng;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ops::{self, MoveResult};
use super::spawner;
use super::terminal::{self, GameStatus, Target};

/// Value held by a single cell: 0 for empty, otherwise a power of two in `2..=MAX_TILE`.
pub type Tile = u32;
/// Accumulated score; merges add the value of the tile they create.
pub type Score = u64;

/// Side length of the board.
pub const SIZE: usize = 4;
/// Number of cells on the board.
pub const CELLS: usize = SIZE * SIZE;
/// Largest tile a board may hold. Two of them sit side by side without merging.
pub const MAX_TILE: Tile = 1 << 30;

pub(crate) type Grid = [[Tile; SIZE]; SIZE];

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All directions, in `[Up, Down, Left, Right]` order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Position of this direction in [`Move::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Move::Up => 0,
            Move::Down => 1,
            Move::Left => 2,
            Move::Right => 3,
        }
    }

    /// Parse a single-letter move: `u`/`d`/`l`/`r` (either case).
    pub fn from_char(c: char) -> Option<Move> {
        match c.to_ascii_lowercase() {
            'u' => Some(Move::Up),
            'd' => Some(Move::Down),
            'l' => Some(Move::Left),
            'r' => Some(Move::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(name)
    }
}

/// Caller handed the engine something that is not a legal board.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidBoard {
    #[error("expected a 4x4 board, got {rows} rows (first bad row has {cols} cells)")]
    Shape { rows: usize, cols: usize },
    #[error("expected 16 cells, got {0}")]
    Length(usize),
    #[error("negative tile {value} at ({row}, {col})")]
    Negative { row: usize, col: usize, value: i64 },
    #[error("tile {value} at ({row}, {col}) is not a power of two >= 2")]
    NotPowerOfTwo { row: usize, col: usize, value: i64 },
    #[error("tile {value} at ({row}, {col}) exceeds the largest tile {}", MAX_TILE)]
    TooLarge { row: usize, col: usize, value: i64 },
}

/// 4x4 2048 board, row-major, `rows[0]` is the top row.
///
/// Boards are plain values: every operation returns a new `Board` and never
/// touches the receiver. The only way to build one from outside the crate is
/// through the validating constructors, so every `Board` in hand holds zeros
/// and powers of two only.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "[[u32; 4]; 4]", into = "[[u32; 4]; 4]")]
pub struct Board(pub(crate) Grid);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board([[0; SIZE]; SIZE]);

    /// Build a board from rows, rejecting any cell that is not 0 or a power of two >= 2.
    ///
    /// ```
    /// use grid_2048::engine::Board;
    /// let b = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 4]]).unwrap();
    /// assert_eq!(b.get(3, 3), 4);
    /// assert!(Board::from_rows([[3, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_err());
    /// ```
    pub fn from_rows(rows: [[Tile; SIZE]; SIZE]) -> Result<Self, InvalidBoard> {
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                validate_cell(r, c, i64::from(value))?;
            }
        }
        Ok(Board(rows))
    }

    /// Build a board from 16 row-major cells as they might arrive from an
    /// external session store (signed, unchecked).
    pub fn from_cells(cells: &[i64]) -> Result<Self, InvalidBoard> {
        if cells.len() != CELLS {
            return Err(InvalidBoard::Length(cells.len()));
        }
        let mut grid = [[0; SIZE]; SIZE];
        for (idx, &value) in cells.iter().enumerate() {
            let (r, c) = (idx / SIZE, idx % SIZE);
            grid[r][c] = validate_cell(r, c, value)?;
        }
        Ok(Board(grid))
    }

    /// Rows of the board, top to bottom.
    #[inline]
    pub fn rows(self) -> [[Tile; SIZE]; SIZE] { self.0 }

    /// Cells in row-major order.
    pub fn cells(self) -> [Tile; CELLS] {
        let mut out = [0; CELLS];
        for (idx, slot) in out.iter_mut().enumerate() {
            *slot = self.0[idx / SIZE][idx % SIZE];
        }
        out
    }

    /// Value at `(row, col)`; 0 if empty.
    ///
    /// Panics if either coordinate is outside `0..4`.
    #[inline]
    pub fn get(self, row: usize, col: usize) -> Tile { self.0[row][col] }

    /// Return the board resulting from sliding/merging tiles in `dir` (no random insert).
    ///
    /// ```
    /// use grid_2048::engine::{Board, Move};
    /// let b = Board::from_rows([[0, 2, 0, 2], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// assert_eq!(b.shift(Move::Left).rows()[0], [4, 0, 0, 0]);
    /// ```
    #[inline]
    pub fn shift(self, dir: Move) -> Self { ops::shift(self, dir) }

    /// Slide/merge in `dir` and report the score gained, whether anything
    /// changed and whether `target` now sits on the board.
    #[inline]
    pub fn resolve(self, dir: Move, target: Target) -> MoveResult { ops::resolve(self, dir, target) }

    /// True if sliding in `dir` would change the board.
    #[inline]
    pub fn can_move(self, dir: Move) -> bool { self.shift(dir) != self }

    /// Directions that would change the board, in `[Up, Down, Left, Right]` order.
    pub fn legal_moves(self) -> Vec<Move> {
        Move::ALL.into_iter().filter(|&m| self.can_move(m)).collect()
    }

    /// Insert a random 2 (90%) or 4 (10%) tile into a random empty slot, using the provided RNG.
    ///
    /// A full board comes back unchanged.
    ///
    /// ```
    /// use grid_2048::engine::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Self { spawner::spawn(self, rng) }

    /// Win/loss/in-progress for this board against `target`.
    #[inline]
    pub fn status(self, target: Target) -> GameStatus { terminal::status(self, target) }

    /// Count the number of empty cells on the board.
    pub fn count_empty(self) -> usize {
        self.0.iter().flatten().filter(|&&v| v == 0).count()
    }

    /// Coordinates of empty cells in row-major order.
    pub fn empty_cells(self) -> impl Iterator<Item = (usize, usize)> {
        (0..CELLS)
            .map(|idx| (idx / SIZE, idx % SIZE))
            .filter(move |&(r, c)| self.0[r][c] == 0)
    }

    /// Return the highest tile value (e.g., 2048) present on the board, 0 if empty.
    pub fn highest_tile(self) -> Tile {
        self.0.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Sum of all tile values.
    pub fn tile_sum(self) -> u64 {
        self.0.iter().flatten().map(|&v| u64::from(v)).sum()
    }

    /// True if any cell holds exactly `value`.
    #[inline]
    pub fn contains(self, value: Tile) -> bool {
        self.0.iter().flatten().any(|&v| v == value)
    }

    pub(crate) fn with_tile(self, row: usize, col: usize, value: Tile) -> Self {
        let mut grid = self.0;
        grid[row][col] = value;
        Board(grid)
    }
}

fn validate_cell(row: usize, col: usize, value: i64) -> Result<Tile, InvalidBoard> {
    if value < 0 {
        return Err(InvalidBoard::Negative { row, col, value });
    }
    if value == 0 {
        return Ok(0);
    }
    if value < 2 || value.count_ones() != 1 {
        return Err(InvalidBoard::NotPowerOfTwo { row, col, value });
    }
    match Tile::try_from(value) {
        Ok(v) if v <= MAX_TILE => Ok(v),
        _ => Err(InvalidBoard::TooLarge { row, col, value }),
    }
}

impl TryFrom<[[Tile; SIZE]; SIZE]> for Board {
    type Error = InvalidBoard;
    fn try_from(rows: [[Tile; SIZE]; SIZE]) -> Result<Self, Self::Error> { Board::from_rows(rows) }
}

impl TryFrom<Vec<Vec<i64>>> for Board {
    type Error = InvalidBoard;

    fn try_from(rows: Vec<Vec<i64>>) -> Result<Self, Self::Error> {
        if rows.len() != SIZE {
            let cols = rows.first().map_or(0, Vec::len);
            return Err(InvalidBoard::Shape { rows: rows.len(), cols });
        }
        if let Some(bad) = rows.iter().find(|row| row.len() != SIZE) {
            return Err(InvalidBoard::Shape { rows: rows.len(), cols: bad.len() });
        }
        let flat: Vec<i64> = rows.into_iter().flatten().collect();
        Board::from_cells(&flat)
    }
}

impl From<Board> for [[Tile; SIZE]; SIZE] {
    fn from(b: Board) -> Self { b.0 }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Board").field(&self.0).finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for (r, row) in self.0.iter().enumerate() {
            if r > 0 {
                writeln!(f, "{}", "-".repeat(31))?;
            }
            let cells: Vec<String> = row.iter().map(|&v| format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(val: Tile) -> String {
    match val {
        0 => " ".repeat(7),
        x => format!("{:^7}", x),
    }
}
