use std::fmt;

use serde::{Deserialize, Serialize};

use super::ops::mergeable;
use super::state::{Board, Tile, MAX_TILE, SIZE};

/// Where a game stands. Always derived from the current board, never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    /// Won or Lost.
    #[inline]
    pub fn is_terminal(self) -> bool { !matches!(self, GameStatus::InProgress) }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameStatus::InProgress => "in progress",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        };
        f.write_str(s)
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid target {0}: must be a power of two between 4 and {}", MAX_TILE)]
pub struct InvalidTarget(pub Tile);

/// Tile value that wins the game.
///
/// Smaller targets are handy for tests and short sessions; the classic game uses 2048.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Target(Tile);

impl Target {
    pub const DEFAULT: Target = Target(2048);

    pub fn new(value: Tile) -> Result<Self, InvalidTarget> {
        if value >= 4 && value <= MAX_TILE && value.is_power_of_two() {
            Ok(Target(value))
        } else {
            Err(InvalidTarget(value))
        }
    }

    #[inline]
    pub fn value(self) -> Tile { self.0 }
}

impl Default for Target {
    fn default() -> Self { Target::DEFAULT }
}

impl TryFrom<u32> for Target {
    type Error = InvalidTarget;
    fn try_from(value: u32) -> Result<Self, Self::Error> { Target::new(value) }
}

impl From<Target> for u32 {
    fn from(t: Target) -> Self { t.0 }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Win/loss/in-progress for `board`.
///
/// A board holding the target is `Won` even if it is also stuck.
///
/// ```
/// use grid_2048::engine::{status, Board, GameStatus, Target};
/// let stuck = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]).unwrap();
/// assert_eq!(status(stuck, Target::DEFAULT), GameStatus::Lost);
/// assert_eq!(status(Board::EMPTY, Target::DEFAULT), GameStatus::InProgress);
/// ```
pub fn status(board: Board, target: Target) -> GameStatus {
    if board.contains(target.value()) {
        GameStatus::Won
    } else if board.count_empty() == 0 && !has_adjacent_pair(board) {
        GameStatus::Lost
    } else {
        GameStatus::InProgress
    }
}

/// True if two horizontally or vertically adjacent cells could merge.
pub fn has_adjacent_pair(board: Board) -> bool {
    let g = board.0;
    for r in 0..SIZE {
        for c in 0..SIZE {
            let v = g[r][c];
            if c + 1 < SIZE && mergeable(v, g[r][c + 1]) {
                return true;
            }
            if r + 1 < SIZE && mergeable(v, g[r + 1][c]) {
                return true;
            }
        }
    }
    false
}
