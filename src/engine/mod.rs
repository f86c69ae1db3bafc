//! Engine module: the 4x4 board, move resolution, tile spawning and
//! terminal detection.
//!
//! - `Board` is the validated 4x4 state with useful methods.
//! - Free functions mirror the methods when convenient (e.g., `shift`, `spawn`).
//! - Every operation takes boards by value and hands back a new one.

mod ops;
mod spawner;
pub mod state;
mod terminal;

pub use state::{Board, InvalidBoard, Move, Score, Tile, CELLS, MAX_TILE, SIZE};

pub use ops::{resolve, shift, MoveResult};
pub use spawner::spawn;
pub use terminal::{has_adjacent_pair, status, GameStatus, InvalidTarget, Target};
