use log::trace;
use rand::Rng;

use super::state::{Board, Tile, CELLS};

/// Insert a random 2 (90%) or 4 (10%) tile into a uniformly chosen empty cell.
///
/// The caller owns the RNG; it is only borrowed for the two draws this makes
/// (cell, then value). A board with no empty cell is returned as-is without
/// touching the RNG.
///
/// ```
/// use grid_2048::engine::{spawn, Board};
/// use rand::rngs::mock::StepRng;
/// // A generator that always yields zero picks the first empty cell and a 2.
/// let mut rng = StepRng::new(0, 0);
/// let b = spawn(Board::EMPTY, &mut rng);
/// assert_eq!(b.get(0, 0), 2);
/// ```
pub fn spawn<R: Rng + ?Sized>(board: Board, rng: &mut R) -> Board {
    let mut slots = [(0, 0); CELLS];
    let mut empty = 0;
    for cell in board.empty_cells() {
        slots[empty] = cell;
        empty += 1;
    }
    if empty == 0 {
        trace!("spawn skipped: board is full");
        return board;
    }
    let (row, col) = slots[rng.gen_range(0..empty)];
    let tile = generate_random_tile(rng);
    trace!("spawned {} at ({}, {})", tile, row, col);
    board.with_tile(row, col, tile)
}

pub(crate) fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen_range(0..10) < 9 { 2 } else { 4 }
}
