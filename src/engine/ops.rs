use super::state::{Board, Grid, Move, Score, Tile, MAX_TILE, SIZE};
use super::terminal::Target;

/// Outcome of resolving one direction against a board. No tile has been spawned yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    /// Board after sliding and merging.
    pub board: Board,
    /// Sum of the tiles created by merges during this move.
    pub score_delta: Score,
    /// False when the direction left every cell where it was.
    pub moved: bool,
    /// True when some cell of `board` equals the target.
    pub reached_target: bool,
}

type Transform = fn(Grid) -> Grid;

/// Maps a direction into the canonical "slide left" frame and back.
struct Orientation {
    forward: Transform,
    inverse: Transform,
}

// Indexed by `Move::index()`: Up, Down, Left, Right.
const ORIENTATIONS: [Orientation; 4] = [
    Orientation { forward: transpose, inverse: transpose },
    Orientation { forward: rotate_cw, inverse: rotate_ccw },
    Orientation { forward: identity, inverse: identity },
    Orientation { forward: mirror, inverse: mirror },
];

/// Slide/merge tiles in `direction` and report what happened.
///
/// ```
/// use grid_2048::engine::{resolve, Board, Move, Target};
/// let b = Board::from_rows([[2, 2, 2, 2], [0; 4], [0; 4], [0; 4]]).unwrap();
/// let r = resolve(b, Move::Left, Target::DEFAULT);
/// assert_eq!(r.board.rows()[0], [4, 4, 0, 0]);
/// assert_eq!(r.score_delta, 8);
/// assert!(r.moved && !r.reached_target);
/// ```
pub fn resolve(board: Board, direction: Move, target: Target) -> MoveResult {
    let (next, score_delta, moved) = slide(board, direction);
    MoveResult { board: next, score_delta, moved, reached_target: next.contains(target.value()) }
}

/// Slide/merge tiles in the given direction. No randomness.
pub fn shift(board: Board, direction: Move) -> Board {
    slide(board, direction).0
}

fn slide(board: Board, direction: Move) -> (Board, Score, bool) {
    let orientation = &ORIENTATIONS[direction.index()];
    let canonical = (orientation.forward)(board.0);
    let mut out = canonical;
    let mut gained = 0;
    let mut moved = false;
    for (slot, row) in out.iter_mut().zip(canonical) {
        let (next, row_score) = slide_row_left(row);
        moved |= next != row;
        gained += row_score;
        *slot = next;
    }
    (Board((orientation.inverse)(out)), gained, moved)
}

/// Compact a row to the left, merging each adjacent equal pair at most once.
pub(crate) fn slide_row_left(row: [Tile; SIZE]) -> ([Tile; SIZE], Score) {
    let mut compact = [0; SIZE];
    let mut len = 0;
    for v in row.into_iter().filter(|&v| v != 0) {
        compact[len] = v;
        len += 1;
    }

    let mut out = [0; SIZE];
    let mut score = 0;
    let (mut read, mut write) = (0, 0);
    while read < len {
        let val = compact[read];
        if read + 1 < len && mergeable(val, compact[read + 1]) {
            let merged = val << 1;
            out[write] = merged;
            score += Score::from(merged);
            read += 2;
        } else {
            out[write] = val;
            read += 1;
        }
        write += 1;
    }
    (out, score)
}

/// Two cells merge when they hold the same tile and the result stays within `MAX_TILE`.
#[inline]
pub(crate) fn mergeable(a: Tile, b: Tile) -> bool {
    a != 0 && a == b && a < MAX_TILE
}

fn identity(grid: Grid) -> Grid { grid }

fn mirror(grid: Grid) -> Grid {
    grid.map(|mut row| {
        row.reverse();
        row
    })
}

fn transpose(grid: Grid) -> Grid {
    let mut out = [[0; SIZE]; SIZE];
    for (r, row) in grid.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            out[c][r] = v;
        }
    }
    out
}

// Column c read bottom-up becomes row c.
fn rotate_cw(grid: Grid) -> Grid { mirror(transpose(grid)) }

fn rotate_ccw(grid: Grid) -> Grid { transpose(mirror(grid)) }

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: [[Tile; 4]; 4]) -> Board { Board::from_rows(rows).unwrap() }

    fn row_board(row: [Tile; 4]) -> Board { board([row, [0; 4], [0; 4], [0; 4]]) }

    #[test]
    fn it_slide_row_left() {
        assert_eq!(slide_row_left([0, 0, 0, 0]), ([0, 0, 0, 0], 0));
        assert_eq!(slide_row_left([2, 4, 2, 4]), ([2, 4, 2, 4], 0));
        assert_eq!(slide_row_left([2, 2, 4, 4]), ([4, 8, 0, 0], 12));
        assert_eq!(slide_row_left([2, 0, 0, 2]), ([4, 0, 0, 0], 4));
        assert_eq!(slide_row_left([0, 2, 0, 4]), ([2, 4, 0, 0], 0));
    }

    #[test]
    fn merged_tile_does_not_merge_again() {
        assert_eq!(slide_row_left([2, 2, 2, 2]), ([4, 4, 0, 0], 8));
        assert_eq!(slide_row_left([2, 2, 2, 0]), ([4, 2, 0, 0], 4));
        assert_eq!(slide_row_left([4, 2, 2, 0]), ([4, 4, 0, 0], 4));
        assert_eq!(slide_row_left([8, 4, 4, 0]), ([8, 8, 0, 0], 8));
    }

    #[test]
    fn largest_pair_merges_and_max_tiles_stay_put() {
        let half = MAX_TILE / 2;
        assert_eq!(slide_row_left([half, half, 0, 0]), ([MAX_TILE, 0, 0, 0], Score::from(MAX_TILE)));
        assert_eq!(slide_row_left([0, MAX_TILE, 0, MAX_TILE]), ([MAX_TILE, MAX_TILE, 0, 0], 0));
        assert_eq!(slide_row_left([MAX_TILE, half, half, 0]), ([MAX_TILE, MAX_TILE, 0, 0], Score::from(MAX_TILE)));

        let b = row_board([MAX_TILE, MAX_TILE, 0, 0]);
        let r = resolve(b, Move::Left, Target::DEFAULT);
        assert!(!r.moved);
        assert_eq!(r.board, b);
        assert_eq!(r.board.tile_sum(), 2 * u64::from(MAX_TILE));
    }

    #[test]
    fn transforms_invert() {
        let g = [[2, 4, 8, 16], [32, 64, 128, 256], [0, 2, 0, 4], [8, 0, 0, 2]];
        for o in &ORIENTATIONS {
            assert_eq!((o.inverse)((o.forward)(g)), g);
        }
    }

    #[test]
    fn no_op_when_row_is_packed() {
        let b = row_board([2, 4, 8, 16]);
        let r = resolve(b, Move::Left, Target::DEFAULT);
        assert!(!r.moved);
        assert_eq!(r.board, b);
        assert_eq!(r.score_delta, 0);
    }

    #[test]
    fn edge_row_left_and_right() {
        let b = row_board([0, 0, 2, 4]);
        let right = resolve(b, Move::Right, Target::DEFAULT);
        assert!(!right.moved);
        assert_eq!(right.board, b);
        let left = resolve(b, Move::Left, Target::DEFAULT);
        assert!(left.moved);
        assert_eq!(left.board.rows()[0], [2, 4, 0, 0]);
        let back = resolve(left.board, Move::Right, Target::DEFAULT);
        assert_eq!(back.board, b);
    }

    #[test]
    fn test_move_left() {
        let b = board([[2, 4, 8, 16], [2, 8, 8, 4], [4, 0, 0, 4], [2, 0, 0, 4]]);
        let r = resolve(b, Move::Left, Target::DEFAULT);
        assert_eq!(r.board, board([[2, 4, 8, 16], [2, 16, 4, 0], [8, 0, 0, 0], [2, 4, 0, 0]]));
        assert_eq!(r.score_delta, 16 + 8);
    }

    #[test]
    fn test_move_right() {
        let b = board([[2, 4, 8, 16], [2, 8, 8, 4], [4, 0, 0, 4], [2, 0, 0, 4]]);
        let r = resolve(b, Move::Right, Target::DEFAULT);
        assert_eq!(r.board, board([[2, 4, 8, 16], [0, 2, 16, 4], [0, 0, 0, 8], [0, 0, 2, 4]]));
        assert_eq!(r.score_delta, 24);
    }

    #[test]
    fn test_move_up() {
        let b = board([[2, 2, 4, 2], [4, 8, 0, 0], [8, 8, 0, 0], [16, 4, 4, 4]]);
        let r = resolve(b, Move::Up, Target::DEFAULT);
        assert_eq!(r.board, board([[2, 2, 8, 2], [4, 16, 0, 4], [8, 4, 0, 0], [16, 0, 0, 0]]));
        assert_eq!(r.score_delta, 16 + 8);
    }

    #[test]
    fn test_move_down() {
        let b = board([[2, 2, 4, 2], [4, 8, 0, 0], [8, 8, 0, 0], [16, 4, 4, 4]]);
        let r = resolve(b, Move::Down, Target::DEFAULT);
        assert_eq!(r.board, board([[2, 0, 0, 0], [4, 2, 0, 0], [8, 16, 0, 2], [16, 4, 8, 4]]));
        assert_eq!(r.score_delta, 16 + 8);
    }

    #[test]
    fn down_merges_nearest_to_bottom_first() {
        let b = board([[2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0], [0, 0, 0, 0]]);
        let r = resolve(b, Move::Down, Target::DEFAULT);
        assert_eq!(r.board, board([[0; 4], [0; 4], [2, 0, 0, 0], [4, 0, 0, 0]]));
    }

    #[test]
    fn reached_target_is_configurable() {
        let b = row_board([8, 8, 0, 0]);
        assert!(resolve(b, Move::Left, Target::new(16).unwrap()).reached_target);
        assert!(!resolve(b, Move::Left, Target::DEFAULT).reached_target);
    }

    #[test]
    fn empty_board_never_moves() {
        for m in Move::ALL {
            let r = resolve(Board::EMPTY, m, Target::DEFAULT);
            assert!(!r.moved);
            assert_eq!(r.board, Board::EMPTY);
        }
    }
}
