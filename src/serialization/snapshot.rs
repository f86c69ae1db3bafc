use std::fs;
use std::io::{self, Write};
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::engine::{status, Board, GameStatus, InvalidBoard, InvalidTarget, Score, Target, Tile, CELLS};
use crate::game::GameState;

const MAGIC: &[u8; 4] = b"G2S1"; // ASCII magic, bump the digit on layout changes
const CHECKSUM_LEN: usize = 4;

/// A session as a caller would store it: 16 row-major cells, score, status tag and target.
///
/// Cells are kept raw so a snapshot can carry whatever the outside world
/// wrote; [`Snapshot::restore`] is where they are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cells: [Tile; CELLS],
    pub score: Score,
    pub status: GameStatus,
    pub target: Tile,
}

#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("postcard error: {0}")]
    Postcard(#[from] postcard::Error),
    #[error("invalid magic")]
    Magic,
    #[error("file too short or malformed")]
    Malformed,
    #[error("checksum mismatch")]
    Checksum,
    #[error("invalid board: {0}")]
    InvalidBoard(#[from] InvalidBoard),
    #[error(transparent)]
    InvalidTarget(#[from] InvalidTarget),
}

impl Snapshot {
    /// Capture a session.
    pub fn capture(state: &GameState, target: Target) -> Self {
        Snapshot {
            cells: state.board.cells(),
            score: state.score,
            status: state.status,
            target: target.value(),
        }
    }

    /// Validate and rebuild the session.
    ///
    /// The status is recomputed from the board; a stored tag that disagrees is
    /// logged and replaced.
    pub fn restore(&self) -> Result<(GameState, Target), SnapshotError> {
        let cells: Vec<i64> = self.cells.iter().map(|&v| i64::from(v)).collect();
        let board = Board::from_cells(&cells)?;
        let target = Target::new(self.target)?;
        let derived = status(board, target);
        if derived != self.status {
            warn!("snapshot status {} disagrees with board ({}), using board", self.status, derived);
        }
        Ok((GameState { board, score: self.score, status: derived }, target))
    }
}

/// Magic, postcard body, CRC32C of everything before it (LE).
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<Vec<u8>, SnapshotError> {
    let body = postcard::to_allocvec(snapshot)?;
    let mut buf = Vec::with_capacity(MAGIC.len() + body.len() + CHECKSUM_LEN);
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&body);
    let checksum = crc32c::crc32c(&buf);
    buf.extend_from_slice(&checksum.to_le_bytes());
    Ok(buf)
}

pub fn decode_snapshot(bytes: &[u8]) -> Result<Snapshot, SnapshotError> {
    if bytes.len() < MAGIC.len() + CHECKSUM_LEN {
        return Err(SnapshotError::Malformed);
    }
    // Validate checksum first so a corrupt body never reaches postcard
    let (content, trailer) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    let file_crc = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    if file_crc != crc32c::crc32c(content) {
        return Err(SnapshotError::Checksum);
    }
    if &content[..MAGIC.len()] != MAGIC {
        return Err(SnapshotError::Magic);
    }
    let (snapshot, rest) = postcard::take_from_bytes::<Snapshot>(&content[MAGIC.len()..])?;
    if !rest.is_empty() {
        return Err(SnapshotError::Malformed);
    }
    Ok(snapshot)
}

pub fn write_snapshot_to_path<P: AsRef<Path>>(path: P, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    let data = encode_snapshot(snapshot)?;
    let mut f = fs::File::create(path)?;
    f.write_all(&data)?;
    Ok(())
}

pub fn read_snapshot_from_path<P: AsRef<Path>>(path: P) -> Result<Snapshot, SnapshotError> {
    let data = fs::read(path)?;
    decode_snapshot(&data)
}
