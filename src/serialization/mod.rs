//! Serialization surfaces for game sessions.
//!
//! A session is stored as a [`Snapshot`]: the board as a flat array of 16
//! row-major cells, the score, the status tag and the target. The binary
//! form is a postcard body framed by a magic header and a CRC32C trailer;
//! serde derives make JSON (or any other serde format) available to callers.

mod snapshot;

pub use snapshot::{
    Snapshot,
    SnapshotError,
    encode_snapshot,
    decode_snapshot,
    write_snapshot_to_path,
    read_snapshot_from_path,
};
