//! The persisted cross-table artifact.
//!
//! Two chunks, and nothing else: a header chunk (version, node count,
//! waypoint count, both source graph guids) and a data chunk holding
//! one fixed-width cell per level node in node-id order. Every field
//! is little-endian; cells are 6 bytes (`f32` distance, `u16` waypoint
//! index) with no padding. This layout is the external contract.

mod reader;
mod writer;

pub use reader::CrossTable;
pub use writer::{encode_cross_table, write_cross_table};

pub const FORMAT_VERSION: u32 = 10;

pub const CHUNK_HEADER: u32 = 0;
pub const CHUNK_CELLS: u32 = 1;

/// version + node count + waypoint count + two 16-byte guids.
pub const HEADER_BYTES: usize = 4 + 4 + 4 + 16 + 16;
pub const CELL_BYTES: usize = 4 + 2;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error(transparent)]
    Chunk(#[from] crate::chunk::ChunkError),
    #[error("cell count {actual} does not match header node count {expected}")]
    CellCountMismatch { expected: u32, actual: usize },
    #[error("unsupported cross table version {0}")]
    UnsupportedVersion(u32),
    #[error("header chunk is {0} bytes, expected {HEADER_BYTES}")]
    BadHeaderSize(usize),
    #[error("cell chunk is {actual} bytes, expected {expected}")]
    BadCellPayload { expected: usize, actual: usize },
}
