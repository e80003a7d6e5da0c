use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use uuid::Uuid;

use crate::chunk::ChunkReader;
use crate::graph::NodeId;
use crate::table::{CrossTableCell, CrossTableHeader};

use super::{ArtifactError, CELL_BYTES, CHUNK_CELLS, CHUNK_HEADER, FORMAT_VERSION, HEADER_BYTES};

/// Read-side view of a saved cross table. Opens the artifact through a
/// memory map and validates both chunks up front, so the per-node
/// lookup is a plain O(1) slice decode.
pub struct CrossTable {
    chunks: ChunkReader,
    header: CrossTableHeader,
    cells: std::ops::Range<usize>,
}

impl CrossTable {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let chunks = ChunkReader::open(path)?;

        let header = {
            let payload = chunks.find(CHUNK_HEADER)?;
            if payload.len() != HEADER_BYTES {
                return Err(ArtifactError::BadHeaderSize(payload.len()));
            }
            let version = LittleEndian::read_u32(&payload[0..4]);
            if version != FORMAT_VERSION {
                return Err(ArtifactError::UnsupportedVersion(version));
            }
            let mut level_guid = [0u8; 16];
            let mut game_guid = [0u8; 16];
            level_guid.copy_from_slice(&payload[12..28]);
            game_guid.copy_from_slice(&payload[28..44]);
            CrossTableHeader {
                version,
                node_count: LittleEndian::read_u32(&payload[4..8]),
                waypoint_count: LittleEndian::read_u32(&payload[8..12]),
                level_guid: Uuid::from_bytes(level_guid),
                game_guid: Uuid::from_bytes(game_guid),
            }
        };

        let cells = chunks.find_range(CHUNK_CELLS)?;
        let expected = header.node_count as usize * CELL_BYTES;
        if cells.len() != expected {
            return Err(ArtifactError::BadCellPayload {
                expected,
                actual: cells.len(),
            });
        }

        Ok(CrossTable { chunks, header, cells })
    }

    pub fn header(&self) -> &CrossTableHeader {
        &self.header
    }

    pub fn node_count(&self) -> u32 {
        self.header.node_count
    }

    /// Nearest waypoint record for `node`, `None` past the node count.
    pub fn cell(&self, node: NodeId) -> Option<CrossTableCell> {
        if node >= self.header.node_count {
            return None;
        }
        let at = self.cells.start + node as usize * CELL_BYTES;
        let bytes = &self.chunks.bytes()[at..at + CELL_BYTES];
        Some(CrossTableCell {
            distance: LittleEndian::read_f32(&bytes[0..4]),
            waypoint: LittleEndian::read_u16(&bytes[4..6]),
        })
    }

    pub fn cells(&self) -> impl Iterator<Item = CrossTableCell> + '_ {
        (0..self.header.node_count).filter_map(move |node| self.cell(node))
    }

    /// True when the table was built from different graphs than the
    /// ones identified by these guids.
    pub fn is_stale(&self, level_guid: &Uuid, game_guid: &Uuid) -> bool {
        self.header.level_guid != *level_guid || self.header.game_guid != *game_guid
    }
}
