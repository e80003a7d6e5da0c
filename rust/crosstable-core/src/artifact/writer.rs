use std::path::Path;

use crate::chunk::ChunkWriter;
use crate::table::{CrossTableCell, CrossTableHeader};

use super::{ArtifactError, CHUNK_CELLS, CHUNK_HEADER};

/// Serializes header and cells into a chunk stream, ready to save.
pub fn encode_cross_table(
    header: &CrossTableHeader,
    cells: &[CrossTableCell],
) -> Result<ChunkWriter, ArtifactError> {
    if cells.len() != header.node_count as usize {
        return Err(ArtifactError::CellCountMismatch {
            expected: header.node_count,
            actual: cells.len(),
        });
    }

    let mut writer = ChunkWriter::new();

    writer.open_chunk(CHUNK_HEADER)?;
    writer.write_u32(header.version)?;
    writer.write_u32(header.node_count)?;
    writer.write_u32(header.waypoint_count)?;
    writer.write_bytes(header.level_guid.as_bytes())?;
    writer.write_bytes(header.game_guid.as_bytes())?;
    writer.close_chunk()?;

    writer.open_chunk(CHUNK_CELLS)?;
    for cell in cells {
        writer.write_f32(cell.distance)?;
        writer.write_u16(cell.waypoint)?;
    }
    writer.close_chunk()?;

    Ok(writer)
}

pub fn write_cross_table(
    path: impl AsRef<Path>,
    header: &CrossTableHeader,
    cells: &[CrossTableCell],
) -> Result<(), ArtifactError> {
    let writer = encode_cross_table(header, cells)?;
    writer.save_to(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::NO_WAYPOINT;
    use uuid::Uuid;

    use super::super::HEADER_BYTES;

    fn header(nodes: u32) -> CrossTableHeader {
        CrossTableHeader {
            version: super::super::FORMAT_VERSION,
            node_count: nodes,
            waypoint_count: 1,
            level_guid: Uuid::from_u128(1),
            game_guid: Uuid::from_u128(2),
        }
    }

    #[test]
    fn rejects_cell_count_mismatch() {
        let cells = vec![CrossTableCell { distance: 0.0, waypoint: 0 }];
        let err = encode_cross_table(&header(2), &cells).unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::CellCountMismatch { expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn layout_is_exact() {
        let cells = vec![
            CrossTableCell { distance: 1.5, waypoint: 0 },
            CrossTableCell { distance: f32::INFINITY, waypoint: NO_WAYPOINT },
        ];
        let writer = encode_cross_table(&header(2), &cells).unwrap();
        // frame + header payload + frame + 2 cells, nothing after.
        assert_eq!(writer.as_bytes().len(), 8 + HEADER_BYTES + 8 + 2 * super::super::CELL_BYTES);
    }
}
