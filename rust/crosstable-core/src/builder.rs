//! The cross-table pipeline: mask once, one distance pass per
//! waypoint, then the reduction.

use crate::artifact::FORMAT_VERSION;
use crate::distance::{fill_distances, UNREACHABLE};
use crate::graph::{LevelGraph, NodeId, WaypointGraph};
use crate::mask::exclusion_mask;
use crate::progress::{Progress, SubRange};
use crate::table::{assemble, AnchorConflict, CrossTableCell, CrossTableHeader};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("there are no waypoints in the game graph")]
    NoWaypoints,
    #[error("waypoint {waypoint} anchor {anchor} is not a valid level node (node count {count})")]
    AnchorOutOfRange {
        waypoint: u16,
        anchor: NodeId,
        count: u32,
    },
}

#[derive(Debug)]
pub struct BuildOutput {
    pub header: CrossTableHeader,
    pub cells: Vec<CrossTableCell>,
    /// Anchor nodes whose reduction had to be overridden; already
    /// corrected in `cells`, reported for diagnostics.
    pub conflicts: Vec<AnchorConflict>,
}

/// Computes the full cross table for one level.
///
/// Synchronous and single-threaded; runs to completion or fails before
/// doing any work. The whole distance matrix is held in memory, so the
/// peak cost is `waypoint_count x node_count` u32 entries.
pub fn build_cross_table<L, W, P>(
    level: &L,
    waypoints: &W,
    progress: &mut P,
) -> Result<BuildOutput, BuildError>
where
    L: LevelGraph,
    W: WaypointGraph,
    P: Progress + ?Sized,
{
    let waypoint_count = waypoints.waypoint_count();
    if waypoint_count == 0 {
        return Err(BuildError::NoWaypoints);
    }

    let node_count = level.node_count() as usize;
    let mut anchors = Vec::with_capacity(waypoint_count as usize);
    for waypoint in 0..waypoint_count {
        let anchor = waypoints.anchor(waypoint);
        if !level.is_valid(anchor) {
            return Err(BuildError::AnchorOutOfRange {
                waypoint,
                anchor,
                count: level.node_count(),
            });
        }
        anchors.push(anchor);
    }

    progress.phase("masking unreachable cells");
    let excluded = exclusion_mask(level, &anchors);

    progress.phase("building distance matrix");
    progress.fraction(0.0);
    let mut matrix: Vec<Vec<u32>> = Vec::with_capacity(waypoint_count as usize);
    let span = 1.0 / waypoint_count as f32;
    for (index, &anchor) in anchors.iter().enumerate() {
        let mut field = vec![UNREACHABLE; node_count];
        let mut window = SubRange::new(progress, index as f32 * span, span);
        fill_distances(level, anchor, &excluded, &mut field, &mut window);
        matrix.push(field);
        progress.fraction((index + 1) as f32 * span);
    }
    progress.fraction(1.0);

    progress.phase("assembling cross table");
    let (cells, conflicts) = assemble(level, waypoints, &matrix);

    let header = CrossTableHeader {
        version: FORMAT_VERSION,
        node_count: level.node_count(),
        waypoint_count: waypoint_count as u32,
        level_guid: level.guid(),
        game_guid: waypoints.guid(),
    };

    Ok(BuildOutput { header, cells, conflicts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{MemoryLevelGraph, MemoryWaypointGraph, INVALID_NODE, LINKS_PER_NODE};
    use crate::progress::NullProgress;
    use uuid::Uuid;

    #[test]
    fn zero_waypoints_is_fatal() {
        let level = MemoryLevelGraph::new(
            Uuid::nil(),
            1.0,
            vec![[INVALID_NODE; LINKS_PER_NODE]],
        )
        .unwrap();
        let waypoints = MemoryWaypointGraph::new(Uuid::nil(), Vec::new()).unwrap();
        assert!(matches!(
            build_cross_table(&level, &waypoints, &mut NullProgress),
            Err(BuildError::NoWaypoints)
        ));
    }

    #[test]
    fn out_of_range_anchor_is_fatal() {
        let level = MemoryLevelGraph::new(
            Uuid::nil(),
            1.0,
            vec![[INVALID_NODE; LINKS_PER_NODE]],
        )
        .unwrap();
        let waypoints = MemoryWaypointGraph::new(Uuid::nil(), vec![5]).unwrap();
        assert!(matches!(
            build_cross_table(&level, &waypoints, &mut NullProgress),
            Err(BuildError::AnchorOutOfRange { waypoint: 0, anchor: 5, count: 1 })
        ));
    }

    #[test]
    fn single_waypoint_single_node() {
        let level = MemoryLevelGraph::new(
            Uuid::from_u128(1),
            0.5,
            vec![[INVALID_NODE; LINKS_PER_NODE]],
        )
        .unwrap();
        let waypoints = MemoryWaypointGraph::new(Uuid::from_u128(2), vec![0]).unwrap();
        let out = build_cross_table(&level, &waypoints, &mut NullProgress).unwrap();
        assert_eq!(out.header.node_count, 1);
        assert_eq!(out.header.waypoint_count, 1);
        assert_eq!(out.header.level_guid, Uuid::from_u128(1));
        assert_eq!(out.header.game_guid, Uuid::from_u128(2));
        assert_eq!(out.cells, vec![CrossTableCell { distance: 0.0, waypoint: 0 }]);
        assert!(out.conflicts.is_empty());
    }
}
