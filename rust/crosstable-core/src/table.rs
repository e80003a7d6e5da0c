//! Reduction of per-waypoint distance fields into the cross table.

use tracing::warn;
use uuid::Uuid;

use crate::distance::UNREACHABLE;
use crate::graph::{LevelGraph, NodeId, WaypointGraph};

/// Waypoint index sentinel for "no reachable waypoint".
pub const NO_WAYPOINT: u16 = u16::MAX;

/// One record per level node: nearest waypoint and the physical
/// distance to it (hop count scaled by cell size).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossTableCell {
    pub distance: f32,
    pub waypoint: u16,
}

impl CrossTableCell {
    pub const UNREACHED: CrossTableCell = CrossTableCell {
        distance: f32::INFINITY,
        waypoint: NO_WAYPOINT,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossTableHeader {
    pub version: u32,
    pub node_count: u32,
    pub waypoint_count: u32,
    pub level_guid: Uuid,
    pub game_guid: Uuid,
}

/// An anchor node whose reduction picked a different waypoint than the
/// one anchored there. Only degenerate inputs (anchors closer together
/// than the graph resolution separates) produce these; the override in
/// [`assemble`] already corrected the cell when one is reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorConflict {
    pub node: NodeId,
    /// Waypoint anchored at `node`, forced to win.
    pub kept: u16,
    pub kept_distance: f32,
    /// Waypoint the plain reduction had picked.
    pub displaced: u16,
    pub displaced_distance: f32,
}

/// Reduces the distance matrix (one field per waypoint, in waypoint
/// index order) to one cell per node.
///
/// The reduction keeps the strictly smallest physical distance, so on
/// an exact tie the lowest waypoint index wins. Afterwards every
/// anchor is checked against its own node: an anchor that lost the
/// reduction overrides the cell with its own recorded distance and is
/// reported as a conflict. Several waypoints anchored on one node
/// resolve silently, last index wins.
pub fn assemble<L, W>(level: &L, waypoints: &W, matrix: &[Vec<u32>]) -> (Vec<CrossTableCell>, Vec<AnchorConflict>)
where
    L: LevelGraph,
    W: WaypointGraph,
{
    let node_count = level.node_count() as usize;
    let cell_size = level.cell_size();
    let waypoint_count = waypoints.waypoint_count();
    debug_assert_eq!(matrix.len(), waypoint_count as usize);

    let mut cells = Vec::with_capacity(node_count);
    let mut conflicts = Vec::new();

    for node in 0..node_count {
        let mut best = CrossTableCell::UNREACHED;
        for (index, field) in matrix.iter().enumerate() {
            let hops = field[node];
            if hops == UNREACHABLE {
                continue;
            }
            let distance = hops as f32 * cell_size;
            if distance < best.distance {
                best = CrossTableCell { distance, waypoint: index as u16 };
            }
        }

        for waypoint in 0..waypoint_count {
            if waypoints.anchor(waypoint) != node as NodeId || best.waypoint == waypoint {
                continue;
            }
            let own_hops = matrix[waypoint as usize][node];
            let own_distance = own_hops as f32 * cell_size;
            // Co-anchored waypoints on one node are expected to
            // displace each other; only a genuinely foreign winner is
            // worth a diagnostic.
            let displaced_is_co_anchor = best.waypoint != NO_WAYPOINT
                && waypoints.anchor(best.waypoint) == node as NodeId;
            if !displaced_is_co_anchor {
                warn!(
                    node = node as NodeId,
                    kept = waypoint,
                    kept_distance = own_distance,
                    displaced = best.waypoint,
                    displaced_distance = best.distance,
                    "waypoints too close together; forcing anchor node onto its own waypoint"
                );
                conflicts.push(AnchorConflict {
                    node: node as NodeId,
                    kept: waypoint,
                    kept_distance: own_distance,
                    displaced: best.waypoint,
                    displaced_distance: best.distance,
                });
            }
            best = CrossTableCell { distance: own_distance, waypoint };
        }

        cells.push(best);
    }

    (cells, conflicts)
}
