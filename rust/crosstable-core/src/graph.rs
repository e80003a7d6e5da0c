//! Input graph model: the fine-grained level graph (one node per
//! spatial cell, up to four directional links) and the sparse waypoint
//! graph anchored onto it.
//!
//! The cross-table pipeline only consumes the two traits; loading and
//! parsing of on-disk graph formats stay outside this crate. The
//! `Memory*` types are the owned implementations used by the builder
//! binary and the tests.

use uuid::Uuid;

pub type NodeId = u32;

/// Link slot value for "no neighbor in this direction".
pub const INVALID_NODE: NodeId = u32::MAX;

/// Every level node carries exactly four directional link slots.
pub const LINKS_PER_NODE: usize = 4;

pub trait LevelGraph {
    fn node_count(&self) -> u32;

    /// Uniform physical size of one cell; scales hop counts into
    /// physical distances.
    fn cell_size(&self) -> f32;

    fn guid(&self) -> Uuid;

    /// The four link slots of `node`, `INVALID_NODE` where absent.
    fn links(&self, node: NodeId) -> [NodeId; LINKS_PER_NODE];

    fn is_valid(&self, node: NodeId) -> bool {
        node < self.node_count()
    }
}

pub trait WaypointGraph {
    fn waypoint_count(&self) -> u16;

    fn guid(&self) -> Uuid;

    /// Level node the waypoint is attached to.
    fn anchor(&self, waypoint: u16) -> NodeId;
}

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("node count {0} exceeds u32 range")]
    TooManyNodes(usize),
    #[error("node {node}: link target {target} out of range (node count {count})")]
    LinkOutOfRange { node: NodeId, target: NodeId, count: u32 },
    #[error("cell size {0} must be positive and finite")]
    BadCellSize(f32),
    #[error("waypoint count {0} exceeds u16 range")]
    TooManyWaypoints(usize),
}

#[derive(Debug, Clone)]
pub struct MemoryLevelGraph {
    guid: Uuid,
    cell_size: f32,
    links: Vec<[NodeId; LINKS_PER_NODE]>,
}

impl MemoryLevelGraph {
    pub fn new(
        guid: Uuid,
        cell_size: f32,
        links: Vec<[NodeId; LINKS_PER_NODE]>,
    ) -> Result<Self, GraphError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GraphError::BadCellSize(cell_size));
        }
        // The sentinel must stay distinguishable from a real id.
        if links.len() >= u32::MAX as usize {
            return Err(GraphError::TooManyNodes(links.len()));
        }
        let count = links.len() as u32;
        for (node, slots) in links.iter().enumerate() {
            for &target in slots {
                if target != INVALID_NODE && target >= count {
                    return Err(GraphError::LinkOutOfRange {
                        node: node as NodeId,
                        target,
                        count,
                    });
                }
            }
        }
        Ok(MemoryLevelGraph { guid, cell_size, links })
    }
}

impl LevelGraph for MemoryLevelGraph {
    fn node_count(&self) -> u32 {
        self.links.len() as u32
    }

    fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn guid(&self) -> Uuid {
        self.guid
    }

    fn links(&self, node: NodeId) -> [NodeId; LINKS_PER_NODE] {
        self.links[node as usize]
    }
}

#[derive(Debug, Clone)]
pub struct MemoryWaypointGraph {
    guid: Uuid,
    anchors: Vec<NodeId>,
}

impl MemoryWaypointGraph {
    pub fn new(guid: Uuid, anchors: Vec<NodeId>) -> Result<Self, GraphError> {
        // u16::MAX is the "no waypoint" sentinel in the output table.
        if anchors.len() >= u16::MAX as usize {
            return Err(GraphError::TooManyWaypoints(anchors.len()));
        }
        Ok(MemoryWaypointGraph { guid, anchors })
    }
}

impl WaypointGraph for MemoryWaypointGraph {
    fn waypoint_count(&self) -> u16 {
        self.anchors.len() as u16
    }

    fn guid(&self) -> Uuid {
        self.guid
    }

    fn anchor(&self, waypoint: u16) -> NodeId {
        self.anchors[waypoint as usize]
    }
}
