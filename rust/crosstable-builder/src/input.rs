//! JSON input documents for the two source graphs.
//!
//! The builder keeps the on-disk input format deliberately small: one
//! document per graph, links listed per node (absent slots may simply
//! be omitted), waypoints as `{ name, anchor }` records.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crosstable_core::graph::{
    GraphError, MemoryLevelGraph, MemoryWaypointGraph, NodeId, INVALID_NODE, LINKS_PER_NODE,
};

#[derive(Debug, Deserialize)]
pub struct LevelGraphDoc {
    pub guid: Uuid,
    pub cell_size: f32,
    pub nodes: Vec<LevelNodeDoc>,
}

#[derive(Debug, Deserialize)]
pub struct LevelNodeDoc {
    #[serde(default)]
    pub links: Vec<NodeId>,
}

#[derive(Debug, Deserialize)]
pub struct GameGraphDoc {
    pub guid: Uuid,
    pub waypoints: Vec<WaypointDoc>,
}

#[derive(Debug, Deserialize)]
pub struct WaypointDoc {
    #[serde(default)]
    pub name: Option<String>,
    pub anchor: NodeId,
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("node {node} declares {declared} links, at most {LINKS_PER_NODE} allowed")]
    TooManyLinks { node: usize, declared: usize },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl LevelGraphDoc {
    pub fn into_graph(self) -> Result<MemoryLevelGraph, InputError> {
        let mut links = Vec::with_capacity(self.nodes.len());
        for (node, doc) in self.nodes.into_iter().enumerate() {
            if doc.links.len() > LINKS_PER_NODE {
                return Err(InputError::TooManyLinks {
                    node,
                    declared: doc.links.len(),
                });
            }
            let mut slots = [INVALID_NODE; LINKS_PER_NODE];
            slots[..doc.links.len()].copy_from_slice(&doc.links);
            links.push(slots);
        }
        Ok(MemoryLevelGraph::new(self.guid, self.cell_size, links)?)
    }
}

impl GameGraphDoc {
    pub fn into_graph(self) -> Result<MemoryWaypointGraph, InputError> {
        for (index, waypoint) in self.waypoints.iter().enumerate() {
            debug!(
                index,
                name = waypoint.name.as_deref().unwrap_or("<unnamed>"),
                anchor = waypoint.anchor,
                "waypoint"
            );
        }
        let anchors = self.waypoints.into_iter().map(|w| w.anchor).collect();
        Ok(MemoryWaypointGraph::new(self.guid, anchors)?)
    }
}

pub fn load_level_graph(path: &Path) -> Result<MemoryLevelGraph> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading level graph {path:?}"))?;
    let doc: LevelGraphDoc = serde_json::from_str(&text)
        .with_context(|| format!("parsing level graph {path:?}"))?;
    doc.into_graph()
        .with_context(|| format!("validating level graph {path:?}"))
}

pub fn load_game_graph(path: &Path) -> Result<MemoryWaypointGraph> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading game graph {path:?}"))?;
    let doc: GameGraphDoc = serde_json::from_str(&text)
        .with_context(|| format!("parsing game graph {path:?}"))?;
    doc.into_graph()
        .with_context(|| format!("validating game graph {path:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosstable_core::graph::LevelGraph as _;
    use crosstable_core::graph::WaypointGraph as _;

    #[test]
    fn level_doc_pads_missing_link_slots() {
        let doc: LevelGraphDoc = serde_json::from_str(
            r#"{
                "guid": "00000000-0000-0000-0000-000000000001",
                "cell_size": 0.7,
                "nodes": [
                    { "links": [1] },
                    { "links": [0, 2] },
                    {}
                ]
            }"#,
        )
        .unwrap();
        let graph = doc.into_graph().unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.links(0), [1, INVALID_NODE, INVALID_NODE, INVALID_NODE]);
        assert_eq!(graph.links(1), [0, 2, INVALID_NODE, INVALID_NODE]);
        assert_eq!(graph.links(2), [INVALID_NODE; LINKS_PER_NODE]);
    }

    #[test]
    fn level_doc_rejects_five_links() {
        let doc = LevelGraphDoc {
            guid: Uuid::nil(),
            cell_size: 1.0,
            nodes: vec![LevelNodeDoc { links: vec![0, 0, 0, 0, 0] }],
        };
        assert!(matches!(
            doc.into_graph(),
            Err(InputError::TooManyLinks { node: 0, declared: 5 })
        ));
    }

    #[test]
    fn game_doc_keeps_waypoint_order() {
        let doc: GameGraphDoc = serde_json::from_str(
            r#"{
                "guid": "00000000-0000-0000-0000-000000000002",
                "waypoints": [
                    { "name": "camp", "anchor": 4 },
                    { "anchor": 9 }
                ]
            }"#,
        )
        .unwrap();
        let graph = doc.into_graph().unwrap();
        assert_eq!(graph.waypoint_count(), 2);
        assert_eq!(graph.anchor(0), 4);
        assert_eq!(graph.anchor(1), 9);
    }

    #[test]
    fn invalid_link_target_surfaces_the_graph_error() {
        let doc = LevelGraphDoc {
            guid: Uuid::nil(),
            cell_size: 1.0,
            nodes: vec![LevelNodeDoc { links: vec![3] }],
        };
        assert!(matches!(doc.into_graph(), Err(InputError::Graph(_))));
    }
}
