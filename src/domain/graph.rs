//! One-hop neighbourhood of a page.

use crate::domain::{Page, PageId};
use serde::Serialize;
use std::collections::HashSet;

/// Position of a node relative to the page the graph was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Current,
    Outgoing,
    Incoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: PageId,
    pub title: String,
    pub role: NodeRole,
}

/// Direction of an edge as seen from the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeDirection {
    Outgoing,
    Incoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: PageId,
    pub target: PageId,
    pub direction: EdgeDirection,
}

/// Nodes and edges around one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl PageGraph {
    /// Builds the graph for `current`.
    ///
    /// `outgoing` holds the target page of every link leaving the page and
    /// `incoming` the source page of every link arriving at it; repeats are
    /// expected and collapse here. A page linked both ways keeps the
    /// outgoing role. Links from the page to itself are dropped.
    pub fn assemble(current: &Page, outgoing: &[Page], incoming: &[Page]) -> Self {
        let mut nodes = vec![GraphNode {
            id: current.id().clone(),
            title: current.title().to_string(),
            role: NodeRole::Current,
        }];
        let mut edges = Vec::new();
        let mut seen_nodes: HashSet<PageId> = HashSet::from([current.id().clone()]);
        let mut seen_edges = HashSet::new();

        let sides = [
            (outgoing, NodeRole::Outgoing, EdgeDirection::Outgoing),
            (incoming, NodeRole::Incoming, EdgeDirection::Incoming),
        ];
        for (pages, role, direction) in sides {
            for other in pages {
                if other.id() == current.id() {
                    continue;
                }
                if seen_nodes.insert(other.id().clone()) {
                    nodes.push(GraphNode {
                        id: other.id().clone(),
                        title: other.title().to_string(),
                        role,
                    });
                }
                if seen_edges.insert((other.id().clone(), direction)) {
                    let (source, target) = match direction {
                        EdgeDirection::Outgoing => (current.id().clone(), other.id().clone()),
                        EdgeDirection::Incoming => (other.id().clone(), current.id().clone()),
                    };
                    edges.push(GraphEdge {
                        source,
                        target,
                        direction,
                    });
                }
            }
        }

        Self { nodes, edges }
    }

    /// Returns the node for `id`, if present.
    pub fn node(&self, id: &PageId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }
}
