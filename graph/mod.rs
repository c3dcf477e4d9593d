/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Network graph data structures.
//!
//! Core structures:
//! - `Graph`: node/link container backed by petgraph::StableGraph
//! - `Node`: positioned junction, reservoir or tank
//! - `Link`: pipe, pump or valve between two nodes
//!
//! Node ids and link ids live in separate namespaces; lookups that accept
//! either resolve nodes first.

use euclid::default::Point2D;
use petgraph::Directed;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use std::collections::HashMap;

pub mod element;
pub mod id;
pub mod patch;

pub use element::{
    ElementRef, Junction, Link, LinkKind, LinkType, MixingModel, Node, NodeKind, NodeType, Pipe,
    PipeStatus, Pump, PumpCurve, Reservoir, SourceQuality, SourceType, Tank, Valve, ValveStatus,
    ValveType,
};
pub use patch::{
    ElementPatch, JunctionPatch, LinkPatch, NodePatch, PipePatch, PumpPatch, ReservoirPatch,
    TankPatch, ValvePatch,
};

/// Canvas (world) space coordinate.
pub type Point = Point2D<f64>;

/// Stable node handle; a petgraph NodeIndex survives other deletions.
pub type NodeKey = NodeIndex;

/// Stable link handle (petgraph EdgeIndex)
pub type LinkKey = EdgeIndex;

/// Errors from graph mutations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A link endpoint names a node that does not exist.
    InvalidReference { node: String },
    /// An inserted element reuses an id that is still held.
    DuplicateId { id: String },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::InvalidReference { node } => {
                write!(f, "Invalid reference: no node with id `{node}`")
            },
            GraphError::DuplicateId { id } => write!(f, "Duplicate id: `{id}` is already in use"),
        }
    }
}

impl std::error::Error for GraphError {}

/// Main graph structure backed by petgraph::StableGraph
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Nodes are vertices, links are directed edges `node1 -> node2`.
    inner: StableGraph<Node, Link, Directed>,

    node_ids: HashMap<String, NodeKey>,

    link_ids: HashMap<String, LinkKey>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with a freshly generated id; returns the id.
    pub fn add_node(&mut self, kind: NodeKind, position: Point) -> String {
        let id = self.fresh_node_id(kind.node_type());
        let key = self.inner.add_node(Node::new(id.clone(), position, kind));
        self.node_ids.insert(id.clone(), key);
        id
    }

    /// Add a link with a freshly generated id between two existing nodes.
    pub fn add_link(
        &mut self,
        kind: LinkKind,
        node1: &str,
        node2: &str,
    ) -> Result<String, GraphError> {
        let from = self.resolve(node1)?;
        let to = self.resolve(node2)?;
        let id = self.fresh_link_id(kind.link_type());
        let key = self
            .inner
            .add_edge(from, to, Link::new(id.clone(), node1, node2, kind));
        self.link_ids.insert(id.clone(), key);
        Ok(id)
    }

    /// Insert a node that already carries an id.
    pub fn insert_node(&mut self, node: Node) -> Result<NodeKey, GraphError> {
        if self.node_ids.contains_key(&node.id) {
            return Err(GraphError::DuplicateId { id: node.id });
        }
        let id = node.id.clone();
        let key = self.inner.add_node(node);
        self.node_ids.insert(id, key);
        Ok(key)
    }

    /// Insert a link that already carries an id. Both endpoints must exist.
    pub fn insert_link(&mut self, link: Link) -> Result<LinkKey, GraphError> {
        if self.link_ids.contains_key(&link.id) {
            return Err(GraphError::DuplicateId { id: link.id });
        }
        let from = self.resolve(&link.node1)?;
        let to = self.resolve(&link.node2)?;
        let id = link.id.clone();
        let key = self.inner.add_edge(from, to, link);
        self.link_ids.insert(id, key);
        Ok(key)
    }

    /// Remove a node and every link touching it.
    ///
    /// Returns the removed node and the cascaded links, or `None` if the id
    /// is unknown.
    pub fn remove_node(&mut self, id: &str) -> Option<(Node, Vec<Link>)> {
        let key = self.node_ids.get(id).copied()?;
        let mut incident: Vec<LinkKey> = self
            .inner
            .edge_references()
            .filter(|edge| edge.source() == key || edge.target() == key)
            .map(|edge| edge.id())
            .collect();
        incident.sort();

        let mut links = Vec::with_capacity(incident.len());
        for edge in incident {
            if let Some(link) = self.inner.remove_edge(edge) {
                self.link_ids.remove(&link.id);
                links.push(link);
            }
        }

        let node = self.inner.remove_node(key)?;
        self.node_ids.remove(&node.id);
        Some((node, links))
    }

    /// Remove a single link; its endpoints are untouched.
    pub fn remove_link(&mut self, id: &str) -> Option<Link> {
        let key = self.link_ids.remove(id)?;
        self.inner.remove_edge(key)
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.inner.clear();
        self.node_ids.clear();
        self.link_ids.clear();
    }

    /// Apply a typed patch to the element with `id`.
    ///
    /// Returns `Ok(false)` when the id is unknown or the patch does not fit
    /// the element. Endpoint changes are validated before anything moves.
    pub fn apply_patch(&mut self, id: &str, patch: &ElementPatch) -> Result<bool, GraphError> {
        if let Some(&key) = self.node_ids.get(id) {
            let node = &mut self.inner[key];
            return Ok(match patch {
                ElementPatch::Position(position) => {
                    node.position = *position;
                    true
                },
                ElementPatch::Node(node_patch) => node_patch.apply(&mut node.kind),
                ElementPatch::Endpoints { .. } | ElementPatch::Link(_) => false,
            });
        }

        if let Some(&key) = self.link_ids.get(id) {
            return match patch {
                ElementPatch::Link(link_patch) => Ok(link_patch.apply(&mut self.inner[key].kind)),
                ElementPatch::Endpoints { node1, node2 } => {
                    self.reconnect(key, node1.as_deref(), node2.as_deref())
                },
                ElementPatch::Position(_) | ElementPatch::Node(_) => Ok(false),
            };
        }

        Ok(false)
    }

    /// Move a node. Returns false if the id is not a node.
    pub fn set_node_position(&mut self, id: &str, position: Point) -> bool {
        match self.node_ids.get(id) {
            Some(&key) => {
                self.inner[key].position = position;
                true
            },
            None => false,
        }
    }

    fn reconnect(
        &mut self,
        key: LinkKey,
        node1: Option<&str>,
        node2: Option<&str>,
    ) -> Result<bool, GraphError> {
        let current = &self.inner[key];
        let node1 = node1.map_or_else(|| current.node1.clone(), str::to_string);
        let node2 = node2.map_or_else(|| current.node2.clone(), str::to_string);
        let from = self.resolve(&node1)?;
        let to = self.resolve(&node2)?;

        let Some(mut link) = self.inner.remove_edge(key) else {
            return Ok(false);
        };
        link.node1 = node1;
        link.node2 = node2;
        let id = link.id.clone();
        let new_key = self.inner.add_edge(from, to, link);
        self.link_ids.insert(id, new_key);
        Ok(true)
    }

    fn resolve(&self, node_id: &str) -> Result<NodeKey, GraphError> {
        self.node_ids
            .get(node_id)
            .copied()
            .ok_or_else(|| GraphError::InvalidReference {
                node: node_id.to_string(),
            })
    }

    /// Generate a node id not held by any node.
    pub fn fresh_node_id(&self, node_type: NodeType) -> String {
        id::generate(node_type.id_prefix(), |candidate| {
            self.node_ids.contains_key(candidate)
        })
    }

    /// Generate a link id not held by any link.
    pub fn fresh_link_id(&self, link_type: LinkType) -> String {
        id::generate(link_type.id_prefix(), |candidate| {
            self.link_ids.contains_key(candidate)
        })
    }

    /// Get a node by id
    pub fn node(&self, id: &str) -> Option<&Node> {
        let key = *self.node_ids.get(id)?;
        self.inner.node_weight(key)
    }

    /// Get a link by id
    pub fn link(&self, id: &str) -> Option<&Link> {
        let key = *self.link_ids.get(id)?;
        self.inner.edge_weight(key)
    }

    /// Resolve an id across nodes first, then links.
    pub fn element(&self, id: &str) -> Option<ElementRef<'_>> {
        self.node(id)
            .map(ElementRef::Node)
            .or_else(|| self.link(id).map(ElementRef::Link))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.contains_node(id) || self.contains_link(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_ids.contains_key(id)
    }

    pub fn contains_link(&self, id: &str) -> bool {
        self.link_ids.contains_key(id)
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.inner.node_indices().map(move |idx| &self.inner[idx])
    }

    /// Iterate over all links
    pub fn links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.inner.edge_references().map(|edge| edge.weight())
    }

    /// Iterate nodes then links.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.nodes()
            .map(ElementRef::Node)
            .chain(self.links().map(ElementRef::Link))
    }

    /// Links with `node_id` as either endpoint.
    pub fn links_of(&self, node_id: &str) -> Vec<&Link> {
        self.links().filter(|link| link.touches(node_id)).collect()
    }

    /// Count of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Count of links in the graph
    pub fn link_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0 && self.link_count() == 0
    }

    /// Check that id maps and link endpoint ids agree with the petgraph edges.
    pub fn is_consistent(&self) -> bool {
        if self.node_ids.len() != self.node_count() || self.link_ids.len() != self.link_count() {
            return false;
        }
        let nodes_ok = self
            .node_ids
            .iter()
            .all(|(id, &key)| self.inner.node_weight(key).is_some_and(|node| &node.id == id));
        let links_ok = self.inner.edge_references().all(|edge| {
            let link = edge.weight();
            self.link_ids.get(&link.id) == Some(&edge.id())
                && self.inner[edge.source()].id == link.node1
                && self.inner[edge.target()].id == link.node2
        });
        nodes_ok && links_ok
    }
}

/// Observational equality: same element ids with the same attributes,
/// regardless of internal storage order.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.node_count() == other.node_count()
            && self.link_count() == other.link_count()
            && self.nodes().all(|node| other.node(&node.id) == Some(node))
            && self.links().all(|link| other.link(&link.id) == Some(link))
    }
}
