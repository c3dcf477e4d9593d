/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Node snapping and spatial queries.
//!
//! [`find_nearest`] is the canonical snap query and scans linearly, which is
//! fine at interactive network sizes. [`NodeSpatialIndex`] is an R*-tree
//! built on demand for rectangle selection and large-graph nearest lookups.

use euclid::default::Box2D;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::graph::{Node, Point};

/// Round each coordinate to the nearest multiple of `spacing`.
///
/// A non-positive spacing leaves the point untouched.
pub fn snap_to_grid(point: Point, spacing: f64) -> Point {
    if spacing <= 0.0 {
        return point;
    }
    Point::new(
        (point.x / spacing).round() * spacing,
        (point.y / spacing).round() * spacing,
    )
}

/// Node closest to `point` if its distance is strictly below `radius`.
///
/// Ties keep the first node encountered.
pub fn find_nearest<'a>(
    nodes: impl IntoIterator<Item = &'a Node>,
    point: Point,
    radius: f64,
) -> Option<&'a Node> {
    let mut best: Option<(&Node, f64)> = None;
    for node in nodes {
        let distance = (node.position - point).length();
        if distance < radius && best.is_none_or(|(_, closest)| distance < closest) {
            best = Some((node, distance));
        }
    }
    best.map(|(node, _)| node)
}

/// A node entry stored in the R*-tree.
struct IndexedNode {
    position: [f64; 2],
    id: String,
}

impl RTreeObject for IndexedNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index mapping canvas-space positions to node ids.
pub struct NodeSpatialIndex {
    tree: RTree<IndexedNode>,
}

impl NodeSpatialIndex {
    /// Build the index from the graph's nodes.
    pub fn build<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        let entries: Vec<_> = nodes
            .into_iter()
            .map(|node| IndexedNode {
                position: [node.position.x, node.position.y],
                id: node.id.clone(),
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Ids of nodes whose position lies inside `rect` (inclusive bounds).
    pub fn nodes_in_rect(&self, rect: Box2D<f64>) -> Vec<String> {
        let aabb = AABB::from_corners([rect.min.x, rect.min.y], [rect.max.x, rect.max.y]);
        self.tree
            .locate_in_envelope(&aabb)
            .map(|entry| entry.id.clone())
            .collect()
    }

    /// Closest node strictly within `radius`.
    pub fn nearest_within(&self, point: Point, radius: f64) -> Option<&str> {
        let entry = self.tree.nearest_neighbor(&[point.x, point.y])?;
        (entry.distance_2(&[point.x, point.y]) < radius * radius).then_some(entry.id.as_str())
    }
}
