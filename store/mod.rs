/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Network graph store: the single owner of element data.
//!
//! Every mutating call records the pre-mutation graph in [`History`] before
//! the change becomes visible, and keeps the selection free of ids that no
//! longer resolve. Calls that turn out to change nothing (unknown ids,
//! rejected paths, mismatched patches) leave history untouched.

use std::convert::Infallible;

use rand::Rng;

use crate::curves::{Curve, CurveLibrary};
use crate::graph::{
    ElementPatch, ElementRef, Graph, GraphError, Link, LinkKind, LinkPatch, LinkType, Node,
    NodePatch, NodeType, Point, PumpCurve,
};
use crate::inp::{self, ExportOptions, ImportReport};
use crate::spatial;

pub mod history;
pub mod selection;

pub use history::{DEFAULT_MAX_DEPTH, History};
pub use selection::SelectionState;

/// Target of one hop in [`NetworkStore::add_path`].
#[derive(Debug, Clone, PartialEq)]
pub enum Waypoint {
    /// Connect to a node that already exists.
    Existing(String),
    /// Place a new junction here and connect to it.
    New(Point),
}

/// Ids created by a committed path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathCommit {
    /// Node reached by each hop, existing or new, in order.
    pub nodes: Vec<String>,
    /// Newly created junctions only.
    pub created_nodes: Vec<String>,
    pub links: Vec<String>,
}

pub struct NetworkStore {
    graph: Graph,
    history: History<Graph>,
    selection: SelectionState,
    /// Edited outside the undo history.
    curves: CurveLibrary,
    revision: u64,
}

impl NetworkStore {
    pub fn new() -> Self {
        Self::with_history_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_history_depth(max_depth: usize) -> Self {
        Self {
            graph: Graph::new(),
            history: History::new(max_depth),
            selection: SelectionState::new(),
            curves: CurveLibrary::new(),
            revision: 0,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn history(&self) -> &History<Graph> {
        &self.history
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Incremented on every graph change, including undo and redo.
    pub fn curves(&self) -> &CurveLibrary {
        &self.curves
    }

    pub fn curves_mut(&mut self) -> &mut CurveLibrary {
        &mut self.curves
    }

    /// Head curve named by pump `link_id`, if it has one and it resolves.
    pub fn pump_head_curve(&self, link_id: &str) -> Option<&Curve> {
        match &self.graph.link(link_id)?.kind {
            LinkKind::Pump(pump) => match &pump.curve {
                PumpCurve::Head(reference) => self.curves.resolve(reference),
                PumpCurve::Power(_) => None,
            },
            _ => None,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn element(&self, id: &str) -> Option<ElementRef<'_>> {
        self.graph.element(id)
    }

    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.graph.elements()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.nodes()
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.graph.links()
    }

    pub fn node_position(&self, id: &str) -> Option<Point> {
        self.graph.node(id).map(|node| node.position)
    }

    /// Snap query over all nodes; see [`spatial::find_nearest`].
    pub fn find_nearest_node(&self, point: Point, radius: f64) -> Option<&Node> {
        spatial::find_nearest(self.graph.nodes(), point, radius)
    }

    /// Place a node of the patch's variant, defaults merged with overrides.
    pub fn add_node(&mut self, patch: impl Into<NodePatch>, position: Point) -> String {
        let kind = patch.into().build();
        let id = self.record(|graph| graph.add_node(kind, position));
        log::debug!("added node {id}");
        id
    }

    /// Connect two existing nodes.
    pub fn add_link(
        &mut self,
        patch: impl Into<LinkPatch>,
        node1: &str,
        node2: &str,
    ) -> Result<String, GraphError> {
        let kind = patch.into().build();
        self.try_record(|graph| graph.add_link(kind, node1, node2).map(Some))
            .map(Option::unwrap_or_default)
    }

    /// Chain of links of `link_type` from `from` through each waypoint,
    /// committed as a single history entry.
    ///
    /// Returns `Ok(None)` without touching the graph when the chain is empty
    /// or any hop would connect a node to itself.
    pub fn add_path(
        &mut self,
        link_type: LinkType,
        from: &str,
        waypoints: &[Waypoint],
    ) -> Result<Option<PathCommit>, GraphError> {
        if waypoints.is_empty() {
            return Ok(None);
        }
        self.try_record(|graph| {
            let mut previous = from.to_string();
            let mut commit = PathCommit::default();
            for waypoint in waypoints {
                let target = match waypoint {
                    Waypoint::Existing(id) => id.clone(),
                    Waypoint::New(position) => {
                        let id = graph.add_node(NodeType::Junction.default_kind(), *position);
                        commit.created_nodes.push(id.clone());
                        id
                    },
                };
                if target == previous {
                    return Ok(None);
                }
                let link = graph.add_link(link_type.default_kind(), &previous, &target)?;
                commit.links.push(link);
                commit.nodes.push(target.clone());
                previous = target;
            }
            Ok(Some(commit))
        })
    }

    /// Patch the element with `id`. `Ok(false)` means nothing matched and no
    /// history entry was taken.
    pub fn update_element(
        &mut self,
        id: &str,
        patch: impl Into<ElementPatch>,
    ) -> Result<bool, GraphError> {
        if !self.graph.contains(id) {
            log::debug!("update ignored for unknown element {id}");
            return Ok(false);
        }
        let patch = patch.into();
        let applied = self.try_record(|graph| {
            graph
                .apply_patch(id, &patch)
                .map(|changed| changed.then_some(()))
        })?;
        Ok(applied.is_some())
    }

    pub fn move_node(&mut self, id: &str, position: Point) -> bool {
        self.update_element(id, ElementPatch::Position(position))
            .unwrap_or(false)
    }

    /// Delete a node (with its links) or a single link.
    ///
    /// Returns every removed id, cascaded links first; empty for unknown ids.
    pub fn delete_element(&mut self, id: &str) -> Vec<String> {
        if !self.graph.contains(id) {
            log::debug!("delete ignored for unknown element {id}");
            return Vec::new();
        }
        self.record_if(|graph| remove_element(graph, id))
            .unwrap_or_default()
    }

    /// Delete the whole selection as one history entry.
    pub fn delete_selected(&mut self) -> Vec<String> {
        let targets: Vec<String> = self.selection.iter().map(str::to_string).collect();
        if targets.is_empty() {
            return Vec::new();
        }
        self.record_if(|graph| {
            let removed: Vec<String> = targets
                .iter()
                .filter_map(|id| remove_element(graph, id))
                .flatten()
                .collect();
            (!removed.is_empty()).then_some(removed)
        })
        .unwrap_or_default()
    }

    /// Remove every element. Undoable; a no-op on an empty graph.
    pub fn clear_network(&mut self) -> bool {
        self.record_if(|graph| {
            if graph.is_empty() {
                return None;
            }
            graph.clear();
            Some(())
        })
        .is_some()
    }

    /// Swap in a whole new graph as one undoable step.
    pub fn replace_graph(&mut self, graph: Graph) {
        self.record(|current| *current = graph);
        self.selection.clear();
    }

    /// Parse the sectioned text format and replace the graph with it.
    pub fn import_inp(&mut self, text: &str) -> ImportReport {
        let (graph, report) = inp::import(text);
        self.replace_graph(graph);
        log::info!(
            "imported {} nodes and {} links",
            report.nodes,
            report.links
        );
        report
    }

    /// [`NetworkStore::import_inp`] with caller-supplied placeholder randomness.
    pub fn import_inp_with_rng(
        &mut self,
        text: &str,
        rng: &mut impl Rng,
        placeholder_extent: f64,
    ) -> ImportReport {
        let (graph, report) = inp::import_with_rng(text, rng, placeholder_extent);
        self.replace_graph(graph);
        report
    }

    pub fn export_inp(&self, options: &ExportOptions) -> String {
        inp::export(&self.graph, options)
    }

    /// Start over: empty graph, curves, selection and history. Not undoable.
    pub fn new_document(&mut self) {
        self.graph.clear();
        self.history.clear();
        self.selection.clear();
        self.curves.clear();
        self.bump();
    }

    /// Select an existing element; unknown ids are ignored.
    pub fn select(&mut self, id: &str, multi_select: bool) -> bool {
        if !self.graph.contains(id) {
            return false;
        }
        self.selection.select(id, multi_select);
        true
    }

    /// Replace the selection, dropping ids that do not resolve.
    pub fn select_many(&mut self, ids: impl IntoIterator<Item = String>) {
        let graph = &self.graph;
        self.selection
            .replace(ids.into_iter().filter(|id| graph.contains(id)));
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Restore the graph from before the last mutation.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo(self.graph.clone()) else {
            return false;
        };
        self.restore(previous);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo(self.graph.clone()) else {
            return false;
        };
        self.restore(next);
        true
    }

    pub fn set_history_depth(&mut self, max_depth: usize) {
        self.history.set_max_depth(max_depth);
    }

    fn restore(&mut self, graph: Graph) {
        self.graph = graph;
        self.selection.clear();
        self.bump();
    }

    fn record<R>(&mut self, edit: impl FnOnce(&mut Graph) -> R) -> R {
        self.history.snapshot(self.graph.clone());
        let result = edit(&mut self.graph);
        self.after_change();
        result
    }

    fn record_if<R>(&mut self, edit: impl FnOnce(&mut Graph) -> Option<R>) -> Option<R> {
        match self.try_record(|graph| Ok::<_, Infallible>(edit(graph))) {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }

    /// Run `edit` on a working copy; commit it (and record the old graph)
    /// only on `Ok(Some(_))`.
    fn try_record<R, E>(
        &mut self,
        edit: impl FnOnce(&mut Graph) -> Result<Option<R>, E>,
    ) -> Result<Option<R>, E> {
        let mut working = self.graph.clone();
        let Some(result) = edit(&mut working)? else {
            return Ok(None);
        };
        let previous = std::mem::replace(&mut self.graph, working);
        self.history.snapshot(previous);
        self.after_change();
        Ok(Some(result))
    }

    fn after_change(&mut self) {
        let graph = &self.graph;
        self.selection.retain(|id| graph.contains(id));
        self.bump();
    }

    fn bump(&mut self) {
        self.revision = self.revision.saturating_add(1);
    }
}

impl Default for NetworkStore {
    fn default() -> Self {
        Self::new()
    }
}

fn remove_element(graph: &mut Graph, id: &str) -> Option<Vec<String>> {
    if let Some((node, links)) = graph.remove_node(id) {
        let mut removed: Vec<String> = links.into_iter().map(|link| link.id).collect();
        removed.push(node.id);
        return Some(removed);
    }
    graph.remove_link(id).map(|link| vec![link.id])
}
