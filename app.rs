/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Editor facade: routes pointer and keyboard input to the store, the link
//! drawing session and the viewport.

use euclid::default::{Box2D, Vector2D};
use keyboard_types::{Key, Modifiers};

use crate::graph::{ElementRef, Point};
use crate::inp::ImportReport;
use crate::input::{self, BendKind, DrawStep, LinkDrawing, PointerButton, Tool};
use crate::prefs::EditorPreferences;
use crate::simulation::SimulationSession;
use crate::spatial::{self, NodeSpatialIndex};
use crate::store::NetworkStore;
use crate::viewport::Viewport;

/// Zoom step for keyboard zoom.
const KEYBOARD_ZOOM_FACTOR: f64 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorIntent {
    Cancel,
    DeleteSelected,
    Undo,
    Redo,
    SelectAll,
    FitToScreen,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    SetTool(Tool),
    ChooseBend(BendKind),
    ClearNetwork,
    NewDocument,
}

/// What a pointer press did.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    Nothing,
    Selected(String),
    Deselected,
    DragStarted(String),
    RubberBandStarted,
    NodePlaced(String),
    Draw(DrawStep),
    BendMenuOpened,
    BendMenuDismissed,
}

/// Node being dragged. The graph only sees the final position.
#[derive(Debug, Clone, PartialEq)]
struct NodeDrag {
    id: String,
    origin: Point,
    grab_offset: Vector2D<f64>,
    current: Point,
}

#[derive(Debug, Clone, PartialEq)]
struct RubberBand {
    start: Point,
    current: Point,
    additive: bool,
}

pub struct NetworkEditor {
    store: NetworkStore,
    drawing: LinkDrawing,
    tool: Tool,
    pub viewport: Viewport,
    prefs: EditorPreferences,
    pub simulation: SimulationSession,
    hovered: Option<String>,
    drag: Option<NodeDrag>,
    rubber_band: Option<RubberBand>,
    /// Index over node positions, tagged with the store revision it mirrors.
    index: Option<(u64, NodeSpatialIndex)>,
}

impl NetworkEditor {
    pub fn new(prefs: EditorPreferences) -> Self {
        Self {
            store: NetworkStore::with_history_depth(prefs.history_depth),
            drawing: LinkDrawing::new(),
            tool: Tool::default(),
            viewport: Viewport::new(prefs.min_zoom, prefs.max_zoom),
            prefs,
            simulation: SimulationSession::default(),
            hovered: None,
            drag: None,
            rubber_band: None,
            index: None,
        }
    }

    pub fn new_for_testing() -> Self {
        Self::new(EditorPreferences::default())
    }

    pub fn store(&self) -> &NetworkStore {
        &self.store
    }

    /// Direct store access for property edits.
    pub fn store_mut(&mut self) -> &mut NetworkStore {
        &mut self.store
    }

    pub fn drawing(&self) -> &LinkDrawing {
        &self.drawing
    }

    pub fn prefs(&self) -> &EditorPreferences {
        &self.prefs
    }

    pub fn set_prefs(&mut self, prefs: EditorPreferences) {
        self.store.set_history_depth(prefs.history_depth);
        self.viewport.zoom_min = prefs.min_zoom;
        self.viewport.zoom_max = prefs.max_zoom;
        self.viewport.set_zoom(self.viewport.zoom());
        self.prefs = prefs;
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switching tool abandons any drawing session.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool != self.tool && self.drawing.cancel() {
            log::debug!("drawing cancelled by tool switch");
        }
        self.tool = tool;
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn hovered_element(&self) -> Option<ElementRef<'_>> {
        self.store.element(self.hovered.as_deref()?)
    }

    /// Where a node should be drawn, including an uncommitted drag.
    pub fn node_display_position(&self, id: &str) -> Option<Point> {
        match &self.drag {
            Some(drag) if drag.id == id => Some(drag.current),
            _ => self.store.node_position(id),
        }
    }

    /// Current rubber-band rectangle, if one is being dragged.
    pub fn selection_rect(&self) -> Option<Box2D<f64>> {
        self.rubber_band
            .as_ref()
            .map(|band| Box2D::from_points([band.start, band.current]))
    }

    fn node_index(&mut self) -> &NodeSpatialIndex {
        let revision = self.store.revision();
        let index = match self.index.take() {
            Some((built, index)) if built == revision => index,
            _ => NodeSpatialIndex::build(self.store.nodes()),
        };
        &self.index.insert((revision, index)).1
    }

    pub fn pointer_down(
        &mut self,
        point: Point,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> PointerOutcome {
        if let Some(node_type) = self.tool.node_type() {
            if button != PointerButton::Primary {
                return PointerOutcome::Nothing;
            }
            let id = self.store.add_node(node_type, snap(&self.prefs, point));
            return PointerOutcome::NodePlaced(id);
        }
        if let Some(link_type) = self.tool.link_type() {
            return match button {
                PointerButton::Secondary if self.drawing.secondary() => {
                    PointerOutcome::BendMenuOpened
                },
                PointerButton::Secondary => PointerOutcome::Nothing,
                PointerButton::Primary
                    if self.drawing.session().is_some_and(|s| s.bend_menu_open()) =>
                {
                    self.drawing.dismiss_bend_menu();
                    PointerOutcome::BendMenuDismissed
                },
                PointerButton::Primary => {
                    let snapped = snap(&self.prefs, point);
                    let radius = self.prefs.snap_radius;
                    let step = if self.drawing.is_active() {
                        self.drawing.primary(&mut self.store, snapped, radius)
                    } else {
                        self.drawing.begin(&mut self.store, link_type, snapped, radius)
                    };
                    PointerOutcome::Draw(step)
                },
            };
        }
        if button != PointerButton::Primary {
            return PointerOutcome::Nothing;
        }
        self.select_press(point, modifiers)
    }

    fn select_press(&mut self, point: Point, modifiers: Modifiers) -> PointerOutcome {
        let toggle = modifiers.contains(Modifiers::CONTROL) || modifiers.contains(Modifiers::META);
        let hit = self
            .store
            .find_nearest_node(point, self.prefs.snap_radius)
            .map(|node| (node.id.clone(), node.position));

        let Some((id, position)) = hit else {
            if !toggle {
                self.store.clear_selection();
            }
            self.rubber_band = Some(RubberBand {
                start: point,
                current: point,
                additive: toggle,
            });
            return PointerOutcome::RubberBandStarted;
        };

        if toggle {
            self.store.select(&id, true);
            return if self.store.selection().contains(&id) {
                PointerOutcome::Selected(id)
            } else {
                PointerOutcome::Deselected
            };
        }
        if !self.store.selection().contains(&id) {
            self.store.select(&id, false);
        }
        self.drag = Some(NodeDrag {
            id: id.clone(),
            origin: position,
            grab_offset: position - point,
            current: position,
        });
        PointerOutcome::DragStarted(id)
    }

    pub fn pointer_move(&mut self, point: Point) {
        let hover_radius = self.prefs.hover_radius;
        self.hovered = self
            .node_index()
            .nearest_within(point, hover_radius)
            .map(str::to_string);

        if let Some(drag) = self.drag.as_mut() {
            drag.current = snap(&self.prefs, point + drag.grab_offset);
        }
        if let Some(band) = self.rubber_band.as_mut() {
            band.current = point;
        }
        if self.drawing.is_active() {
            let snapped = snap(&self.prefs, point);
            self.drawing.pointer_move(&self.store, snapped);
        }
    }

    /// Finish a drag (one history entry) or a rubber-band selection.
    pub fn pointer_up(&mut self) -> bool {
        if let Some(drag) = self.drag.take() {
            if drag.current == drag.origin {
                return false;
            }
            return self.store.move_node(&drag.id, drag.current);
        }
        if let Some(band) = self.rubber_band.take() {
            let rect = Box2D::from_points([band.start, band.current]);
            if rect.is_empty() {
                return false;
            }
            let mut ids = self.node_index().nodes_in_rect(rect);
            if band.additive {
                ids.extend(self.store.selection().iter().map(str::to_string));
            }
            self.store.select_many(ids);
            return true;
        }
        false
    }

    pub fn choose_bend(&mut self, kind: BendKind) -> bool {
        self.drawing.choose_bend(&self.store, kind)
    }

    /// Handle a key press end to end.
    pub fn handle_key(&mut self, key: &Key, modifiers: Modifiers, text_input_focused: bool) {
        let actions = input::collect_actions(key, modifiers, text_input_focused);
        self.apply_intents(input::intents_from_actions(&actions));
    }

    /// Apply a batch of intents in order.
    pub fn apply_intents<I>(&mut self, intents: I)
    where
        I: IntoIterator<Item = EditorIntent>,
    {
        for intent in intents {
            self.apply_intent(intent);
        }
    }

    fn apply_intent(&mut self, intent: EditorIntent) {
        match intent {
            EditorIntent::Cancel => {
                self.cancel();
            },
            EditorIntent::DeleteSelected => {
                self.delete_selected();
            },
            EditorIntent::Undo => {
                self.undo();
            },
            EditorIntent::Redo => {
                self.redo();
            },
            EditorIntent::SelectAll => self.select_all(),
            EditorIntent::FitToScreen => {
                self.fit_view();
            },
            EditorIntent::ZoomIn => self.zoom_about_center(KEYBOARD_ZOOM_FACTOR),
            EditorIntent::ZoomOut => self.zoom_about_center(1.0 / KEYBOARD_ZOOM_FACTOR),
            EditorIntent::ZoomReset => {
                let factor = 1.0 / self.viewport.zoom();
                self.zoom_about_center(factor);
            },
            EditorIntent::SetTool(tool) => self.set_tool(tool),
            EditorIntent::ChooseBend(kind) => {
                self.choose_bend(kind);
            },
            EditorIntent::ClearNetwork => {
                self.clear_network();
            },
            EditorIntent::NewDocument => self.new_document(),
        }
    }

    fn zoom_about_center(&mut self, factor: f64) {
        let center = self.viewport.view_box().center();
        self.viewport.zoom_at(center, factor);
    }

    /// Escape: end the drawing session, else abandon a gesture, else clear
    /// the selection.
    pub fn cancel(&mut self) -> bool {
        if self.drawing.cancel() {
            return true;
        }
        if self.drag.take().is_some() || self.rubber_band.take().is_some() {
            return true;
        }
        if self.store.selection().is_empty() {
            return false;
        }
        self.store.clear_selection();
        true
    }

    pub fn delete_selected(&mut self) -> Vec<String> {
        let removed = self.store.delete_selected();
        self.drop_stale_drawing();
        removed
    }

    pub fn clear_network(&mut self) -> bool {
        self.drawing.cancel();
        self.store.clear_network()
    }

    pub fn select_all(&mut self) {
        let ids: Vec<String> = self
            .store
            .elements()
            .map(|element| element.id().to_string())
            .collect();
        self.store.select_many(ids);
    }

    /// Undo is unavailable while a drawing session is active.
    pub fn can_undo(&self) -> bool {
        !self.drawing.is_active() && self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.drawing.is_active() && self.store.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        if self.drawing.is_active() {
            log::debug!("undo ignored while drawing");
            return false;
        }
        self.drag = None;
        self.store.undo()
    }

    pub fn redo(&mut self) -> bool {
        if self.drawing.is_active() {
            log::debug!("redo ignored while drawing");
            return false;
        }
        self.drag = None;
        self.store.redo()
    }

    pub fn fit_view(&mut self) -> bool {
        let positions: Vec<Point> = self.store.nodes().map(|node| node.position).collect();
        self.viewport.fit_to(positions, self.prefs.fit_padding)
    }

    pub fn import_inp(&mut self, text: &str) -> ImportReport {
        self.reset_interaction();
        let report = self.store.import_inp_with_rng(
            text,
            &mut rand::thread_rng(),
            self.prefs.placeholder_extent,
        );
        self.fit_view();
        report
    }

    pub fn export_inp(&self) -> String {
        self.store.export_inp(&self.prefs.export_options())
    }

    pub fn new_document(&mut self) {
        self.reset_interaction();
        self.store.new_document();
        self.viewport = Viewport::new(self.prefs.min_zoom, self.prefs.max_zoom);
    }

    fn reset_interaction(&mut self) {
        self.drawing.cancel();
        self.drag = None;
        self.rubber_band = None;
        self.hovered = None;
    }

    /// A session whose anchor was deleted cannot continue.
    fn drop_stale_drawing(&mut self) {
        let stale = self
            .drawing
            .session()
            .and_then(|session| session.last_node())
            .is_some_and(|id| !self.store.graph().contains_node(id));
        if stale {
            self.drawing.cancel();
        }
    }
}

/// Grid-snap `point` when the preference is on.
fn snap(prefs: &EditorPreferences, point: Point) -> Point {
    if prefs.snap_to_grid {
        spatial::snap_to_grid(point, prefs.grid_size)
    } else {
        point
    }
}

impl Default for NetworkEditor {
    fn default() -> Self {
        Self::new_for_testing()
    }
}
