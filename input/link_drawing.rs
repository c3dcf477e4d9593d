/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Interactive multi-segment link drawing.
//!
//! `Idle -> Drawing` on the first primary action, `Drawing -> Drawing` for
//! each straight segment, `Drawing -> BendPending` once a bend kind is chosen
//! from the secondary-action menu, and back to `Drawing` when the bend is
//! committed. Every committed segment or bend goes to the store as its own
//! history entry; the session itself only remembers which nodes it placed.

use crate::graph::{LinkType, NodeType, Point};
use crate::store::{NetworkStore, PathCommit, Waypoint};

/// Share of the horizontal offset used for the arc control point.
const ARC_CONTROL_X: f64 = 0.5;
/// Share of the vertical offset used for the arc control point.
const ARC_CONTROL_Y: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BendKind {
    Angle,
    Arc,
}

/// Which leg of a right-angle bend comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerOrientation {
    HorizontalFirst,
    VerticalFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawingPhase {
    Idle,
    Drawing,
    BendPending(BendKind),
}

/// Proposed bend shape between the last node and the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BendGeometry {
    Angle {
        corner: Point,
        orientation: CornerOrientation,
    },
    Arc {
        control: Point,
    },
}

impl BendGeometry {
    pub fn compute(kind: BendKind, last: Point, cursor: Point) -> Self {
        match kind {
            BendKind::Angle => {
                let orientation = corner_orientation(last, cursor);
                BendGeometry::Angle {
                    corner: angle_corner(last, cursor, orientation),
                    orientation,
                }
            },
            BendKind::Arc => BendGeometry::Arc {
                control: arc_control(last, cursor),
            },
        }
    }

    pub fn kind(&self) -> BendKind {
        match self {
            BendGeometry::Angle { .. } => BendKind::Angle,
            BendGeometry::Arc { .. } => BendKind::Arc,
        }
    }
}

/// Horizontal-first when the horizontal offset is strictly larger.
pub fn corner_orientation(last: Point, cursor: Point) -> CornerOrientation {
    let offset = cursor - last;
    if offset.x.abs() > offset.y.abs() {
        CornerOrientation::HorizontalFirst
    } else {
        CornerOrientation::VerticalFirst
    }
}

pub fn angle_corner(last: Point, cursor: Point, orientation: CornerOrientation) -> Point {
    match orientation {
        CornerOrientation::HorizontalFirst => Point::new(cursor.x, last.y),
        CornerOrientation::VerticalFirst => Point::new(last.x, cursor.y),
    }
}

pub fn arc_control(last: Point, cursor: Point) -> Point {
    let offset = cursor - last;
    Point::new(
        last.x + offset.x * ARC_CONTROL_X,
        last.y + offset.y * ARC_CONTROL_Y,
    )
}

/// Transient state of one link being drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSession {
    link_type: LinkType,
    nodes: Vec<String>,
    cursor: Point,
    bend: Option<BendGeometry>,
    bend_menu_open: bool,
}

impl DrawingSession {
    pub fn link_type(&self) -> LinkType {
        self.link_type
    }

    /// Node ids visited so far, oldest first.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn last_node(&self) -> Option<&str> {
        self.nodes.last().map(String::as_str)
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn bend(&self) -> Option<&BendGeometry> {
        self.bend.as_ref()
    }

    pub fn bend_menu_open(&self) -> bool {
        self.bend_menu_open
    }
}

/// Result of a primary action.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawStep {
    /// A session began at this node.
    Started(String),
    /// A segment or bend was committed.
    Extended(PathCommit),
    /// Self-loop or degenerate bend; nothing changed.
    Rejected,
    /// The last node no longer resolves; nothing changed.
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct LinkDrawing {
    session: Option<DrawingSession>,
}

impl LinkDrawing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DrawingPhase {
        match &self.session {
            None => DrawingPhase::Idle,
            Some(session) => match &session.bend {
                Some(bend) => DrawingPhase::BendPending(bend.kind()),
                None => DrawingPhase::Drawing,
            },
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DrawingSession> {
        self.session.as_ref()
    }

    /// Extend the running session with a click at `point` (already
    /// grid-snapped by the caller). Without a session nothing happens; use
    /// [`LinkDrawing::begin`] to start one.
    pub fn primary(
        &mut self,
        store: &mut NetworkStore,
        point: Point,
        snap_radius: f64,
    ) -> DrawStep {
        let Some(session) = self.session.as_mut() else {
            return DrawStep::Ignored;
        };
        session.cursor = point;

        let Some(last) = session.last_node().map(str::to_string) else {
            return DrawStep::Ignored;
        };
        let Some(last_position) = store.node_position(&last) else {
            log::warn!("drawing anchor {last} no longer exists; ignoring click");
            return DrawStep::Ignored;
        };

        let (end, end_position) = match store.find_nearest_node(point, snap_radius) {
            Some(node) if node.id == last => return DrawStep::Rejected,
            Some(node) => (Waypoint::Existing(node.id.clone()), node.position),
            None => (Waypoint::New(point), point),
        };

        let waypoints = match session.bend.map(|bend| bend.kind()) {
            None => vec![end],
            Some(kind) => match BendGeometry::compute(kind, last_position, end_position) {
                BendGeometry::Angle { corner, .. }
                    if corner == last_position || corner == end_position =>
                {
                    vec![end]
                },
                BendGeometry::Angle { corner, .. } => vec![Waypoint::New(corner), end],
                BendGeometry::Arc { control } => vec![Waypoint::New(control), end],
            },
        };

        match store.add_path(session.link_type, &last, &waypoints) {
            Ok(Some(commit)) => {
                session.nodes.extend(commit.nodes.iter().cloned());
                session.bend = None;
                session.bend_menu_open = false;
                DrawStep::Extended(commit)
            },
            Ok(None) => DrawStep::Rejected,
            Err(err) => {
                log::warn!("could not extend link from {last}: {err}");
                DrawStep::Ignored
            },
        }
    }

    /// Start a `link_type` session at `point`, snapping to a node within
    /// `snap_radius` or placing a junction. A running session is replaced.
    pub fn begin(
        &mut self,
        store: &mut NetworkStore,
        link_type: LinkType,
        point: Point,
        snap_radius: f64,
    ) -> DrawStep {
        if self.session.is_some() {
            log::debug!("replacing the running drawing session");
        }
        let start = match store.find_nearest_node(point, snap_radius) {
            Some(node) => node.id.clone(),
            None => store.add_node(NodeType::Junction, point),
        };
        log::debug!("started {link_type:?} at {start}");
        self.session = Some(DrawingSession {
            link_type,
            nodes: vec![start.clone()],
            cursor: point,
            bend: None,
            bend_menu_open: false,
        });
        DrawStep::Started(start)
    }

    /// Secondary action: open the bend menu. Only meaningful mid-session.
    pub fn secondary(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.bend_menu_open = true;
                true
            },
            None => false,
        }
    }

    pub fn dismiss_bend_menu(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.bend_menu_open = false;
        }
    }

    /// Pick a bend kind; geometry is proposed immediately from the cursor.
    pub fn choose_bend(&mut self, store: &NetworkStore, kind: BendKind) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(last) = session.last_node().and_then(|id| store.node_position(id)) else {
            return false;
        };
        session.bend = Some(BendGeometry::compute(kind, last, session.cursor));
        session.bend_menu_open = false;
        true
    }

    /// Track the cursor, reshaping any pending bend.
    pub fn pointer_move(&mut self, store: &NetworkStore, point: Point) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.cursor = point;
        let Some(kind) = session.bend.map(|bend| bend.kind()) else {
            return;
        };
        if let Some(last) = session.last_node().and_then(|id| store.node_position(id)) {
            session.bend = Some(BendGeometry::compute(kind, last, point));
        }
    }

    /// Drop the session; already committed segments stay in the graph.
    pub fn cancel(&mut self) -> bool {
        self.session.take().is_some()
    }
}
