/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Typed partial updates for network elements.
//!
//! Every field is optional; `None` leaves the target untouched. A patch for
//! one variant never matches another variant, so it cannot set fields the
//! element does not have.

use super::Point;
use super::element::{
    Junction, LinkKind, LinkType, MixingModel, NodeKind, NodeType, Pipe, PipeStatus, Pump,
    PumpCurve, Reservoir, SourceQuality, Tank, Valve, ValveStatus, ValveType,
};

macro_rules! apply_fields {
    ($patch:expr, $target:expr, [$($field:ident),* $(,)?]) => {
        $(
            if let Some(value) = &$patch.$field {
                $target.$field = value.clone();
            }
        )*
    };
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JunctionPatch {
    pub elevation: Option<f64>,
    pub base_demand: Option<f64>,
    pub demand_pattern: Option<String>,
    pub emitter_coefficient: Option<f64>,
    pub emitter_exponent: Option<f64>,
    pub initial_quality: Option<f64>,
    pub source_quality: Option<Option<SourceQuality>>,
}

impl JunctionPatch {
    fn apply(&self, junction: &mut Junction) {
        apply_fields!(
            self,
            junction,
            [
                elevation,
                base_demand,
                demand_pattern,
                emitter_coefficient,
                emitter_exponent,
                initial_quality,
                source_quality,
            ]
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservoirPatch {
    pub head: Option<f64>,
    pub head_pattern: Option<String>,
    pub initial_quality: Option<f64>,
    pub source_quality: Option<Option<SourceQuality>>,
}

impl ReservoirPatch {
    fn apply(&self, reservoir: &mut Reservoir) {
        apply_fields!(
            self,
            reservoir,
            [head, head_pattern, initial_quality, source_quality]
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TankPatch {
    pub elevation: Option<f64>,
    pub initial_level: Option<f64>,
    pub min_level: Option<f64>,
    pub max_level: Option<f64>,
    pub diameter: Option<f64>,
    pub min_volume: Option<f64>,
    pub volume_curve: Option<String>,
    pub mixing: Option<MixingModel>,
    pub reaction_coefficient: Option<f64>,
    pub initial_quality: Option<f64>,
}

impl TankPatch {
    fn apply(&self, tank: &mut Tank) {
        apply_fields!(
            self,
            tank,
            [
                elevation,
                initial_level,
                min_level,
                max_level,
                diameter,
                min_volume,
                volume_curve,
                mixing,
                reaction_coefficient,
                initial_quality,
            ]
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipePatch {
    pub length: Option<f64>,
    pub diameter: Option<f64>,
    pub roughness: Option<f64>,
    pub minor_loss: Option<f64>,
    pub status: Option<PipeStatus>,
    pub check_valve: Option<bool>,
    pub bulk_reaction: Option<f64>,
    pub wall_reaction: Option<f64>,
    pub vertices: Option<Vec<Point>>,
}

impl PipePatch {
    fn apply(&self, pipe: &mut Pipe) {
        apply_fields!(
            self,
            pipe,
            [
                length,
                diameter,
                roughness,
                minor_loss,
                status,
                check_valve,
                bulk_reaction,
                wall_reaction,
                vertices,
            ]
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PumpPatch {
    pub curve: Option<PumpCurve>,
    pub speed: Option<f64>,
    pub pattern: Option<String>,
    pub energy_price: Option<f64>,
    pub energy_pattern: Option<String>,
    pub efficiency_curve: Option<String>,
}

impl PumpPatch {
    fn apply(&self, pump: &mut Pump) {
        apply_fields!(
            self,
            pump,
            [
                curve,
                speed,
                pattern,
                energy_price,
                energy_pattern,
                efficiency_curve,
            ]
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValvePatch {
    pub diameter: Option<f64>,
    pub valve_type: Option<ValveType>,
    pub setting: Option<f64>,
    pub minor_loss: Option<f64>,
    pub status: Option<ValveStatus>,
    pub loss_curve: Option<String>,
}

impl ValvePatch {
    fn apply(&self, valve: &mut Valve) {
        apply_fields!(
            self,
            valve,
            [diameter, valve_type, setting, minor_loss, status, loss_curve]
        );
    }
}

/// Attribute patch for one node variant.
#[derive(Debug, Clone, PartialEq)]
pub enum NodePatch {
    Junction(JunctionPatch),
    Reservoir(ReservoirPatch),
    Tank(TankPatch),
}

impl NodePatch {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodePatch::Junction(_) => NodeType::Junction,
            NodePatch::Reservoir(_) => NodeType::Reservoir,
            NodePatch::Tank(_) => NodeType::Tank,
        }
    }

    /// Variant defaults with this patch's overrides merged in.
    pub fn build(&self) -> NodeKind {
        let mut kind = self.node_type().default_kind();
        self.apply(&mut kind);
        kind
    }

    /// Apply to `kind`; returns false when the variants differ.
    pub fn apply(&self, kind: &mut NodeKind) -> bool {
        match (self, kind) {
            (NodePatch::Junction(patch), NodeKind::Junction(junction)) => patch.apply(junction),
            (NodePatch::Reservoir(patch), NodeKind::Reservoir(reservoir)) => {
                patch.apply(reservoir)
            },
            (NodePatch::Tank(patch), NodeKind::Tank(tank)) => patch.apply(tank),
            _ => return false,
        }
        true
    }
}

impl From<NodeType> for NodePatch {
    fn from(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Junction => NodePatch::Junction(JunctionPatch::default()),
            NodeType::Reservoir => NodePatch::Reservoir(ReservoirPatch::default()),
            NodeType::Tank => NodePatch::Tank(TankPatch::default()),
        }
    }
}

impl From<JunctionPatch> for NodePatch {
    fn from(patch: JunctionPatch) -> Self {
        NodePatch::Junction(patch)
    }
}

impl From<ReservoirPatch> for NodePatch {
    fn from(patch: ReservoirPatch) -> Self {
        NodePatch::Reservoir(patch)
    }
}

impl From<TankPatch> for NodePatch {
    fn from(patch: TankPatch) -> Self {
        NodePatch::Tank(patch)
    }
}

/// Attribute patch for one link variant.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkPatch {
    Pipe(PipePatch),
    Pump(PumpPatch),
    Valve(ValvePatch),
}

impl LinkPatch {
    pub fn link_type(&self) -> LinkType {
        match self {
            LinkPatch::Pipe(_) => LinkType::Pipe,
            LinkPatch::Pump(_) => LinkType::Pump,
            LinkPatch::Valve(_) => LinkType::Valve,
        }
    }

    pub fn build(&self) -> LinkKind {
        let mut kind = self.link_type().default_kind();
        self.apply(&mut kind);
        kind
    }

    pub fn apply(&self, kind: &mut LinkKind) -> bool {
        match (self, kind) {
            (LinkPatch::Pipe(patch), LinkKind::Pipe(pipe)) => patch.apply(pipe),
            (LinkPatch::Pump(patch), LinkKind::Pump(pump)) => patch.apply(pump),
            (LinkPatch::Valve(patch), LinkKind::Valve(valve)) => patch.apply(valve),
            _ => return false,
        }
        true
    }
}

impl From<LinkType> for LinkPatch {
    fn from(link_type: LinkType) -> Self {
        match link_type {
            LinkType::Pipe => LinkPatch::Pipe(PipePatch::default()),
            LinkType::Pump => LinkPatch::Pump(PumpPatch::default()),
            LinkType::Valve => LinkPatch::Valve(ValvePatch::default()),
        }
    }
}

impl From<PipePatch> for LinkPatch {
    fn from(patch: PipePatch) -> Self {
        LinkPatch::Pipe(patch)
    }
}

impl From<PumpPatch> for LinkPatch {
    fn from(patch: PumpPatch) -> Self {
        LinkPatch::Pump(patch)
    }
}

impl From<ValvePatch> for LinkPatch {
    fn from(patch: ValvePatch) -> Self {
        LinkPatch::Valve(patch)
    }
}

/// Any update accepted by `update_element`.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementPatch {
    /// Move a node.
    Position(Point),
    /// Reconnect a link; endpoints left as `None` are kept.
    Endpoints {
        node1: Option<String>,
        node2: Option<String>,
    },
    Node(NodePatch),
    Link(LinkPatch),
}

impl From<NodePatch> for ElementPatch {
    fn from(patch: NodePatch) -> Self {
        ElementPatch::Node(patch)
    }
}

impl From<LinkPatch> for ElementPatch {
    fn from(patch: LinkPatch) -> Self {
        ElementPatch::Link(patch)
    }
}

macro_rules! element_patch_from {
    ($($variant:ty => $wrapper:ident),* $(,)?) => {
        $(
            impl From<$variant> for ElementPatch {
                fn from(patch: $variant) -> Self {
                    ElementPatch::from($wrapper::from(patch))
                }
            }
        )*
    };
}

element_patch_from! {
    JunctionPatch => NodePatch,
    ReservoirPatch => NodePatch,
    TankPatch => NodePatch,
    PipePatch => LinkPatch,
    PumpPatch => LinkPatch,
    ValvePatch => LinkPatch,
}
