/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Node and link element types.
//!
//! Nodes are the only positioned elements. Links refer to their endpoints by
//! node id; the owning [`Graph`](super::Graph) keeps those ids in step with
//! the underlying petgraph edge endpoints.

use super::Point;

/// Node variant discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Junction,
    Reservoir,
    Tank,
}

impl NodeType {
    pub const ALL: [NodeType; 3] = [NodeType::Junction, NodeType::Reservoir, NodeType::Tank];

    /// Identifier prefix used for generated ids of this variant.
    pub fn id_prefix(self) -> &'static str {
        match self {
            NodeType::Junction => "J",
            NodeType::Reservoir => "R",
            NodeType::Tank => "T",
        }
    }

    /// Attribute defaults for a freshly placed node.
    pub fn default_kind(self) -> NodeKind {
        match self {
            NodeType::Junction => NodeKind::Junction(Junction::default()),
            NodeType::Reservoir => NodeKind::Reservoir(Reservoir::default()),
            NodeType::Tank => NodeKind::Tank(Tank::default()),
        }
    }
}

/// Link variant discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkType {
    Pipe,
    Pump,
    Valve,
}

impl LinkType {
    pub const ALL: [LinkType; 3] = [LinkType::Pipe, LinkType::Pump, LinkType::Valve];

    pub fn id_prefix(self) -> &'static str {
        match self {
            LinkType::Pipe => "P",
            LinkType::Pump => "Pump",
            LinkType::Valve => "V",
        }
    }

    pub fn default_kind(self) -> LinkKind {
        match self {
            LinkType::Pipe => LinkKind::Pipe(Pipe::default()),
            LinkType::Pump => LinkKind::Pump(Pump::default()),
            LinkType::Valve => LinkKind::Valve(Valve::default()),
        }
    }
}

/// Water quality source attached to a junction or reservoir.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceQuality {
    pub source_type: SourceType,
    pub strength: f64,
    pub pattern: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Concentration,
    Mass,
    Setpoint,
    FlowPaced,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    pub elevation: f64,
    pub base_demand: f64,
    pub demand_pattern: String,
    pub emitter_coefficient: f64,
    pub emitter_exponent: f64,
    pub initial_quality: f64,
    pub source_quality: Option<SourceQuality>,
}

impl Default for Junction {
    fn default() -> Self {
        Self {
            elevation: 0.0,
            base_demand: 0.0,
            demand_pattern: String::new(),
            emitter_coefficient: 0.0,
            emitter_exponent: 0.5,
            initial_quality: 0.0,
            source_quality: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reservoir {
    pub head: f64,
    pub head_pattern: String,
    pub initial_quality: f64,
    pub source_quality: Option<SourceQuality>,
}

impl Default for Reservoir {
    fn default() -> Self {
        Self {
            head: 100.0,
            head_pattern: String::new(),
            initial_quality: 0.0,
            source_quality: None,
        }
    }
}

/// Tank mixing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MixingModel {
    #[default]
    Mix1,
    Mix2,
    Fifo,
    Lifo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tank {
    pub elevation: f64,
    pub initial_level: f64,
    pub min_level: f64,
    pub max_level: f64,
    pub diameter: f64,
    pub min_volume: f64,
    pub volume_curve: String,
    pub mixing: MixingModel,
    pub reaction_coefficient: f64,
    pub initial_quality: f64,
}

impl Default for Tank {
    fn default() -> Self {
        Self {
            elevation: 0.0,
            initial_level: 50.0,
            min_level: 0.0,
            max_level: 100.0,
            diameter: 20.0,
            min_volume: 0.0,
            volume_curve: String::new(),
            mixing: MixingModel::Mix1,
            reaction_coefficient: 0.0,
            initial_quality: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipeStatus {
    #[default]
    Open,
    Closed,
    CheckValve,
}

impl PipeStatus {
    pub fn keyword(self) -> &'static str {
        match self {
            PipeStatus::Open => "Open",
            PipeStatus::Closed => "Closed",
            PipeStatus::CheckValve => "CV",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_uppercase().as_str() {
            "OPEN" => Some(PipeStatus::Open),
            "CLOSED" => Some(PipeStatus::Closed),
            "CV" => Some(PipeStatus::CheckValve),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub length: f64,
    pub diameter: f64,
    pub roughness: f64,
    pub minor_loss: f64,
    pub status: PipeStatus,
    pub check_valve: bool,
    pub bulk_reaction: f64,
    pub wall_reaction: f64,
    /// Interior drawing vertices; they carry no topology.
    pub vertices: Vec<Point>,
}

impl Default for Pipe {
    fn default() -> Self {
        Self {
            length: 100.0,
            diameter: 100.0,
            roughness: 100.0,
            minor_loss: 0.0,
            status: PipeStatus::Open,
            check_valve: false,
            bulk_reaction: 0.0,
            wall_reaction: 0.0,
            vertices: Vec::new(),
        }
    }
}

/// Pump characteristic: constant power or a head curve reference.
#[derive(Debug, Clone, PartialEq)]
pub enum PumpCurve {
    Power(f64),
    Head(String),
}

impl Default for PumpCurve {
    fn default() -> Self {
        PumpCurve::Power(1.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pump {
    pub curve: PumpCurve,
    pub speed: f64,
    pub pattern: String,
    pub energy_price: f64,
    pub energy_pattern: String,
    pub efficiency_curve: String,
}

impl Default for Pump {
    fn default() -> Self {
        Self {
            curve: PumpCurve::default(),
            speed: 1.0,
            pattern: String::new(),
            energy_price: 0.0,
            energy_pattern: String::new(),
            efficiency_curve: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValveType {
    #[default]
    Prv,
    Psv,
    Pbv,
    Fcv,
    Tcv,
    Gpv,
}

impl ValveType {
    pub fn keyword(self) -> &'static str {
        match self {
            ValveType::Prv => "PRV",
            ValveType::Psv => "PSV",
            ValveType::Pbv => "PBV",
            ValveType::Fcv => "FCV",
            ValveType::Tcv => "TCV",
            ValveType::Gpv => "GPV",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_uppercase().as_str() {
            "PRV" => Some(ValveType::Prv),
            "PSV" => Some(ValveType::Psv),
            "PBV" => Some(ValveType::Pbv),
            "FCV" => Some(ValveType::Fcv),
            "TCV" => Some(ValveType::Tcv),
            "GPV" => Some(ValveType::Gpv),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValveStatus {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Valve {
    pub diameter: f64,
    pub valve_type: ValveType,
    pub setting: f64,
    pub minor_loss: f64,
    pub status: ValveStatus,
    pub loss_curve: String,
}

impl Default for Valve {
    fn default() -> Self {
        Self {
            diameter: 100.0,
            valve_type: ValveType::Prv,
            setting: 0.0,
            minor_loss: 0.0,
            status: ValveStatus::Open,
            loss_curve: String::new(),
        }
    }
}

/// Variant-specific node attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Junction(Junction),
    Reservoir(Reservoir),
    Tank(Tank),
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Junction(_) => NodeType::Junction,
            NodeKind::Reservoir(_) => NodeType::Reservoir,
            NodeKind::Tank(_) => NodeType::Tank,
        }
    }
}

/// Variant-specific link attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkKind {
    Pipe(Pipe),
    Pump(Pump),
    Valve(Valve),
}

impl LinkKind {
    pub fn link_type(&self) -> LinkType {
        match self {
            LinkKind::Pipe(_) => LinkType::Pipe,
            LinkKind::Pump(_) => LinkType::Pump,
            LinkKind::Valve(_) => LinkType::Valve,
        }
    }
}

/// A positioned network endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub position: Point,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(id: impl Into<String>, position: Point, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            position,
            kind,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }
}

/// A connector between two nodes, ordered `node1 -> node2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: String,
    pub node1: String,
    pub node2: String,
    pub kind: LinkKind,
}

impl Link {
    pub fn new(
        id: impl Into<String>,
        node1: impl Into<String>,
        node2: impl Into<String>,
        kind: LinkKind,
    ) -> Self {
        Self {
            id: id.into(),
            node1: node1.into(),
            node2: node2.into(),
            kind,
        }
    }

    pub fn link_type(&self) -> LinkType {
        self.kind.link_type()
    }

    /// Whether `node_id` is one of this link's endpoints.
    pub fn touches(&self, node_id: &str) -> bool {
        self.node1 == node_id || self.node2 == node_id
    }
}

/// Borrowed view of either element kind, as returned by id lookups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementRef<'a> {
    Node(&'a Node),
    Link(&'a Link),
}

impl<'a> ElementRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            ElementRef::Node(node) => &node.id,
            ElementRef::Link(link) => &link.id,
        }
    }

    pub fn as_node(&self) -> Option<&'a Node> {
        match self {
            ElementRef::Node(node) => Some(node),
            ElementRef::Link(_) => None,
        }
    }

    pub fn as_link(&self) -> Option<&'a Link> {
        match self {
            ElementRef::Link(link) => Some(link),
            ElementRef::Node(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_defaults_match_editor_palette() {
        let NodeKind::Tank(tank) = NodeType::Tank.default_kind() else {
            panic!("tank default should be a tank");
        };
        assert_eq!(tank.initial_level, 50.0);
        assert_eq!(tank.min_level, 0.0);
        assert_eq!(tank.max_level, 100.0);
        assert_eq!(tank.diameter, 20.0);
        assert_eq!(tank.mixing, MixingModel::Mix1);

        let NodeKind::Reservoir(reservoir) = NodeType::Reservoir.default_kind() else {
            panic!("reservoir default should be a reservoir");
        };
        assert_eq!(reservoir.head, 100.0);
    }

    #[test]
    fn test_link_defaults_match_editor_palette() {
        assert_eq!(
            LinkType::Pump.default_kind(),
            LinkKind::Pump(Pump {
                curve: PumpCurve::Power(1.0),
                ..Pump::default()
            })
        );
        let LinkKind::Valve(valve) = LinkType::Valve.default_kind() else {
            panic!("valve default should be a valve");
        };
        assert_eq!(valve.valve_type, ValveType::Prv);
        assert_eq!(valve.diameter, 100.0);
    }

    #[test]
    fn test_status_keywords_are_case_insensitive() {
        assert_eq!(PipeStatus::from_keyword("cv"), Some(PipeStatus::CheckValve));
        assert_eq!(ValveType::from_keyword("fcv"), Some(ValveType::Fcv));
        assert_eq!(ValveType::from_keyword("XYZ"), None);
    }

    #[test]
    fn test_link_touches_either_endpoint() {
        let link = Link::new("P-1", "J-1", "J-2", LinkType::Pipe.default_kind());
        assert!(link.touches("J-1"));
        assert!(link.touches("J-2"));
        assert!(!link.touches("J-3"));
    }
}
