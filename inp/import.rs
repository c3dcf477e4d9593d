/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Tolerant single-pass reader.
//!
//! Malformed records never abort the import: unparsable or missing numbers
//! fall back to per-field defaults, and records that cannot be placed at all
//! (too few tokens, links to unknown nodes) are skipped and counted.

use std::collections::HashMap;

use rand::Rng;

use super::section;
use crate::graph::{
    Graph, Junction, Link, LinkKind, Node, NodeKind, Pipe, PipeStatus, Point, Pump, PumpCurve,
    Reservoir, Tank, Valve, ValveType,
};

/// Placeholder positions are drawn from `[0, extent)` on both axes.
pub const DEFAULT_PLACEHOLDER_EXTENT: f64 = 500.0;

/// What an import did with the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub title: Option<String>,
    pub nodes: usize,
    pub links: usize,
    /// Fields present but unparsable that took their fallback.
    pub defaulted_fields: usize,
    /// Records dropped entirely.
    pub skipped_records: usize,
    /// Nodes whose placeholder position was replaced from `[COORDINATES]`.
    pub relocated_nodes: usize,
    /// Records read in sections this reader does not interpret.
    pub ignored_records: usize,
}

/// Parse `text` into a fresh graph using thread-local randomness for
/// placeholder coordinates.
pub fn import(text: &str) -> (Graph, ImportReport) {
    import_with_rng(text, &mut rand::thread_rng(), DEFAULT_PLACEHOLDER_EXTENT)
}

pub fn import_with_rng(text: &str, rng: &mut impl Rng, extent: f64) -> (Graph, ImportReport) {
    let mut reader = Reader {
        rng,
        extent,
        nodes: Staged::default(),
        links: Staged::default(),
        report: ImportReport::default(),
    };
    let mut current = String::new();
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    for raw in text.lines() {
        let line = raw.trim();
        if let Some(name) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            current = name.trim().to_ascii_uppercase();
            continue;
        }
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        // The title is free text and keeps its semicolons.
        let content = if current == section::TITLE {
            line
        } else {
            line.split(';').next().unwrap_or_default()
        };
        reader.record(&current, content);
    }

    reader.finish()
}

/// Insertion-ordered records with last-wins replacement by id.
struct Staged<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Staged<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Staged<T> {
    fn put(&mut self, id: String, item: T) -> bool {
        match self.index.get(&id) {
            Some(&slot) => {
                self.items[slot] = item;
                true
            },
            None => {
                self.index.insert(id, self.items.len());
                self.items.push(item);
                false
            },
        }
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        let slot = *self.index.get(id)?;
        self.items.get_mut(slot)
    }
}

/// Whitespace tokens of one record plus fallback bookkeeping.
struct Fields<'a> {
    tokens: Vec<&'a str>,
    defaulted: usize,
}

impl<'a> Fields<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            tokens: content.split_whitespace().collect(),
            defaulted: 0,
        }
    }

    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn text(&self, index: usize) -> String {
        self.tokens.get(index).map_or_else(String::new, |token| token.to_string())
    }

    /// Parse column `index`. An absent column takes `fallback` silently; a
    /// present but unparsable one takes it and is counted.
    fn number(&mut self, index: usize, fallback: f64) -> f64 {
        match self.tokens.get(index).map(|token| token.parse::<f64>()) {
            None => fallback,
            Some(Ok(value)) if value.is_finite() => value,
            Some(_) => {
                self.defaulted += 1;
                fallback
            },
        }
    }
}

struct Reader<'r, R: Rng> {
    rng: &'r mut R,
    extent: f64,
    nodes: Staged<Node>,
    links: Staged<Link>,
    report: ImportReport,
}

impl<R: Rng> Reader<'_, R> {
    fn record(&mut self, section_name: &str, content: &str) {
        if section_name == section::TITLE {
            if self.report.title.is_none() {
                self.report.title = Some(content.trim().to_string());
            }
            return;
        }

        let mut fields = Fields::new(content);
        if fields.len() < 2 {
            log::debug!("skipping short record in [{section_name}]: {content:?}");
            self.report.skipped_records += 1;
            return;
        }

        match section_name {
            section::JUNCTIONS => {
                let kind = NodeKind::Junction(Junction {
                    elevation: fields.number(1, 0.0),
                    base_demand: fields.number(2, 0.0),
                    demand_pattern: fields.text(3),
                    ..Junction::default()
                });
                self.stage_node(&fields, kind);
            },
            section::RESERVOIRS => {
                let kind = NodeKind::Reservoir(Reservoir {
                    head: fields.number(1, 0.0),
                    head_pattern: fields.text(2),
                    ..Reservoir::default()
                });
                self.stage_node(&fields, kind);
            },
            section::TANKS => {
                let kind = NodeKind::Tank(Tank {
                    elevation: fields.number(1, 0.0),
                    initial_level: fields.number(2, 50.0),
                    min_level: fields.number(3, 0.0),
                    max_level: fields.number(4, 100.0),
                    diameter: fields.number(5, 20.0),
                    min_volume: fields.number(6, 0.0),
                    volume_curve: fields.text(7),
                    ..Tank::default()
                });
                self.stage_node(&fields, kind);
            },
            section::PIPES => {
                let status = fields.tokens.get(7).and_then(|word| PipeStatus::from_keyword(word));
                if fields.len() > 7 && status.is_none() {
                    fields.defaulted += 1;
                }
                let status = status.unwrap_or_default();
                let kind = LinkKind::Pipe(Pipe {
                    length: fields.number(3, 100.0),
                    diameter: fields.number(4, 100.0),
                    roughness: fields.number(5, 100.0),
                    minor_loss: fields.number(6, 0.0),
                    status,
                    check_valve: status == PipeStatus::CheckValve,
                    ..Pipe::default()
                });
                self.stage_link(&fields, kind);
            },
            section::PUMPS => {
                let kind = LinkKind::Pump(parse_pump(&mut fields));
                self.stage_link(&fields, kind);
            },
            section::VALVES => {
                let valve_type = fields.tokens.get(4).and_then(|word| ValveType::from_keyword(word));
                if fields.len() > 4 && valve_type.is_none() {
                    fields.defaulted += 1;
                }
                let kind = LinkKind::Valve(Valve {
                    diameter: fields.number(3, 100.0),
                    valve_type: valve_type.unwrap_or_default(),
                    setting: fields.number(5, 0.0),
                    minor_loss: fields.number(6, 0.0),
                    ..Valve::default()
                });
                self.stage_link(&fields, kind);
            },
            section::COORDINATES => {
                let id = fields.text(0);
                let position = Point::new(fields.number(1, 0.0), fields.number(2, 0.0));
                self.report.defaulted_fields += fields.defaulted;
                match self.nodes.get_mut(&id) {
                    Some(node) => {
                        node.position = position;
                        self.report.relocated_nodes += 1;
                    },
                    None => log::debug!("dropping coordinates for unknown node {id}"),
                }
            },
            _ => {
                self.report.ignored_records += 1;
            },
        }
    }

    fn stage_node(&mut self, fields: &Fields<'_>, kind: NodeKind) {
        let id = fields.text(0);
        let position = Point::new(self.placeholder(), self.placeholder());
        self.report.defaulted_fields += fields.defaulted;
        if self.nodes.put(id.clone(), Node::new(id.clone(), position, kind)) {
            log::warn!("node {id} defined more than once; keeping the last definition");
        }
    }

    fn placeholder(&mut self) -> f64 {
        if self.extent > 0.0 {
            self.rng.gen_range(0.0..self.extent)
        } else {
            0.0
        }
    }

    fn stage_link(&mut self, fields: &Fields<'_>, kind: LinkKind) {
        if fields.len() < 3 {
            log::warn!("skipping link {} without a second endpoint", fields.text(0));
            self.report.skipped_records += 1;
            return;
        }
        let id = fields.text(0);
        self.report.defaulted_fields += fields.defaulted;
        let link = Link::new(id.clone(), fields.text(1), fields.text(2), kind);
        if self.links.put(id.clone(), link) {
            log::warn!("link {id} defined more than once; keeping the last definition");
        }
    }

    fn finish(self) -> (Graph, ImportReport) {
        let mut graph = Graph::new();
        let mut report = self.report;

        for node in self.nodes.items {
            if graph.insert_node(node).is_ok() {
                report.nodes += 1;
            }
        }
        // Links go in last so they may precede their nodes in the file.
        for link in self.links.items {
            let id = link.id.clone();
            match graph.insert_link(link) {
                Ok(_) => report.links += 1,
                Err(err) => {
                    log::warn!("skipping link {id}: {err}");
                    report.skipped_records += 1;
                },
            }
        }
        (graph, report)
    }
}

/// `ID Node1 Node2 [POWER kw | HEAD curve | SPEED s | PATTERN p]...`
fn parse_pump(fields: &mut Fields<'_>) -> Pump {
    let mut pump = Pump::default();
    let mut index = 3;
    while index < fields.len() {
        let keyword = fields.tokens[index].to_ascii_uppercase();
        match keyword.as_str() {
            "POWER" => {
                pump.curve = PumpCurve::Power(fields.number(index + 1, 1.0));
            },
            "HEAD" => {
                let curve = fields.text(index + 1);
                if curve.is_empty() {
                    fields.defaulted += 1;
                } else {
                    pump.curve = PumpCurve::Head(curve);
                }
            },
            "SPEED" => pump.speed = fields.number(index + 1, 1.0),
            "PATTERN" => pump.pattern = fields.text(index + 1),
            _ => {
                log::debug!("ignoring pump parameter {keyword}");
            },
        }
        index += 2;
    }
    pump
}
