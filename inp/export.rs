/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use super::section;
use crate::graph::{Graph, LinkKind, NodeKind, PumpCurve};

/// Default `[TITLE]` text.
pub const DEFAULT_TITLE: &str = "Pipe Network";

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub title: String,
    /// Emit a `[COORDINATES]` section before `[END]`.
    pub coordinates: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            coordinates: false,
        }
    }
}

/// Serialize `graph`. Sections without elements are omitted; the output ends
/// with `[END]` and no trailing newline.
pub fn export(graph: &Graph, options: &ExportOptions) -> String {
    let mut out = format!("[{}]\n{}\n\n", section::TITLE, title_line(&options.title));

    let mut junctions = Table::new(section::JUNCTIONS, "ID\tElevation\tDemand\tPattern");
    let mut reservoirs = Table::new(section::RESERVOIRS, "ID\tHead\tPattern");
    let mut tanks = Table::new(
        section::TANKS,
        "ID\tElevation\tInitLevel\tMinLevel\tMaxLevel\tDiameter",
    );
    for node in graph.nodes() {
        match &node.kind {
            NodeKind::Junction(junction) => junctions.row(format!(
                "{}\t{}\t{}\t{}",
                node.id, junction.elevation, junction.base_demand, junction.demand_pattern
            )),
            NodeKind::Reservoir(reservoir) => reservoirs.row(format!(
                "{}\t{}\t{}",
                node.id, reservoir.head, reservoir.head_pattern
            )),
            NodeKind::Tank(tank) => tanks.row(format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                node.id,
                tank.elevation,
                tank.initial_level,
                tank.min_level,
                tank.max_level,
                tank.diameter
            )),
        }
    }

    let mut pipes = Table::new(
        section::PIPES,
        "ID\tNode1\tNode2\tLength\tDiameter\tRoughness",
    );
    let mut pumps = Table::new(section::PUMPS, "ID\tNode1\tNode2\tParameters");
    let mut valves = Table::new(
        section::VALVES,
        "ID\tNode1\tNode2\tDiameter\tType\tSetting",
    );
    for link in graph.links() {
        match &link.kind {
            LinkKind::Pipe(pipe) => pipes.row(format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                link.id, link.node1, link.node2, pipe.length, pipe.diameter, pipe.roughness
            )),
            LinkKind::Pump(pump) => match &pump.curve {
                PumpCurve::Power(power) => pumps.row(format!(
                    "{}\t{}\t{}\tPOWER {}",
                    link.id, link.node1, link.node2, power
                )),
                PumpCurve::Head(curve) => pumps.row(format!(
                    "{}\t{}\t{}\tHEAD {}",
                    link.id, link.node1, link.node2, curve
                )),
            },
            LinkKind::Valve(valve) => valves.row(format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                link.id,
                link.node1,
                link.node2,
                valve.diameter,
                valve.valve_type.keyword(),
                valve.setting
            )),
        }
    }

    for table in [junctions, reservoirs, tanks, pipes, pumps, valves] {
        table.write_into(&mut out);
    }

    if options.coordinates {
        let mut coordinates = Table::new(section::COORDINATES, "Node\tX-Coord\tY-Coord");
        for node in graph.nodes() {
            coordinates.row(format!(
                "{}\t{}\t{}",
                node.id, node.position.x, node.position.y
            ));
        }
        coordinates.write_into(&mut out);
    }

    out.push_str(&format!("[{}]", section::END));
    out
}

/// The title on one line. Leading markers that would read back as a
/// comment or a section header are dropped.
fn title_line(title: &str) -> String {
    let flat = title.lines().map(str::trim).collect::<Vec<_>>().join(" ");
    flat.trim_start_matches([';', '[']).trim_start().to_string()
}

/// One section body, emitted only if it received rows.
struct Table {
    name: &'static str,
    header: &'static str,
    rows: String,
}

impl Table {
    fn new(name: &'static str, header: &'static str) -> Self {
        Self {
            name,
            header,
            rows: String::new(),
        }
    }

    fn row(&mut self, line: String) {
        self.rows.push_str(&line);
        self.rows.push('\n');
    }

    fn write_into(self, out: &mut String) {
        if self.rows.is_empty() {
            return;
        }
        out.push_str(&format!("[{}]\n;{}\n{}\n", self.name, self.header, self.rows));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Link, LinkType, Node, NodeType, Point, Pump};

    fn sample() -> Graph {
        let mut graph = Graph::new();
        graph
            .insert_node(Node::new("J1", Point::new(1.0, 2.0), NodeType::Junction.default_kind()))
            .unwrap();
        graph
            .insert_node(Node::new("R1", Point::new(3.5, 4.0), NodeType::Reservoir.default_kind()))
            .unwrap();
        graph
            .insert_link(Link::new("P1", "R1", "J1", LinkType::Pipe.default_kind()))
            .unwrap();
        graph
            .insert_link(Link::new(
                "PU1",
                "J1",
                "R1",
                LinkKind::Pump(Pump {
                    curve: PumpCurve::Head("C7".to_string()),
                    ..Pump::default()
                }),
            ))
            .unwrap();
        graph
    }

    #[test]
    fn test_export_empty_graph() {
        let text = export(&Graph::new(), &ExportOptions::default());
        assert_eq!(text, "[TITLE]\nPipe Network\n\n[END]");
    }

    #[test]
    fn test_export_layout() {
        let text = export(&sample(), &ExportOptions::default());
        let expected = "[TITLE]\nPipe Network\n\n\
            [JUNCTIONS]\n;ID\tElevation\tDemand\tPattern\nJ1\t0\t0\t\n\n\
            [RESERVOIRS]\n;ID\tHead\tPattern\nR1\t100\t\n\n\
            [PIPES]\n;ID\tNode1\tNode2\tLength\tDiameter\tRoughness\nP1\tR1\tJ1\t100\t100\t100\n\n\
            [PUMPS]\n;ID\tNode1\tNode2\tParameters\nPU1\tJ1\tR1\tHEAD C7\n\n\
            [END]";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_export_omits_empty_sections() {
        let text = export(&sample(), &ExportOptions::default());
        assert!(!text.contains("[TANKS]"));
        assert!(!text.contains("[VALVES]"));
        assert!(!text.contains("[COORDINATES]"));
    }

    #[test]
    fn test_export_coordinates_when_requested() {
        let options = ExportOptions {
            title: "Town".to_string(),
            coordinates: true,
        };
        let text = export(&sample(), &options);
        assert!(text.starts_with("[TITLE]\nTown\n\n"));
        assert!(text.ends_with(
            "[COORDINATES]\n;Node\tX-Coord\tY-Coord\nJ1\t1\t2\nR1\t3.5\t4\n\n[END]"
        ));
    }

    #[test]
    fn test_title_with_separators_survives_reimport() {
        let options = ExportOptions {
            title: "Zone A; phase 2\n[draft]".to_string(),
            coordinates: false,
        };
        let text = export(&sample(), &options);
        assert!(text.starts_with("[TITLE]\nZone A; phase 2 [draft]\n\n"));
        let (_, report) = crate::inp::import(&text);
        assert_eq!(report.title.as_deref(), Some("Zone A; phase 2 [draft]"));
    }

    #[test]
    fn test_title_that_looks_like_a_header_is_flattened() {
        let options = ExportOptions {
            title: "[OPTIONS]".to_string(),
            coordinates: false,
        };
        let text = export(&sample(), &options);
        let (graph, report) = crate::inp::import(&text);
        assert_eq!(report.title.as_deref(), Some("OPTIONS]"));
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_export_pump_power_keyword() {
        let mut graph = sample();
        graph.remove_link("PU1");
        graph
            .insert_link(Link::new("PU2", "J1", "R1", LinkType::Pump.default_kind()))
            .unwrap();
        let text = export(&graph, &ExportOptions::default());
        assert!(text.contains("PU2\tJ1\tR1\tPOWER 1\n"));
    }
}
