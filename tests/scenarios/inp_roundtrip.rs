/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use hydranet::graph::{LinkKind, NodeKind, PumpCurve, ValveType};
use hydranet::inp::ExportOptions;
use hydranet::{NetworkStore, Point};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::harness::{SAMPLE_INP, TestHarness};

fn load(text: &str) -> (NetworkStore, Option<String>) {
    let mut store = NetworkStore::new();
    let report = store.import_inp_with_rng(text, &mut StdRng::seed_from_u64(7), 500.0);
    (store, report.title)
}

fn normalize(text: &str) -> String {
    let (store, title) = load(text);
    store.export_inp(&ExportOptions {
        title: title.unwrap_or_default(),
        coordinates: true,
    })
}

#[test]
fn sample_network_imports_every_variant() {
    let mut store = NetworkStore::new();
    let report = store.import_inp_with_rng(SAMPLE_INP, &mut StdRng::seed_from_u64(1), 500.0);

    assert_eq!(report.title.as_deref(), Some("Hillside zone"));
    assert_eq!((report.nodes, report.links), (4, 5));
    assert_eq!(report.defaulted_fields, 0);
    assert_eq!(report.skipped_records, 0);
    assert_eq!(report.relocated_nodes, 4);

    let graph = store.graph();
    assert_eq!(graph.node("J2").unwrap().position, Point::new(400.0, 100.0));
    let NodeKind::Junction(j1) = &graph.node("J1").unwrap().kind else {
        panic!("J1 should be a junction");
    };
    assert_eq!(j1.base_demand, 3.5);
    assert_eq!(j1.demand_pattern, "PAT1");

    let LinkKind::Pipe(p3) = &graph.link("P3").unwrap().kind else {
        panic!("P3 should be a pipe");
    };
    assert!(p3.check_valve);

    let LinkKind::Pump(pu1) = &graph.link("PU1").unwrap().kind else {
        panic!("PU1 should be a pump");
    };
    assert_eq!(pu1.curve, PumpCurve::Head("C1".to_string()));

    let LinkKind::Valve(v1) = &graph.link("V1").unwrap().kind else {
        panic!("V1 should be a valve");
    };
    assert_eq!(v1.valve_type, ValveType::Psv);
    assert_eq!(v1.setting, 35.0);
}

#[test]
fn export_then_import_is_stable() {
    let once = normalize(SAMPLE_INP);
    let twice = normalize(&once);
    assert_eq!(once, twice);
    assert!(once.starts_with("[TITLE]\nHillside zone\n\n[JUNCTIONS]\n"));
    assert!(once.contains("V1\tJ2\tR1\t150\tPSV\t35\n"));
    assert!(once.contains("PU1\tJ1\tT1\tHEAD C1\n"));
    assert!(once.ends_with("T1\t600\t0\n\n[END]"));
}

#[test]
fn round_trip_preserves_topology_and_positions() {
    let (first, _) = load(SAMPLE_INP);
    let (reloaded, _) = load(&normalize(SAMPLE_INP));
    assert_eq!(first.graph().node_count(), reloaded.graph().node_count());
    for link in first.links() {
        let copy = reloaded.graph().link(&link.id).unwrap();
        assert_eq!((&copy.node1, &copy.node2), (&link.node1, &link.node2));
    }
    for node in first.nodes() {
        assert_eq!(reloaded.node_position(&node.id), Some(node.position));
    }
}

#[test]
fn import_through_editor_is_one_undo_step() {
    let mut harness = TestHarness::new();
    harness.editor.import_inp(SAMPLE_INP);
    assert_eq!(harness.node_count(), 4);
    assert!(harness.editor.undo());
    assert_eq!(harness.node_count(), 0);
    assert!(harness.editor.redo());
    assert_eq!(harness.link_count(), 5);
}

#[test]
fn exported_file_reads_back_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zone.inp");
    std::fs::write(&path, normalize(SAMPLE_INP)).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let (store, title) = load(&text);
    assert_eq!(title.as_deref(), Some("Hillside zone"));
    assert_eq!(store.graph().link_count(), 5);
}
