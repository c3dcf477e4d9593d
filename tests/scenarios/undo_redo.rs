/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use hydranet::graph::{JunctionPatch, NodeKind, NodeType, PipePatch};
use hydranet::input::Tool;
use hydranet::{EditorPreferences, NetworkStore, Point};

use crate::harness::TestHarness;

#[test]
fn place_edit_delete_then_unwind_everything() {
    let mut store = NetworkStore::new();
    let a = store.add_node(NodeType::Junction, Point::new(0.0, 0.0));
    let b = store.add_node(NodeType::Reservoir, Point::new(100.0, 0.0));
    let pipe = store
        .add_link(
            PipePatch {
                diameter: Some(250.0),
                ..PipePatch::default()
            },
            &a,
            &b,
        )
        .unwrap();
    assert!(
        store
            .update_element(
                &a,
                JunctionPatch {
                    elevation: Some(42.0),
                    ..JunctionPatch::default()
                },
            )
            .unwrap()
    );
    assert_eq!(store.delete_element(&a), vec![pipe.clone(), a.clone()]);
    assert_eq!(store.graph().node_count(), 1);

    assert!(store.undo());
    let NodeKind::Junction(junction) = &store.graph().node(&a).unwrap().kind else {
        panic!("expected a junction");
    };
    assert_eq!(junction.elevation, 42.0);
    assert!(store.graph().contains_link(&pipe));

    while store.undo() {}
    assert!(store.graph().is_empty());

    while store.redo() {}
    assert_eq!(store.graph().node_count(), 1);
    assert!(!store.graph().contains_node(&a));
    assert!(!store.can_redo());
}

#[test]
fn new_edit_discards_redo_branch() {
    let mut harness = TestHarness::new();
    harness.editor.set_tool(Tool::Junction);
    harness.click(0.0, 0.0);
    harness.click(100.0, 0.0);
    assert!(harness.editor.undo());
    assert!(harness.editor.can_redo());

    harness.click(300.0, 300.0);
    assert!(!harness.editor.can_redo());
    assert_eq!(harness.node_count(), 2);
}

#[test]
fn history_depth_from_preferences_bounds_undo() {
    let prefs = EditorPreferences {
        history_depth: 3,
        ..EditorPreferences::default()
    };
    let mut harness = TestHarness::with_prefs(prefs);
    harness.editor.set_tool(Tool::Tank);
    for i in 0..6 {
        harness.click(f64::from(i) * 100.0, 0.0);
    }

    let mut undone = 0;
    while harness.editor.undo() {
        undone += 1;
    }
    assert_eq!(undone, 3);
    assert_eq!(harness.node_count(), 3);
}

#[test]
fn undo_clears_selection() {
    let mut harness = TestHarness::new();
    harness.editor.set_tool(Tool::Junction);
    harness.click(0.0, 0.0);
    harness.editor.set_tool(Tool::Select);
    harness.click(0.0, 0.0);
    harness.editor.pointer_up();
    assert_eq!(harness.editor.store().selection().len(), 1);

    assert!(harness.editor.undo());
    assert!(harness.editor.store().selection().is_empty());
}

#[test]
fn drag_is_one_undo_step() {
    let mut harness = TestHarness::new();
    harness.editor.set_tool(Tool::Junction);
    harness.click(100.0, 100.0);
    harness.editor.set_tool(Tool::Select);

    assert!(harness.drag((100.0, 100.0), (300.0, 200.0)));
    let id = harness.editor.store().nodes().next().unwrap().id.clone();
    assert_eq!(
        harness.editor.store().node_position(&id),
        Some(Point::new(300.0, 200.0))
    );

    assert!(harness.editor.undo());
    assert_eq!(
        harness.editor.store().node_position(&id),
        Some(Point::new(100.0, 100.0))
    );
}
