/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use hydranet::app::PointerOutcome;
use hydranet::graph::{LinkType, NodeType};
use hydranet::input::{BendKind, DrawStep, DrawingPhase, Tool};
use hydranet::Point;

use crate::harness::TestHarness;

#[test]
fn three_clicks_draw_a_two_segment_pipe_run() {
    let mut harness = TestHarness::new();
    harness.editor.set_tool(Tool::Pipe);

    assert!(matches!(harness.click(0.0, 0.0), PointerOutcome::Draw(DrawStep::Started(_))));
    assert!(matches!(harness.click(200.0, 0.0), PointerOutcome::Draw(DrawStep::Extended(_))));
    assert!(matches!(harness.click(200.0, 200.0), PointerOutcome::Draw(DrawStep::Extended(_))));
    harness.escape();

    assert_eq!(harness.node_count(), 3);
    assert_eq!(harness.link_count(), 2);
    assert!(
        harness
            .editor
            .store()
            .links()
            .all(|link| link.link_type() == LinkType::Pipe)
    );
    assert_eq!(harness.editor.drawing().phase(), DrawingPhase::Idle);
}

#[test]
fn drawing_snaps_to_existing_nodes() {
    let mut harness = TestHarness::new();
    harness.editor.set_tool(Tool::Reservoir);
    let PointerOutcome::NodePlaced(reservoir) = harness.click(300.0, 0.0) else {
        panic!("expected a reservoir");
    };

    harness.editor.set_tool(Tool::Pump);
    harness.click(0.0, 0.0);
    let PointerOutcome::Draw(DrawStep::Extended(commit)) = harness.click(310.0, 10.0) else {
        panic!("expected a committed segment");
    };
    assert_eq!(commit.nodes, vec![reservoir.clone()]);
    assert!(commit.created_nodes.is_empty());

    let link = harness.editor.store().graph().link(&commit.links[0]).unwrap();
    assert_eq!(link.node2, reservoir);
    assert_eq!(link.link_type(), LinkType::Pump);
}

#[test]
fn clicking_the_anchor_again_is_rejected() {
    let mut harness = TestHarness::new();
    harness.editor.set_tool(Tool::Valve);
    harness.click(0.0, 0.0);
    assert_eq!(
        harness.click(5.0, 5.0),
        PointerOutcome::Draw(DrawStep::Rejected)
    );
    assert_eq!(harness.link_count(), 0);
}

#[test]
fn angle_bend_adds_a_corner_junction() {
    let mut harness = TestHarness::new();
    harness.editor.set_tool(Tool::Pipe);
    harness.click(0.0, 0.0);

    assert_eq!(harness.right_click(300.0, 100.0), PointerOutcome::BendMenuOpened);
    harness.editor.pointer_move(Point::new(300.0, 100.0));
    assert!(harness.editor.choose_bend(BendKind::Angle));
    assert_eq!(
        harness.editor.drawing().phase(),
        DrawingPhase::BendPending(BendKind::Angle)
    );

    let PointerOutcome::Draw(DrawStep::Extended(commit)) = harness.click(300.0, 100.0) else {
        panic!("expected a committed bend");
    };
    assert_eq!(commit.created_nodes.len(), 2);
    assert_eq!(commit.links.len(), 2);
    let corner = harness
        .editor
        .store()
        .node_position(&commit.created_nodes[0])
        .unwrap();
    assert_eq!(corner, Point::new(300.0, 0.0));
    assert_eq!(harness.editor.drawing().phase(), DrawingPhase::Drawing);
}

#[test]
fn each_segment_undoes_separately_after_the_session() {
    let mut harness = TestHarness::new();
    harness.editor.set_tool(Tool::Pipe);
    harness.click(0.0, 0.0);
    harness.click(100.0, 0.0);
    harness.click(200.0, 0.0);
    assert!(!harness.editor.can_undo());
    harness.escape();

    assert!(harness.editor.undo());
    assert_eq!((harness.node_count(), harness.link_count()), (2, 1));
    assert!(harness.editor.undo());
    assert_eq!((harness.node_count(), harness.link_count()), (1, 0));
    assert!(harness.editor.undo());
    assert_eq!(harness.node_count(), 0);
}

#[test]
fn starting_point_is_a_junction() {
    let mut harness = TestHarness::new();
    harness.editor.set_tool(Tool::Pipe);
    let PointerOutcome::Draw(DrawStep::Started(start)) = harness.click(47.0, 52.0) else {
        panic!("expected a started session");
    };
    let node = harness.editor.store().graph().node(&start).unwrap();
    assert_eq!(node.node_type(), NodeType::Junction);
    assert_eq!(node.position, Point::new(50.0, 50.0));
}
