/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use hydranet::input::Tool;
use keyboard_types::{Key, Modifiers, NamedKey};

use crate::harness::TestHarness;

fn harness_with_two_junctions() -> TestHarness {
    let mut harness = TestHarness::new();
    harness.editor.set_tool(Tool::Junction);
    harness.click(0.0, 0.0);
    harness.click(200.0, 0.0);
    harness.editor.set_tool(Tool::Select);
    harness
}

#[test]
fn ctrl_z_and_ctrl_y_walk_history() {
    let mut harness = harness_with_two_junctions();
    harness.press_char("z", Modifiers::CONTROL);
    assert_eq!(harness.node_count(), 1);
    harness.press_char("y", Modifiers::CONTROL);
    assert_eq!(harness.node_count(), 2);
    harness.press_char("z", Modifiers::CONTROL);
    harness.press_char("Z", Modifiers::CONTROL | Modifiers::SHIFT);
    assert_eq!(harness.node_count(), 2);
}

#[test]
fn plain_z_does_not_undo() {
    let mut harness = harness_with_two_junctions();
    harness.press_char("z", Modifiers::empty());
    assert_eq!(harness.node_count(), 2);
}

#[test]
fn delete_and_backspace_remove_selection() {
    let mut harness = harness_with_two_junctions();
    harness.click(0.0, 0.0);
    harness.editor.pointer_up();
    harness.press(Key::Named(NamedKey::Delete), Modifiers::empty());
    assert_eq!(harness.node_count(), 1);

    harness.click(200.0, 0.0);
    harness.editor.pointer_up();
    harness.press(Key::Named(NamedKey::Backspace), Modifiers::empty());
    assert_eq!(harness.node_count(), 0);
}

#[test]
fn undo_shortcut_is_ignored_mid_drawing() {
    let mut harness = TestHarness::new();
    harness.editor.set_tool(Tool::Pipe);
    harness.click(0.0, 0.0);
    harness.click(100.0, 0.0);

    harness.press_char("z", Modifiers::CONTROL);
    assert_eq!(harness.link_count(), 1);
    assert!(harness.editor.drawing().is_active());

    harness.escape();
    harness.press_char("z", Modifiers::CONTROL);
    assert_eq!(harness.link_count(), 0);
}

#[test]
fn ctrl_a_then_delete_clears_network_in_one_step() {
    let mut harness = TestHarness::new();
    harness.editor.set_tool(Tool::Pipe);
    harness.click(0.0, 0.0);
    harness.click(100.0, 0.0);
    harness.click(100.0, 100.0);
    harness.escape();

    harness.press_char("a", Modifiers::CONTROL);
    harness.press(Key::Named(NamedKey::Delete), Modifiers::empty());
    assert_eq!((harness.node_count(), harness.link_count()), (0, 0));

    harness.press_char("z", Modifiers::CONTROL);
    assert_eq!((harness.node_count(), harness.link_count()), (3, 2));
}

#[test]
fn shortcuts_wait_for_text_fields() {
    let mut harness = harness_with_two_junctions();
    harness
        .editor
        .handle_key(&Key::Character("z".to_string()), Modifiers::CONTROL, true);
    assert_eq!(harness.node_count(), 2);
}
