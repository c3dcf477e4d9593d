/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Input handling for the network editor.
//!
//! Keyboard shortcuts are mapped here. Pointer interaction is dispatched by
//! [`crate::app::NetworkEditor`] according to the active [`Tool`].

use keyboard_types::{Key, Modifiers, NamedKey};

use crate::app::EditorIntent;
use crate::graph::{LinkType, NodeType};

pub mod link_drawing;

pub use link_drawing::{
    BendGeometry, BendKind, CornerOrientation, DrawStep, DrawingPhase, DrawingSession, LinkDrawing,
};

/// Active canvas tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Junction,
    Reservoir,
    Tank,
    Pipe,
    Pump,
    Valve,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::Select,
        Tool::Junction,
        Tool::Reservoir,
        Tool::Tank,
        Tool::Pipe,
        Tool::Pump,
        Tool::Valve,
    ];

    /// Node variant placed by this tool, if it places nodes.
    pub fn node_type(self) -> Option<NodeType> {
        match self {
            Tool::Junction => Some(NodeType::Junction),
            Tool::Reservoir => Some(NodeType::Reservoir),
            Tool::Tank => Some(NodeType::Tank),
            _ => None,
        }
    }

    /// Link variant drawn by this tool, if it draws links.
    pub fn link_type(self) -> Option<LinkType> {
        match self {
            Tool::Pipe => Some(LinkType::Pipe),
            Tool::Pump => Some(LinkType::Pump),
            Tool::Valve => Some(LinkType::Valve),
            _ => None,
        }
    }
}

impl From<NodeType> for Tool {
    fn from(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Junction => Tool::Junction,
            NodeType::Reservoir => Tool::Reservoir,
            NodeType::Tank => Tool::Tank,
        }
    }
}

impl From<LinkType> for Tool {
    fn from(link_type: LinkType) -> Self {
        match link_type {
            LinkType::Pipe => Tool::Pipe,
            LinkType::Pump => Tool::Pump,
            LinkType::Valve => Tool::Valve,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Keyboard actions detected from one key press.
///
/// Detection is kept apart from application (pure state mutation) so both
/// halves can be tested without a windowing layer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeyboardActions {
    pub cancel: bool,
    pub delete_selected: bool,
    pub undo: bool,
    pub redo: bool,
    pub select_all: bool,
    pub fit_to_screen: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
    pub zoom_reset: bool,
}

/// Ctrl on most platforms, Cmd on macOS.
fn command_held(modifiers: Modifiers) -> bool {
    modifiers.contains(Modifiers::CONTROL) || modifiers.contains(Modifiers::META)
}

/// Map one key press to actions. Nothing fires while a text field owns the
/// keyboard; the field handles Escape itself.
pub fn collect_actions(key: &Key, modifiers: Modifiers, text_input_focused: bool) -> KeyboardActions {
    let mut actions = KeyboardActions::default();
    if text_input_focused {
        return actions;
    }
    let command = command_held(modifiers);

    match key {
        Key::Named(NamedKey::Escape) => actions.cancel = true,
        Key::Named(NamedKey::Delete) | Key::Named(NamedKey::Backspace) => {
            actions.delete_selected = true
        },
        Key::Character(text) => match text.to_lowercase().as_str() {
            "z" if command => {
                if modifiers.contains(Modifiers::SHIFT) {
                    actions.redo = true;
                } else {
                    actions.undo = true;
                }
            },
            "y" if command => actions.redo = true,
            "a" if command => actions.select_all = true,
            "f" if !command => actions.fit_to_screen = true,
            "+" | "=" if !command => actions.zoom_in = true,
            "-" if !command => actions.zoom_out = true,
            "0" if !command => actions.zoom_reset = true,
            _ => {},
        },
        _ => {},
    }

    actions
}

/// Convert keyboard actions to editor intents without applying them.
pub fn intents_from_actions(actions: &KeyboardActions) -> Vec<EditorIntent> {
    let mut intents = Vec::new();
    if actions.cancel {
        intents.push(EditorIntent::Cancel);
    }
    if actions.delete_selected {
        intents.push(EditorIntent::DeleteSelected);
    }
    if actions.undo {
        intents.push(EditorIntent::Undo);
    }
    if actions.redo {
        intents.push(EditorIntent::Redo);
    }
    if actions.select_all {
        intents.push(EditorIntent::SelectAll);
    }
    if actions.fit_to_screen {
        intents.push(EditorIntent::FitToScreen);
    }
    if actions.zoom_in {
        intents.push(EditorIntent::ZoomIn);
    }
    if actions.zoom_out {
        intents.push(EditorIntent::ZoomOut);
    }
    if actions.zoom_reset {
        intents.push(EditorIntent::ZoomReset);
    }
    intents
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn character(text: &str) -> Key {
        Key::Character(text.to_string())
    }

    #[test]
    fn test_escape_cancels() {
        let actions = collect_actions(&Key::Named(NamedKey::Escape), Modifiers::empty(), false);
        assert_eq!(
            actions,
            KeyboardActions {
                cancel: true,
                ..Default::default()
            }
        );
    }

    #[rstest]
    #[case(NamedKey::Delete)]
    #[case(NamedKey::Backspace)]
    fn test_delete_keys(#[case] named: NamedKey) {
        let actions = collect_actions(&Key::Named(named), Modifiers::empty(), false);
        assert!(actions.delete_selected);
    }

    #[rstest]
    #[case("z", Modifiers::CONTROL, true, false)]
    #[case("Z", Modifiers::CONTROL | Modifiers::SHIFT, false, true)]
    #[case("y", Modifiers::CONTROL, false, true)]
    #[case("z", Modifiers::META, true, false)]
    #[case("z", Modifiers::empty(), false, false)]
    #[case("y", Modifiers::empty(), false, false)]
    fn test_history_shortcuts(
        #[case] text: &str,
        #[case] modifiers: Modifiers,
        #[case] undo: bool,
        #[case] redo: bool,
    ) {
        let actions = collect_actions(&character(text), modifiers, false);
        assert_eq!(actions.undo, undo);
        assert_eq!(actions.redo, redo);
    }

    #[test]
    fn test_text_focus_suppresses_shortcuts() {
        let actions = collect_actions(&Key::Named(NamedKey::Delete), Modifiers::empty(), true);
        assert_eq!(actions, KeyboardActions::default());
        let actions = collect_actions(&Key::Named(NamedKey::Escape), Modifiers::empty(), true);
        assert!(!actions.cancel);
    }

    #[test]
    fn test_ctrl_a_selects_all() {
        let actions = collect_actions(&character("a"), Modifiers::CONTROL, false);
        assert!(actions.select_all);
        let actions = collect_actions(&character("a"), Modifiers::empty(), false);
        assert!(!actions.select_all);
    }

    #[test]
    fn test_no_actions_no_intents() {
        assert!(intents_from_actions(&KeyboardActions::default()).is_empty());
    }

    #[test]
    fn test_undo_action_maps_to_intent() {
        let intents = intents_from_actions(&KeyboardActions {
            undo: true,
            ..Default::default()
        });
        assert_eq!(intents, vec![EditorIntent::Undo]);
    }

    #[test]
    fn test_tool_variants() {
        assert_eq!(Tool::Tank.node_type(), Some(NodeType::Tank));
        assert_eq!(Tool::Tank.link_type(), None);
        assert_eq!(Tool::Valve.link_type(), Some(LinkType::Valve));
        assert_eq!(Tool::Select.node_type(), None);
        assert_eq!(Tool::from(LinkType::Pump), Tool::Pump);
        assert_eq!(Tool::from(NodeType::Reservoir), Tool::Reservoir);
    }
}
