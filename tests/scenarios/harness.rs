/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use hydranet::app::PointerOutcome;
use hydranet::input::PointerButton;
use hydranet::{EditorPreferences, NetworkEditor, Point};
use keyboard_types::{Key, Modifiers, NamedKey};

/// Small network with every element variant and explicit coordinates.
pub const SAMPLE_INP: &str = "\
[TITLE]
Hillside zone

[JUNCTIONS]
;ID Elev Demand Pattern
J1  12  3.5  PAT1
J2  8   0

[RESERVOIRS]
R1  120

[TANKS]
T1  40  10  2  25  18

[PIPES]
P1  R1  J1  850  300  130
P2  J1  J2  400  200  110  0.2  Open
P3  J2  T1  600  150  100  0    CV

[PUMPS]
PU1 J1  T1  HEAD C1

[VALVES]
V1  J2  R1  150  PSV  35

[COORDINATES]
R1  0    0
J1  200  0
J2  400  100
T1  600  0

[END]
";

pub struct TestHarness {
    pub editor: NetworkEditor,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            editor: NetworkEditor::new(EditorPreferences::default()),
        }
    }

    pub fn with_prefs(prefs: EditorPreferences) -> Self {
        Self {
            editor: NetworkEditor::new(prefs),
        }
    }

    pub fn click(&mut self, x: f64, y: f64) -> PointerOutcome {
        self.editor
            .pointer_down(Point::new(x, y), PointerButton::Primary, Modifiers::empty())
    }

    pub fn right_click(&mut self, x: f64, y: f64) -> PointerOutcome {
        self.editor
            .pointer_down(Point::new(x, y), PointerButton::Secondary, Modifiers::empty())
    }

    pub fn drag(&mut self, from: (f64, f64), to: (f64, f64)) -> bool {
        self.click(from.0, from.1);
        self.editor.pointer_move(Point::new(to.0, to.1));
        self.editor.pointer_up()
    }

    pub fn press(&mut self, key: Key, modifiers: Modifiers) {
        self.editor.handle_key(&key, modifiers, false);
    }

    pub fn press_char(&mut self, text: &str, modifiers: Modifiers) {
        self.press(Key::Character(text.to_string()), modifiers);
    }

    pub fn escape(&mut self) {
        self.press(Key::Named(NamedKey::Escape), Modifiers::empty());
    }

    pub fn node_count(&self) -> usize {
        self.editor.store().graph().node_count()
    }

    pub fn link_count(&self) -> usize {
        self.editor.store().graph().link_count()
    }
}
