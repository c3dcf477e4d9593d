/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Editing engine for water distribution networks: a typed node/link graph
//! with undo history, snapping, multi-segment link drawing and a sectioned
//! text codec.

pub mod app;
pub mod curves;
pub mod graph;
pub mod inp;
pub mod input;
pub mod prefs;
pub mod simulation;
pub mod spatial;
pub mod store;
pub mod viewport;

pub use app::NetworkEditor;
pub use graph::{Graph, GraphError, Point};
pub use prefs::EditorPreferences;
pub use store::NetworkStore;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
