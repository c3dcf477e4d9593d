/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Sectioned, line-oriented network text format.
//!
//! Files are UTF-8, one record per line, `[SECTION]` headers, `;` comments and
//! tab-separated columns on export (any whitespace on import), terminated by
//! `[END]`.

pub mod export;
pub mod import;

pub use export::{ExportOptions, export};
pub use import::{DEFAULT_PLACEHOLDER_EXTENT, ImportReport, import, import_with_rng};

/// Section names in export order.
pub(crate) mod section {
    pub const TITLE: &str = "TITLE";
    pub const JUNCTIONS: &str = "JUNCTIONS";
    pub const RESERVOIRS: &str = "RESERVOIRS";
    pub const TANKS: &str = "TANKS";
    pub const PIPES: &str = "PIPES";
    pub const PUMPS: &str = "PUMPS";
    pub const VALVES: &str = "VALVES";
    pub const COORDINATES: &str = "COORDINATES";
    pub const END: &str = "END";
}
