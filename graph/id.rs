/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Element identifier generation.

use uuid::Uuid;

/// Hex digits kept from the random UUID.
const SUFFIX_LEN: usize = 8;

/// Produce `<prefix>-<hex>` that `is_taken` rejects for no live element.
///
/// Collisions are astronomically unlikely but still redrawn, so an id is
/// never handed out while another element holds it.
pub fn generate(prefix: &str, is_taken: impl Fn(&str) -> bool) -> String {
    loop {
        let candidate = candidate(prefix);
        if !is_taken(&candidate) {
            return candidate;
        }
        log::debug!("id collision on {candidate}; redrawing");
    }
}

fn candidate(prefix: &str) -> String {
    let simple = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &simple[..SUFFIX_LEN])
}
