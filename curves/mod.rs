/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Named x/y curves referenced by pumps, tanks and valves.
//!
//! Points are kept sorted by `x`. Lookups interpolate linearly between
//! neighbouring points and clamp to the end values outside the curve.

use crate::graph::id;

/// Prefix of generated curve ids.
pub const CURVE_ID_PREFIX: &str = "curve";

pub const DEFAULT_HEAD_CURVE_NAME: &str = "Default head curve";
pub const DEFAULT_EFFICIENCY_CURVE_NAME: &str = "Default efficiency curve";

/// Flow against head, falling from shutoff.
const DEFAULT_HEAD_POINTS: [(f64, f64); 7] = [
    (0.0, 120.0),
    (20.0, 115.0),
    (40.0, 105.0),
    (60.0, 90.0),
    (80.0, 70.0),
    (100.0, 45.0),
    (120.0, 15.0),
];

/// Flow against efficiency in percent, peaking mid-range.
const DEFAULT_EFFICIENCY_POINTS: [(f64, f64); 7] = [
    (0.0, 0.0),
    (20.0, 65.0),
    (40.0, 78.0),
    (60.0, 82.0),
    (80.0, 79.0),
    (100.0, 72.0),
    (120.0, 60.0),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

impl CurvePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for CurvePoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub id: String,
    pub name: String,
    points: Vec<CurvePoint>,
}

impl Curve {
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// `y` at `x`, clamped to the first and last points. `None` for an empty
    /// curve.
    pub fn value_at(&self, x: f64) -> Option<f64> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if x.is_nan() || x <= first.x {
            return Some(first.y);
        }
        if x >= last.x {
            return Some(last.y);
        }
        // Every point left of `upper` lies strictly below `x`, so the segment
        // has positive width even when x values repeat.
        let upper = self.points.partition_point(|point| point.x < x);
        let (p1, p2) = (self.points[upper - 1], self.points[upper]);
        let width = p2.x - p1.x;
        if width <= 0.0 {
            return Some(p2.y);
        }
        let t = (x - p1.x) / width;
        Some(p1.y + t * (p2.y - p1.y))
    }
}

/// Partial update for [`CurveLibrary::update`]; `None` keeps the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveUpdate {
    pub name: Option<String>,
    pub points: Option<Vec<CurvePoint>>,
}

/// Insertion-ordered curve collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveLibrary {
    curves: Vec<Curve>,
}

impl CurveLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Store a new curve and return its generated id.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        points: impl IntoIterator<Item = CurvePoint>,
    ) -> String {
        let id = id::generate(CURVE_ID_PREFIX, |candidate| self.get(candidate).is_some());
        let name = name.into();
        log::debug!("added curve {id} ({name})");
        self.curves.push(Curve {
            id: id.clone(),
            name,
            points: sorted_points(points),
        });
        id
    }

    /// Returns false when `id` is unknown.
    pub fn update(&mut self, id: &str, update: CurveUpdate) -> bool {
        let Some(curve) = self.curves.iter_mut().find(|curve| curve.id == id) else {
            return false;
        };
        if let Some(name) = update.name {
            curve.name = name;
        }
        if let Some(points) = update.points {
            curve.points = sorted_points(points);
        }
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<Curve> {
        let slot = self.curves.iter().position(|curve| curve.id == id)?;
        Some(self.curves.remove(slot))
    }

    pub fn get(&self, id: &str) -> Option<&Curve> {
        self.curves.iter().find(|curve| curve.id == id)
    }

    /// Look a curve up by id, then by name. Pump records name their curve
    /// either way.
    pub fn resolve(&self, reference: &str) -> Option<&Curve> {
        self.get(reference)
            .or_else(|| self.curves.iter().find(|curve| curve.name == reference))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Curve> {
        self.curves.iter()
    }

    /// Interpolated `y` of curve `id` at `x`.
    pub fn value_at(&self, id: &str, x: f64) -> Option<f64> {
        self.get(id)?.value_at(x)
    }

    pub fn add_default_head_curve(&mut self) -> String {
        self.add(
            DEFAULT_HEAD_CURVE_NAME,
            DEFAULT_HEAD_POINTS.into_iter().map(CurvePoint::from),
        )
    }

    pub fn add_default_efficiency_curve(&mut self) -> String {
        self.add(
            DEFAULT_EFFICIENCY_CURVE_NAME,
            DEFAULT_EFFICIENCY_POINTS.into_iter().map(CurvePoint::from),
        )
    }

    pub fn clear(&mut self) {
        self.curves.clear();
    }
}

/// Sort by `x`, dropping points with non-finite coordinates.
fn sorted_points(points: impl IntoIterator<Item = CurvePoint>) -> Vec<CurvePoint> {
    let mut points: Vec<CurvePoint> = points
        .into_iter()
        .filter(|point| {
            let finite = point.x.is_finite() && point.y.is_finite();
            if !finite {
                log::warn!("dropping non-finite curve point {point:?}");
            }
            finite
        })
        .collect();
    points.sort_by(|a, b| a.x.total_cmp(&b.x));
    points
}
