/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Visible canvas region and zoom bounds enforcement.

use euclid::default::{Box2D, Rect, Size2D, Vector2D};

use crate::graph::Point;

/// Canvas region shown when a document opens.
pub const DEFAULT_VIEW_SIZE: (f64, f64) = (1000.0, 800.0);

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    view_box: Rect<f64>,
    zoom: f64,
    pub zoom_min: f64,
    pub zoom_max: f64,
}

impl Viewport {
    pub fn new(zoom_min: f64, zoom_max: f64) -> Self {
        Self {
            view_box: Rect::new(
                Point::origin(),
                Size2D::new(DEFAULT_VIEW_SIZE.0, DEFAULT_VIEW_SIZE.1),
            ),
            zoom: 1.0,
            zoom_min,
            zoom_max,
        }
    }

    pub fn view_box(&self) -> Rect<f64> {
        self.view_box
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Clamp a zoom value to the allowed range
    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.clamp(self.zoom_min, self.zoom_max)
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = self.clamp(zoom);
    }

    /// Zoom by `factor` keeping `anchor` (canvas space) fixed on screen.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        let new_zoom = self.clamp(self.zoom * factor);
        let scale = self.zoom / new_zoom;
        let origin = self.view_box.origin;
        self.view_box = Rect::new(
            anchor - (anchor - origin) * scale,
            self.view_box.size * scale,
        );
        self.zoom = new_zoom;
    }

    /// Pan by a screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.view_box.origin -= Vector2D::new(dx, dy) / self.zoom;
    }

    /// Shift the view so canvas point `grabbed` sits where `pointer` is.
    pub fn drag(&mut self, grabbed: Point, pointer: Point) {
        self.view_box.origin -= pointer - grabbed;
    }

    /// Frame all `positions` with `padding`. Returns false (and leaves the
    /// view alone) when there is nothing to frame.
    pub fn fit_to(&mut self, positions: impl IntoIterator<Item = Point>, padding: f64) -> bool {
        let mut positions = positions.into_iter().peekable();
        if positions.peek().is_none() {
            return false;
        }
        let bounds = Box2D::from_points(positions).inflate(padding, padding);
        self.view_box = bounds.to_rect();
        true
    }

    /// Map a point in a `screen`-sized surface onto the canvas.
    pub fn screen_to_canvas(&self, point: Point, screen: Size2D<f64>) -> Point {
        let scale = self.scale_for(screen);
        self.view_box.origin + point.to_vector().component_mul(scale)
    }

    pub fn canvas_to_screen(&self, point: Point, screen: Size2D<f64>) -> Point {
        let scale = self.scale_for(screen);
        let offset = point - self.view_box.origin;
        Point::new(offset.x / scale.x, offset.y / scale.y)
    }

    fn scale_for(&self, screen: Size2D<f64>) -> Vector2D<f64> {
        let width = if screen.width > 0.0 { screen.width } else { 1.0 };
        let height = if screen.height > 0.0 { screen.height } else { 1.0 };
        Vector2D::new(
            self.view_box.size.width / width,
            self.view_box.size.height / height,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.1, 5.0)
    }
}
