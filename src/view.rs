// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pan-and-zoom state for whoever drives the engine.  A View is a
//! centre point and a zoom factor; every operation returns a new
//! View rather than mutating one, and `viewport()` turns it into the
//! rectangle handed to `Engine::compute`.

use crate::planes::Viewport;

// Half the width and half the height of the viewport at zoom 1.
const HALF_WIDTH: f64 = 1.5;
const HALF_HEIGHT: f64 = 0.9;

/// A direction to pan in, as seen on screen.  Screen rows grow
/// downward, and so do imaginary values in the field.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Direction {
    /// Toward smaller real values.
    Left,
    /// Toward larger real values.
    Right,
    /// Toward smaller imaginary values.
    Up,
    /// Toward larger imaginary values.
    Down,
}

/// Where the camera is and how far it is zoomed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct View {
    /// Real part of the centre.
    pub center_x: f64,
    /// Imaginary part of the centre.
    pub center_y: f64,
    /// Scale of the viewport relative to the starting view; smaller
    /// is closer.
    pub zoom: f64,
}

impl Default for View {
    fn default() -> View {
        View {
            center_x: -1.0,
            center_y: 0.0,
            zoom: 1.0,
        }
    }
}

impl View {
    /// Halves the zoom factor.
    pub fn zoom_in(self) -> View {
        View {
            zoom: self.zoom * 0.5,
            ..self
        }
    }

    /// Doubles the zoom factor.
    pub fn zoom_out(self) -> View {
        View {
            zoom: self.zoom / 0.5,
            ..self
        }
    }

    /// Moves the centre one zoom unit in the given direction.
    pub fn pan(self, direction: Direction) -> View {
        let (dx, dy) = match direction {
            Direction::Left => (-self.zoom, 0.0),
            Direction::Right => (self.zoom, 0.0),
            Direction::Up => (0.0, -self.zoom),
            Direction::Down => (0.0, self.zoom),
        };
        View {
            center_x: self.center_x + dx,
            center_y: self.center_y + dy,
            ..self
        }
    }

    /// Back to the starting view.
    pub fn reset(self) -> View {
        View::default()
    }

    /// The rectangle of the complex plane this view shows.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.center_x - HALF_WIDTH * self.zoom,
            self.center_x + HALF_WIDTH * self.zoom,
            self.center_y - HALF_HEIGHT * self.zoom,
            self.center_y + HALF_HEIGHT * self.zoom,
        )
    }
}
