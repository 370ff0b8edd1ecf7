#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time Mandelbrot fields
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring `z` and adding `c`, starting from
//! zero, never runs off to infinity.  Points outside the set run off
//! at different speeds, and the number of iterations a point takes
//! to pass a radius of 2 (its escape time) is what gets coloured.
//!
//! This crate computes the escape time of every pixel of a grid laid
//! over a rectangle of the complex plane.  The grid is a `Field`,
//! allocated once and recomputed in place whenever the viewport or
//! the iteration budget changes.  An `Engine` does the computing: it
//! splits the field into bands of rows, one per thread, and each
//! thread runs one of several interchangeable kernels, from a plain
//! one-pixel-at-a-time loop to lane batches that advance a 2x2 block
//! of pixels in lock-step.  Every kernel produces exactly the same
//! counts.
//!
//! ```
//! let mut field = mandelfield::create_field(64, 48).unwrap();
//! mandelfield::compute(&mut field, 100, -2.5, 1.0, -1.2, 1.2);
//! assert!(field.counts().iter().all(|&count| count <= 100));
//! ```

pub mod engine;
pub mod error;
pub mod field;
pub mod kernel;
pub mod palette;
pub mod planes;
pub mod view;

pub use engine::{Engine, Kernel, Tile};
pub use error::Error;
pub use field::Field;
pub use kernel::LaneBatch;
pub use planes::{Pixel, PlaneMapper, Viewport};
pub use view::{Direction, View};

/// Allocates a field of `width` by `height` pixels.
pub fn create_field(width: usize, height: usize) -> Result<Field, Error> {
    Field::new(width, height)
}

/// Fills `field` with the escape-time values of the viewport
/// `xmin..xmax` by `ymin..ymax`, using the default `Engine`.
pub fn compute(field: &mut Field, max_iter: u32, xmin: f64, xmax: f64, ymin: f64, ymax: f64) {
    Engine::default().compute(field, max_iter, &Viewport::new(xmin, xmax, ymin, ymax));
}
