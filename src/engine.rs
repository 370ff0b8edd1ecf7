// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The field engine: chooses a kernel, splits the field into bands
//! of rows, and hands each band to its own worker thread.
//!
//! Every band is a disjoint `&mut [u32]` carved out of the field with
//! `chunks_mut`, so the workers share nothing mutable and need no
//! locks.  The workers run inside a crossbeam scope, which is also
//! the join barrier: `compute` does not return until every band is
//! written.

use std::fmt;
use std::str::FromStr;

use itertools::iproduct;
use log::{debug, trace};
use num::Complex;

use crate::error::Error;
use crate::field::Field;
use crate::kernel::{escape_time, escape_time_complex, LaneBatch};
use crate::planes::{Pixel, PlaneMapper, Viewport};

/// The shape of the group of pixels a lane batch covers, in columns
/// and rows.  Lane `k` of a batch sits at column `k % width` and row
/// `k / width` of the tile.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tile {
    /// Columns per tile.
    pub width: usize,
    /// Rows per tile.
    pub height: usize,
}

impl Tile {
    /// Number of lanes needed to cover the tile.
    pub fn lanes(&self) -> usize {
        self.width * self.height
    }
}

/// The interchangeable ways of filling a field.  They differ only in
/// speed; for the same viewport and budget they write the same counts.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Kernel {
    /// One pixel at a time using `num::Complex` arithmetic.
    Complex,
    /// One pixel at a time with the real and imaginary parts split.
    Scalar,
    /// Two lanes covering a horizontal run of two pixels.
    Linear2,
    /// Four lanes covering a horizontal run of four pixels.
    Linear4,
    /// Four lanes covering a 2x2 block of pixels.
    Tiled4,
}

/// Every kernel, in order of increasing lane width.
pub const KERNELS: [Kernel; 5] = [
    Kernel::Complex,
    Kernel::Scalar,
    Kernel::Linear2,
    Kernel::Linear4,
    Kernel::Tiled4,
];

impl Kernel {
    /// The tile each batch of this kernel covers.
    pub fn tile(self) -> Tile {
        match self {
            Kernel::Complex | Kernel::Scalar => Tile {
                width: 1,
                height: 1,
            },
            Kernel::Linear2 => Tile {
                width: 2,
                height: 1,
            },
            Kernel::Linear4 => Tile {
                width: 4,
                height: 1,
            },
            Kernel::Tiled4 => Tile {
                width: 2,
                height: 2,
            },
        }
    }

    /// Number of pixels advanced per iteration step.
    pub fn lanes(self) -> usize {
        self.tile().lanes()
    }

    fn fill(
        self,
        band: &mut [u32],
        first_row: usize,
        mapper: &PlaneMapper,
        max_iter: u32,
        early_exit: bool,
    ) {
        match self {
            Kernel::Complex => fill_points(band, first_row, mapper, |c| {
                escape_time_complex(c, max_iter)
            }),
            Kernel::Scalar => fill_points(band, first_row, mapper, |c| {
                escape_time(c.re, c.im, max_iter)
            }),
            Kernel::Linear2 => {
                fill_batches::<2>(band, first_row, mapper, self.tile(), max_iter, early_exit)
            }
            Kernel::Linear4 | Kernel::Tiled4 => {
                fill_batches::<4>(band, first_row, mapper, self.tile(), max_iter, early_exit)
            }
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Kernel::Complex => "complex",
            Kernel::Scalar => "scalar",
            Kernel::Linear2 => "linear2",
            Kernel::Linear4 => "linear4",
            Kernel::Tiled4 => "tiled4",
        };
        f.write_str(name)
    }
}

impl FromStr for Kernel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Kernel, Error> {
        KERNELS
            .iter()
            .find(|kernel| kernel.to_string() == s)
            .cloned()
            .ok_or_else(|| Error::UnknownKernel(s.to_string()))
    }
}

/// Fills a band one pixel at a time.  `band` holds whole rows of the
/// field starting at `first_row`.
fn fill_points<F>(band: &mut [u32], first_row: usize, mapper: &PlaneMapper, escape: F)
where
    F: Fn(Complex<f64>) -> u32,
{
    let width = mapper.width();
    for (row, cells) in band.chunks_mut(width).enumerate() {
        for (column, cell) in cells.iter_mut().enumerate() {
            *cell = escape(mapper.pixel_to_point(&Pixel(column, first_row + row)));
        }
    }
}

/// Fills a band tile by tile, `L` lanes per tile.  Lanes that land
/// past the right edge of the field or below the last row of the
/// band are iterated along with the others and then dropped.
fn fill_batches<const L: usize>(
    band: &mut [u32],
    first_row: usize,
    mapper: &PlaneMapper,
    tile: Tile,
    max_iter: u32,
    early_exit: bool,
) {
    debug_assert_eq!(tile.lanes(), L);
    let width = mapper.width();
    let rows = band.len() / width;

    for (top, left) in iproduct!(
        (0..rows).step_by(tile.height),
        (0..width).step_by(tile.width)
    ) {
        let mut batch = LaneBatch::<L>::new();
        for lane in 0..L {
            let pixel = Pixel(left + lane % tile.width, first_row + top + lane / tile.width);
            let point = mapper.pixel_to_point(&pixel);
            batch.x[lane] = point.re;
            batch.y[lane] = point.im;
        }

        let counts = batch.escape_times(max_iter, early_exit);
        for (lane, &count) in counts.iter().enumerate() {
            let (row, column) = (top + lane / tile.width, left + lane % tile.width);
            if row < rows && column < width {
                band[row * width + column] = count;
            }
        }
    }
}

/// Rows per worker: the rows divided as evenly as the thread count
/// allows, rounded up to whole tiles so that no tile is split
/// between two workers.
fn band_rows(height: usize, threads: usize, tile_height: usize) -> usize {
    let rows = height / threads + (height % threads != 0) as usize;
    let tiles = rows / tile_height + (rows % tile_height != 0) as usize;
    tiles.max(1) * tile_height
}

/// Computes fields.  Holds only configuration, so one engine can
/// serve any number of fields, one call at a time or from several
/// threads at once.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Engine {
    kernel: Kernel,
    threads: usize,
    early_exit: bool,
}

impl Default for Engine {
    fn default() -> Engine {
        Engine {
            kernel: Kernel::Tiled4,
            threads: num_cpus::get(),
            early_exit: true,
        }
    }
}

impl Engine {
    /// An engine using the 2x2 tiled kernel on every available CPU,
    /// with early exit on.
    pub fn new() -> Engine {
        Engine::default()
    }

    /// Selects the kernel.
    pub fn with_kernel(mut self, kernel: Kernel) -> Engine {
        self.kernel = kernel;
        self
    }

    /// Sets the number of worker threads.  Zero is taken as one.
    pub fn with_threads(mut self, threads: usize) -> Engine {
        self.threads = threads.max(1);
        self
    }

    /// Turns the early termination of fully escaped lane batches on
    /// or off.  It only affects speed.
    pub fn with_early_exit(mut self, early_exit: bool) -> Engine {
        self.early_exit = early_exit;
        self
    }

    /// The configured kernel.
    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    /// The configured number of worker threads.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Overwrites every cell of `field` with the escape-time value of
    /// the point it samples in `viewport`, and records `max_iter` on
    /// the field.  The viewport is not checked; see `Viewport`.
    pub fn compute(&self, field: &mut Field, max_iter: u32, viewport: &Viewport) {
        let (width, height) = field.dimensions();
        let mapper = PlaneMapper::new(width, height, viewport);
        let band_rows = band_rows(height, self.threads, self.kernel.tile().height);
        debug!(
            "computing {}x{} field, max_iter {}, kernel {}, {} rows per band on up to {} threads",
            width, height, max_iter, self.kernel, band_rows, self.threads
        );

        field.set_max_iter(max_iter);
        let bands: Vec<&mut [u32]> = field.counts_mut().chunks_mut(band_rows * width).collect();
        let (kernel, early_exit, mapper) = (self.kernel, self.early_exit, &mapper);
        let joined = crossbeam::scope(|spawner| {
            for (index, band) in bands.into_iter().enumerate() {
                spawner.spawn(move |_| {
                    let first_row = index * band_rows;
                    trace!(
                        "band {} covers rows {}..{}",
                        index,
                        first_row,
                        first_row + band.len() / width
                    );
                    kernel.fill(band, first_row, mapper, max_iter, early_exit);
                });
            }
        });

        // A worker only fails by panicking; carry the panic to the caller.
        if let Err(panic) = joined {
            std::panic::resume_unwind(panic);
        }
    }
}
