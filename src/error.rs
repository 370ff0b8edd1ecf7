// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The few things that can go wrong.  Iteration itself cannot fail;
//! only building a field and naming a kernel can.

use failure::Fail;

/// Errors surfaced by the field engine.
#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    /// A field needs at least one row and one column.
    #[fail(display = "bad dimensions, width: {}, height: {}", width, height)]
    InvalidDimensions {
        /// Requested number of columns.
        width: usize,
        /// Requested number of rows.
        height: usize,
    },

    /// The count buffer could not be obtained.
    #[fail(display = "could not allocate a field of {} cells", cells)]
    AllocationFailure {
        /// Number of cells requested, saturated on overflow.
        cells: usize,
    },

    /// A kernel name that is not one of complex, scalar, linear2,
    /// linear4 or tiled4.
    #[fail(display = "unknown kernel: {}", _0)]
    UnknownKernel(String),
}
