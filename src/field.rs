// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The Field is the owned buffer of escape-time counts: one `u32`
//! per pixel, stored row-major with a stride of `width`.  It is
//! allocated once and then overwritten by every computation.

use crate::error::Error;

/// A `width` by `height` grid of escape-time counts, together with
/// the iteration budget that produced them.  Every count lies in
/// `0..=max_iter`; a count equal to `max_iter` means the point did
/// not escape.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    max_iter: u32,
    counts: Vec<u32>,
}

impl Field {
    /// Allocates a zeroed field.  Fails with `InvalidDimensions` if
    /// either dimension is zero, and with `AllocationFailure` if the
    /// buffer cannot be had.  No partial field is ever returned.
    pub fn new(width: usize, height: usize) -> Result<Field, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let cells = width
            .checked_mul(height)
            .ok_or(Error::AllocationFailure { cells: usize::MAX })?;
        let mut counts: Vec<u32> = Vec::new();
        counts
            .try_reserve_exact(cells)
            .map_err(|_| Error::AllocationFailure { cells })?;
        counts.resize(cells, 0);

        Ok(Field {
            width,
            height,
            max_iter: 0,
            counts,
        })
    }

    /// The count at a given row and column.
    ///
    /// # Panics
    ///
    /// Panics if `row >= height` or `col >= width`.
    pub fn get(&self, row: usize, col: usize) -> u32 {
        assert!(
            row < self.height && col < self.width,
            "cell ({}, {}) outside a {}x{} field",
            row,
            col,
            self.width,
            self.height
        );
        self.counts[row * self.width + col]
    }

    /// The iteration budget used by the last computation, or 0 for
    /// a field that has never been computed.
    pub fn max_iter(&self) -> u32 {
        self.max_iter
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// One row of counts.
    ///
    /// # Panics
    ///
    /// Panics if `row >= height`.
    pub fn row(&self, row: usize) -> &[u32] {
        assert!(
            row < self.height,
            "row {} outside a {}x{} field",
            row,
            self.width,
            self.height
        );
        let start = row * self.width;
        &self.counts[start..start + self.width]
    }

    /// The whole buffer, row-major.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub(crate) fn set_max_iter(&mut self, max_iter: u32) {
        self.max_iter = max_iter;
    }

    pub(crate) fn counts_mut(&mut self) -> &mut [u32] {
        &mut self.counts
    }
}
