// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns escape-time counts into colours: a red ramp that is
//! brightest for points that escape at once and black for points in
//! the set.

use crate::field::Field;

/// Colour of one count under a budget of `max_iter`, as `[r, g, b]`.
/// A count equal to the budget is black; with a budget of zero every
/// count is, so the whole image is black.
pub fn to_color(count: u32, max_iter: u32) -> [u8; 3] {
    if count >= max_iter {
        return [0, 0, 0];
    }
    let red = (255.0 - f64::from(count) * 255.0 / f64::from(max_iter)) as u8;
    [red, 0, 0]
}

/// The whole field as a row-major RGB buffer, three bytes a pixel.
pub fn colorize(field: &Field) -> Vec<u8> {
    let max_iter = field.max_iter();
    let mut pixels = Vec::with_capacity(field.counts().len() * 3);
    for &count in field.counts() {
        pixels.extend_from_slice(&to_color(count, max_iter));
    }
    pixels
}
