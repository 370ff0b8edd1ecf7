// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time iteration itself.
//!
//! Starting from `z = 0`, a point `c` is pushed through `z = z*z + c`
//! until the squared modulus of `z` reaches 4 (an escape radius of 2,
//! compared squared to avoid a square root) or the iteration budget
//! runs out.  The escape-time value is the 0-based index of the
//! update that escaped, or the budget if none did.
//!
//! Three renditions of the same loop live here: the textbook one on
//! `num::Complex`, a scalar one that keeps the real and imaginary
//! parts apart so no multiplication is done twice, and a lane batch
//! that advances `L` points in lock-step.  Batches of two and four
//! lanes run on `wide`'s packed `f64x2` and `f64x4`; other widths
//! fall back to a loop over plain arrays.  All of them produce
//! identical counts.

use num::Complex;
use wide::{f64x2, f64x4, CmpGe, CmpGt};

/// Squared escape radius.
pub const ESCAPE: f64 = 4.0;

/// This is our classic iterator function, written with complex
/// arithmetic.  Kept as the reference the others are checked against.
pub fn escape_time_complex(c: Complex<f64>, max_iter: u32) -> u32 {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    for i in 0..max_iter {
        z = z * z + c;
        if z.norm_sqr() >= ESCAPE {
            return i;
        }
    }
    max_iter
}

/// The same iteration with the real and imaginary parts tracked as
/// plain doubles, using `re = a*a - b*b + x` and `im = 2*a*b + y`.
///
/// A NaN modulus never compares `>= 4`, so a point whose orbit goes
/// to NaN is reported as not escaping.
#[inline]
pub fn escape_time(x: f64, y: f64, max_iter: u32) -> u32 {
    let (mut a, mut b) = (0.0_f64, 0.0_f64);
    for i in 0..max_iter {
        let re = a * a - b * b + x;
        let im = 2.0 * a * b + y;
        if re * re + im * im >= ESCAPE {
            return i;
        }
        a = re;
        b = im;
    }
    max_iter
}

/// `L` sample points iterated together.  Lane `k` is the point
/// `x[k] + y[k]i`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LaneBatch<const L: usize> {
    /// Real parts.
    pub x: [f64; L],
    /// Imaginary parts.
    pub y: [f64; L],
}

impl<const L: usize> LaneBatch<L> {
    /// A batch with every lane at the origin.
    pub fn new() -> Self {
        LaneBatch {
            x: [0.0; L],
            y: [0.0; L],
        }
    }

    /// Returns the escape-time value of every lane, on packed SIMD
    /// registers when `L` is 2 or 4.  See `escape_times_portable` for
    /// how the lanes are counted; both give the same answer.
    pub fn escape_times(&self, max_iter: u32, early_exit: bool) -> [u32; L] {
        let mut counts = [0u32; L];
        match L {
            2 => packed_f64x2(&self.x, &self.y, max_iter, early_exit, &mut counts),
            4 => packed_f64x4(&self.x, &self.y, max_iter, early_exit, &mut counts),
            _ => return self.escape_times_portable(max_iter, early_exit),
        }
        counts
    }

    /// Returns the escape-time value of every lane, using plain
    /// arrays.
    ///
    /// Each step first masks off the lanes whose modulus, as it stood
    /// before the step, has reached the escape radius; live lanes
    /// have their counts bumped; then every lane, live or not, gets
    /// the same update.  Because the mask lags the update by one
    /// step, the first update (which maps `z = 0` to `c`) is done
    /// before the loop, and the count comes out equal to
    /// `escape_time` for every lane.
    ///
    /// With `early_exit` the batch stops once no lane is live.
    /// Without it the loop runs the full budget.  Dead lanes keep
    /// iterating (and may overflow to infinity or NaN) but their
    /// counts are frozen, so the flag never changes the result.
    pub fn escape_times_portable(&self, max_iter: u32, early_exit: bool) -> [u32; L] {
        let mut re = self.x;
        let mut im = self.y;
        let mut live = [true; L];
        let mut counts = [0u32; L];

        for _ in 0..max_iter {
            let mut any_live = false;
            for k in 0..L {
                // Written as a negation so that NaN stays live.
                let inside = !(re[k] * re[k] + im[k] * im[k] >= ESCAPE);
                live[k] &= inside;
                counts[k] += live[k] as u32;
                any_live |= live[k];
            }
            if early_exit && !any_live {
                break;
            }
            for k in 0..L {
                let (a, b) = (re[k], im[k]);
                re[k] = a * a - b * b + self.x[k];
                im[k] = 2.0 * a * b + self.y[k];
            }
        }
        counts
    }
}

impl<const L: usize> Default for LaneBatch<L> {
    fn default() -> Self {
        Self::new()
    }
}

// The lane batch on a packed vector type.  `live` holds 1.0 for lanes
// still inside the radius and 0.0 for escaped ones, so adding it to
// `counts` bumps exactly the live lanes.  Counts stay exact in f64 far
// past u32::MAX.
macro_rules! packed_kernel {
    ($name:ident, $simd:ident, $lanes:expr) => {
        fn $name(xs: &[f64], ys: &[f64], max_iter: u32, early_exit: bool, out: &mut [u32]) {
            let (mut x, mut y) = ([0.0; $lanes], [0.0; $lanes]);
            x.copy_from_slice(xs);
            y.copy_from_slice(ys);
            let (cx, cy) = ($simd::from(x), $simd::from(y));
            let (escape, two) = ($simd::splat(ESCAPE), $simd::splat(2.0));
            let zero = $simd::splat(0.0);

            let (mut re, mut im) = (cx, cy);
            let mut live = $simd::splat(1.0);
            let mut counts = zero;
            for _ in 0..max_iter {
                // cmp_ge is false for NaN, so NaN lanes stay live.
                let escaped = (re * re + im * im).cmp_ge(escape);
                live = escaped.blend(zero, live);
                counts = counts + live;
                if early_exit && live.cmp_gt(zero).none() {
                    break;
                }
                let (a, b) = (re, im);
                re = a * a - b * b + cx;
                im = two * a * b + cy;
            }

            for (cell, &count) in out.iter_mut().zip(counts.to_array().iter()) {
                *cell = count as u32;
            }
        }
    };
}

packed_kernel!(packed_f64x2, f64x2, 2);
packed_kernel!(packed_f64x4, f64x4, 4);

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [(f64, f64); 12] = [
        (0.0, 0.0),
        (2.0, 0.0),
        (-2.0, 0.0),
        (-0.75, 0.1),
        (0.25, 0.0),
        (0.26, 0.0),
        (-1.0, 0.0),
        (0.3, 0.5),
        (-0.1, 0.651),
        (-1.768, 0.002),
        (1.5, 1.5),
        (-0.5, -0.5),
    ];

    #[test]
    fn origin_never_escapes() {
        for &max_iter in &[1, 10, 100, 1000] {
            assert_eq!(escape_time(0.0, 0.0, max_iter), max_iter);
            assert_eq!(escape_time_complex(Complex::new(0.0, 0.0), max_iter), max_iter);
        }
    }

    #[test]
    fn two_escapes_on_the_first_update() {
        assert_eq!(escape_time(2.0, 0.0, 100), 0);
        assert_eq!(escape_time_complex(Complex::new(2.0, 0.0), 100), 0);
        assert_eq!(LaneBatch { x: [2.0], y: [0.0] }.escape_times(100, true), [0]);
    }

    #[test]
    fn escape_index_is_zero_based() {
        // c = 1: z runs 1, 2; the second update reaches the radius.
        assert_eq!(escape_time(1.0, 0.0, 100), 1);
        assert_eq!(escape_time_complex(Complex::new(1.0, 0.0), 100), 1);
        assert_eq!(LaneBatch { x: [1.0], y: [0.0] }.escape_times(100, true), [1]);
    }

    #[test]
    fn zero_budget_counts_nothing() {
        assert_eq!(escape_time(0.0, 0.0, 0), 0);
        assert_eq!(escape_time(3.0, 3.0, 0), 0);
        let batch = LaneBatch {
            x: [0.0, 3.0],
            y: [0.0, 3.0],
        };
        assert_eq!(batch.escape_times(0, true), [0, 0]);
    }

    #[test]
    fn nan_is_treated_as_not_escaping() {
        assert_eq!(escape_time(f64::NAN, 0.0, 50), 50);
        let batch = LaneBatch {
            x: [f64::NAN, 2.0],
            y: [0.0, 0.0],
        };
        assert_eq!(batch.escape_times(50, true), [50, 0]);
    }

    #[test]
    fn complex_and_scalar_agree() {
        for &(x, y) in SAMPLES.iter() {
            for &max_iter in &[1, 7, 64, 500] {
                assert_eq!(
                    escape_time_complex(Complex::new(x, y), max_iter),
                    escape_time(x, y, max_iter),
                    "c = {} + {}i, max_iter = {}",
                    x,
                    y,
                    max_iter
                );
            }
        }
    }

    #[test]
    fn four_lanes_agree_with_scalar() {
        for group in SAMPLES.chunks(4) {
            let mut batch = LaneBatch::<4>::new();
            for (k, &(x, y)) in group.iter().enumerate() {
                batch.x[k] = x;
                batch.y[k] = y;
            }
            for &max_iter in &[1, 2, 13, 256] {
                let expected: Vec<u32> = group
                    .iter()
                    .map(|&(x, y)| escape_time(x, y, max_iter))
                    .collect();
                assert_eq!(batch.escape_times(max_iter, true).to_vec(), expected);
            }
        }
    }

    #[test]
    fn two_lanes_agree_with_scalar() {
        for pair in SAMPLES.chunks(2) {
            let batch = LaneBatch {
                x: [pair[0].0, pair[1].0],
                y: [pair[0].1, pair[1].1],
            };
            assert_eq!(
                batch.escape_times(300, true),
                [
                    escape_time(pair[0].0, pair[0].1, 300),
                    escape_time(pair[1].0, pair[1].1, 300)
                ]
            );
        }
    }

    #[test]
    fn early_exit_does_not_change_counts() {
        for group in SAMPLES.chunks(4) {
            let mut batch = LaneBatch::<4>::default();
            for (k, &(x, y)) in group.iter().enumerate() {
                batch.x[k] = x;
                batch.y[k] = y;
            }
            assert_eq!(batch.escape_times(400, true), batch.escape_times(400, false));
        }
    }

    #[test]
    fn packed_and_portable_batches_agree() {
        let mut points = SAMPLES.to_vec();
        points.push((f64::NAN, 0.5));
        points.push((0.0, f64::INFINITY));
        points.push((-0.7435, 0.1314));
        points.push((0.2501, 0.0));
        for group in points.chunks(4) {
            let mut batch = LaneBatch::<4>::new();
            for (k, &(x, y)) in group.iter().enumerate() {
                batch.x[k] = x;
                batch.y[k] = y;
            }
            for &max_iter in &[0, 1, 3, 90, 1000] {
                for &early_exit in &[true, false] {
                    assert_eq!(
                        batch.escape_times(max_iter, early_exit),
                        batch.escape_times_portable(max_iter, early_exit),
                        "{:?}, max_iter = {}",
                        batch,
                        max_iter
                    );
                }
            }
        }
        for pair in points.chunks(2) {
            let batch = LaneBatch {
                x: [pair[0].0, pair[1].0],
                y: [pair[0].1, pair[1].1],
            };
            assert_eq!(batch.escape_times(500, true), batch.escape_times_portable(500, true));
        }
    }

    #[test]
    fn odd_widths_use_the_portable_loop() {
        let batch = LaneBatch {
            x: [0.0, 2.0, 1.0],
            y: [0.0, 0.0, 0.0],
        };
        assert_eq!(batch.escape_times(60, true), [60, 0, 1]);
    }

    #[test]
    fn counts_never_exceed_the_budget() {
        let batch = LaneBatch {
            x: [0.0, -1.0, 0.25, -0.75],
            y: [0.0, 0.0, 0.0, 0.0],
        };
        for &count in batch.escape_times(77, false).iter() {
            assert!(count <= 77);
        }
    }
}
