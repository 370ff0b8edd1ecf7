// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the complex plane (the Viewport) sampled onto
//! it.
use num::Complex;

/// Describes the rectangle of the complex plane sampled onto the
/// field, treating the real part as the x-component and the
/// imaginary part as the y-component.  Nothing here is validated:
/// a viewport with `xmax <= xmin` or `ymax <= ymin` produces a
/// flipped or collapsed image, and that is the caller's business.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Real value sampled by column 0.
    pub xmin: f64,
    /// Real value the columns approach but never reach.
    pub xmax: f64,
    /// Imaginary value sampled by row 0.
    pub ymin: f64,
    /// Imaginary value the rows approach but never reach.
    pub ymax: f64,
}

impl Viewport {
    /// Constructor, in the order the coordinates are usually quoted.
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Viewport {
        Viewport {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }
}

/// Describes the x, y of a pixel in the field: column first, then
/// row.  Names are important.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Contains the definitions of two planes: an integral cartesian
/// plane of `width` by `height` pixels, and the viewport on the
/// complex plane.  Maps pixels from one to points on the other.
#[derive(Debug)]
pub struct PlaneMapper {
    width: usize,
    height: usize,
    viewport: Viewport,
    // Extent of the viewport along each axis.
    spans: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Takes the dimensions of the integral plane and
    /// the viewport onto the complex plane.
    pub fn new(width: usize, height: usize, viewport: &Viewport) -> PlaneMapper {
        PlaneMapper {
            width,
            height,
            viewport: *viewport,
            spans: (
                viewport.xmax - viewport.xmin,
                viewport.ymax - viewport.ymin,
            ),
        }
    }

    /// Width of the integral plane, which is also the stride of a
    /// row in the field.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the integral plane.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Given a pixel on the integral cartesian plane, return the
    /// complex number it samples.  Pixels past the edge of the plane
    /// are mapped by the same linear rule; batch kernels rely on that
    /// for the lanes they throw away.
    #[inline]
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            self.viewport.xmin + (pixel.0 as f64 / self.width as f64) * self.spans.0,
            self.viewport.ymin + (pixel.1 as f64 / self.height as f64) * self.spans.1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_to_point_on_positive_planes() {
        let pm = PlaneMapper::new(5, 5, &Viewport::new(0.0, 5.0, 0.0, 5.0));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 4)), Complex::new(4.0, 4.0));
    }

    #[test]
    fn pixel_to_points_on_mixed_planes() {
        let pm = PlaneMapper::new(4, 4, &Viewport::new(-2.0, 2.0, -2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, -2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(3, 1)), Complex::new(1.0, -1.0));
    }

    #[test]
    fn columns_and_rows_scale_independently() {
        let pm = PlaneMapper::new(8, 2, &Viewport::new(-2.0, 2.0, 0.0, 1.0));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 1)), Complex::new(0.0, 0.5));
        assert_eq!(pm.pixel_to_point(&Pixel(6, 0)), Complex::new(1.0, 0.0));
    }

    #[test]
    fn pixels_past_the_edge_keep_the_linear_rule() {
        let pm = PlaneMapper::new(4, 4, &Viewport::new(-2.0, 2.0, -2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 5)), Complex::new(2.0, 3.0));
    }

    #[test]
    fn flipped_viewports_are_mapped_not_rejected() {
        let pm = PlaneMapper::new(4, 4, &Viewport::new(2.0, -2.0, 2.0, -2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(1, 3)), Complex::new(1.0, -1.0));
    }
}
