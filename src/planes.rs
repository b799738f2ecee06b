//! Contains the Viewport, which describes a rectangle on the complex
//! plane by its centre and extents, and the PlaneMapper, which relates
//! that rectangle to an integral pixel grid with its origin at 0,0.
use crate::errors::{Error, Result};
use num::Complex;

/// Describes the x, y of a pixel: column, then row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// A window onto the complex plane, given by its centre and its width
/// and height in plane units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Centre of the window.
    pub center: Complex<f64>,
    /// Width and height of the window.
    pub scale: (f64, f64),
}

impl Viewport {
    /// Builds a viewport from the centre and the x extent.  The y
    /// extent follows the aspect ratio of the image.
    pub fn new(center: Complex<f64>, xscale: f64, width: usize, height: usize) -> Viewport {
        Viewport {
            center,
            scale: (xscale, xscale / width as f64 * height as f64),
        }
    }

    /// The same window with both extents multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Result<Viewport> {
        if !(factor > 0.0) {
            return Err(Error::Plane(format!(
                "scale factor {} would collapse or mirror the viewport",
                factor
            )));
        }
        Ok(Viewport {
            center: self.center,
            scale: (self.scale.0 * factor, self.scale.1 * factor),
        })
    }

    /// The lower-left and upper-right corners of the window.
    pub fn bounds(&self) -> (Complex<f64>, Complex<f64>) {
        let (half_w, half_h) = (self.scale.0 / 2.0, self.scale.1 / 2.0);
        (
            Complex::new(self.center.re - half_w, self.center.im - half_h),
            Complex::new(self.center.re + half_w, self.center.im + half_h),
        )
    }
}

/// Maps pixels of a `width` x `height` grid onto a viewport.
#[derive(Debug)]
pub struct PlaneMapper {
    /// Width and height of the pixel grid.
    pub size: (usize, usize),
    leftlower: Complex<f64>,
    // Width and height of the window in plane units.
    span: (f64, f64),
}

impl PlaneMapper {
    /// Fails when the grid is empty or the viewport has no area.
    pub fn new(width: usize, height: usize, viewport: &Viewport) -> Result<PlaneMapper> {
        if width == 0 || height == 0 {
            return Err(Error::Plane(format!(
                "the pixel grid {}x{} is empty",
                width, height
            )));
        }

        if !(viewport.scale.0 > 0.0 && viewport.scale.1 > 0.0) {
            return Err(Error::Plane(format!(
                "the viewport extents {:?} must both be positive",
                viewport.scale
            )));
        }

        let (leftlower, rightupper) = viewport.bounds();
        Ok(PlaneMapper {
            size: (width, height),
            leftlower,
            span: (rightupper.re - leftlower.re, rightupper.im - leftlower.im),
        })
    }

    /// Given a pixel on the integral grid, return the point on the
    /// complex plane at its corner.  Row 0 sits at the bottom edge of
    /// the viewport.
    #[inline]
    pub fn pixel_to_point(&self, pixel: Pixel) -> Complex<f64> {
        Complex::new(
            self.leftlower.re + pixel.0 as f64 * self.span.0 / self.size.0 as f64,
            self.leftlower.im + pixel.1 as f64 * self.span.1 / self.size.1 as f64,
        )
    }
}
