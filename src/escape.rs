//! The escape-time test.  A point `c` on the complex plane is iterated
//! under `z <- z^2 + c`, starting from `z = c`, until either its
//! magnitude exceeds 2 or the iteration limit is reached.  The number
//! of iterations survived is the only thing the renderer needs.

use num::Complex;

/// The outcome of iterating one point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Escape {
    /// Iterations survived, in `[0, limit]`.
    pub iterations: u32,
    /// Whether the orbit left the radius-2 disc before the limit.
    pub escaped: bool,
}

/// Iterates the point `(x0, y0)` at most `limit` times and returns how
/// many iterations it survived.  Points inside the set return `limit`.
#[inline]
pub fn iterate(x0: f64, y0: f64, limit: u32) -> u32 {
    let (mut x, mut y) = (x0, y0);
    let mut iterations = 0;
    while x * x + y * y <= 4.0 && iterations < limit {
        let xt = x * x - y * y + x0;
        let yt = 2.0 * x * y + y0;
        x = xt;
        y = yt;
        iterations += 1;
    }
    iterations
}

/// Like `iterate`, but also reports whether the orbit escaped.
pub fn escape(point: Complex<f64>, limit: u32) -> Escape {
    let iterations = iterate(point.re, point.im, limit);
    Escape {
        iterations,
        escaped: iterations < limit,
    }
}

/// Anything that can turn a point on the complex plane into an
/// iteration count.  The renderer is generic over this so a frame can
/// be rendered with an instrumented kernel.
pub trait Kernel: Sync {
    /// Iteration count for `point`, in `[0, limit]`.
    fn iterate(&self, point: Complex<f64>, limit: u32) -> u32;
}

/// The classic quadratic Mandelbrot kernel.
#[derive(Copy, Clone, Debug, Default)]
pub struct Mandelbrot;

impl Kernel for Mandelbrot {
    #[inline]
    fn iterate(&self, point: Complex<f64>, limit: u32) -> u32 {
        iterate(point.re, point.im, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::distributions::{Distribution, Uniform};
    use rand::prelude::*;

    #[test]
    fn origin_never_escapes() {
        for limit in &[0, 1, 2, 50, 1000] {
            assert_eq!(iterate(0.0, 0.0, *limit), *limit);
        }
    }

    #[test]
    fn points_outside_the_disc_escape_immediately() {
        let mut rng = thread_rng();
        let angle = Uniform::new(0.0, 2.0 * std::f64::consts::PI);
        let radius = Uniform::new(2.000_001, 1.0e6);
        for _ in 0..1000 {
            let (t, r) = (angle.sample(&mut rng), radius.sample(&mut rng));
            let point = Complex::from_polar(&r, &t);
            assert_eq!(iterate(point.re, point.im, 500), 0);
        }
    }

    #[test]
    fn counts_stay_within_the_limit() {
        let mut rng = thread_rng();
        let coord = Uniform::new(-2.5, 2.5);
        for _ in 0..1000 {
            let (x, y) = (coord.sample(&mut rng), coord.sample(&mut rng));
            assert!(iterate(x, y, 64) <= 64);
        }
    }

    #[test]
    fn known_points() {
        // -1 is a period-2 point; 1 escapes after 0 -> 1 -> 2 -> 5.
        assert_eq!(iterate(-1.0, 0.0, 100), 100);
        assert_eq!(iterate(1.0, 0.0, 100), 2);
        assert_eq!(iterate(2.0, 0.0, 100), 1);
    }

    #[test]
    fn escape_reports_state() {
        assert_eq!(
            escape(Complex::new(0.0, 0.0), 10),
            Escape {
                iterations: 10,
                escaped: false
            }
        );
        assert!(escape(Complex::new(3.0, 0.0), 10).escaped);
    }

    #[test]
    fn kernel_matches_the_free_function() {
        let p = Complex::new(-0.75, 0.1);
        assert_eq!(Mandelbrot.iterate(p, 200), iterate(-0.75, 0.1, 200));
    }
}
