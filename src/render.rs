//! Renders one frame.  The frame's rows are partitioned into bands,
//! each band is handed to its own scoped thread as an exclusive slice of
//! the frame buffer, and the frame is complete once every band's thread
//! has joined.

use crate::buffer::{PixelBuffer, Rows};
use crate::errors::{Error, Result};
use crate::escape::{Kernel, Mandelbrot};
use crate::palette::color_for;
use crate::planes::{Pixel, PlaneMapper, Viewport};
use crate::rows::partition;
use itertools::iproduct;
use log::debug;
use std::any::Any;
use std::path::PathBuf;

/// Everything needed to produce one frame of the animation.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSpec {
    /// Position in the animation, from 0.
    pub index: usize,
    /// The window onto the complex plane.
    pub viewport: Viewport,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Iteration limit per point.
    pub max_iterations: u32,
    /// Where the encoder should put the frame.
    pub output_path: PathBuf,
}

/// Renders frames with a given kernel.  A renderer holds no per-frame
/// state and can be shared between frame workers.
#[derive(Debug, Default)]
pub struct FrameRenderer<K = Mandelbrot> {
    kernel: K,
}

impl FrameRenderer<Mandelbrot> {
    /// A renderer for the Mandelbrot set.
    pub fn new() -> FrameRenderer<Mandelbrot> {
        FrameRenderer { kernel: Mandelbrot }
    }
}

impl<K: Kernel> FrameRenderer<K> {
    /// A renderer driven by `kernel`.
    pub fn with_kernel(kernel: K) -> FrameRenderer<K> {
        FrameRenderer { kernel }
    }

    /// The kernel in use.
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Renders `spec` using `workers` row workers.  A panicking worker
    /// fails this frame with `Error::Render`; the buffer is discarded.
    pub fn render(&self, spec: &FrameSpec, workers: usize) -> Result<PixelBuffer> {
        if workers == 0 {
            return Err(Error::Configuration(
                "a frame needs at least one row worker".to_string(),
            ));
        }
        if spec.max_iterations == 0 {
            return Err(Error::Configuration(
                "the iteration limit must be at least 1".to_string(),
            ));
        }

        let plane = PlaneMapper::new(spec.width, spec.height, &spec.viewport)?;
        let mut buffer = PixelBuffer::new(spec.width, spec.height);
        let ranges = partition(spec.height, workers);
        debug!(
            "frame {}: {}x{} over {:?} in {} bands",
            spec.index, spec.width, spec.height, spec.viewport, workers
        );

        let limit = spec.max_iterations;
        let kernel = &self.kernel;
        let plane = &plane;
        crossbeam::scope(|spawner| {
            for band in buffer.rows_mut(&ranges) {
                spawner.spawn(move |_| render_band(kernel, plane, band, limit));
            }
        })
        .map_err(|panic| Error::Render {
            index: spec.index,
            reason: panic_message(&*panic),
        })?;

        Ok(buffer)
    }
}

fn render_band<K: Kernel>(kernel: &K, plane: &PlaneMapper, mut band: Rows, limit: u32) {
    for (row, column) in iproduct!(band.range().rows(), 0..band.width()) {
        let pixel = Pixel(column, row);
        let iterations = kernel.iterate(plane.pixel_to_point(pixel), limit);
        band.set(pixel, color_for(iterations, limit));
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(panics) = panic.downcast_ref::<Vec<Box<dyn Any + Send + 'static>>>() {
        return panics
            .iter()
            .map(|p| panic_message(&**p))
            .collect::<Vec<_>>()
            .join("; ");
    }
    if let Some(s) = panic.downcast_ref::<&str>() {
        return (*s).to_string();
    }
    if let Some(s) = panic.downcast_ref::<String>() {
        return s.clone();
    }
    "row worker panicked".to_string()
}
