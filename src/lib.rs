#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot zoom animation generator
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which iterating `z <- z^2 + c` never runs off to infinity.  The
//! escape-time picture of it colors each point by how many iterations
//! it survives before its magnitude passes 2.
//!
//! An animation here is a run of frames, each showing a viewport 2%
//! smaller than the one before around the same centre.  Work is spread
//! at two levels: frames are rendered concurrently by a pool of frame
//! workers, optionally throttled by an admission gate, and every frame
//! is split into bands of rows rendered by their own threads.  Each
//! row thread holds an exclusive `&mut` slice of the frame buffer, so
//! the threads cannot touch each other's pixels.

extern crate crossbeam;
extern crate image;
extern crate itertools;
extern crate num;
extern crate num_cpus;

pub mod buffer;
pub mod config;
pub mod encoder;
pub mod errors;
pub mod escape;
pub mod gate;
pub mod palette;
pub mod planes;
pub mod render;
pub mod rows;
pub mod scheduler;

pub use buffer::PixelBuffer;
pub use config::Config;
pub use encoder::{FrameEncoder, JpegEncoder};
pub use errors::{Error, Result};
pub use escape::{Kernel, Mandelbrot};
pub use gate::AdmissionGate;
pub use planes::Viewport;
pub use render::{FrameRenderer, FrameSpec};
pub use rows::{partition, RowRange};
pub use scheduler::{Animation, Scheduler, Summary};
