//! Drives a whole animation.  Each frame zooms 2% further into the
//! base viewport than the last.  Frames are handed to a fixed pool of
//! frame workers over a rendezvous channel; when admission limiting is
//! on, a slot in the `AdmissionGate` is taken before a frame is handed
//! over and given back once the frame is encoded.

use crate::encoder::{FrameEncoder, MAX_DIMENSION};
use crate::errors::{Error, Result};
use crate::escape::Kernel;
use crate::gate::{AdmissionGate, Permit};
use crate::planes::Viewport;
use crate::render::{panic_message, FrameRenderer, FrameSpec};
use crossbeam::channel::{self, Receiver, SendError, Sender};
use log::{debug, error, info, warn};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

/// Each frame's extents are this much smaller, as a fraction of the
/// base viewport, than the previous frame's.
pub const ZOOM_STEP: f64 = 0.02;

/// Frame 50 would have a zero-sized viewport.
pub const MAX_FRAMES: usize = 50;

/// Upper bound on row workers per frame.
pub const MAX_THREADS: usize = 20;

/// The parameters of one animation run.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    /// Number of frames, at most `MAX_FRAMES`.
    pub frames: usize,
    /// The window shown by frame 0.
    pub viewport: Viewport,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Iteration limit per point.
    pub max_iterations: u32,
    /// Output files are named `<prefix>_NNN.jpg`.
    pub prefix: String,
    /// Frame workers, and so the most frames rendering at once.
    pub process_concurrency: usize,
    /// Row workers per frame.
    pub thread_concurrency: usize,
    /// When set, at most this many frames hold an admission slot.
    pub admission_limit: Option<usize>,
}

impl Animation {
    /// Checks every parameter before any work is started.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| -> Result<()> { Err(Error::Configuration(msg)) };
        if self.thread_concurrency < 1 || self.thread_concurrency > MAX_THREADS {
            return fail(format!(
                "Number of threads must be between 1 and {}, not {}.",
                MAX_THREADS, self.thread_concurrency
            ));
        }
        if self.process_concurrency < 1 {
            return fail("At least one frame worker is required.".to_string());
        }
        if self.frames > MAX_FRAMES {
            return fail(format!(
                "At most {} frames can be generated; frame {} would have no area.",
                MAX_FRAMES, MAX_FRAMES
            ));
        }
        if self.width < 1 || self.height < 1 {
            return fail(format!(
                "Image size {}x{} must be at least 1x1.",
                self.width, self.height
            ));
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return fail(format!(
                "Image size {}x{} exceeds the {} pixel JPEG limit.",
                self.width, self.height, MAX_DIMENSION
            ));
        }
        if self.max_iterations < 1 {
            return fail("The iteration limit must be at least 1.".to_string());
        }
        if !(self.viewport.scale.0 > 0.0 && self.viewport.scale.1 > 0.0) {
            return fail(format!(
                "The scale {} must be positive.",
                self.viewport.scale.0
            ));
        }
        if self.admission_limit == Some(0) {
            return fail("The admission limit must be at least 1.".to_string());
        }
        Ok(())
    }

    /// How much of the base viewport frame `index` shows.
    pub fn scale_factor(index: usize) -> f64 {
        1.0 - ZOOM_STEP * index as f64
    }

    /// Where frame `index` is written.
    pub fn output_path(&self, index: usize) -> PathBuf {
        PathBuf::from(format!("{}_{:03}.jpg", self.prefix, index))
    }

    /// The spec for frame `index`.
    pub fn frame(&self, index: usize) -> Result<FrameSpec> {
        Ok(FrameSpec {
            index,
            viewport: self.viewport.scaled(Animation::scale_factor(index))?,
            width: self.width,
            height: self.height,
            max_iterations: self.max_iterations,
            output_path: self.output_path(index),
        })
    }

    /// Specs for every frame, in order.
    pub fn frame_specs(&self) -> Result<Vec<FrameSpec>> {
        (0..self.frames).map(|i| self.frame(i)).collect()
    }
}

/// A frame that did not make it to disk.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameFailure {
    /// Frame index.
    pub index: usize,
    /// What went wrong.
    pub reason: String,
}

/// What a run produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    /// Frames requested.
    pub frames: usize,
    /// Files written, in frame order.
    pub completed: Vec<PathBuf>,
    /// Frames that failed, in frame order.
    pub failed: Vec<FrameFailure>,
    /// Most frames ever holding an admission slot at once, when
    /// admission limiting was on.
    pub peak_admitted: Option<usize>,
}

impl Summary {
    /// True when every frame was written.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.completed.len() == self.frames
    }
}

type Job<'g> = (FrameSpec, Option<Permit<'g>>);

struct Outcome {
    index: usize,
    result: Result<PathBuf>,
}

/// Renders and encodes the frames of an animation.
pub struct Scheduler<K, E> {
    renderer: FrameRenderer<K>,
    encoder: E,
}

impl<K: Kernel, E: FrameEncoder> Scheduler<K, E> {
    /// A scheduler that renders with `renderer` and writes with
    /// `encoder`.
    pub fn new(renderer: FrameRenderer<K>, encoder: E) -> Scheduler<K, E> {
        Scheduler { renderer, encoder }
    }

    /// The encoder frames are handed to.
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Produces every frame of `animation` and waits for all of them.
    /// Only configuration and resource problems fail the run; per-frame
    /// problems are collected in the summary.
    pub fn run(&self, animation: &Animation) -> Result<Summary> {
        animation.validate()?;
        let gate = match animation.admission_limit {
            Some(limit) => Some(AdmissionGate::new(limit)?),
            None => None,
        };
        self.run_with_gate(animation, gate.as_ref())
    }

    /// Like `run`, but frames are admitted through `gate` rather than a
    /// gate built from `animation.admission_limit`.
    pub fn run_with_gate(
        &self,
        animation: &Animation,
        gate: Option<&AdmissionGate>,
    ) -> Result<Summary> {
        animation.validate()?;
        let specs = animation.frame_specs()?;

        info!(
            "Generating {} frames using {} frame workers & {} threads",
            animation.frames, animation.process_concurrency, animation.thread_concurrency
        );
        let cores = num_cpus::get();
        if animation.process_concurrency * animation.thread_concurrency > cores {
            warn!(
                "{} frame workers x {} threads oversubscribes {} cores",
                animation.process_concurrency, animation.thread_concurrency, cores
            );
        }

        let (job_tx, job_rx) = channel::bounded::<Job>(0);
        let (done_tx, done_rx) = channel::unbounded::<Outcome>();
        let threads = animation.thread_concurrency;

        let dispatched = crossbeam::scope(|s| {
            let mut workers = 0;
            for id in 0..animation.process_concurrency {
                let (jobs, done) = (job_rx.clone(), done_tx.clone());
                match s
                    .builder()
                    .name(format!("frame-worker-{}", id))
                    .spawn(move |_| self.frame_worker(jobs, done, threads))
                {
                    Ok(_) => workers += 1,
                    Err(e) => error!("Could not start frame worker {}: {}", id, e),
                }
            }
            drop(job_rx);
            if workers == 0 {
                return Err(Error::Resource("no frame worker could be started".to_string()));
            }

            let mut undelivered = Vec::new();
            for spec in specs {
                let index = spec.index;
                let permit = gate.map(AdmissionGate::acquire);
                if let Err(SendError((_, permit))) = job_tx.send((spec, permit)) {
                    drop(permit);
                    let e = Error::Dispatch {
                        index,
                        reason: "every frame worker has stopped".to_string(),
                    };
                    error!("{}", e);
                    undelivered.push(Outcome {
                        index,
                        result: Err(e),
                    });
                }
            }
            drop(job_tx);
            Ok(undelivered)
        })
        .map_err(|panic| Error::Resource(format!("frame pool died: {}", panic_message(&*panic))))??;
        drop(done_tx);

        let mut outcomes: Vec<Outcome> = done_rx.iter().chain(dispatched).collect();
        outcomes.sort_by_key(|o| o.index);

        let mut summary = Summary {
            frames: animation.frames,
            peak_admitted: gate.map(AdmissionGate::peak),
            ..Summary::default()
        };
        for outcome in outcomes {
            match outcome.result {
                Ok(path) => summary.completed.push(path),
                Err(e) => summary.failed.push(FrameFailure {
                    index: outcome.index,
                    reason: e.to_string(),
                }),
            }
        }
        info!(
            "{} of {} frames generated",
            summary.completed.len(),
            summary.frames
        );
        Ok(summary)
    }

    // A worker whose frame failed with a fatal error stops taking frames.
    // Frames that find no worker left become dispatch failures.
    fn frame_worker(&self, jobs: Receiver<Job>, done: Sender<Outcome>, threads: usize) {
        for (spec, permit) in jobs.iter() {
            debug!("Generating image: {}", spec.output_path.display());
            let result = panic::catch_unwind(AssertUnwindSafe(|| self.produce(&spec, threads)))
                .unwrap_or_else(|panic| {
                    Err(Error::Render {
                        index: spec.index,
                        reason: panic_message(&*panic),
                    })
                });
            drop(permit);

            let retire = match result {
                Ok(()) => {
                    info!("Generated image: {}", spec.output_path.display());
                    false
                }
                Err(ref e) => {
                    error!("{}", e);
                    e.is_fatal()
                }
            };
            let FrameSpec {
                index, output_path, ..
            } = spec;
            let outcome = Outcome {
                index,
                result: result.map(|()| output_path),
            };
            if done.send(outcome).is_err() || retire {
                break;
            }
        }
    }

    fn produce(&self, spec: &FrameSpec, threads: usize) -> Result<()> {
        let buffer = self.renderer.render(spec, threads)?;
        self.encoder.encode(&buffer, &spec.output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;

    fn animation(frames: usize) -> Animation {
        Animation {
            frames,
            viewport: Viewport::new(Complex::new(0.0, 0.0), 4.0, 100, 100),
            width: 100,
            height: 100,
            max_iterations: 50,
            prefix: "mandel".to_string(),
            process_concurrency: 1,
            thread_concurrency: 1,
            admission_limit: None,
        }
    }

    #[test]
    fn zooms_two_percent_per_frame() {
        let specs = animation(5).frame_specs().unwrap();
        let xscales: Vec<f64> = specs.iter().map(|s| s.viewport.scale.0).collect();
        let expected = [4.0, 3.92, 3.84, 3.76, 3.68];
        for (got, want) in xscales.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-12, "{} vs {}", got, want);
        }
        assert!(xscales.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn names_frames_with_three_digits() {
        let a = animation(12);
        assert_eq!(a.output_path(0), PathBuf::from("mandel_000.jpg"));
        assert_eq!(a.output_path(11), PathBuf::from("mandel_011.jpg"));
    }

    #[test]
    fn fifty_frames_is_the_limit() {
        assert!(animation(MAX_FRAMES).validate().is_ok());
        let last = animation(MAX_FRAMES).frame(MAX_FRAMES - 1).unwrap();
        assert!(last.viewport.scale.0 > 0.0);
        assert!(animation(MAX_FRAMES + 1).validate().is_err());
        assert!(animation(MAX_FRAMES).frame(MAX_FRAMES).is_err());
    }

    #[test]
    fn thread_count_is_range_checked() {
        for &threads in &[0, 21, 100] {
            let mut a = animation(1);
            a.thread_concurrency = threads;
            match a.validate() {
                Err(Error::Configuration(msg)) => assert!(msg.contains("between 1 and 20")),
                other => panic!("expected a configuration error, got {:?}", other),
            }
        }
        for threads in 1..=MAX_THREADS {
            let mut a = animation(1);
            a.thread_concurrency = threads;
            assert!(a.validate().is_ok());
        }
    }

    #[test]
    fn rejects_images_the_codec_cannot_describe() {
        let mut a = animation(1);
        a.width = MAX_DIMENSION + 1;
        a.height = 1;
        match a.validate() {
            Err(Error::Configuration(msg)) => assert!(msg.contains("JPEG limit")),
            other => panic!("expected a configuration error, got {:?}", other),
        }
        a.width = MAX_DIMENSION;
        assert!(a.validate().is_ok());
        a.height = MAX_DIMENSION + 1;
        assert!(a.validate().is_err());
    }

    #[test]
    fn rejects_empty_images_and_limits() {
        let mut a = animation(1);
        a.width = 0;
        assert!(a.validate().is_err());
        let mut a = animation(1);
        a.max_iterations = 0;
        assert!(a.validate().is_err());
        let mut a = animation(1);
        a.admission_limit = Some(0);
        assert!(a.validate().is_err());
        let mut a = animation(1);
        a.process_concurrency = 0;
        assert!(a.validate().is_err());
    }
}
