//! Run settings as the user states them, before they are turned into
//! an `Animation`.

use crate::errors::Result;
use crate::planes::Viewport;
use crate::scheduler::Animation;
use num::Complex;

/// User-facing settings.  The y extent is never set directly; it
/// follows from the x extent and the image's aspect ratio.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Number of frames.
    pub frames: usize,
    /// Output file prefix.
    pub prefix: String,
    /// Centre of the first frame.
    pub center: Complex<f64>,
    /// Width of the first frame on the complex plane.
    pub xscale: f64,
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Iteration limit per point.
    pub max_iterations: u32,
    /// Frame workers; also the admission limit when `semaphore` is set.
    pub processes: usize,
    /// Row workers per frame.
    pub threads: usize,
    /// Bound in-flight frames with an admission gate.
    pub semaphore: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            frames: 50,
            prefix: "mandel".to_string(),
            center: Complex::new(0.0, 0.0),
            xscale: 4.0,
            width: 1000,
            height: 1000,
            max_iterations: 1000,
            processes: 1,
            threads: 1,
            semaphore: false,
        }
    }
}

impl Config {
    /// The animation these settings describe, validated.
    pub fn animation(&self) -> Result<Animation> {
        let animation = Animation {
            frames: self.frames,
            viewport: Viewport::new(self.center, self.xscale, self.width, self.height),
            width: self.width,
            height: self.height,
            max_iterations: self.max_iterations,
            prefix: self.prefix.clone(),
            process_concurrency: self.processes,
            thread_concurrency: self.threads,
            admission_limit: if self.semaphore {
                Some(self.processes)
            } else {
                None
            },
        };
        animation.validate()?;
        Ok(animation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn defaults_are_valid() {
        let animation = Config::default().animation().unwrap();
        assert_eq!(animation.frames, 50);
        assert_eq!(animation.viewport.scale, (4.0, 4.0));
        assert_eq!(animation.admission_limit, None);
    }

    #[test]
    fn yscale_is_derived() {
        let config = Config {
            width: 800,
            height: 600,
            ..Config::default()
        };
        assert_eq!(config.animation().unwrap().viewport.scale, (4.0, 3.0));
    }

    #[test]
    fn semaphore_limits_to_process_count() {
        let config = Config {
            processes: 3,
            semaphore: true,
            ..Config::default()
        };
        assert_eq!(config.animation().unwrap().admission_limit, Some(3));
    }

    #[test]
    fn bad_thread_count_is_a_configuration_error() {
        let config = Config {
            threads: 21,
            ..Config::default()
        };
        match config.animation() {
            Err(Error::Configuration(_)) => {}
            other => panic!("expected a configuration error, got {:?}", other),
        }
    }

    #[test]
    fn too_many_frames_is_a_configuration_error() {
        let config = Config {
            frames: 51,
            ..Config::default()
        };
        assert!(config.animation().is_err());
    }
}
