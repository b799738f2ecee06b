//! Error types for the animation pipeline.
//!
//! Configuration and resource errors are fatal and surface before any
//! frame work starts.  Dispatch, render and encode errors are scoped to
//! a single frame; the scheduler records them and keeps going.

use failure::Fail;
use std::io;
use std::path::Path;

/// Everything that can go wrong while producing an animation.
#[derive(Debug, Fail)]
pub enum Error {
    /// A run parameter is out of range.  Raised before any frame work.
    #[fail(display = "Configuration error: {}", _0)]
    Configuration(String),

    /// A process-wide resource (the admission gate, the frame pool)
    /// could not be created.
    #[fail(display = "Could not acquire resource: {}", _0)]
    Resource(String),

    /// A frame job never started.
    #[fail(display = "Frame {} was not dispatched: {}", index, reason)]
    Dispatch {
        /// Frame index.
        index: usize,
        /// What kept it from starting.
        reason: String,
    },

    /// A row worker died while rendering a frame.
    #[fail(display = "Frame {} failed to render: {}", index, reason)]
    Render {
        /// Frame index.
        index: usize,
        /// Panic payload or description of the defect.
        reason: String,
    },

    /// The viewport cannot be mapped onto the pixel grid.
    #[fail(display = "Invalid plane: {}", _0)]
    Plane(String),

    /// The codec could not write the frame.
    #[fail(display = "Could not write {}: {}", path, cause)]
    Encode {
        /// Destination that failed.
        path: String,
        /// Underlying I/O failure.
        #[cause]
        cause: io::Error,
    },
}

impl Error {
    pub(crate) fn encode(path: &Path, cause: io::Error) -> Error {
        Error::Encode {
            path: path.display().to_string(),
            cause,
        }
    }

    /// True for errors that must stop the run before it begins.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Configuration(_) | Error::Resource(_) => true,
            _ => false,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_errors_are_the_pre_render_ones() {
        assert!(Error::Configuration("threads".to_string()).is_fatal());
        assert!(Error::Resource("gate".to_string()).is_fatal());
        assert!(!Error::Render {
            index: 3,
            reason: "boom".to_string()
        }
        .is_fatal());
    }

    #[test]
    fn messages_name_the_frame() {
        let e = Error::Dispatch {
            index: 7,
            reason: "no workers".to_string(),
        };
        assert_eq!(format!("{}", e), "Frame 7 was not dispatched: no workers");
    }
}
