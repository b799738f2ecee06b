//! The boundary between the renderer and the image codec.  The
//! scheduler only ever asks an encoder to persist a finished buffer.

use crate::buffer::PixelBuffer;
use crate::errors::{Error, Result};
use image::jpeg::JPEGEncoder;
use image::ColorType;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// JPEG stores each dimension in 16 bits.
pub const MAX_DIMENSION: usize = 65_535;

/// Persists finished frames.  Shared by every frame worker.
pub trait FrameEncoder: Sync {
    /// Writes `buffer` to `path`.
    fn encode(&self, buffer: &PixelBuffer, path: &Path) -> Result<()>;
}

/// Writes baseline JPEG files.
#[derive(Copy, Clone, Debug)]
pub struct JpegEncoder {
    quality: u8,
}

impl JpegEncoder {
    /// `quality` runs from 1 to 100.
    pub fn new(quality: u8) -> JpegEncoder {
        JpegEncoder {
            quality: quality.max(1).min(100),
        }
    }
}

impl Default for JpegEncoder {
    fn default() -> JpegEncoder {
        JpegEncoder::new(75)
    }
}

impl FrameEncoder for JpegEncoder {
    fn encode(&self, buffer: &PixelBuffer, path: &Path) -> Result<()> {
        if buffer.width() > MAX_DIMENSION || buffer.height() > MAX_DIMENSION {
            let cause = io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "a {}x{} frame does not fit a JPEG header",
                    buffer.width(),
                    buffer.height()
                ),
            );
            return Err(Error::encode(path, cause));
        }
        let output = File::create(path).map_err(|e| Error::encode(path, e))?;
        let mut output = BufWriter::new(output);
        {
            let mut encoder = JPEGEncoder::new_with_quality(&mut output, self.quality);
            encoder
                .encode(
                    &buffer.to_rgb(),
                    buffer.width() as u32,
                    buffer.height() as u32,
                    ColorType::RGB(8),
                )
                .map_err(|e| Error::encode(path, e))?;
        }
        output.flush().map_err(|e| Error::encode(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::WHITE;
    use std::fs;

    #[test]
    fn writes_a_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame_000.jpg");
        let mut buffer = PixelBuffer::new(16, 8);
        buffer.fill(WHITE);
        JpegEncoder::default().encode(&buffer, &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn reports_unwritable_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frame_000.jpg");
        match JpegEncoder::default().encode(&PixelBuffer::new(4, 4), &path) {
            Err(Error::Encode { path: p, .. }) => assert!(p.ends_with("frame_000.jpg")),
            other => panic!("expected an encode error, got {:?}", other),
        }
    }

    #[test]
    fn refuses_frames_too_wide_for_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide_000.jpg");
        let buffer = PixelBuffer::new(MAX_DIMENSION + 1, 1);
        match JpegEncoder::default().encode(&buffer, &path) {
            Err(Error::Encode { cause, .. }) => {
                assert_eq!(cause.kind(), io::ErrorKind::InvalidInput)
            }
            other => panic!("expected an encode error, got {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn clamps_quality() {
        assert_eq!(JpegEncoder::new(0).quality, 1);
        assert_eq!(JpegEncoder::new(200).quality, 100);
    }
}
