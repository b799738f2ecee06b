//! The raster a frame is rendered into.  A buffer is owned by exactly
//! one render; its row workers each borrow an exclusive band of it.

use crate::palette::{rgb, BLACK};
use crate::planes::Pixel;
use crate::rows::RowRange;

/// A `width` x `height` grid of packed `0xRRGGBB` colors, stored row
/// by row.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// A buffer filled with the black background.
    pub fn new(width: usize, height: usize) -> PixelBuffer {
        PixelBuffer {
            width,
            height,
            pixels: vec![BLACK; width * height],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The raw colors, row by row.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Sets every pixel to `color`.
    pub fn fill(&mut self, color: u32) {
        for p in self.pixels.iter_mut() {
            *p = color;
        }
    }

    /// Sets one pixel.
    pub fn set(&mut self, pixel: Pixel, color: u32) {
        let offset = self.offset(pixel);
        self.pixels[offset] = color;
    }

    /// Reads one pixel.
    pub fn get(&self, pixel: Pixel) -> u32 {
        self.pixels[self.offset(pixel)]
    }

    fn offset(&self, pixel: Pixel) -> usize {
        assert!(
            pixel.0 < self.width && pixel.1 < self.height,
            "pixel {:?} is outside a {}x{} buffer",
            pixel,
            self.width,
            self.height
        );
        pixel.1 * self.width + pixel.0
    }

    /// Hands out one exclusive band per range.  The ranges must be in
    /// order and tile `[0, height)` exactly; anything else is a
    /// partitioning bug and panics.
    pub fn rows_mut(&mut self, ranges: &[RowRange]) -> Vec<Rows<'_>> {
        let (width, height) = (self.width, self.height);
        let mut rest: &mut [u32] = &mut self.pixels;
        let mut next = 0;
        let mut bands = Vec::with_capacity(ranges.len());
        for &range in ranges {
            assert!(
                range.start == next && range.start <= range.end && range.end <= height,
                "row range {:?} does not continue from row {} of {}",
                range,
                next,
                height
            );
            let (band, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * width);
            rest = tail;
            next = range.end;
            bands.push(Rows {
                range,
                width,
                pixels: band,
            });
        }
        assert!(
            next == height,
            "row ranges stop at row {} of {}",
            next,
            height
        );
        bands
    }

    /// The buffer as interleaved 8-bit RGB, ready for a codec.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut raw = Vec::with_capacity(self.pixels.len() * 3);
        for &p in &self.pixels {
            raw.extend_from_slice(&rgb(p));
        }
        raw
    }
}

/// An exclusive, writable band of rows within a `PixelBuffer`.
#[derive(Debug)]
pub struct Rows<'a> {
    range: RowRange,
    width: usize,
    pixels: &'a mut [u32],
}

impl<'a> Rows<'a> {
    /// The rows this band covers, in buffer coordinates.
    pub fn range(&self) -> RowRange {
        self.range
    }

    /// Width of each row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Sets one pixel.  `pixel.1` is a buffer row and must fall inside
    /// this band.
    #[inline]
    pub fn set(&mut self, pixel: Pixel, color: u32) {
        assert!(
            pixel.0 < self.width && pixel.1 >= self.range.start && pixel.1 < self.range.end,
            "pixel {:?} is outside band {:?}",
            pixel,
            self.range
        );
        self.pixels[(pixel.1 - self.range.start) * self.width + pixel.0] = color;
    }
}
