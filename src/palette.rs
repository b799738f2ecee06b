//! Maps iteration counts onto 24-bit packed `0xRRGGBB` colors.
//!
//! The mapping is a straight linear ramp across the whole 24-bit
//! range, so points that never escape land on `WHITE`.

/// The largest 24-bit color.
pub const WHITE: u32 = 0x00FF_FFFF;

/// The background a fresh frame starts with.
pub const BLACK: u32 = 0;

/// Color for a point that survived `iterations` out of `limit`.
/// `limit` must be at least 1.
#[inline]
pub fn color_for(iterations: u32, limit: u32) -> u32 {
    debug_assert!(limit > 0, "color_for needs a positive iteration limit");
    (f64::from(WHITE) * f64::from(iterations) / f64::from(limit)) as u32
}

/// Unpacks a `0xRRGGBB` color into its channels.
#[inline]
pub fn rgb(color: u32) -> [u8; 3] {
    [(color >> 16) as u8, (color >> 8) as u8, color as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_endpoints() {
        assert_eq!(color_for(1000, 1000), WHITE);
        assert_eq!(color_for(0, 1000), BLACK);
        assert_eq!(color_for(1, 1), WHITE);
    }

    #[test]
    fn ramp_truncates() {
        // 0xFFFFFF / 2 = 8388607.5
        assert_eq!(color_for(1, 2), 8_388_607);
        assert_eq!(color_for(1, 3), 0x55_5555);
    }

    #[test]
    fn ramp_is_monotonic() {
        let colors: Vec<u32> = (0..=50).map(|i| color_for(i, 50)).collect();
        assert!(colors.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn unpacks_channels() {
        assert_eq!(rgb(WHITE), [255, 255, 255]);
        assert_eq!(rgb(0x12_3456), [0x12, 0x34, 0x56]);
        assert_eq!(rgb(BLACK), [0, 0, 0]);
    }
}
