//! Unit conversion utilities.
//!
//! DrawingML positions and sizes are English Metric Units (EMU); run font sizes
//! are hundredths of a point.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const CENTIPOINTS_PER_PT: u32 = 100;

/// Point size to the `sz` attribute value of `a:rPr`.
#[inline]
pub fn pt_to_centipoints(pt: f64) -> u32 {
    (pt * CENTIPOINTS_PER_PT as f64).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_size_units() {
        assert_eq!(pt_to_centipoints(14.0), 1400);
        assert_eq!(pt_to_centipoints(10.5), 1050);
        assert_eq!(pt_to_centipoints(-3.0), 0);
        assert_eq!(2 * EMUS_PER_INCH, 1_828_800);
    }
}
