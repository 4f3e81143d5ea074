//! Logical-to-device arithmetic
//!
//! `f64::round` rounds half away from zero, which is the rounding every
//! conversion here promises.

use crate::domain::value_objects::{Size, LOGICAL_DPI};

/// Factor for a DPI (`dpi / 96`)
pub fn factor_for_dpi(dpi: f64) -> f64 {
    dpi / LOGICAL_DPI
}

/// Scale `value` by a precomputed factor
pub fn scale_by_factor(value: i32, factor: f64) -> i32 {
    (value as f64 * factor).round() as i32
}

/// Scale `value` authored at 96 DPI to `dpi`.
///
/// The product is formed before dividing so that exact halves stay exact
/// (`12 * 100 / 96 == 12.5`), which a rounded factor could push either way.
pub fn scale_for_dpi(value: i32, dpi: u32) -> i32 {
    (value as f64 * dpi as f64 / LOGICAL_DPI).round() as i32
}

/// Scale both dimensions by the same factor
pub fn scale_size_by_factor(size: Size, factor: f64) -> Size {
    size.map(|v| scale_by_factor(v, factor))
}

/// Scale both dimensions to `dpi`
pub fn scale_size_for_dpi(size: Size, dpi: u32) -> Size {
    size.map(|v| scale_for_dpi(v, dpi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_for_dpi_matches_rounded_ratio() {
        for dpi in [72, 96, 100, 120, 144, 168, 192, 240, 288] {
            for value in -50..=50 {
                let exact = value as f64 * dpi as f64 / 96.0;
                assert_eq!(scale_for_dpi(value, dpi), exact.round() as i32, "{value} @ {dpi}");
            }
        }
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(scale_for_dpi(1, 144), 2); // 1.5
        assert_eq!(scale_for_dpi(-1, 144), -2);
        assert_eq!(scale_for_dpi(12, 100), 13); // 12.5
        assert_eq!(scale_for_dpi(-12, 100), -13);
        assert_eq!(scale_by_factor(3, 1.5), 5); // 4.5
    }

    #[test]
    fn test_factor_for_dpi() {
        assert_eq!(factor_for_dpi(96.0), 1.0);
        assert_eq!(factor_for_dpi(144.0), 1.5);
        assert_eq!(factor_for_dpi(192.0), 2.0);
    }

    #[test]
    fn test_size_uses_same_factor_on_both_axes() {
        assert_eq!(scale_size_for_dpi(Size::new(16, 32), 120), Size::new(20, 40));
        assert_eq!(scale_size_by_factor(Size::new(10, 3), 1.25), Size::new(13, 4));
    }
}
