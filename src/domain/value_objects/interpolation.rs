//! Interpolation mode value object

/// Reference density all authored coordinates assume
pub const LOGICAL_DPI: f64 = 96.0;

/// Resampling algorithm used when stretching or shrinking a bitmap
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum InterpolationMode {
    /// Not yet computed
    #[default]
    Invalid,
    NearestNeighbor,
    HighQualityBilinear,
    HighQualityBicubic,
}

impl InterpolationMode {
    /// Pick the mode for a logical-to-device scaling factor.
    ///
    /// Whole multiples (100%, 200%, ...) keep edges crisp with nearest
    /// neighbour. Anything below 100% shrinks and uses bilinear. Fractional
    /// upscales such as 125% or 150% use bicubic.
    pub fn for_scale_factor(factor: f64) -> Self {
        let percent = (factor * 100.0).round() as i64;
        if percent % 100 == 0 {
            Self::NearestNeighbor
        } else if percent < 100 {
            Self::HighQualityBilinear
        } else {
            Self::HighQualityBicubic
        }
    }

    /// Whether this is a real mode rather than the "not computed" sentinel
    pub fn is_valid(self) -> bool {
        self != Self::Invalid
    }
}
