//! Luminance histogram feeding the exposure measure.

use std::ops::RangeBounds;

use image::GrayImage;

/// 256-bin histogram of luminance values.
#[derive(Debug, Clone)]
pub struct Histogram {
    bins: [u64; 256],
    total: u64,
}

impl Histogram {
    #[must_use]
    pub fn from_luma(image: &GrayImage) -> Self {
        let mut bins = [0u64; 256];
        for pixel in image.pixels() {
            bins[usize::from(pixel.0[0])] += 1;
        }
        Self {
            bins,
            total: bins.iter().sum(),
        }
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Luminance level at or below which fraction `p` of the pixels lie.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn percentile(&self, p: f64) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let target = (self.total as f64 * p.clamp(0.0, 1.0)).round() as u64;
        self.bins
            .iter()
            .scan(0u64, |cumulative, &count| {
                *cumulative += count;
                Some(*cumulative)
            })
            .position(|cumulative| cumulative >= target)
            .map_or(u8::MAX, |level| level as u8)
    }

    /// Width of the band holding the middle of the distribution, as a
    /// fraction of the full range. `tail` is cut from each end.
    #[must_use]
    pub fn spread(&self, tail: f64) -> f64 {
        let low = self.percentile(tail);
        let high = self.percentile(1.0 - tail);
        f64::from(high.saturating_sub(low)) / 255.0
    }

    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let sum: u64 = (0u64..).zip(self.bins).map(|(level, count)| level * count).sum();
        sum as f64 / self.total as f64
    }

    /// Fraction of pixels at or below `shadow` plus those at or above
    /// `highlight`.
    #[must_use]
    pub fn clipped(&self, shadow: u8, highlight: u8) -> f64 {
        self.fraction(..=usize::from(shadow)) + self.fraction(usize::from(highlight)..)
    }

    #[allow(clippy::cast_precision_loss)]
    fn fraction(&self, levels: impl RangeBounds<usize>) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let range = (levels.start_bound().cloned(), levels.end_bound().cloned());
        let count: u64 = self.bins[range].iter().sum();
        count as f64 / self.total as f64
    }
}
