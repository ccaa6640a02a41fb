//! Per-metric image measurements, each mapped onto `0..=100`.

use image::{DynamicImage, GrayImage, RgbImage};

use super::histogram::Histogram;

/// Longest edge analyzed. Larger images are downscaled first.
pub const MAX_EDGE: u32 = 512;

/// Laplacian variance that maps to a sharpness of 50.
const SHARPNESS_KNEE: f64 = 100.0;

/// Pixels at or below this are clipped shadows.
const SHADOW_CLIP_LEVEL: u8 = 8;
/// Pixels at or above this are blown highlights.
const HIGHLIGHT_CLIP_LEVEL: u8 = 247;

/// Decoded pixels prepared for measurement.
pub struct Frame {
    luma: GrayImage,
    rgb: RgbImage,
    gradient: Vec<f64>,
}

impl Frame {
    /// Prepares an image, downscaling it to at most [`MAX_EDGE`] pixels.
    #[must_use]
    pub fn new(image: &DynamicImage) -> Self {
        let image = if image.width().max(image.height()) > MAX_EDGE {
            image.thumbnail(MAX_EDGE, MAX_EDGE)
        } else {
            image.clone()
        };
        let luma = image.to_luma8();
        let gradient = gradient_magnitude(&luma);
        Self {
            rgb: image.to_rgb8(),
            luma,
            gradient,
        }
    }

    /// Sharpness from the variance of the Laplacian.
    #[must_use]
    pub fn sharpness(&self) -> u8 {
        let variance = laplacian_variance(&self.luma);
        to_score(variance / (variance + SHARPNESS_KNEE))
    }

    /// Exposure from mid-tone placement, tonal range and clipping.
    #[must_use]
    pub fn exposure(&self) -> u8 {
        let histogram = Histogram::from_luma(&self.luma);
        if histogram.total() == 0 {
            return 0;
        }
        let centered = 1.0 - (histogram.mean() - 127.5).abs() / 127.5;
        let range = histogram.spread(0.05);
        let clipped = histogram.clipped(SHADOW_CLIP_LEVEL, HIGHLIGHT_CLIP_LEVEL);

        to_score((0.6 * centered + 0.4 * range) * (1.0 - clipped))
    }

    /// Color balance from the spread between channel means.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn color_balance(&self) -> u8 {
        let pixels = u64::from(self.rgb.width()) * u64::from(self.rgb.height());
        if pixels == 0 {
            return 0;
        }
        let mut sums = [0u64; 3];
        for pixel in self.rgb.pixels() {
            for (sum, &channel) in sums.iter_mut().zip(pixel.0.iter()) {
                *sum += u64::from(channel);
            }
        }
        let means = sums.map(|s| s as f64 / pixels as f64);
        let max = means.iter().copied().fold(f64::MIN, f64::max);
        let min = means.iter().copied().fold(f64::MAX, f64::min);

        to_score(1.0 - (max - min) / 255.0)
    }

    /// Composition from how much edge energy sits near the rule-of-thirds lines.
    ///
    /// An image whose edges are spread evenly scores 50.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn composition(&self) -> u8 {
        let (width, height) = self.luma.dimensions();
        let band_x = (width / 12).max(1);
        let band_y = (height / 12).max(1);
        let thirds_x = [width / 3, 2 * width / 3];
        let thirds_y = [height / 3, 2 * height / 3];
        let near = |v: u32, lines: &[u32; 2], band: u32| lines.iter().any(|&l| v.abs_diff(l) < band);

        let mut total = 0.0;
        let mut on_thirds = 0.0;
        let mut thirds_pixels = 0u64;
        for (i, &energy) in self.gradient.iter().enumerate() {
            let x = u32::try_from(i).map_or(0, |i| i % width.max(1));
            let y = u32::try_from(i).map_or(0, |i| i / width.max(1));
            total += energy;
            if near(x, &thirds_x, band_x) || near(y, &thirds_y, band_y) {
                on_thirds += energy;
                thirds_pixels += 1;
            }
        }
        if total <= 0.0 || thirds_pixels == 0 {
            return 0;
        }

        let area_share = thirds_pixels as f64 / self.gradient.len() as f64;
        let ratio = (on_thirds / total) / area_share;
        to_score(ratio / (ratio + 1.0))
    }

    /// Subject clarity from edge energy in the center half against the border.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn subject_clarity(&self) -> u8 {
        let (width, height) = self.luma.dimensions();
        let (x0, x1) = (width / 4, width - width / 4);
        let (y0, y1) = (height / 4, height - height / 4);

        let (mut center, mut center_n, mut border, mut border_n) = (0.0, 0u64, 0.0, 0u64);
        for (i, &energy) in self.gradient.iter().enumerate() {
            let x = u32::try_from(i).map_or(0, |i| i % width.max(1));
            let y = u32::try_from(i).map_or(0, |i| i / width.max(1));
            if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
                center += energy;
                center_n += 1;
            } else {
                border += energy;
                border_n += 1;
            }
        }

        let center_mean = if center_n == 0 { 0.0 } else { center / center_n as f64 };
        let border_mean = if border_n == 0 { 0.0 } else { border / border_n as f64 };
        if center_mean + border_mean <= 0.0 {
            return 0;
        }
        to_score(center_mean / (center_mean + border_mean))
    }
}

/// Central-difference gradient magnitude per pixel; zero on the border.
fn gradient_magnitude(luma: &GrayImage) -> Vec<f64> {
    let (width, height) = luma.dimensions();
    let at = |x: u32, y: u32| f64::from(luma.get_pixel(x, y).0[0]);
    let mut out = Vec::with_capacity((width as usize) * (height as usize));
    for y in 0..height {
        for x in 0..width {
            if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                out.push(0.0);
                continue;
            }
            let gx = at(x + 1, y) - at(x - 1, y);
            let gy = at(x, y + 1) - at(x, y - 1);
            out.push(gx.abs() + gy.abs());
        }
    }
    out
}

#[allow(clippy::cast_precision_loss)]
fn laplacian_variance(luma: &GrayImage) -> f64 {
    let (width, height) = luma.dimensions();
    if width < 3 || height < 3 {
        return 0.0;
    }
    let at = |x: u32, y: u32| f64::from(luma.get_pixel(x, y).0[0]);

    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    let mut n = 0u64;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let lap = 4.0 * at(x, y) - at(x - 1, y) - at(x + 1, y) - at(x, y - 1) - at(x, y + 1);
            sum += lap;
            sum_sq += lap * lap;
            n += 1;
        }
    }
    let mean = sum / n as f64;
    (sum_sq / n as f64 - mean * mean).max(0.0)
}

/// Maps a fraction onto `0..=100`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_score(fraction: f64) -> u8 {
    if fraction.is_nan() {
        return 0;
    }
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    fn gray(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([value])))
    }

    fn checkerboard(size: u32, cell: u32) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_fn(size, size, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Luma([255])
            } else {
                Luma([0])
            }
        }))
    }

    #[test]
    fn test_to_score_bounds() {
        assert_eq!(to_score(-1.0), 0);
        assert_eq!(to_score(0.5), 50);
        assert_eq!(to_score(0.996), 100);
        assert_eq!(to_score(2.0), 100);
        assert_eq!(to_score(f64::NAN), 0);
    }

    #[test]
    fn test_flat_image_has_no_sharpness() {
        let frame = Frame::new(&gray(64, 64, 128));
        assert_eq!(frame.sharpness(), 0);
        assert_eq!(frame.composition(), 0);
        assert_eq!(frame.subject_clarity(), 0);
    }

    #[test]
    fn test_checkerboard_is_sharp() {
        assert!(Frame::new(&checkerboard(64, 4)).sharpness() > 90);
    }

    #[test]
    fn test_clipped_exposure() {
        assert_eq!(Frame::new(&gray(32, 32, 0)).exposure(), 0);
        assert_eq!(Frame::new(&gray(32, 32, 255)).exposure(), 0);
        assert!(Frame::new(&gray(32, 32, 128)).exposure() >= 59);
    }

    #[test]
    fn test_color_cast() {
        let neutral = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([90, 90, 90])));
        let red = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([255, 0, 0])));
        assert_eq!(Frame::new(&neutral).color_balance(), 100);
        assert_eq!(Frame::new(&red).color_balance(), 0);
    }

    #[test]
    fn test_large_images_are_downscaled() {
        let frame = Frame::new(&gray(2048, 1024, 100));
        assert_eq!(frame.luma.dimensions(), (512, 256));
    }
}
