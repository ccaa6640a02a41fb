//! Builders for photos, analysis results and synthetic images.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma, RgbImage};
use photo_triage_core::domain::{AnalysisResult, Metrics, Photo, PhotoId, SourceRef, Upload};
use time::{Duration, OffsetDateTime};

/// Fixed reference time so built photos have reproducible timestamps.
pub const BASE_TIME: OffsetDateTime = time::macros::datetime!(2024-06-01 12:00 UTC);

/// Builder for [`AnalysisResult`] values.
///
/// Every metric defaults to the aggregate score.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisBuilder {
    metrics: Metrics,
    score: u8,
}

impl AnalysisBuilder {
    /// Starts a result whose metrics and aggregate all equal `score`.
    #[must_use]
    pub const fn scored(score: u8) -> Self {
        Self {
            metrics: Metrics {
                composition: score,
                sharpness: score,
                exposure: score,
                color_balance: score,
                subject_clarity: score,
            },
            score,
        }
    }

    /// Overrides the sharpness metric.
    #[must_use]
    pub const fn sharpness(mut self, value: u8) -> Self {
        self.metrics.sharpness = value;
        self
    }

    /// Overrides the exposure metric.
    #[must_use]
    pub const fn exposure(mut self, value: u8) -> Self {
        self.metrics.exposure = value;
        self
    }

    /// Overrides every metric.
    #[must_use]
    pub const fn metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Builds the result.
    ///
    /// # Panics
    ///
    /// Panics if a value exceeds 100.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn build(self) -> AnalysisResult {
        AnalysisResult::new(self.metrics, self.score).expect("scores within 0..=100")
    }
}

/// Builder for [`Photo`] records.
#[derive(Debug, Clone)]
pub struct PhotoBuilder {
    id: PhotoId,
    name: String,
    source: Option<SourceRef>,
    uploaded_at: OffsetDateTime,
    analysis: AnalysisBuilder,
}

impl PhotoBuilder {
    /// Starts a photo with the given identity, named `<id>.jpg`, scored 50.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            id: PhotoId::from(id),
            name: format!("{id}.jpg"),
            source: None,
            uploaded_at: BASE_TIME,
            analysis: AnalysisBuilder::scored(50),
        }
    }

    /// Sets the aggregate score (and every metric).
    #[must_use]
    pub const fn score(mut self, score: u8) -> Self {
        self.analysis = AnalysisBuilder::scored(score);
        self
    }

    /// Sets the full analysis.
    #[must_use]
    pub const fn analysis(mut self, analysis: AnalysisBuilder) -> Self {
        self.analysis = analysis;
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Sets the source handle. Defaults to `mem://<name>`.
    #[must_use]
    pub fn source(mut self, source: &str) -> Self {
        self.source = Some(SourceRef::new(source));
        self
    }

    /// Sets the upload time to [`BASE_TIME`] plus `minutes`.
    #[must_use]
    pub fn uploaded_minutes_after_base(mut self, minutes: i64) -> Self {
        self.uploaded_at = BASE_TIME + Duration::minutes(minutes);
        self
    }

    /// Builds the photo.
    #[must_use]
    pub fn build(self) -> Photo {
        let source = self
            .source
            .unwrap_or_else(|| SourceRef::new(format!("mem://{}", self.name)));
        Photo::new(
            self.id,
            source,
            self.name,
            self.uploaded_at,
            self.analysis.build(),
        )
    }
}

/// Builds photos `p1..pN` with the given scores, one minute apart.
#[must_use]
pub fn photos_with_scores(scores: &[u8]) -> Vec<Photo> {
    scores
        .iter()
        .zip(1i64..)
        .map(|(&score, n)| {
            PhotoBuilder::new(&format!("p{n}"))
                .score(score)
                .uploaded_minutes_after_base(n)
                .build()
        })
        .collect()
}

/// Builder for creating synthetic test images.
///
/// Provides images with known characteristics (sharp, flat, dark, color
/// cast) and encodes them for upload.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    /// Creates a high-contrast checkerboard pattern (very sharp edges).
    #[must_use]
    pub fn checkerboard(width: u32, height: u32, cell_size: u32) -> DynamicImage {
        let cell = cell_size.max(1);
        let img = GrayImage::from_fn(width, height, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        DynamicImage::ImageLuma8(img)
    }

    /// Creates a uniform gray image (no edges at all).
    #[must_use]
    pub fn uniform_gray(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([value])))
    }

    /// Creates a smooth horizontal gradient.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn horizontal_gradient(width: u32, height: u32) -> DynamicImage {
        let img = GrayImage::from_fn(width, height, |x, _| {
            let val = ((u32::from(u8::MAX) * x) / width.max(1)) as u8;
            Luma([val])
        });
        DynamicImage::ImageLuma8(img)
    }

    /// Creates a completely black image.
    #[must_use]
    pub fn underexposed(width: u32, height: u32) -> DynamicImage {
        Self::uniform_gray(width, height, 0)
    }

    /// Creates a completely white image.
    #[must_use]
    pub fn overexposed(width: u32, height: u32) -> DynamicImage {
        Self::uniform_gray(width, height, 255)
    }

    /// Creates a uniform RGB image.
    #[must_use]
    pub fn rgb_uniform(width: u32, height: u32, r: u8, g: u8, b: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([r, g, b])))
    }

    /// Creates an image with a sharp checkerboard center and flat gray edges.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn sharp_center_flat_edges(width: u32, height: u32) -> DynamicImage {
        let cx = (width / 2) as i32;
        let cy = (height / 2) as i32;
        let radius = (width.min(height) / 4) as i32;

        let img = GrayImage::from_fn(width, height, |x, y| {
            let dist = (x as i32 - cx).abs().max((y as i32 - cy).abs());
            if dist < radius {
                if (x / 4 + y / 4) % 2 == 0 {
                    Luma([255u8])
                } else {
                    Luma([0u8])
                }
            } else {
                Luma([128u8])
            }
        });
        DynamicImage::ImageLuma8(img)
    }

    /// Encodes an image as PNG.
    ///
    /// # Panics
    ///
    /// Panics if encoding fails.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("encode png");
        bytes
    }

    /// Wraps an encoded image as an upload named `name`.
    #[must_use]
    pub fn upload(name: &str, image: &DynamicImage) -> Upload {
        Upload::new(
            SourceRef::new(format!("mem://{name}")),
            name,
            Self::png_bytes(image),
        )
    }
}

/// Creates an upload carrying arbitrary bytes, not necessarily an image.
#[must_use]
pub fn raw_upload(name: &str, bytes: &[u8]) -> Upload {
    Upload::new(SourceRef::new(format!("mem://{name}")), name, bytes.to_vec())
}
