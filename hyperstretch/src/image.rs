//! Normalized image buffers.
//!
//! Every stage of the stretch works on [`NormalizedImage`]: interleaved `f32`
//! samples in `[0, 1]` with one (mono) or three (RGB) channels.

use strum_macros::Display;

use crate::error::{Error, Result};
use crate::parallel;

/// Source sample representation, as delivered by the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SampleFormat {
    /// 8-bit unsigned integer, full scale 255.
    UInt8,
    /// 16-bit unsigned integer, full scale 65535.
    UInt16,
    /// 32-bit unsigned integer, full scale 4294967295.
    UInt32,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// Complex 32-bit samples. Never accepted.
    Complex32,
    /// Complex 64-bit samples. Never accepted.
    Complex64,
}

impl SampleFormat {
    pub fn is_complex(self) -> bool {
        matches!(self, SampleFormat::Complex32 | SampleFormat::Complex64)
    }
}

/// Borrowed interleaved source samples in any supported representation.
#[derive(Debug, Clone, Copy)]
pub enum SourceSamples<'a> {
    UInt8(&'a [u8]),
    UInt16(&'a [u16]),
    UInt32(&'a [u32]),
    Float32(&'a [f32]),
    Float64(&'a [f64]),
    Complex32(&'a [[f32; 2]]),
    Complex64(&'a [[f64; 2]]),
}

impl SourceSamples<'_> {
    pub fn format(&self) -> SampleFormat {
        match self {
            SourceSamples::UInt8(_) => SampleFormat::UInt8,
            SourceSamples::UInt16(_) => SampleFormat::UInt16,
            SourceSamples::UInt32(_) => SampleFormat::UInt32,
            SourceSamples::Float32(_) => SampleFormat::Float32,
            SourceSamples::Float64(_) => SampleFormat::Float64,
            SourceSamples::Complex32(_) => SampleFormat::Complex32,
            SourceSamples::Complex64(_) => SampleFormat::Complex64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SourceSamples::UInt8(s) => s.len(),
            SourceSamples::UInt16(s) => s.len(),
            SourceSamples::UInt32(s) => s.len(),
            SourceSamples::Float32(s) => s.len(),
            SourceSamples::Float64(s) => s.len(),
            SourceSamples::Complex32(s) => s.len(),
            SourceSamples::Complex64(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Image dimensions: width, height, and number of channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ImageDimensions {
    /// Image width in pixels
    pub width: usize,
    /// Image height in pixels
    pub height: usize,
    /// Number of channels (1 for mono, 3 for RGB)
    pub channels: usize,
}

impl ImageDimensions {
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    /// Number of pixel locations (width * height).
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Total number of samples (width * height * channels).
    pub fn sample_count(&self) -> usize {
        self.pixel_count() * self.channels
    }

    pub fn is_mono(&self) -> bool {
        self.channels == 1
    }

    pub fn is_rgb(&self) -> bool {
        self.channels == 3
    }

    /// Same geometry with a different channel count.
    pub fn with_channels(&self, channels: usize) -> Self {
        Self { channels, ..*self }
    }

    fn check(&self, actual_len: usize) -> Result<()> {
        if !self.is_mono() && !self.is_rgb() {
            return Err(Error::UnsupportedChannelCount {
                channels: self.channels,
            });
        }
        if actual_len != self.sample_count() {
            return Err(Error::DimensionMismatch {
                expected: self.sample_count(),
                actual: actual_len,
            });
        }
        Ok(())
    }
}

/// Interleaved floating-point image with samples in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedImage {
    pixels: Vec<f32>,
    dimensions: ImageDimensions,
}

impl NormalizedImage {
    /// Convert host samples to a normalized image.
    ///
    /// Integers are divided by their full-scale value. Floats are taken as-is
    /// unless their maximum exceeds 1.1, in which case a 16-bit range is assumed
    /// below 100000 and a 32-bit range above. Non-finite and negative samples
    /// become 0, and the result is truncated to `[0, 1]`.
    pub fn from_samples(dimensions: ImageDimensions, samples: SourceSamples<'_>) -> Result<Self> {
        let format = samples.format();
        if format.is_complex() {
            return Err(Error::UnsupportedSampleFormat { format });
        }
        dimensions.check(samples.len())?;

        let pixels: Vec<f32> = match samples {
            SourceSamples::UInt8(s) => scale_integers(s, u8::MAX as f64),
            SourceSamples::UInt16(s) => scale_integers(s, u16::MAX as f64),
            SourceSamples::UInt32(s) => scale_integers(s, u32::MAX as f64),
            SourceSamples::Float32(s) => scale_floats(s.iter().map(|&v| v as f64)),
            SourceSamples::Float64(s) => scale_floats(s.iter().copied()),
            SourceSamples::Complex32(_) | SourceSamples::Complex64(_) => unreachable!(),
        };

        tracing::debug!(
            "Normalized {} input {}x{}x{}",
            format,
            dimensions.width,
            dimensions.height,
            dimensions.channels
        );

        let mut image = Self { pixels, dimensions };
        image.sanitize();
        Ok(image)
    }

    /// Wrap an owned buffer of `f32` samples, sanitizing it into `[0, 1]`.
    pub fn from_pixels(dimensions: ImageDimensions, pixels: Vec<f32>) -> Result<Self> {
        dimensions.check(pixels.len())?;
        let mut image = Self { pixels, dimensions };
        image.sanitize();
        Ok(image)
    }

    /// Image with every sample set to `value` (clamped into `[0, 1]`).
    pub fn filled(dimensions: ImageDimensions, value: f32) -> Self {
        assert!(
            dimensions.is_mono() || dimensions.is_rgb(),
            "Unsupported channel count: {}",
            dimensions.channels
        );
        Self {
            pixels: vec![value.clamp(0.0, 1.0); dimensions.sample_count()],
            dimensions,
        }
    }

    /// Wrap a buffer produced inside the crate without range sanitation.
    ///
    /// Used for intermediate buffers that are allowed to leave `[0, 1]`
    /// until the owning stage truncates them.
    pub(crate) fn from_raw(dimensions: ImageDimensions, pixels: Vec<f32>) -> Self {
        debug_assert_eq!(pixels.len(), dimensions.sample_count());
        Self { pixels, dimensions }
    }

    #[inline]
    pub fn dimensions(&self) -> ImageDimensions {
        self.dimensions
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.dimensions.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.dimensions.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.dimensions.channels
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.dimensions.pixel_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn is_rgb(&self) -> bool {
        self.dimensions.is_rgb()
    }

    #[inline]
    pub fn is_mono(&self) -> bool {
        self.dimensions.is_mono()
    }

    #[inline]
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [f32] {
        &mut self.pixels
    }

    #[inline]
    pub fn into_pixels(self) -> Vec<f32> {
        self.pixels
    }

    /// Sample at (x, y) in channel `c`.
    #[inline]
    pub fn sample(&self, x: usize, y: usize, c: usize) -> f32 {
        debug_assert!(x < self.width() && y < self.height() && c < self.channels());
        self.pixels[(y * self.width() + x) * self.channels() + c]
    }

    /// Iterate the samples of a single channel in pixel order.
    pub fn channel(&self, c: usize) -> impl Iterator<Item = f32> + '_ {
        debug_assert!(c < self.channels());
        self.pixels
            .iter()
            .skip(c)
            .step_by(self.channels())
            .copied()
    }

    /// Every `stride`-th pixel of channel `c`, collected for statistics.
    pub fn channel_subsample(&self, c: usize, stride: usize) -> Vec<f32> {
        debug_assert!(c < self.channels());
        let stride = stride.max(1);
        self.pixels
            .iter()
            .skip(c)
            .step_by(self.channels() * stride)
            .copied()
            .collect()
    }

    /// Apply `f` to every sample in place.
    pub fn map_in_place<F>(&mut self, f: F)
    where
        F: Fn(f32) -> f32 + Sync + Send,
    {
        parallel::map_in_place(&mut self.pixels, f);
    }

    /// Truncate every sample to `[0, 1]`.
    pub fn truncate(&mut self) {
        self.map_in_place(|v| v.clamp(0.0, 1.0));
    }

    fn sanitize(&mut self) {
        self.map_in_place(|v| {
            if v.is_finite() && v > 0.0 {
                v.min(1.0)
            } else {
                0.0
            }
        });
    }
}

fn scale_integers<T: Copy + Into<f64>>(samples: &[T], full_scale: f64) -> Vec<f32> {
    samples
        .iter()
        .map(|&v| (v.into() / full_scale) as f32)
        .collect()
}

fn scale_floats<I>(samples: I) -> Vec<f32>
where
    I: Iterator<Item = f64> + Clone,
{
    let max = samples
        .clone()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);

    let divisor = if max > 1.1 {
        if max < 100_000.0 {
            u16::MAX as f64
        } else {
            u32::MAX as f64
        }
    } else {
        1.0
    };

    samples.map(|v| (v / divisor) as f32).collect()
}
