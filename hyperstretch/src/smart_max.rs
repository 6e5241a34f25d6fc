//! "Smart max": tells a genuine stellar core apart from an isolated hot pixel.
//!
//! A real star is spread by the PSF, so the pixels around its brightest sample
//! carry a sizeable fraction of the peak. A hot pixel stands alone.

use crate::image::NormalizedImage;

/// Neighbor brightness, relative to the peak, that marks a supported maximum.
pub const NEIGHBOR_SUPPORT_RATIO: f32 = 0.2;

/// Peaks at or below this level are too faint to classify.
pub const MIN_CLASSIFIABLE_PEAK: f32 = 0.001;

/// Location and neighborhood of the brightest sample of an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakAnalysis {
    pub max: f32,
    pub x: usize,
    pub y: usize,
    pub channel: usize,
    /// Brightest 3x3 neighbor (same channel) strictly below `max`, or 0.
    pub max_neighbor: f32,
}

impl PeakAnalysis {
    /// Analyze the first brightest sample of `image`. `None` for empty images.
    pub fn analyze(image: &NormalizedImage) -> Option<Self> {
        let (index, &max) = image
            .pixels()
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, &f32)>, (i, v)| match best {
                Some((_, b)) if *v <= *b => best,
                _ => Some((i, v)),
            })?;

        let channels = image.channels();
        let pixel = index / channels;
        let channel = index % channels;
        let (x, y) = (pixel % image.width(), pixel / image.width());

        let x0 = x.saturating_sub(1);
        let x1 = (x + 2).min(image.width());
        let y0 = y.saturating_sub(1);
        let y1 = (y + 2).min(image.height());

        let mut max_neighbor = 0.0f32;
        for ny in y0..y1 {
            for nx in x0..x1 {
                let v = image.sample(nx, ny, channel);
                if v < max {
                    max_neighbor = max_neighbor.max(v);
                }
            }
        }

        Some(Self {
            max,
            x,
            y,
            channel,
            max_neighbor,
        })
    }

    /// Bright enough that the neighbor test means something.
    #[inline]
    pub fn is_classifiable(&self) -> bool {
        self.max > MIN_CLASSIFIABLE_PEAK
    }

    /// Neighbors carry at least 20% of the peak.
    #[inline]
    pub fn has_neighbor_support(&self) -> bool {
        self.max_neighbor >= self.max * NEIGHBOR_SUPPORT_RATIO
    }

    /// Whether range expansion may use the absolute maximum as its high bound.
    ///
    /// Requires a classifiable, supported peak. Faint or isolated peaks fall
    /// back to statistical bounds.
    #[inline]
    pub fn use_absolute_max(&self) -> bool {
        self.is_classifiable() && self.has_neighbor_support()
    }

    /// Whether the maximum is a trustworthy physical ceiling for output scaling.
    ///
    /// Only a classifiable, isolated peak is rejected.
    #[inline]
    pub fn is_physical_ceiling(&self) -> bool {
        !self.is_classifiable() || self.has_neighbor_support()
    }
}
