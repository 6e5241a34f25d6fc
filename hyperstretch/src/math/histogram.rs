//! Fixed-resolution histogram over the unit interval.

/// Number of bins used for black-point detection (16-bit resolution).
pub const HISTOGRAM_BINS: usize = 65_536;

/// Width of the box filter applied before peak detection.
pub const SMOOTHING_WIDTH: usize = 50;

/// Counts of samples over `[0, 1)` split into equally sized bins.
#[derive(Debug, Clone)]
pub struct UnitHistogram {
    counts: Vec<u32>,
}

impl UnitHistogram {
    /// Accumulate `samples` into `bins` bins.
    ///
    /// Samples are clipped to `[0, 1]`; a value of exactly 1.0 lands in the last bin.
    pub fn from_samples(samples: impl IntoIterator<Item = f32>, bins: usize) -> Self {
        assert!(bins > 0, "histogram needs at least one bin");

        let mut counts = vec![0u32; bins];
        let last = bins - 1;
        for v in samples {
            let v = v.clamp(0.0, 1.0) as f64;
            let idx = ((v * bins as f64) as usize).min(last);
            counts[idx] += 1;
        }
        Self { counts }
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Lower edge of bin `index` in the unit interval.
    pub fn bin_lower_edge(&self, index: usize) -> f64 {
        index as f64 / self.counts.len() as f64
    }

    /// Box-filtered histogram with zero padding.
    ///
    /// Output bin `i` is the mean of raw bins `[i - width/2, i + (width - 1) - width/2]`,
    /// out-of-range bins counting as zero. The output has the same length as the input.
    pub fn box_smoothed(&self, width: usize) -> Vec<f64> {
        let n = self.counts.len();
        let width = width.max(1);
        let before = width / 2;
        let after = width - 1 - before;

        // prefix[i] = sum of counts[..i]
        let mut prefix = Vec::with_capacity(n + 1);
        prefix.push(0u64);
        let mut acc = 0u64;
        for &c in &self.counts {
            acc += c as u64;
            prefix.push(acc);
        }

        let inv = 1.0 / width as f64;
        (0..n)
            .map(|i| {
                let lo = i.saturating_sub(before);
                let hi = (i + after + 1).min(n);
                (prefix[hi] - prefix[lo]) as f64 * inv
            })
            .collect()
    }
}
