//! Synthetic linear star fields for tests, benchmarks and demos.
//!
//! Fields are deterministic for a given seed: a sky background with an
//! optional gradient, Gaussian read noise, Gaussian-profile stars with a mild
//! per-star color tint, and optional isolated hot pixels.
//!
//! ```rust,ignore
//! use hyperstretch::synthetic;
//!
//! let image = synthetic::field_builder(512, 512)
//!     .rgb()
//!     .star_count(150)
//!     .hot_pixels(5)
//!     .seed(42)
//!     .build();
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::image::{ImageDimensions, NormalizedImage};

/// Configuration for star field generation.
#[derive(Debug, Clone)]
pub struct StarFieldConfig {
    pub width: usize,
    pub height: usize,
    /// 1 (mono) or 3 (RGB).
    pub channels: usize,
    /// Sky level in linear units.
    pub background_level: f32,
    /// Background increase from the left to the right edge.
    pub gradient: f32,
    /// Gaussian noise sigma.
    pub noise_sigma: f32,
    pub num_stars: usize,
    /// FWHM range (min, max) in pixels.
    pub fwhm_range: (f32, f32),
    /// Peak amplitude range above background.
    pub peak_range: (f32, f32),
    /// Maximum per-channel tint deviation for RGB stars.
    pub color_spread: f32,
    /// Number of isolated full-scale pixels.
    pub hot_pixels: usize,
    pub seed: u64,
}

impl Default for StarFieldConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            channels: 1,
            background_level: 0.02,
            gradient: 0.0,
            noise_sigma: 0.002,
            num_stars: 40,
            fwhm_range: (2.5, 4.0),
            peak_range: (0.02, 0.8),
            color_spread: 0.3,
            hot_pixels: 0,
            seed: 42,
        }
    }
}

/// Generate a star field from `config`.
pub fn generate_star_field(config: &StarFieldConfig) -> NormalizedImage {
    let (w, h, ch) = (config.width, config.height, config.channels);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut pixels = vec![0.0f32; w * h * ch];

    // Background
    for y in 0..h {
        for x in 0..w {
            let level = config.background_level
                + config.gradient * x as f32 / (w.max(2) - 1) as f32;
            for c in 0..ch {
                pixels[(y * w + x) * ch + c] = level;
            }
        }
    }

    // Stars
    for _ in 0..config.num_stars {
        let cx = rng.random_range(0.0..w as f32);
        let cy = rng.random_range(0.0..h as f32);
        let fwhm = sample_range(&mut rng, config.fwhm_range);
        let peak = sample_range(&mut rng, config.peak_range);
        let sigma = fwhm / 2.354_82;
        let tint: [f32; 3] = if ch == 3 {
            std::array::from_fn(|_| 1.0 + rng.random_range(-1.0..=1.0) * config.color_spread)
        } else {
            [1.0; 3]
        };
        render_gaussian(&mut pixels, w, h, ch, (cx, cy), sigma, peak, &tint);
    }

    // Noise
    if config.noise_sigma > 0.0 {
        for v in &mut pixels {
            *v += gaussian(&mut rng) * config.noise_sigma;
        }
    }

    // Hot pixels
    for _ in 0..config.hot_pixels {
        let x = rng.random_range(0..w);
        let y = rng.random_range(0..h);
        let base = (y * w + x) * ch;
        pixels[base..base + ch].fill(1.0);
    }

    for v in &mut pixels {
        *v = v.clamp(0.0, 1.0);
    }

    NormalizedImage::from_raw(ImageDimensions::new(w, h, ch), pixels)
}

/// Start a builder for a `width` x `height` field.
pub fn field_builder(width: usize, height: usize) -> StarFieldBuilder {
    StarFieldBuilder::new(width, height)
}

/// Builder for customizing star field generation.
#[derive(Debug, Clone)]
pub struct StarFieldBuilder {
    config: StarFieldConfig,
}

impl StarFieldBuilder {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            config: StarFieldConfig {
                width,
                height,
                ..Default::default()
            },
        }
    }

    /// Generate three color channels instead of one.
    pub fn rgb(mut self) -> Self {
        self.config.channels = 3;
        self
    }

    pub fn star_count(mut self, count: usize) -> Self {
        self.config.num_stars = count;
        self
    }

    pub fn background(mut self, level: f32) -> Self {
        self.config.background_level = level;
        self
    }

    pub fn gradient(mut self, amount: f32) -> Self {
        self.config.gradient = amount;
        self
    }

    pub fn noise(mut self, sigma: f32) -> Self {
        self.config.noise_sigma = sigma;
        self
    }

    pub fn hot_pixels(mut self, count: usize) -> Self {
        self.config.hot_pixels = count;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn config(&self) -> &StarFieldConfig {
        &self.config
    }

    pub fn build(self) -> NormalizedImage {
        generate_star_field(&self.config)
    }
}

fn sample_range(rng: &mut StdRng, (min, max): (f32, f32)) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Standard normal sample via the Box-Muller transform.
fn gaussian(rng: &mut StdRng) -> f32 {
    let u1: f32 = rng.random_range(f32::EPSILON..1.0);
    let u2: f32 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos()
}

#[allow(clippy::too_many_arguments)]
fn render_gaussian(
    pixels: &mut [f32],
    width: usize,
    height: usize,
    channels: usize,
    (cx, cy): (f32, f32),
    sigma: f32,
    peak: f32,
    tint: &[f32; 3],
) {
    let radius = (sigma * 4.0).ceil() as isize;
    let inv_two_sigma_sq = 1.0 / (2.0 * sigma * sigma);
    let (ix, iy) = (cx as isize, cy as isize);

    for y in (iy - radius).max(0)..(iy + radius + 1).min(height as isize) {
        for x in (ix - radius).max(0)..(ix + radius + 1).min(width as isize) {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let value = peak * (-(dx * dx + dy * dy) * inv_two_sigma_sq).exp();
            let base = (y as usize * width + x as usize) * channels;
            for c in 0..channels {
                pixels[base + c] += value * tint[c];
            }
        }
    }
}
