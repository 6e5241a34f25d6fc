//! Numerical kernels: order statistics, dispersion, and histograms.

pub mod histogram;
pub mod statistics;
