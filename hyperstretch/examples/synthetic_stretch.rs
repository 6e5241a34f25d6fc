//! Example: Stretch a synthetic star field
//!
//! Generates a linear RGB star field, runs the stretch pipeline with a config
//! file or with both built-in presets, and logs the run diagnostics.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example synthetic_stretch
//! cargo run --example synthetic_stretch -- stretch.yaml
//! ```
//!
//! A minimal config file:
//! ```yaml
//! log_d: 2.5
//! anchor: statistical
//! mode:
//!   kind: scientific
//!   color_grip: 0.8
//!   shadow_convergence: 1.0
//!   linear_expansion: 0.3
//! ```

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use common::log_setup::{LogConfig, setup_logging};
use hyperstretch::{
    Config, NormalizedImage, ProgressCallback, SensorCategory, SensorProfileTable,
    StretchPipeline, StretchProgress, synthetic,
};
use strum::IntoEnumIterator;

fn main() -> anyhow::Result<()> {
    setup_logging(&LogConfig::new("synthetic_stretch", "info").console_only());

    let configs = match std::env::args().nth(1) {
        Some(path) => vec![Config::load(&path).with_context(|| format!("loading {path}"))?],
        None => vec![Config::ready_to_use(), Config::scientific()],
    };

    let image = synthetic::field_builder(1200, 800)
        .rgb()
        .star_count(300)
        .gradient(0.015)
        .hot_pixels(4)
        .seed(2024)
        .build();
    tracing::info!(
        width = image.width(),
        height = image.height(),
        channels = image.channels(),
        "Generated star field"
    );

    let table = SensorProfileTable::builtin();
    for category in SensorCategory::iter() {
        let names: Vec<&str> = table
            .in_category(category)
            .map(|(_, p)| p.name.as_str())
            .collect();
        tracing::debug!("{} profiles: {}", category, names.join(", "));
    }

    for config in configs {
        run(config, &table, &image)?;
    }

    Ok(())
}

fn run(config: Config, table: &SensorProfileTable, image: &NormalizedImage) -> anyhow::Result<()> {
    let pipeline = StretchPipeline::new(config, table)?.with_progress(ProgressCallback::new(
        Arc::new(|p: StretchProgress| {
            tracing::info!("[{}/{}] {}", p.current, p.total, p.stage);
        }),
    ));

    let suggested = pipeline.solve_log_d(image);
    let pressure = pipeline.star_pressure(image);
    tracing::info!(suggested_log_d = suggested, star_pressure = pressure, "Scene analysis");

    tracing::info!("Running {} stretch", config.mode);
    let start = Instant::now();
    let result = pipeline.run(image)?;
    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        anchor = result.anchor,
        "Stretch finished"
    );

    if let Some(report) = result.output_scaling {
        tracing::info!(
            floor = report.floor,
            soft_ceiling = report.soft_ceiling,
            scale = report.scale,
            background = report.background,
            "Output scaling"
        );
    }
    if let Some(stats) = result.expansion {
        tracing::info!(
            low = stats.low,
            high = stats.high,
            clipped_low_pct = stats.percent_low(),
            clipped_high_pct = stats.percent_high(),
            "Linear expansion"
        );
    }

    Ok(())
}
