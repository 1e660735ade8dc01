// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SVT survey geometry dump.
//!
//! Builds the 2014 tracker from a detector configuration and writes one
//! placement per node, relative to the tracking volume, as JSON.
//!
//! # Environment
//!
//! - `SVT_CONFIG` - detector configuration JSON (nominal when unset)
//! - `SVT_OUTPUT` - output file (stdout when unset)
//! - `SVT_LOG_FORMAT` - `json` or `pretty`
//! - `SVT_LAYER_MASK` - enabled layers, bit `n - 1` for layer `n`
//! - `RUST_LOG` - log filter

use anyhow::Context;
use svt_survey_catalog::{build_tracker, DetectorConfig, Generation};
use svt_survey_tree::BuildConfig;

mod config;

use config::{Config, LogFormat};

fn init_tracing(format: LogFormat) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing(LogFormat::from_env());
    let config = Config::from_env();

    tracing::info!(
        detector_config = config.detector_config.as_deref().unwrap_or("nominal"),
        output = config.output.as_deref().unwrap_or("stdout"),
        layer_mask = config.layer_mask,
        log_format = ?config.log_format,
        "Starting SVT survey geometry build"
    );

    let detector = match &config.detector_config {
        Some(path) => DetectorConfig::from_path(path)
            .with_context(|| format!("loading detector configuration {path}"))?,
        None => DetectorConfig::nominal(),
    };
    let build = BuildConfig {
        layer_mask: config.layer_mask,
        ..BuildConfig::default()
    };

    let tracker = build_tracker(Generation::Tracker2014, &detector, &build)
        .context("building tracker geometry")?;
    let placements = tracker.placements().context("resolving placements")?;
    let json = serde_json::to_string_pretty(&placements).context("serializing placements")?;

    match &config.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {path}"))?;
        }
        None => println!("{json}"),
    }

    tracing::info!(
        nodes = tracker.tree.len(),
        bundles = tracker.bundles.len(),
        placements = placements.len(),
        "Wrote placements"
    );
    Ok(())
}
