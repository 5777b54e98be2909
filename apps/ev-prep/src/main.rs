//! ev-prep: one batch run of the traffic-volume / EV-station preparation.
//!
//! Reads roads, traffic counts, and charging stations from the paths in
//! `PipelineConfig`, and writes `sorted_roads.csv`, `EV_data_capacity.csv`,
//! and `merged.csv` into the configured output directory.
//!
//! No flags.  If `ev-prep.json` exists in the working directory it replaces
//! the built-in defaults; any section it omits keeps its default.  Set
//! `RUST_LOG=info` (or `debug`) to see stage summaries.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use ev_core::PipelineConfig;
use ev_pipeline::Pipeline;

const CONFIG_FILE: &str = "ev-prep.json";

fn main() -> Result<()> {
    env_logger::init();

    let config_path = Path::new(CONFIG_FILE);
    let config = if config_path.exists() {
        info!("using configuration from {CONFIG_FILE}");
        PipelineConfig::load(config_path).with_context(|| format!("reading {CONFIG_FILE}"))?
    } else {
        PipelineConfig::default()
    };

    let t0 = Instant::now();
    let pipeline = Pipeline::new(config)?;
    let report = pipeline.run()?;
    report.log_summary();
    info!(
        "wrote output to {} in {:.2?}",
        pipeline.config().paths.output_dir.display(),
        t0.elapsed()
    );
    Ok(())
}
