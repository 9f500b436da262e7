//! Live viewer fed by the synthetic heating phantom.
//!
//! ```bash
//! cargo run --release -- [config.yaml]
//! ```
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context};
use log::{info, warn};

use rtthermometry::simulate::{spawn_source, HeatingPhantom};
use rtthermometry::{channel_display, run_viewer, spawn_engine, ThermometryConfig, ThermometryEngine};

fn load_config() -> ThermometryConfig {
    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        return ThermometryConfig::default();
    };
    match ThermometryConfig::load(&path) {
        Ok(cfg) => {
            info!("loaded configuration from {}", path.display());
            cfg
        }
        Err(e) => {
            warn!("{e}; using default configuration");
            ThermometryConfig::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = load_config();

    let (sink, rx) = channel_display();
    let engine = ThermometryEngine::from_config(&cfg, sink).context("creating engine")?;
    let (events, engine_thread) = spawn_engine(engine).context("starting engine thread")?;

    let phantom = HeatingPhantom::new(cfg.source.clone(), cfg.calibration)
        .context("creating phase source")?;
    let interval = Duration::from_millis(cfg.source.frame_interval_ms);
    let _source = spawn_source(events.clone(), phantom, interval).context("starting phase source")?;

    let ui_result = run_viewer(rx, events.clone(), cfg);

    // The source thread notices the closed queue on its next send.
    let _ = events.shutdown();
    if engine_thread.join().is_err() {
        warn!("engine thread panicked");
    }
    ui_result.map_err(|e| anyhow!("viewer failed: {e}"))
}
