//! SkyRoam - headless flight and possession demo.
//!
//! Loads `config.ron`, spawns a pilot beside a plane on a runway and plays a
//! scripted boarding, takeoff and bail-out through the fixed-tick loop,
//! logging telemetry as it goes.

mod config;
mod script;
mod session;

use anyhow::Result;
use config::SimConfig;
use engine_core::FrameClock;
use script::InputScript;
use session::Session;
use std::time::Duration;

/// Synthetic frame times, uneven on purpose so the fixed-step accumulator has work to do.
const FRAME_TIMES_MS: [u64; 3] = [12, 21, 17];

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if std::env::args().any(|a| a == "--write-default-config") {
        let path = config::config_path();
        SimConfig::default().save_to(&path)?;
        log::info!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = SimConfig::load();
    log::info!("Starting SkyRoam ({:?} flight model)", config.flight.mode);

    let mut session = Session::new(config, InputScript::demo_flight());
    let mut wall = FrameClock::new();
    let mut slowest = Duration::ZERO;
    let mut frame = 0usize;
    while !session.is_finished() {
        session.frame(Duration::from_millis(FRAME_TIMES_MS[frame % FRAME_TIMES_MS.len()]));
        slowest = slowest.max(wall.tick());
        frame += 1;
    }
    log::debug!(
        "{} frames in {:.3} s wall time, slowest {:.2} ms",
        frame,
        wall.elapsed_seconds(),
        slowest.as_secs_f64() * 1000.0
    );

    let stats = session.stats();
    let state = session.plane().state();
    log::info!(
        "Session over after {} ticks: {} boarding(s), {} exit(s), top speed {:.1} m/s, ceiling {:.1} m",
        stats.ticks,
        stats.entries,
        stats.exits,
        stats.max_airspeed,
        stats.max_altitude
    );
    log::info!(
        "Plane resting at {:?}, pilot {}",
        state.transform.position,
        if session.plane().possession().is_possessed() { "aboard" } else { "on foot" }
    );
    Ok(())
}
