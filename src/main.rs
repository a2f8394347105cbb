//! # Five-Bar Teleop
//!
//! Drive a parallel 5-bar linkage, its rail and its gripper from a game-pad.
//!
//! Logs go to stderr (and optionally a daily file); stdout is left to the host
//! process.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fivebar_teleop::actuator::select::select_all;
use fivebar_teleop::config::{Config, LoggingConfig};
use fivebar_teleop::controller::gamepad::Gamepad;
use fivebar_teleop::controller::InputSampler;
use fivebar_teleop::kinematics::Workspace;
use fivebar_teleop::motion::{MotionController, MotionSettings, TickOutcome};

/// Configuration file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Number of ticks between status log messages
const LOG_INTERVAL_TICKS: u64 = 200;

/// File name prefix for the daily log file
const LOG_FILE_PREFIX: &str = "fivebar-teleop.log";

/// Main entry point
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration, then set up logging
///    - Open the game-pad, or continue with neutral input
///    - Select a backend for each actuator family
///    - Send the home pose
///
/// 2. **Main Loop**
///    - One control tick per `tick_ms`
///    - Log status every 200 ticks
///    - Stop on a `back` press or Ctrl+C
///
/// 3. **Shutdown**
///    - Release every actuator family, even if one fails
///
/// # Errors
///
/// Returns error only if the configuration cannot be loaded. Missing devices
/// are never fatal.
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let (config, source) = load_config()?;
    let _log_guard = init_logging(&config.logging);

    info!("Five-bar teleop v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {}", source);

    let mut sampler = match Gamepad::open(&config.controller.device_path) {
        Ok(pad) => {
            info!("Game-pad: {}", pad.device_path());
            InputSampler::new(Box::new(pad))
        }
        Err(e) => {
            warn!("No game-pad available, continuing with neutral input: {}", e);
            InputSampler::detached()
        }
    };

    let actuators = select_all(&config);
    let mut controller = MotionController::new(Workspace::default(), MotionSettings::from(&config), actuators);
    controller.sync_pose();

    let mut ticker = interval(Duration::from_millis(config.motion.tick_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut ctrl_c_armed = true;

    info!("Control loop running at {} ms per tick", config.motion.tick_ms);
    info!("Press back or Ctrl+C to exit");

    let mut ticks: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                ticks += 1;

                if controller.tick(&mut sampler) == TickOutcome::SessionEnd {
                    break;
                }

                if ticks % LOG_INTERVAL_TICKS == 0 {
                    let effector = controller.effector();
                    info!(
                        "Tick {}: effector ({:.3}, {:.3}), rail {:.3}",
                        ticks, effector.x, effector.y, controller.rail_position()
                    );
                }
            }

            result = &mut ctrl_c, if ctrl_c_armed => {
                match result {
                    Ok(()) => {
                        info!("Received Ctrl+C, shutting down...");
                        break;
                    }
                    Err(e) => {
                        warn!("Ctrl+C handler unavailable: {}", e);
                        ctrl_c_armed = false;
                    }
                }
            }
        }
    }

    let failures = controller.shutdown();
    if failures.is_empty() {
        info!("All actuators released after {} ticks", ticks);
    } else {
        warn!("{} actuator families failed to release", failures.len());
    }

    Ok(())
}

/// Load the configuration from the first CLI argument, the default file, or
/// built-in defaults, in that order
fn load_config() -> Result<(Config, String)> {
    if let Some(path) = std::env::args().nth(1) {
        let config = Config::load(&path).with_context(|| format!("Failed to load {}", path))?;
        return Ok((config, path));
    }

    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        let config = Config::load(DEFAULT_CONFIG_PATH)
            .with_context(|| format!("Failed to load {}", DEFAULT_CONFIG_PATH))?;
        return Ok((config, DEFAULT_CONFIG_PATH.to_string()));
    }

    Ok((Config::default(), "built-in defaults".to_string()))
}

/// Initialize logging to stderr, plus a daily file when `dir` is set
///
/// `RUST_LOG` overrides the configured level. The returned guard flushes the
/// file writer and must be held until exit.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = if config.dir.is_empty() {
        (None, None)
    } else {
        let appender = tracing_appender::rolling::daily(&config.dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_interval_constant() {
        assert_eq!(LOG_INTERVAL_TICKS, 200);

        // At the default 50 ms tick, 200 ticks = 10 seconds
        let seconds = LOG_INTERVAL_TICKS as f64 * 0.050;
        assert_eq!(seconds, 10.0);
    }

    #[test]
    fn test_default_config_file_is_valid() {
        let config = Config::load(DEFAULT_CONFIG_PATH).expect("config/default.toml should load");
        assert_eq!(config.motion.tick_ms, 50);
        assert_eq!(config.controller.deadzone, 0.10);
    }
}
