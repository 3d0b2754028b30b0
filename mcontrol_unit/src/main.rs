//! # mcontrol
//!
//! Command-line shell around the declination axis controller.
//!
//! Loads the axis configuration (built-in defaults when `--config` is not
//! given), attaches the simulation driver and runs one command:
//! - `position`: report raw, cooked and user angles
//! - `slew <USER_DEGREES>`: slew to an operator-scale angle
//! - `park`: slew to the configured park position
//!
//! Ctrl-C cancels a running slew and leaves the motor stopped.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use mcontrol_common::angle::UserAngle;
use mcontrol_common::config::ConfigError;
use mcontrol_hal::SimulatedAxis;
use mcontrol_unit::config::{LoadedConfig, load_config, load_default_configuration};
use mcontrol_unit::rt::rt_setup;
use mcontrol_unit::{CancelToken, Controller, SlewOutcome};
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// mcontrol: declination axis controller
#[derive(Parser, Debug)]
#[command(name = "mcontrol")]
#[command(version)]
#[command(about = "Slew a telescope declination axis with stall protection")]
struct Args {
    /// Axis configuration TOML. Built-in defaults when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// CPU core to pin the control thread to (with the `rt` feature).
    #[arg(long, default_value_t = 1)]
    cpu_core: usize,

    /// SCHED_FIFO priority (with the `rt` feature).
    #[arg(long, default_value_t = 80)]
    rt_priority: i32,

    /// Log at DEBUG regardless of `[shared].log_level`.
    #[arg(short, long)]
    verbose: bool,

    /// One JSON object per log line.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report the current axis position.
    Position,
    /// Slew to an operator-scale angle [deg].
    Slew {
        #[arg(allow_negative_numbers = true)]
        user_degrees: f64,
    },
    /// Slew to the park position.
    Park,
}

fn main() {
    let args = Args::parse();
    let loaded = match &args.config {
        Some(path) => load_config(path),
        None => load_default_configuration(),
    };
    let level = if args.verbose {
        Level::DEBUG
    } else {
        loaded
            .as_ref()
            .map_or(Level::INFO, |l| l.shared.log_level.as_tracing())
    };
    init_tracing(level, args.json);

    info!(version = env!("CARGO_PKG_VERSION"), "mcontrol starting");

    let result = loaded
        .map_err(|e: ConfigError| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|loaded| run(&args, loaded));
    if let Err(e) = result {
        error!("mcontrol aborted: {e}");
        process::exit(1);
    }
}

fn run(args: &Args, loaded: LoadedConfig) -> Result<(), Box<dyn std::error::Error>> {
    match &args.config {
        Some(path) => info!("Config loaded from {}", path.display()),
        None => warn!("No --config given, using built-in defaults"),
    }
    info!(
        "Axis '{}': forbidden arc [{}, {}], loop {:?}",
        loaded.shared.service_name,
        loaded.angles.minimum(),
        loaded.angles.maximum(),
        loaded.controller.loop_delay
    );

    let axis = SimulatedAxis::new(loaded.simulation.clone(), Arc::clone(&loaded.angles));
    let controller = Controller::new(
        loaded.controller.clone(),
        Arc::clone(&loaded.angles),
        axis.sensor(),
        axis.motor(),
        axis.clock(),
    )?;

    if let Command::Position = args.command {
        let raw = controller.raw_angle()?;
        let cooked = loaded.angles.cook(raw);
        let user = loaded.angles.to_user(cooked);
        info!("Position: {raw} | {cooked} | {user}");
        return Ok(());
    }

    rt_setup(args.cpu_core, args.rt_priority)?;
    debug!(cpu = args.cpu_core, priority = args.rt_priority, "control thread prepared");

    let cancel = CancelToken::new();
    let c = cancel.clone();
    ctrlc::set_handler(move || {
        warn!("interrupt received, cancelling slew");
        c.cancel();
    })?;

    let outcome = match args.command {
        Command::Slew { user_degrees } => {
            controller.slew_user(UserAngle::new(user_degrees), &cancel)?
        }
        Command::Park => controller.park(&cancel)?,
        Command::Position => return Ok(()),
    };

    match outcome {
        SlewOutcome::Arrived { position } => {
            info!(
                "Slew complete at {} ({})",
                position,
                loaded.angles.to_user(position)
            );
        }
        SlewOutcome::Cancelled { position } => {
            warn!("Slew cancelled at {position}");
        }
    }
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` directives win over `level`.
fn init_tracing(level: Level, json: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}
