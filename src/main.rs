//! # Joy Bridge
//!
//! Fly a camera quadcopter with an ordinary game controller.
//!
//! This application normalizes raw joystick input through a per-model
//! device profile and dispatches edge-triggered flight actions plus a
//! fixed-rate stick-output stream.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::{debug, info};

mod config;
mod error;
mod controller;
mod device;
mod vehicle;
mod control;

use config::Config;
use control::{ConsoleSink, PollLoop, VehicleSink};
use controller::profile::{select_profile, HostOs, KNOWN_MODELS};
use device::{list_devices, EvdevSource, InputSource};
use error::JoyBridgeError;
use vehicle::LoggingVehicle;

#[derive(Parser)]
#[command(name = "joy-bridge", version, about = "Fly a camera quadcopter with a game controller")]
struct Cli {
    /// Controller model (DualShock4, HotasX, EightBitDoSF30Pro, SteamController)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Index among detected controllers
    #[arg(short, long, global = true)]
    device: Option<usize>,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fly: stream stick output and execute vehicle actions (default)
    Run,
    /// Diagnostic mode: print transitions and stick values, never fly
    Test,
    /// List detected controllers
    List,
    /// Print the control mapping
    Mapping,
}

/// Main entry point for Joy Bridge
///
/// # Control Flow
///
/// 1. Initialize logging and parse the command line
/// 2. Resolve configuration (CLI overrides the config file)
/// 3. Select the device profile — unknown or missing model is fatal here,
///    before any device is opened
/// 4. Open the controller and run the poll loop in the requested mode
///
/// # Errors
///
/// Returns error if the model is missing/unknown, the config file is
/// invalid, or the controller cannot be opened.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::List => cmd_list(),
        Commands::Mapping => {
            print_control_mapping();
            Ok(())
        }
        Commands::Test => cmd_poll(&cli.model, cli.device, cli.config.as_deref(), true).await,
        Commands::Run => cmd_poll(&cli.model, cli.device, cli.config.as_deref(), false).await,
    }
}

/// Lists every detected controller with its axis and button counts.
fn cmd_list() -> Result<()> {
    let devices = list_devices()?;
    if devices.is_empty() {
        println!("No controllers detected");
        return Ok(());
    }
    for device in devices {
        println!(
            "Controller ID: {}: Name: {}, Axes: {}, Buttons: {}",
            device.id, device.name, device.axis_count, device.button_count
        );
    }
    Ok(())
}

/// Resolves configuration and runs the poll loop in one of the two modes.
async fn cmd_poll(
    model_flag: &Option<String>,
    device_flag: Option<usize>,
    config_path: Option<&std::path::Path>,
    diagnostic: bool,
) -> Result<()> {
    info!("Joy Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::load_or_default(config_path)?;

    let model = model_flag
        .clone()
        .or_else(|| config.controller.model.clone())
        .ok_or(JoyBridgeError::MissingModel)?;
    let device_id = device_flag.unwrap_or(config.controller.device);

    // Profile selection is fatal before any device is opened
    let profile = select_profile(&model, HostOs::current()).map_err(|e| {
        info!("known models: {}", KNOWN_MODELS.join(", "));
        e
    })?;
    info!("selected profile '{}'", profile.name());

    let source = EvdevSource::open(device_id)?;
    info!("controller '{}' ready at {}", source.name(), source.device_path());

    if diagnostic {
        let period = Duration::from_millis(config.control.diagnostic_period_ms);
        println!("Diagnostic mode: move sticks and press buttons; Ctrl+C to exit");
        PollLoop::new(source, ConsoleSink::new(), profile, period)
            .run()
            .await?;
    } else {
        let period = Duration::from_millis(config.control.update_period_ms);
        let (tx, mut rx) = mpsc::channel(config.output.queue_capacity);

        // Drain the stick stream so the loop's hand-off stays live.
        // TODO: hand this receiver to the UDP control-transmission task once
        // the transport lands
        tokio::spawn(async move {
            while let Some(sticks) = rx.recv().await {
                debug!("stick frame: {:?}", sticks);
            }
        });

        let sink = VehicleSink::new(Box::new(LoggingVehicle::new()), tx);
        PollLoop::new(source, sink, profile, period).run().await?;
    }

    Ok(())
}

/// Prints the fixed control mapping.
fn print_control_mapping() {
    print!(
        "Joy Bridge Control Mapping

Left Stick   Forward/Backward/Left/Right
Right Stick  Up/Down/Turn

Triangle     Takeoff
X            Land
Circle       Take Photo
Square       Throw takeoff / Palm land
L1           Slow flight mode
L2           Bounce (on/off)
R1           Fast flight mode
R2           Precision (hold for lower sensitivity, does not change flight speed mode)

D-Pad Left    Flip left
D-Pad Right   Flip right
D-Pad Up      Flip forward
D-Pad Down    Flip backward
(flips require a flip-capable controller profile)
"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_model_and_subcommand() {
        let cli = Cli::parse_from(["joy-bridge", "--model", "DualShock4", "test"]);
        assert_eq!(cli.model.as_deref(), Some("DualShock4"));
        assert!(matches!(cli.command, Some(Commands::Test)));
    }

    #[test]
    fn test_cli_defaults_to_run() {
        let cli = Cli::parse_from(["joy-bridge", "--model", "HotasX"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.device, None);
    }
}
