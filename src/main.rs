//! # midi-serial-bridge
//!
//! Forwards MIDI to a serial device (an ESP32 running the MicroRack firmware,
//! for instance) at a fixed baud rate.
//!
//! By default a virtual MIDI port is created that appears in a DAW as a
//! destination. Anything sent to it is written to the serial port unchanged.
//!
//! # Usage
//!
//! ```bash
//! # Create a virtual port and forward to the ESP32
//! midi-serial-bridge /dev/ttyUSB0
//!
//! # Forward from an existing MIDI input instead
//! midi-serial-bridge /dev/ttyUSB0 --midi-port "MIDI Controller Name"
//!
//! # List MIDI inputs and serial ports
//! midi-serial-bridge --list
//! ```

use clap::{CommandFactory, Parser};
use microrack_bridge::listing::{format_midi_inputs, format_serial_ports};
use microrack_bridge::{Bridge, BridgeBuilder, BridgeConfig, IgnoreFilter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

/// Bridge USB MIDI to an ESP32 serial port
#[derive(Parser, Debug)]
#[command(name = "midi-serial-bridge")]
#[command(version)]
#[command(about = "Bridge USB MIDI to ESP32 serial port")]
#[command(long_about = None)]
struct Args {
    /// Serial port path (e.g. /dev/ttyUSB0)
    serial_port: Option<String>,

    /// Connect to an existing MIDI port instead of creating a virtual one
    #[arg(long, value_name = "NAME")]
    midi_port: Option<String>,

    /// Name of the virtual MIDI port to create
    #[arg(long, value_name = "NAME", conflicts_with = "midi_port")]
    virtual_name: Option<String>,

    /// List available MIDI input ports and serial ports
    #[arg(long)]
    list: bool,

    /// Serial baud rate [default: 115200]
    #[arg(long)]
    baud: Option<u32>,

    /// Load settings from a TOML file (command-line flags take precedence)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// MIDI message classes the driver should drop [default: active_sense]
    #[arg(long, value_name = "KIND")]
    ignore: Option<IgnoreFilter>,

    /// Sleep between queue drains, in milliseconds [default: 1]
    #[arg(long, value_name = "MS")]
    poll_interval_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_tracing(&args);

    if args.list {
        return list_ports();
    }

    let builder = match builder_from_args(&args) {
        Ok(builder) => builder,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if !builder.has_serial_port() {
        let _ = Args::command().print_help();
        println!("\nTip: run with --list to see available MIDI ports");
        return ExitCode::FAILURE;
    }

    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Loads the config file (if any) and layers command-line flags on top.
fn builder_from_args(args: &Args) -> microrack_bridge::Result<BridgeBuilder> {
    let base = match args.config {
        Some(ref path) => {
            info!("Loading config from {}", path.display());
            BridgeConfig::from_file(path)?
        }
        None => BridgeConfig::default(),
    };

    let mut builder = BridgeBuilder::from_config(base);
    if let Some(ref path) = args.serial_port {
        builder = builder.serial_port(path.as_str());
    }
    if let Some(baud) = args.baud {
        builder = builder.baud_rate(baud);
    }
    if let Some(ref name) = args.midi_port {
        builder = builder.midi_port(name.as_str());
    }
    if let Some(ref name) = args.virtual_name {
        builder = builder.virtual_port(name.as_str());
    }
    if let Some(filter) = args.ignore {
        builder = builder.ignore(filter);
    }
    if let Some(ms) = args.poll_interval_ms {
        builder = builder.poll_interval(Duration::from_millis(ms));
    }
    Ok(builder)
}

fn run(config: BridgeConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Installed before opening so a signal during startup still closes both ports
    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        handler_flag.store(false, Ordering::SeqCst);
    })?;

    let mut bridge = Bridge::open_with_running_flag(config, running)
        .map_err(|e| format!("Startup failed: {}", e))?;

    if bridge.is_virtual() {
        info!("Created virtual MIDI port: \"{}\"", bridge.midi_port_name());
        info!("Select this as a MIDI output in your DAW.");
    } else {
        info!("MIDI input: {}", bridge.midi_port_name());
    }
    info!(
        "Serial output: {} @ {} baud",
        bridge.serial_path(),
        bridge.baud_rate()
    );

    info!("Forwarding MIDI... (Ctrl+C to stop)");
    let result = bridge.run();

    bridge.close();
    info!("Stopped.");

    result?;
    Ok(())
}

fn list_ports() -> ExitCode {
    let mut status = ExitCode::SUCCESS;

    match microrack_bridge::midi::list_devices() {
        Ok(devices) => print!("{}", format_midi_inputs(&devices)),
        Err(e) => {
            error!("Cannot enumerate MIDI input ports: {}", e);
            status = ExitCode::FAILURE;
        }
    }

    println!();

    match microrack_bridge::serial::list_ports() {
        Ok(ports) => print!("{}", format_serial_ports(&ports)),
        Err(e) => {
            error!("Cannot enumerate serial ports: {}", e);
            status = ExitCode::FAILURE;
        }
    }

    status
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
