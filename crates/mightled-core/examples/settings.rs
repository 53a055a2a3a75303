//! Settings report
//!
//! Prints every parameter of every channel, or dumps them as JSON.
//!
//! Usage:
//!   cargo run --example settings -- [OPTIONS] [PORT]
//!
//! Options:
//!   --port PORT       Serial port (default: /dev/ttyUSB0)
//!   --json            Print JSON instead of the text report
//!   --restore         Restore factory defaults first
//!   --store           With --restore, also persist the defaults

use mightled_core::protocol::{LedController, SessionConfig};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut config = SessionConfig::for_port("/dev/ttyUSB0");
    let mut json = false;
    let mut restore = false;
    let mut store = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                i += 1;
                if i < args.len() {
                    config.port_name = args[i].clone();
                }
            }
            "--json" => json = true,
            "--restore" => restore = true,
            "--store" => store = true,
            arg if !arg.starts_with('-') => {
                config.port_name = arg.to_string();
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
            }
        }
        i += 1;
    }

    let mut dev = LedController::open(config)?;

    if restore {
        println!("Restoring device to factory defaults");
        dev.restore_defaults(store)?;
    }

    let settings = dev.read_settings()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        println!();
        print!("{}", settings);
    }

    dev.close()?;
    Ok(())
}
