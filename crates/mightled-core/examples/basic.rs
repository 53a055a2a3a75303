//! Normal mode demo
//!
//! Steps the output current of one channel through a few set points.
//!
//! Usage:
//!   cargo run --example basic -- [OPTIONS] [PORT]
//!
//! Options:
//!   --port PORT       Serial port (default: /dev/ttyUSB0)
//!   --chan N          Channel to drive (default: 1)
//!   --config FILE     Load session settings from a JSON file

use mightled_core::protocol::{LedController, Mode, SessionConfig};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut config = SessionConfig::for_port("/dev/ttyUSB0");
    let mut chan = 1u8;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                i += 1;
                if i < args.len() {
                    config.port_name = args[i].clone();
                }
            }
            "--chan" | "-c" => {
                i += 1;
                if i < args.len() {
                    chan = args[i].parse().unwrap_or(1);
                }
            }
            "--config" => {
                i += 1;
                if i < args.len() {
                    config = SessionConfig::from_file(&args[i])?;
                }
            }
            arg if !arg.starts_with('-') => {
                config.port_name = arg.to_string();
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
            }
        }
        i += 1;
    }

    // Maximum allowed current
    let imax = 1000;

    let mut dev = LedController::open(config)?;
    dev.set_normal_mode_params(chan, imax, 0)?;
    dev.set_mode(chan, Mode::Normal)?;

    for iset in [5, 50, 100, 300, 600] {
        println!("iset: {}mA", iset);
        dev.set_normal_mode_current(chan, iset)?;
        std::thread::sleep(Duration::from_secs(1));
    }

    dev.set_mode(chan, Mode::Disabled)?;
    dev.close()?;
    Ok(())
}
