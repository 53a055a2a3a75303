//! Strobe mode demo
//!
//! Programs a two-step profile on one channel and starts it.
//!
//! Usage:
//!   cargo run --example strobe_mode -- [OPTIONS] [PORT]
//!
//! Options:
//!   --port PORT       Serial port (default: /dev/ttyUSB0)
//!   --chan N          Channel to drive (default: 1)
//!   --repeat N        Repeat count or "forever" (default: 20)

use mightled_core::protocol::{LedController, Mode, SessionConfig};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut config = SessionConfig::for_port("/dev/ttyUSB0");
    let mut chan = 1u8;
    let mut repeat = "20".to_string();

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
            "--repeat" | "-r" => {
                i += 1;
                if i < args.len() {
                    repeat = args[i].clone();
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

    let mut dev = LedController::open(config)?;

    // Max current in mA, repeat count
    dev.set_strobe_mode_params(chan, 1000, &repeat)?;

    // Step 0: 200mA for 50ms, step 1: 10mA for 70ms
    dev.set_strobe_mode_profile(chan, 0, 200, 50_000)?;
    dev.set_strobe_mode_profile(chan, 1, 10, 70_000)?;

    // Start the strobe output
    dev.set_mode(chan, Mode::Strobe)?;

    for (step, value) in dev.get_strobe_mode_profile(chan)?.iter().enumerate() {
        println!("step {}: iset {}mA, tset {}us", step, value.iset, value.tset);
    }

    dev.close()?;
    Ok(())
}
