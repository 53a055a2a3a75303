//! Duty-cycle brightness demo
//!
//! Ramps one channel from off to full brightness and back using the
//! strobe-mode PWM helper.
//!
//! Usage:
//!   cargo run --example pwm -- [OPTIONS] [PORT]
//!
//! Options:
//!   --port PORT       Serial port (default: /dev/ttyUSB0)
//!   --chan N          Channel to drive (default: 1)
//!   --freq HZ         Drive frequency (default: 1000)

use mightled_core::protocol::{SessionConfig, MAX_CURRENT, NUM_CHANNELS};
use mightled_core::pwm::{PwmController, DEFAULT_FREQ_HZ};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut config = SessionConfig::for_port("/dev/ttyUSB0");
    let mut chan = 1u8;
    let mut freq = DEFAULT_FREQ_HZ;

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
            "--freq" | "-f" => {
                i += 1;
                if i < args.len() {
                    freq = args[i].parse().unwrap_or(DEFAULT_FREQ_HZ);
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

    let iset = vec![MAX_CURRENT; usize::from(NUM_CHANNELS)];
    let mut pwm = PwmController::open(config, freq, iset)?;
    println!("period: {}us", pwm.period_us());

    pwm.enable(chan)?;
    let ramp = (0..=10).chain((0..10).rev());
    for step in ramp {
        let value = f64::from(step) / 10.0;
        println!("value: {:.1}", value);
        pwm.set_value(chan, value)?;
        std::thread::sleep(Duration::from_millis(200));
    }
    pwm.disable(chan)?;

    pwm.into_inner().close()?;
    Ok(())
}
