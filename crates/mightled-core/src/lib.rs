//! # MightLED Core Library
//!
//! Driver for Mightex Sirius SLC-XXXX-S/U multi-channel LED current controllers.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - The ASCII command/response protocol (encoding, echo handling, reply parsing)
//! - Parameter validation against the controller's limits
//! - A serial transport with 9600 8N1 defaults
//! - Settings snapshots of every channel
//! - Duty-cycle brightness control on top of strobe mode
//!
//! ## Example
//!
//! ```rust,ignore
//! use mightled_core::protocol::{LedController, Mode, SessionConfig};
//!
//! let mut dev = LedController::open(SessionConfig::for_port("/dev/ttyUSB0"))?;
//!
//! // Two-step strobe profile on channel 1, repeated 20 times
//! dev.set_strobe_mode_params(1, 1000, 20)?;
//! dev.set_strobe_mode_profile(1, 0, 200, 50_000)?;
//! dev.set_strobe_mode_profile(1, 1, 10, 70_000)?;
//! dev.set_mode(1, Mode::Strobe)?;
//!
//! println!("{}", dev.read_settings()?);
//! dev.close()?;
//! ```

pub mod protocol;
pub mod pwm;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::protocol::{
        DeviceSettings, LedController, Mode, NormalParams, Polarity, ProfileStep, ProtocolError,
        SessionConfig, StrobeParams, Transport, TriggerParams,
    };
    pub use crate::pwm::PwmController;
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
