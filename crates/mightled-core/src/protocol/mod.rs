//! Serial Protocol Communication
//!
//! Implements the Mightex Sirius ASCII line protocol for LED controller communication.
//!
//! Every operation is one command line (`VERB arg arg ...\r\n`) followed by a
//! multi-line textual reply collected until the transport read timeout expires.

pub mod codec;
pub mod commands;
mod config;
mod error;
pub mod response;
pub mod serial;
mod session;
mod settings;
pub mod transport;
pub mod validate;

pub use commands::{Command, Mode, Polarity};
pub use config::SessionConfig;
pub use error::{ProtocolError, Result};
pub use response::{NormalParams, ProfileStep, StrobeParams, TriggerParams};
pub use serial::{configure_port, open_port};
pub use session::LedController;
pub use settings::{ChannelSettings, DeviceSettings};
pub use transport::{SerialTransport, Transport};
pub use validate::RawValue;

/// Default baud rate of the controller's serial interface
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default timeout for responses in milliseconds
///
/// A reply is complete once the line has been quiet for this long.
pub const DEFAULT_TIMEOUT_MS: u64 = 100;

/// Response timeout used while the device writes its non-volatile memory
pub const STORE_TIMEOUT_MS: u64 = 2000;

/// Approximate time the device stays unresponsive after a soft reset
pub const RESET_SLEEP_MS: u64 = 4000;

/// Maximum drive current in milliamps
pub const MAX_CURRENT: u16 = 1000;

/// Maximum strobe repeat count
pub const MAX_REPEAT: u32 = 99_999_999;

/// Repeat count the device interprets as "repeat forever"
pub const REPEAT_FOREVER: u32 = 9999;

/// Number of addressable profile steps per channel and mode
pub const NUM_PROFILE_STEPS: u8 = 128;

/// Number of output channels on an SLC-XX04 controller
pub const NUM_CHANNELS: u8 = 4;
