//! Protocol errors

use thiserror::Error;

/// Result type used throughout the protocol layer
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors that can occur while talking to the LED controller
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// A parameter was rejected before any command was sent
    #[error("Invalid {field} '{value}': must be {allowed}")]
    InvalidParameter {
        /// Name of the rejected argument
        field: &'static str,
        /// The value as supplied
        value: String,
        /// Description of the accepted values
        allowed: String,
    },

    /// The device reply could not be decoded
    #[error("Malformed response '{line}': {message}")]
    Protocol {
        /// The offending reply line
        line: String,
        /// What was wrong with it
        message: String,
    },

    /// The serial link failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Reading from or writing to the port failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ProtocolError {
    pub(crate) fn invalid(
        field: &'static str,
        value: impl ToString,
        allowed: impl Into<String>,
    ) -> Self {
        ProtocolError::InvalidParameter {
            field,
            value: value.to_string(),
            allowed: allowed.into(),
        }
    }

    pub(crate) fn malformed(line: &str, message: impl Into<String>) -> Self {
        ProtocolError::Protocol {
            line: line.to_string(),
            message: message.into(),
        }
    }

    /// True for failures raised before any wire traffic
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, ProtocolError::InvalidParameter { .. })
    }

    /// True for replies that could not be decoded
    pub fn is_protocol(&self) -> bool {
        matches!(self, ProtocolError::Protocol { .. })
    }

    /// True for failures of the underlying link
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ProtocolError::Transport(_) | ProtocolError::IoError(_)
        )
    }
}

impl From<serialport::Error> for ProtocolError {
    fn from(e: serialport::Error) -> Self {
        ProtocolError::Transport(e.to_string())
    }
}
