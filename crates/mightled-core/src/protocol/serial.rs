//! Serial port handling
//!
//! Provides low-level serial port access for the LED controller.

use serialport::SerialPort;
use std::time::Duration;

use super::{ProtocolError, SessionConfig};

/// Open a serial port with the controller's line settings
pub fn open_port(config: &SessionConfig) -> Result<Box<dyn SerialPort>, ProtocolError> {
    let mut port = serialport::new(&config.port_name, config.baud_rate)
        .timeout(Duration::from_millis(config.timeout_ms))
        .open()
        .map_err(|e| {
            ProtocolError::Transport(format!("failed to open {}: {}", config.port_name, e))
        })?;
    configure_port(port.as_mut())?;
    Ok(port)
}

/// Configure a serial port for the controller
pub fn configure_port(port: &mut dyn SerialPort) -> Result<(), ProtocolError> {
    // Standard 8N1 configuration, no hardware or software flow control
    port.set_data_bits(serialport::DataBits::Eight)?;
    port.set_parity(serialport::Parity::None)?;
    port.set_stop_bits(serialport::StopBits::One)?;
    port.set_flow_control(serialport::FlowControl::None)?;
    Ok(())
}

/// Clear the serial port buffers
pub fn clear_buffers(port: &mut dyn SerialPort) -> Result<(), ProtocolError> {
    port.clear(serialport::ClearBuffer::All)?;
    Ok(())
}
