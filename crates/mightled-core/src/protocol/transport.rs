//! Byte transport abstraction
//!
//! The session only needs to write a command and read back the reply lines,
//! so the serial port sits behind [`Transport`] and tests can substitute a
//! scripted double.

use serialport::SerialPort;
use std::io::{self, Read, Write};
use std::time::Duration;

use super::{serial, ProtocolError, Result, SessionConfig};

/// Line oriented link to the controller
pub trait Transport {
    /// Write all bytes of one command
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;

    /// Read reply lines until the link goes quiet for the read timeout.
    ///
    /// Lines are returned without their `\r\n` terminator. An idle link
    /// yields an empty vector rather than an error.
    fn read_lines(&mut self) -> Result<Vec<String>>;

    /// Current read timeout
    fn timeout(&self) -> Duration;

    /// Change the read timeout
    fn set_timeout(&mut self, timeout: Duration) -> Result<()>;

    /// Release the link
    fn close(self) -> Result<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_all(bytes)
    }

    fn read_lines(&mut self) -> Result<Vec<String>> {
        (**self).read_lines()
    }

    fn timeout(&self) -> Duration {
        (**self).timeout()
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        (**self).set_timeout(timeout)
    }
}

/// Serial port wrapper implementing [`Transport`]
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Wrap an already configured port
    pub fn new(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }

    /// Open and configure the port named in `config`
    pub fn open(config: &SessionConfig) -> Result<Self> {
        Ok(Self::new(serial::open_port(config)?))
    }

    /// Name of the underlying port, if the OS reports one
    pub fn name(&self) -> Option<String> {
        self.port.name()
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        // Drop any stale reply so it cannot be read as the answer to this command
        serial::clear_buffers(self.port.as_mut())?;
        Write::write_all(&mut self.port, bytes)?;
        Write::flush(&mut self.port)?;
        Ok(())
    }

    fn read_lines(&mut self) -> Result<Vec<String>> {
        let mut received = Vec::new();
        let mut buffer = [0u8; 256];

        loop {
            match self.port.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => received.extend_from_slice(&buffer[..n]),
                Err(ref e) if e.kind() == io::ErrorKind::TimedOut => break,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ProtocolError::IoError(e)),
            }
        }

        Ok(split_lines(&received))
    }

    fn timeout(&self) -> Duration {
        self.port.as_ref().timeout()
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.port.as_mut().set_timeout(timeout)?;
        Ok(())
    }

    fn close(self) -> Result<()> {
        // serialport closes the handle on drop
        drop(self.port);
        Ok(())
    }
}

/// Split received bytes into lines, dropping `\n` / `\r\n` terminators.
/// A trailing fragment without terminator is kept.
pub fn split_lines(bytes: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(bytes);
    let mut lines: Vec<String> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
        .collect();
    // split() leaves an empty element after a final terminator
    if bytes.ends_with(b"\n") || bytes.is_empty() {
        lines.pop();
    }
    lines
}
