//! Command codec
//!
//! Sends one encoded command over a [`Transport`] and collects the reply
//! lines. The only state it consults is whether the device echoes commands.

use super::{Command, Result, Transport};

/// Remove the device's echo of the command, if echo mode is on.
///
/// Exactly one line is discarded. An empty reply stays empty.
pub fn strip_echo(mut lines: Vec<String>, echo: bool) -> Vec<String> {
    if echo && !lines.is_empty() {
        lines.remove(0);
    }
    lines
}

/// Write `command` and return the reply with any echo removed
pub fn exchange<T: Transport + ?Sized>(
    transport: &mut T,
    command: &Command,
    echo: bool,
) -> Result<Vec<String>> {
    tracing::debug!(cmd = %command, "send");
    transport.write_all(&command.to_bytes())?;

    let lines = transport.read_lines()?;
    tracing::debug!(cmd = %command, rsp = ?lines, "recv");

    Ok(strip_echo(lines, echo))
}
