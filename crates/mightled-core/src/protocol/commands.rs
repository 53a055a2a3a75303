//! Protocol commands
//!
//! Defines the commands supported by the Sirius SLC ASCII protocol and how
//! each one is rendered as a wire line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{validate, ProtocolError};

/// Channel working mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Output off
    #[serde(rename = "disable")]
    Disabled,
    /// Constant current
    Normal,
    /// Free-running current profile
    Strobe,
    /// Current profile started by an external trigger edge
    Trigger,
}

impl Mode {
    /// All modes, in wire-code order
    pub const ALL: [Mode; 4] = [Mode::Disabled, Mode::Normal, Mode::Strobe, Mode::Trigger];

    /// Integer code used on the wire
    pub fn code(self) -> u8 {
        match self {
            Mode::Disabled => 0,
            Mode::Normal => 1,
            Mode::Strobe => 2,
            Mode::Trigger => 3,
        }
    }

    /// Inverse of [`Mode::code`]
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|m| i64::from(m.code()) == code)
    }

    /// Name accepted by [`validate::validate_mode`]
    pub fn name(self) -> &'static str {
        match self {
            Mode::Disabled => "disable",
            Mode::Normal => "normal",
            Mode::Strobe => "strobe",
            Mode::Trigger => "trigger",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate::validate_mode(s)
    }
}

/// Trigger input edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Low to high transition
    Rising,
    /// High to low transition
    Falling,
}

impl Polarity {
    /// Integer code used on the wire
    pub fn code(self) -> u8 {
        match self {
            Polarity::Rising => 0,
            Polarity::Falling => 1,
        }
    }

    /// Inverse of [`Polarity::code`]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Polarity::Rising),
            1 => Some(Polarity::Falling),
            _ => None,
        }
    }

    /// Name accepted by [`validate::validate_polarity`]
    pub fn name(self) -> &'static str {
        match self {
            Polarity::Rising => "rising",
            Polarity::Falling => "falling",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Polarity {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate::validate_polarity(s)
    }
}

/// A single controller command with already validated arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `MODE chan mode`
    SetMode { channel: u8, mode: Mode },
    /// `?MODE chan`
    GetMode { channel: u8 },
    /// `NORMAL chan imax iset`
    SetNormal { channel: u8, imax: u16, iset: u16 },
    /// `CURRENT chan iset`
    SetCurrent { channel: u8, iset: u16 },
    /// `?CURRENT chan`
    GetCurrent { channel: u8 },
    /// `STROBE chan imax repeat`
    SetStrobe { channel: u8, imax: u16, repeat: u32 },
    /// `STRP chan step iset tset`
    SetStrobeProfile {
        channel: u8,
        step: u8,
        iset: u16,
        tset: u64,
    },
    /// `?STROBE chan`
    GetStrobe { channel: u8 },
    /// `?STRP chan`
    GetStrobeProfile { channel: u8 },
    /// `TRIGGER chan imax polarity`
    SetTrigger {
        channel: u8,
        imax: u16,
        polarity: Polarity,
    },
    /// `TRIGP chan step iset tset`
    SetTriggerProfile {
        channel: u8,
        step: u8,
        iset: u16,
        tset: u64,
    },
    /// `?TRIGGER chan`
    GetTrigger { channel: u8 },
    /// `?TRIGP chan`
    GetTriggerProfile { channel: u8 },
    /// Soft reset
    Reset,
    /// Restore factory defaults (not persisted)
    RestoreDefaults,
    /// Persist current settings to non-volatile memory
    Store,
    /// Device type, firmware version and serial number
    DeviceInfo,
    /// Device repeats every command line before its reply
    EchoOn,
    /// Device sends only the reply
    EchoOff,
}

impl Command {
    /// Verb token that starts the wire line
    pub fn verb(&self) -> &'static str {
        match self {
            Command::SetMode { .. } => "MODE",
            Command::GetMode { .. } => "?MODE",
            Command::SetNormal { .. } => "NORMAL",
            Command::SetCurrent { .. } => "CURRENT",
            Command::GetCurrent { .. } => "?CURRENT",
            Command::SetStrobe { .. } => "STROBE",
            Command::SetStrobeProfile { .. } => "STRP",
            Command::GetStrobe { .. } => "?STROBE",
            Command::GetStrobeProfile { .. } => "?STRP",
            Command::SetTrigger { .. } => "TRIGGER",
            Command::SetTriggerProfile { .. } => "TRIGP",
            Command::GetTrigger { .. } => "?TRIGGER",
            Command::GetTriggerProfile { .. } => "?TRIGP",
            // Lower-case on purpose; the firmware matches it verbatim.
            Command::Reset => "Reset",
            Command::RestoreDefaults => "RESTOREDEF",
            Command::Store => "STORE",
            Command::DeviceInfo => "DEVICEINFO",
            Command::EchoOn => "ECHOON",
            Command::EchoOff => "ECHOOFF",
        }
    }

    /// Ordered numeric arguments following the verb
    pub fn args(&self) -> Vec<u64> {
        match *self {
            Command::SetMode { channel, mode } => vec![channel.into(), mode.code().into()],
            Command::GetMode { channel }
            | Command::GetCurrent { channel }
            | Command::GetStrobe { channel }
            | Command::GetStrobeProfile { channel }
            | Command::GetTrigger { channel }
            | Command::GetTriggerProfile { channel } => vec![channel.into()],
            Command::SetNormal {
                channel,
                imax,
                iset,
            } => vec![channel.into(), imax.into(), iset.into()],
            Command::SetCurrent { channel, iset } => vec![channel.into(), iset.into()],
            Command::SetStrobe {
                channel,
                imax,
                repeat,
            } => vec![channel.into(), imax.into(), repeat.into()],
            Command::SetStrobeProfile {
                channel,
                step,
                iset,
                tset,
            }
            | Command::SetTriggerProfile {
                channel,
                step,
                iset,
                tset,
            } => vec![channel.into(), step.into(), iset.into(), tset],
            Command::SetTrigger {
                channel,
                imax,
                polarity,
            } => vec![channel.into(), imax.into(), polarity.code().into()],
            Command::Reset
            | Command::RestoreDefaults
            | Command::Store
            | Command::DeviceInfo
            | Command::EchoOn
            | Command::EchoOff => Vec::new(),
        }
    }

    /// Check if this is a `?` query
    pub fn is_query(&self) -> bool {
        self.verb().starts_with('?')
    }

    /// Render the command line without terminator
    pub fn to_line(&self) -> String {
        let mut line = self.verb().to_string();
        for arg in self.args() {
            line.push(' ');
            line.push_str(&arg.to_string());
        }
        line
    }

    /// Convert command to bytes, appending CR-LF for transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.to_line().into_bytes();
        bytes.extend_from_slice(b"\r\n");
        bytes
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_mode_bytes() {
        let cmd = Command::SetMode {
            channel: 1,
            mode: Mode::Strobe,
        };
        assert_eq!(cmd.to_bytes(), b"MODE 1 2\r\n".to_vec());
    }

    #[test]
    fn test_profile_argument_order() {
        let cmd = Command::SetTriggerProfile {
            channel: 3,
            step: 1,
            iset: 400,
            tset: 100_000,
        };
        assert_eq!(cmd.to_line(), "TRIGP 3 1 400 100000");
    }

    #[test]
    fn test_trigger_polarity_code() {
        let cmd = Command::SetTrigger {
            channel: 2,
            imax: 800,
            polarity: Polarity::Falling,
        };
        assert_eq!(cmd.to_line(), "TRIGGER 2 800 1");
    }

    #[test]
    fn test_queries_take_only_channel() {
        let cmd = Command::GetStrobeProfile { channel: 4 };
        assert!(cmd.is_query());
        assert_eq!(cmd.to_line(), "?STRP 4");
        assert!(!Command::Store.is_query());
    }

    #[test]
    fn test_bare_verbs() {
        assert_eq!(Command::Reset.to_bytes(), b"Reset\r\n".to_vec());
        assert_eq!(Command::RestoreDefaults.to_line(), "RESTOREDEF");
        assert_eq!(Command::EchoOff.to_line(), "ECHOOFF");
    }

    #[test]
    fn test_mode_codes_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_code(mode.code().into()), Some(mode));
        }
        assert_eq!(Mode::from_code(7), None);
    }

    #[test]
    fn test_mode_serde_names() {
        let json = serde_json::to_string(&Mode::Disabled).unwrap();
        assert_eq!(json, "\"disable\"");
        let mode: Mode = serde_json::from_str("\"trigger\"").unwrap();
        assert_eq!(mode, Mode::Trigger);
    }
}
