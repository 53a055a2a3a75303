//! Response parsing
//!
//! Decodes the text lines a query returns. Some firmware revisions prefix the
//! first field with `#` to mark the active entry; the marker is stripped
//! before integer parsing. Profile listings end with a terminator row that
//! repeats the last entry, which is removed here.

use serde::{Deserialize, Serialize};

use super::{Mode, Polarity, ProtocolError, Result, REPEAT_FOREVER};

/// Normal mode currents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalParams {
    /// Maximum allowed current in mA
    pub imax: u16,
    /// Working current in mA
    pub iset: u16,
}

/// Strobe mode parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrobeParams {
    /// Maximum allowed current in mA
    pub imax: u16,
    /// Number of profile repetitions (9999 = forever)
    pub repeat: u32,
}

impl StrobeParams {
    /// Check if the profile repeats indefinitely
    pub fn repeats_forever(&self) -> bool {
        self.repeat == REPEAT_FOREVER
    }
}

/// Trigger mode parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerParams {
    /// Maximum allowed current in mA
    pub imax: u16,
    /// Edge that starts the profile
    pub polarity: Polarity,
}

/// One step of a strobe or trigger profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStep {
    /// Set point current in mA
    pub iset: u16,
    /// Step duration in microseconds
    pub tset: u64,
}

impl From<(u16, u64)> for ProfileStep {
    fn from((iset, tset): (u16, u64)) -> Self {
        Self { iset, tset }
    }
}

fn first_line(lines: &[String]) -> Result<&str> {
    lines
        .first()
        .map(String::as_str)
        .ok_or_else(|| ProtocolError::malformed("", "empty response"))
}

fn strip_marker(token: &str) -> &str {
    token.strip_prefix('#').unwrap_or(token)
}

fn parse_field<T: std::str::FromStr>(line: &str, token: &str, name: &str) -> Result<T> {
    token
        .parse::<T>()
        .map_err(|_| ProtocolError::malformed(line, format!("{} '{}' is not a number", name, token)))
}

/// Split a line into exactly `count` whitespace separated tokens
fn tokens(line: &str, count: usize) -> Result<Vec<&str>> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != count {
        return Err(ProtocolError::malformed(
            line,
            format!("expected {} fields, found {}", count, parts.len()),
        ));
    }
    Ok(parts)
}

/// `?MODE` reply: the second token is the mode code
pub fn parse_mode(lines: &[String]) -> Result<Mode> {
    let line = first_line(lines)?;
    let parts: Vec<&str> = line.split_whitespace().collect();
    let token = parts
        .get(1)
        .ok_or_else(|| ProtocolError::malformed(line, "missing mode field"))?;
    let code: i64 = parse_field(line, strip_marker(token), "mode")?;
    Mode::from_code(code)
        .ok_or_else(|| ProtocolError::malformed(line, format!("unknown mode code {}", code)))
}

/// `?CURRENT` reply: the last two tokens are `imax` and `iset`
pub fn parse_normal_params(lines: &[String]) -> Result<NormalParams> {
    let line = first_line(lines)?;
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(ProtocolError::malformed(
            line,
            format!("expected at least 2 fields, found {}", parts.len()),
        ));
    }
    let n = parts.len();
    Ok(NormalParams {
        imax: parse_field(line, strip_marker(parts[n - 2]), "imax")?,
        iset: parse_field(line, parts[n - 1], "iset")?,
    })
}

/// `?STROBE` reply: `[#]imax repeat`
pub fn parse_strobe_params(lines: &[String]) -> Result<StrobeParams> {
    let line = first_line(lines)?;
    let parts = tokens(line, 2)?;
    Ok(StrobeParams {
        imax: parse_field(line, strip_marker(parts[0]), "imax")?,
        repeat: parse_field(line, parts[1], "repeat")?,
    })
}

/// `?TRIGGER` reply: `[#]imax polarity`
pub fn parse_trigger_params(lines: &[String]) -> Result<TriggerParams> {
    let line = first_line(lines)?;
    let parts = tokens(line, 2)?;
    let imax = parse_field(line, strip_marker(parts[0]), "imax")?;
    let code: i64 = parse_field(line, parts[1], "polarity")?;
    let polarity = Polarity::from_code(code)
        .ok_or_else(|| ProtocolError::malformed(line, format!("unknown polarity code {}", code)))?;
    Ok(TriggerParams { imax, polarity })
}

/// `?STRP` / `?TRIGP` reply: one `[#]iset tset` line per step plus a
/// terminator line, which is dropped.
pub fn parse_profile(lines: &[String]) -> Result<Vec<ProfileStep>> {
    let mut steps = lines
        .iter()
        .map(|line| -> Result<ProfileStep> {
            let parts = tokens(line, 2)?;
            Ok(ProfileStep {
                iset: parse_field(line, strip_marker(parts[0]), "iset")?,
                tset: parse_field(line, parts[1], "tset")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    if steps.pop().is_none() {
        return Err(ProtocolError::malformed("", "empty response"));
    }
    Ok(steps)
}

/// `DEVICEINFO` reply: the first line, right-trimmed
pub fn parse_device_info(lines: &[String]) -> Result<String> {
    Ok(first_line(lines)?.trim_end().to_string())
}
