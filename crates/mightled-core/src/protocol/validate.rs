//! Parameter validation
//!
//! One pure function per value kind. Each accepts a loosely typed
//! [`RawValue`] (an integer, a float, or text), normalizes it to an integer
//! and checks it against the controller's limits. Nothing here touches the
//! transport, so a rejected value never produces partial wire traffic.

use std::fmt;

use super::{
    Mode, Polarity, ProtocolError, Result, MAX_CURRENT, MAX_REPEAT, NUM_PROFILE_STEPS,
    REPEAT_FOREVER,
};

/// A parameter as supplied by a caller, before normalization
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue<'a> {
    /// Whole number
    Int(i64),
    /// Truncated toward zero
    Float(f64),
    /// Decimal integer text, surrounding whitespace ignored
    Text(&'a str),
}

impl fmt::Display for RawValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Int(v) => write!(f, "{}", v),
            RawValue::Float(v) => write!(f, "{}", v),
            RawValue::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! raw_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for RawValue<'_> {
            fn from(v: $t) -> Self {
                RawValue::Int(i64::from(v))
            }
        })*
    };
}

raw_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for RawValue<'_> {
    fn from(v: u64) -> Self {
        RawValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<usize> for RawValue<'_> {
    fn from(v: usize) -> Self {
        RawValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f32> for RawValue<'_> {
    fn from(v: f32) -> Self {
        RawValue::Float(f64::from(v))
    }
}

impl From<f64> for RawValue<'_> {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl<'a> From<&'a str> for RawValue<'a> {
    fn from(s: &'a str) -> Self {
        RawValue::Text(s)
    }
}

impl<'a> From<&'a String> for RawValue<'a> {
    fn from(s: &'a String) -> Self {
        RawValue::Text(s.as_str())
    }
}

impl RawValue<'_> {
    /// Coerce to an integer: floats truncate toward zero, text must be a
    /// decimal integer.
    fn to_int(self, field: &'static str) -> Result<i64> {
        match self {
            RawValue::Int(v) => Ok(v),
            RawValue::Float(v) if v.is_finite() => Ok(v.trunc() as i64),
            RawValue::Float(v) => Err(ProtocolError::invalid(field, v, "a finite number")),
            RawValue::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| ProtocolError::invalid(field, s, "an integer")),
        }
    }
}

fn in_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<i64> {
    if value < min || value > max {
        return Err(ProtocolError::invalid(
            field,
            value,
            format!("in range [{}, {}]", min, max),
        ));
    }
    Ok(value)
}

/// Drive current in milliamps, `[0, 1000]`
pub fn validate_current<'a>(value: impl Into<RawValue<'a>>) -> Result<u16> {
    let v = value.into().to_int("current")?;
    in_range("current", v, 0, MAX_CURRENT.into()).map(|v| v as u16)
}

/// Channel number, `[1, channel_count]`
pub fn validate_channel<'a>(value: impl Into<RawValue<'a>>, channel_count: u8) -> Result<u8> {
    let v = value.into().to_int("channel")?;
    in_range("channel", v, 1, channel_count.into()).map(|v| v as u8)
}

/// Strobe repeat count, `[1, 99_999_999]` or "forever" (9999)
pub fn validate_repeat<'a>(value: impl Into<RawValue<'a>>) -> Result<u32> {
    let raw = value.into();
    if let RawValue::Text(s) = raw {
        if s.trim().eq_ignore_ascii_case("forever") {
            return Ok(REPEAT_FOREVER);
        }
    }
    let v = raw.to_int("repeat")?;
    in_range("repeat", v, 1, MAX_REPEAT.into()).map(|v| v as u32)
}

/// Profile step index, `[0, 127]`
pub fn validate_step<'a>(value: impl Into<RawValue<'a>>) -> Result<u8> {
    let v = value.into().to_int("step")?;
    in_range("step", v, 0, i64::from(NUM_PROFILE_STEPS) - 1).map(|v| v as u8)
}

/// Profile step duration in microseconds, non-negative
pub fn validate_time<'a>(value: impl Into<RawValue<'a>>) -> Result<u64> {
    let v = value.into().to_int("time")?;
    in_range("time", v, 0, i64::MAX).map(|v| v as u64)
}

/// Trigger polarity name, case-insensitive
pub fn validate_polarity(value: &str) -> Result<Polarity> {
    match value.trim().to_ascii_lowercase().as_str() {
        "rising" => Ok(Polarity::Rising),
        "falling" => Ok(Polarity::Falling),
        _ => Err(ProtocolError::invalid(
            "polarity",
            value,
            "one of 'rising', 'falling'",
        )),
    }
}

/// Channel mode name
pub fn validate_mode(value: &str) -> Result<Mode> {
    Mode::ALL
        .into_iter()
        .find(|m| m.name() == value)
        .ok_or_else(|| {
            ProtocolError::invalid(
                "mode",
                value,
                "one of 'disable', 'normal', 'strobe', 'trigger'",
            )
        })
}
