//! Settings snapshot
//!
//! Reads every parameter of every channel into one serializable structure,
//! for reporting and for diffing a device against a known configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    LedController, Mode, NormalParams, ProfileStep, Result, StrobeParams, Transport,
    TriggerParams,
};

/// Parameters of one output channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSettings {
    /// Channel number, starting at 1
    pub channel: u8,
    /// Current working mode
    pub mode: Mode,
    /// Normal mode currents
    pub normal: NormalParams,
    /// Strobe mode parameters
    pub strobe: StrobeParams,
    /// Strobe profile without the terminator row
    pub strobe_profile: Vec<ProfileStep>,
    /// Trigger mode parameters
    pub trigger: TriggerParams,
    /// Trigger profile without the terminator row
    pub trigger_profile: Vec<ProfileStep>,
}

/// Device identification plus all channel parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// `DEVICEINFO` reply
    pub device_info: String,
    /// One entry per channel, in channel order
    pub channels: Vec<ChannelSettings>,
}

impl<T: Transport> LedController<T> {
    /// Query device info and all parameters of every channel
    pub fn read_settings(&mut self) -> Result<DeviceSettings> {
        let device_info = self.device_info()?;
        let mut channels = Vec::with_capacity(self.num_channels().into());
        for channel in 1..=self.num_channels() {
            channels.push(ChannelSettings {
                channel,
                mode: self.get_mode(channel)?,
                normal: self.get_normal_mode_params(channel)?,
                strobe: self.get_strobe_mode_params(channel)?,
                strobe_profile: self.get_strobe_mode_profile(channel)?,
                trigger: self.get_trigger_mode_params(channel)?,
                trigger_profile: self.get_trigger_mode_profile(channel)?,
            });
        }
        Ok(DeviceSettings {
            device_info,
            channels,
        })
    }
}

fn write_profile(f: &mut fmt::Formatter<'_>, steps: &[ProfileStep]) -> fmt::Result {
    for (i, step) in steps.iter().enumerate() {
        writeln!(f, "    step {}", i)?;
        writeln!(f, "      iset: {}", step.iset)?;
        writeln!(f, "      tset: {}", step.tset)?;
    }
    Ok(())
}

impl fmt::Display for ChannelSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "chan: {}", self.channel)?;
        writeln!(f, "  mode: {}", self.mode)?;
        writeln!(f, "  normal mode parameters")?;
        writeln!(f, "    imax: {}", self.normal.imax)?;
        writeln!(f, "    iset: {}", self.normal.iset)?;
        writeln!(f, "  strobe mode parameters")?;
        writeln!(f, "    imax: {}", self.strobe.imax)?;
        writeln!(f, "    repeat: {}", self.strobe.repeat)?;
        writeln!(f, "  strobe mode profile")?;
        write_profile(f, &self.strobe_profile)?;
        writeln!(f, "  trigger mode parameters")?;
        writeln!(f, "    imax: {}", self.trigger.imax)?;
        writeln!(f, "    polarity: {}", self.trigger.polarity)?;
        writeln!(f, "  trigger mode profile")?;
        write_profile(f, &self.trigger_profile)
    }
}

impl fmt::Display for DeviceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.device_info)?;
        writeln!(f)?;
        for channel in &self.channels {
            writeln!(f, "{}", channel)?;
        }
        Ok(())
    }
}
