//! Duty-cycle brightness control
//!
//! Drives each channel in strobe mode with a two-step profile (on, then off)
//! repeated forever, so a normalized value in `[0, 1]` becomes the on-time
//! fraction of a fixed period.

use crate::protocol::{
    validate::validate_channel, LedController, Mode, ProtocolError, Result, SerialTransport,
    SessionConfig, Transport, MAX_CURRENT,
};

/// Default drive frequency in Hz
pub const DEFAULT_FREQ_HZ: f64 = 1000.0;

/// Brightness controller built on strobe mode
pub struct PwmController<T: Transport = SerialTransport> {
    controller: LedController<T>,
    /// Drive frequency in Hz
    freq_hz: f64,
    /// On-step current per channel
    iset: Vec<u16>,
    /// Channels the caller has switched on
    enabled: Vec<bool>,
}

impl PwmController<SerialTransport> {
    /// Open the port in `config` and set up all channels
    pub fn open(config: SessionConfig, freq_hz: f64, iset: Vec<u16>) -> Result<Self> {
        Self::new(LedController::open(config)?, freq_hz, iset)
    }
}

impl<T: Transport> PwmController<T> {
    /// Take over `controller`: disable every channel, set the strobe current
    /// limit to maximum with endless repeat, and zero every value.
    ///
    /// `iset` holds the on-step current of each channel.
    pub fn new(controller: LedController<T>, freq_hz: f64, iset: Vec<u16>) -> Result<Self> {
        if !freq_hz.is_finite() || freq_hz <= 0.0 {
            return Err(ProtocolError::invalid("frequency", freq_hz, "a positive number"));
        }
        let count = usize::from(controller.num_channels());
        if iset.len() != count {
            return Err(ProtocolError::invalid(
                "iset",
                format!("{:?}", iset),
                format!("one current per channel ({})", count),
            ));
        }
        if let Some(&bad) = iset.iter().find(|&&i| i > MAX_CURRENT) {
            return Err(ProtocolError::invalid(
                "iset",
                bad,
                format!("in range [0, {}]", MAX_CURRENT),
            ));
        }

        let mut pwm = Self {
            controller,
            freq_hz,
            iset,
            enabled: vec![false; count],
        };
        pwm.disable_all()?;
        pwm.set_imax_all(MAX_CURRENT)?;
        pwm.set_value_all(&vec![0.0; count])?;
        Ok(pwm)
    }

    /// Default frequency and full current on every channel
    pub fn with_defaults(controller: LedController<T>) -> Result<Self> {
        let iset = vec![MAX_CURRENT; usize::from(controller.num_channels())];
        Self::new(controller, DEFAULT_FREQ_HZ, iset)
    }

    fn index(&self, channel: u8) -> Result<usize> {
        let channel = validate_channel(channel, self.controller.num_channels())?;
        Ok(usize::from(channel) - 1)
    }

    /// Drive frequency in Hz
    pub fn freq_hz(&self) -> f64 {
        self.freq_hz
    }

    /// Check if `channel` is in strobe mode. Unknown channels report false.
    pub fn is_enabled(&self, channel: u8) -> bool {
        self.index(channel)
            .map(|i| self.enabled[i])
            .unwrap_or(false)
    }

    /// Put `channel` into strobe mode
    pub fn enable(&mut self, channel: u8) -> Result<()> {
        let i = self.index(channel)?;
        self.controller.set_mode(channel, Mode::Strobe)?;
        self.enabled[i] = true;
        Ok(())
    }

    /// Turn `channel` off
    pub fn disable(&mut self, channel: u8) -> Result<()> {
        let i = self.index(channel)?;
        self.controller.set_mode(channel, Mode::Disabled)?;
        self.enabled[i] = false;
        Ok(())
    }

    /// Enable every channel
    pub fn enable_all(&mut self) -> Result<()> {
        for channel in 1..=self.controller.num_channels() {
            self.enable(channel)?;
        }
        Ok(())
    }

    /// Disable every channel
    pub fn disable_all(&mut self) -> Result<()> {
        for channel in 1..=self.controller.num_channels() {
            self.disable(channel)?;
        }
        Ok(())
    }

    /// Drive period in microseconds
    pub fn period_us(&self) -> u32 {
        (1_000_000.0 / self.freq_hz).round() as u32
    }

    /// Set the on-time fraction of `channel`.
    ///
    /// A value that rounds down to no on-time disables the channel instead of
    /// writing a zero-length step. Otherwise the profile is rewritten and, if
    /// the channel is enabled, strobe mode is re-sent so it takes effect.
    pub fn set_value(&mut self, channel: u8, value: f64) -> Result<()> {
        let i = self.index(channel)?;
        if !(0.0..=1.0).contains(&value) {
            return Err(ProtocolError::invalid("value", value, "in range [0, 1]"));
        }

        let period = self.period_us();
        let time_high = (value * f64::from(period)).floor() as u32;
        let time_low = period - time_high;

        if time_high == 0 {
            return self.disable(channel);
        }

        let iset = self.iset[i];
        self.controller
            .set_strobe_mode_profile(channel, 0, iset, time_high)?;
        self.controller
            .set_strobe_mode_profile(channel, 1, 0, time_low)?;
        if self.enabled[i] {
            self.enable(channel)?;
        }
        Ok(())
    }

    /// Set values for channels `1..=values.len()`
    pub fn set_value_all(&mut self, values: &[f64]) -> Result<()> {
        for (i, &value) in values.iter().enumerate() {
            let channel = u8::try_from(i + 1)
                .map_err(|_| ProtocolError::invalid("channel", i + 1, "a valid channel"))?;
            self.set_value(channel, value)?;
        }
        Ok(())
    }

    /// Set the strobe current limit of `channel`, repeating forever
    pub fn set_imax(&mut self, channel: u8, imax: u16) -> Result<()> {
        self.controller
            .set_strobe_mode_params(channel, imax, "forever")
    }

    /// Apply [`PwmController::set_imax`] to every channel
    pub fn set_imax_all(&mut self, imax: u16) -> Result<()> {
        for channel in 1..=self.controller.num_channels() {
            self.set_imax(channel, imax)?;
        }
        Ok(())
    }

    /// Underlying session
    pub fn controller_mut(&mut self) -> &mut LedController<T> {
        &mut self.controller
    }

    /// Give back the underlying session
    pub fn into_inner(self) -> LedController<T> {
        self.controller
    }
}
