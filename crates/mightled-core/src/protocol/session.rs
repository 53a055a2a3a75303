//! Device session
//!
//! [`LedController`] validates every argument, encodes the command, performs
//! one request/reply exchange and decodes the reply. It keeps no copy of the
//! device state: every getter queries the hardware, because front-panel use
//! or `RESTOREDEF` can change modes behind the session's back.

use std::time::Duration;

use super::{
    codec,
    response::{self, NormalParams, ProfileStep, StrobeParams, TriggerParams},
    validate::{
        validate_channel, validate_current, validate_repeat, validate_step, validate_time,
        RawValue,
    },
    Command, Mode, Polarity, ProtocolError, Result, SerialTransport, SessionConfig, Transport,
};

/// Session with one Sirius SLC LED controller.
///
/// Commands must not overlap: the protocol has no request identifiers, so
/// each method completes its exchange before returning. Callers sharing a
/// controller across threads wrap it in a `Mutex`.
pub struct LedController<T: Transport = SerialTransport> {
    /// Link to the device
    transport: T,
    /// Settings captured at construction
    config: SessionConfig,
    /// Whether the device echoes each command line back
    echo: bool,
}

impl LedController<SerialTransport> {
    /// Open the serial port named in `config` and start a session
    pub fn open(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let transport = SerialTransport::open(&config)?;
        Self::new(transport, config)
    }
}

impl<T: Transport> LedController<T> {
    /// Start a session over an already open transport.
    ///
    /// Applies the configured read timeout, then sends `ECHOOFF` so the
    /// device is in a known echo state. A failure of that command is logged
    /// and ignored since the device may already have echo disabled.
    pub fn new(mut transport: T, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        transport.set_timeout(config.timeout())?;
        let mut session = Self {
            transport,
            config,
            echo: false,
        };
        if let Err(e) = session.echo_off() {
            tracing::warn!("ECHOOFF during session setup failed: {}", e);
        }
        Ok(session)
    }

    /// Number of output channels
    pub fn num_channels(&self) -> u8 {
        self.config.num_channels
    }

    /// Settings the session was started with
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Underlying link
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Underlying link, mutably. Writing to it directly bypasses echo
    /// handling.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// End the session without closing the transport
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// End the session and close the transport
    pub fn close(self) -> Result<()> {
        self.transport.close()
    }

    fn channel<'a>(&self, channel: impl Into<RawValue<'a>>) -> Result<u8> {
        validate_channel(channel, self.config.num_channels)
    }

    fn send(&mut self, command: Command) -> Result<Vec<String>> {
        codec::exchange(&mut self.transport, &command, self.echo)
    }

    /// Run `f` with the transport read timeout set to `timeout`, restoring
    /// the previous value afterwards whether or not `f` succeeded.
    fn with_timeout<R>(
        &mut self,
        timeout: Duration,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let original = self.transport.timeout();
        self.transport.set_timeout(timeout)?;
        let result = f(self);
        let restored = self.transport.set_timeout(original);
        let value = result?;
        restored?;
        Ok(value)
    }

    /// Returns the working mode of the given channel
    pub fn get_mode<'a>(&mut self, channel: impl Into<RawValue<'a>>) -> Result<Mode> {
        let channel = self.channel(channel)?;
        let resp = self.send(Command::GetMode { channel })?;
        response::parse_mode(&resp)
    }

    /// Sets the working mode of the given channel.
    ///
    /// Parameter changes for a mode only take effect once the mode is set,
    /// even if the channel is already in that mode.
    pub fn set_mode<'a>(&mut self, channel: impl Into<RawValue<'a>>, mode: Mode) -> Result<()> {
        let channel = self.channel(channel)?;
        self.send(Command::SetMode { channel, mode })?;
        Ok(())
    }

    // Normal mode
    // ------------------------------------------------------------------------

    /// Sets the maximum and working current for normal mode. `iset` must not
    /// exceed `imax`.
    pub fn set_normal_mode_params<'a>(
        &mut self,
        channel: impl Into<RawValue<'a>>,
        imax: impl Into<RawValue<'a>>,
        iset: impl Into<RawValue<'a>>,
    ) -> Result<()> {
        let channel = self.channel(channel)?;
        let imax = validate_current(imax)?;
        let iset = validate_current(iset)?;
        if iset > imax {
            return Err(ProtocolError::invalid(
                "iset",
                iset,
                format!("<= imax ({})", imax),
            ));
        }
        self.send(Command::SetNormal {
            channel,
            imax,
            iset,
        })?;
        Ok(())
    }

    /// Sets the normal mode working current. Takes effect immediately when
    /// the channel is in normal mode.
    pub fn set_normal_mode_current<'a>(
        &mut self,
        channel: impl Into<RawValue<'a>>,
        iset: impl Into<RawValue<'a>>,
    ) -> Result<()> {
        let channel = self.channel(channel)?;
        let iset = validate_current(iset)?;
        self.send(Command::SetCurrent { channel, iset })?;
        Ok(())
    }

    /// Returns `imax` and `iset` for normal mode
    pub fn get_normal_mode_params<'a>(
        &mut self,
        channel: impl Into<RawValue<'a>>,
    ) -> Result<NormalParams> {
        let channel = self.channel(channel)?;
        let resp = self.send(Command::GetCurrent { channel })?;
        response::parse_normal_params(&resp)
    }

    // Strobe mode
    // ------------------------------------------------------------------------

    /// Sets the strobe mode current limit and how often the profile runs.
    /// `repeat` accepts `"forever"`.
    pub fn set_strobe_mode_params<'a>(
        &mut self,
        channel: impl Into<RawValue<'a>>,
        imax: impl Into<RawValue<'a>>,
        repeat: impl Into<RawValue<'a>>,
    ) -> Result<()> {
        let channel = self.channel(channel)?;
        let imax = validate_current(imax)?;
        let repeat = validate_repeat(repeat)?;
        self.send(Command::SetStrobe {
            channel,
            imax,
            repeat,
        })?;
        Ok(())
    }

    /// Sets one step of the strobe profile; `tset` is in microseconds.
    ///
    /// Hardware may support fewer than 128 steps and ignores the rest.
    pub fn set_strobe_mode_profile<'a>(
        &mut self,
        channel: impl Into<RawValue<'a>>,
        step: impl Into<RawValue<'a>>,
        iset: impl Into<RawValue<'a>>,
        tset: impl Into<RawValue<'a>>,
    ) -> Result<()> {
        let channel = self.channel(channel)?;
        let step = validate_step(step)?;
        let iset = validate_current(iset)?;
        let tset = validate_time(tset)?;
        self.send(Command::SetStrobeProfile {
            channel,
            step,
            iset,
            tset,
        })?;
        Ok(())
    }

    /// Returns the strobe current limit and repeat count
    pub fn get_strobe_mode_params<'a>(
        &mut self,
        channel: impl Into<RawValue<'a>>,
    ) -> Result<StrobeParams> {
        let channel = self.channel(channel)?;
        let resp = self.send(Command::GetStrobe { channel })?;
        response::parse_strobe_params(&resp)
    }

    /// Returns the programmed strobe steps
    pub fn get_strobe_mode_profile<'a>(
        &mut self,
        channel: impl Into<RawValue<'a>>,
    ) -> Result<Vec<ProfileStep>> {
        let channel = self.channel(channel)?;
        let resp = self.send(Command::GetStrobeProfile { channel })?;
        response::parse_profile(&resp)
    }

    // Trigger mode
    // ------------------------------------------------------------------------

    /// Sets the trigger mode current limit and active edge
    pub fn set_trigger_mode_params<'a>(
        &mut self,
        channel: impl Into<RawValue<'a>>,
        imax: impl Into<RawValue<'a>>,
        polarity: Polarity,
    ) -> Result<()> {
        let channel = self.channel(channel)?;
        let imax = validate_current(imax)?;
        self.send(Command::SetTrigger {
            channel,
            imax,
            polarity,
        })?;
        Ok(())
    }

    /// Sets one step of the trigger profile; `tset` is in microseconds.
    pub fn set_trigger_mode_profile<'a>(
        &mut self,
        channel: impl Into<RawValue<'a>>,
        step: impl Into<RawValue<'a>>,
        iset: impl Into<RawValue<'a>>,
        tset: impl Into<RawValue<'a>>,
    ) -> Result<()> {
        let channel = self.channel(channel)?;
        let step = validate_step(step)?;
        let iset = validate_current(iset)?;
        let tset = validate_time(tset)?;
        self.send(Command::SetTriggerProfile {
            channel,
            step,
            iset,
            tset,
        })?;
        Ok(())
    }

    /// Returns the trigger current limit and polarity
    pub fn get_trigger_mode_params<'a>(
        &mut self,
        channel: impl Into<RawValue<'a>>,
    ) -> Result<TriggerParams> {
        let channel = self.channel(channel)?;
        let resp = self.send(Command::GetTrigger { channel })?;
        response::parse_trigger_params(&resp)
    }

    /// Returns the programmed trigger steps
    pub fn get_trigger_mode_profile<'a>(
        &mut self,
        channel: impl Into<RawValue<'a>>,
    ) -> Result<Vec<ProfileStep>> {
        let channel = self.channel(channel)?;
        let resp = self.send(Command::GetTriggerProfile { channel })?;
        response::parse_profile(&resp)
    }

    // Device commands
    // ------------------------------------------------------------------------

    /// Soft reset. The device drops off the link for about four seconds; the
    /// caller has to close and reopen the transport afterwards. With `sleep`
    /// set, block for the configured reset time before returning.
    pub fn reset(&mut self, sleep: bool) -> Result<()> {
        self.send(Command::Reset)?;
        tracing::info!("reset sent, device will be unresponsive");
        if sleep {
            std::thread::sleep(self.config.reset_sleep());
        }
        Ok(())
    }

    /// Restore factory defaults, optionally persisting them.
    ///
    /// The device does not apply the restored modes until they are set
    /// again, so every channel's mode is read back and re-sent.
    pub fn restore_defaults(&mut self, store: bool) -> Result<()> {
        self.send(Command::RestoreDefaults)?;
        if store {
            self.store()?;
        }
        for channel in 1..=self.config.num_channels {
            let mode = self.get_mode(channel)?;
            self.set_mode(channel, mode)?;
        }
        tracing::info!(stored = store, "factory defaults restored");
        Ok(())
    }

    /// Write the current settings to non-volatile memory.
    ///
    /// Uses the longer store timeout for this exchange only.
    pub fn store(&mut self) -> Result<()> {
        let timeout = self.config.store_timeout();
        self.with_timeout(timeout, |session| session.send(Command::Store))?;
        tracing::info!("settings stored");
        Ok(())
    }

    /// Device type, firmware version and serial number as reported by the
    /// device
    pub fn device_info(&mut self) -> Result<String> {
        let resp = self.send(Command::DeviceInfo)?;
        response::parse_device_info(&resp)
    }

    /// Turn on command echo. Debugging aid, not part of the stable API.
    #[doc(hidden)]
    pub fn echo_on(&mut self) -> Result<()> {
        self.echo = true;
        self.send(Command::EchoOn)?;
        Ok(())
    }

    /// Turn off command echo. Debugging aid, not part of the stable API.
    #[doc(hidden)]
    pub fn echo_off(&mut self) -> Result<()> {
        self.echo = false;
        self.send(Command::EchoOff)?;
        Ok(())
    }
}
