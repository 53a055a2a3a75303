#![allow(dead_code)]

use mightled_core::protocol::{LedController, ProtocolError, SessionConfig, Transport};
use std::time::Duration;

type Responder = Box<dyn FnMut(&str) -> Vec<String>>;

/// Mock transport for testing.
///
/// Each written command line is passed to a responder closure whose return
/// value becomes the reply for the next `read_lines` call.
pub struct MockTransport {
    sent: Vec<u8>,
    responder: Responder,
    pending: Vec<String>,
    timeout: Duration,
    timeout_history: Vec<Duration>,
    fail_on_verb: Option<&'static str>,
}

impl MockTransport {
    /// A device that never answers
    pub fn new() -> Self {
        Self::with_responder(|_| Vec::new())
    }

    pub fn with_responder(responder: impl FnMut(&str) -> Vec<String> + 'static) -> Self {
        Self {
            sent: Vec::new(),
            responder: Box::new(responder),
            pending: Vec::new(),
            timeout: Duration::from_millis(100),
            timeout_history: Vec::new(),
            fail_on_verb: None,
        }
    }

    /// Make writes of `verb` fail with a transport error
    pub fn fail_on(mut self, verb: &'static str) -> Self {
        self.fail_on_verb = Some(verb);
        self
    }

    pub fn set_responder(&mut self, responder: impl FnMut(&str) -> Vec<String> + 'static) {
        self.responder = Box::new(responder);
    }

    /// Raw bytes written so far
    pub fn sent(&self) -> &[u8] {
        &self.sent
    }

    /// Command lines written so far, without terminators
    pub fn commands(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.sent)
            .split("\r\n")
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn clear_sent(&mut self) {
        self.sent.clear();
    }

    pub fn clear_timeout_history(&mut self) {
        self.timeout_history.clear();
    }

    /// Every value passed to `set_timeout`, in order
    pub fn timeout_history(&self) -> &[Duration] {
        &self.timeout_history
    }
}

impl Transport for MockTransport {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), ProtocolError> {
        let line = String::from_utf8_lossy(bytes).trim_end().to_string();
        let verb = line.split_whitespace().next().unwrap_or("");
        if self.fail_on_verb == Some(verb) {
            return Err(ProtocolError::Transport("Serial write failed".to_string()));
        }
        self.sent.extend_from_slice(bytes);
        self.pending = (self.responder)(&line);
        Ok(())
    }

    fn read_lines(&mut self) -> Result<Vec<String>, ProtocolError> {
        Ok(std::mem::take(&mut self.pending))
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<(), ProtocolError> {
        self.timeout = timeout;
        self.timeout_history.push(timeout);
        Ok(())
    }
}

pub fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

pub fn test_config() -> SessionConfig {
    SessionConfig {
        port_name: "mock".to_string(),
        reset_sleep_ms: 0,
        ..SessionConfig::default()
    }
}

/// Session over `mock` with the setup traffic and timeout changes cleared
pub fn session(mock: MockTransport) -> LedController<MockTransport> {
    let mut dev = LedController::new(mock, test_config()).unwrap();
    dev.transport_mut().clear_sent();
    dev.transport_mut().clear_timeout_history();
    dev
}
