mod common;

use common::{lines, session, test_config, MockTransport};
use mightled_core::protocol::{
    LedController, Mode, Polarity, ProfileStep, ProtocolError, SessionConfig, Transport,
};
use pretty_assertions::assert_eq;
use std::time::Duration;

#[test]
fn test_construction_disables_echo() {
    let dev = LedController::new(MockTransport::new(), test_config()).unwrap();
    assert_eq!(dev.transport().commands(), vec!["ECHOOFF"]);
}

#[test]
fn test_construction_applies_configured_timeout() {
    let config = SessionConfig {
        timeout_ms: 250,
        ..test_config()
    };
    let dev = LedController::new(MockTransport::new(), config).unwrap();
    assert_eq!(dev.transport().timeout(), Duration::from_millis(250));
    assert_eq!(dev.transport().timeout_history(), [Duration::from_millis(250)]);
}

#[test]
fn test_construction_ignores_echo_off_failure() {
    let mock = MockTransport::new().fail_on("ECHOOFF");
    let dev = LedController::new(mock, test_config());
    assert!(dev.is_ok());
}

#[test]
fn test_construction_rejects_zero_channels() {
    let config = SessionConfig {
        num_channels: 0,
        ..test_config()
    };
    let err = LedController::new(MockTransport::new(), config).err().unwrap();
    assert!(err.is_invalid_parameter());
}

#[test]
fn test_set_mode_wire_line() {
    let mut dev = session(MockTransport::new());
    dev.set_mode(1, Mode::Strobe).unwrap();
    assert_eq!(dev.transport().sent(), b"MODE 1 2\r\n");
}

#[test]
fn test_get_mode() {
    let mut dev = session(MockTransport::with_responder(|cmd| match cmd {
        "?MODE 3" => lines(&["#3 3"]),
        _ => Vec::new(),
    }));
    assert_eq!(dev.get_mode(3).unwrap(), Mode::Trigger);
    assert_eq!(dev.transport().commands(), vec!["?MODE 3"]);
}

#[test]
fn test_get_mode_unknown_code_is_protocol_error() {
    let mut dev = session(MockTransport::with_responder(|_| lines(&["#1 12"])));
    let err = dev.get_mode(1).unwrap_err();
    assert!(err.is_protocol());
}

#[test]
fn test_get_mode_idle_device() {
    let mut dev = session(MockTransport::new());
    assert!(dev.get_mode(1).unwrap_err().is_protocol());
}

#[test]
fn test_channel_out_of_range_sends_nothing() {
    let mut dev = session(MockTransport::new());
    assert!(dev.set_mode(0, Mode::Normal).unwrap_err().is_invalid_parameter());
    assert!(dev.set_mode(5, Mode::Normal).unwrap_err().is_invalid_parameter());
    assert!(dev.get_strobe_mode_profile(9).is_err());
    assert!(dev.transport().sent().is_empty());
}

#[test]
fn test_normal_params_iset_above_imax_sends_nothing() {
    let mut dev = session(MockTransport::new());
    let err = dev.set_normal_mode_params(1, 10, 50).unwrap_err();
    match err {
        ProtocolError::InvalidParameter { field, .. } => assert_eq!(field, "iset"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(dev.transport().sent().is_empty());
}

#[test]
fn test_normal_mode_commands() {
    let mut dev = session(MockTransport::with_responder(|cmd| match cmd {
        "?CURRENT 2" => lines(&["#2 1000 300"]),
        _ => Vec::new(),
    }));
    dev.set_normal_mode_params(2, 1000, 0).unwrap();
    dev.set_normal_mode_current(2, 300).unwrap();
    let params = dev.get_normal_mode_params(2).unwrap();

    assert_eq!((params.imax, params.iset), (1000, 300));
    assert_eq!(
        dev.transport().commands(),
        vec!["NORMAL 2 1000 0", "CURRENT 2 300", "?CURRENT 2"]
    );
}

#[test]
fn test_strobe_params_forever() {
    let mut dev = session(MockTransport::with_responder(|cmd| match cmd {
        "?STROBE 1" => lines(&["#500 9999"]),
        _ => Vec::new(),
    }));
    dev.set_strobe_mode_params(1, 500, "forever").unwrap();
    let params = dev.get_strobe_mode_params(1).unwrap();

    assert_eq!(dev.transport().commands()[0], "STROBE 1 500 9999");
    assert_eq!(params.imax, 500);
    assert!(params.repeats_forever());
}

#[test]
fn test_strobe_profile_round_trip() {
    let mut dev = session(MockTransport::with_responder(|cmd| match cmd {
        "?STRP 1" => lines(&["#200 50000", "10 70000", "10 70000"]),
        _ => Vec::new(),
    }));
    dev.set_strobe_mode_profile(1, 0, 200, 50_000).unwrap();
    dev.set_strobe_mode_profile(1, 1, 10, 70_000).unwrap();
    let profile = dev.get_strobe_mode_profile(1).unwrap();

    assert_eq!(
        dev.transport().commands()[..2],
        ["STRP 1 0 200 50000", "STRP 1 1 10 70000"]
    );
    assert_eq!(
        profile,
        vec![
            ProfileStep {
                iset: 200,
                tset: 50_000
            },
            ProfileStep {
                iset: 10,
                tset: 70_000
            },
        ]
    );
}

#[test]
fn test_profile_time_beyond_32_bits() {
    let mut dev = session(MockTransport::with_responder(|cmd| match cmd {
        "?STRP 1" => lines(&["#200 5000000000", "#200 5000000000"]),
        _ => Vec::new(),
    }));
    dev.set_strobe_mode_profile(1, 0, 200, 5_000_000_000i64).unwrap();
    let profile = dev.get_strobe_mode_profile(1).unwrap();

    assert_eq!(dev.transport().commands()[0], "STRP 1 0 200 5000000000");
    assert_eq!(profile, vec![ProfileStep::from((200, 5_000_000_000))]);
}

#[test]
fn test_profile_step_out_of_range() {
    let mut dev = session(MockTransport::new());
    assert!(dev.set_strobe_mode_profile(1, 128, 200, 10).is_err());
    assert!(dev.set_trigger_mode_profile(1, 0, 1001, 10).is_err());
    assert!(dev.set_trigger_mode_profile(1, 0, 100, -1).is_err());
    assert!(dev.transport().sent().is_empty());
}

#[test]
fn test_trigger_mode_commands() {
    let mut dev = session(MockTransport::with_responder(|cmd| match cmd {
        "?TRIGGER 4" => lines(&["#800 1"]),
        "?TRIGP 4" => lines(&["#400 100000"]),
        _ => Vec::new(),
    }));
    dev.set_trigger_mode_params(4, 800, Polarity::Falling).unwrap();
    dev.set_trigger_mode_profile(4, 0, 400, 100_000).unwrap();
    let params = dev.get_trigger_mode_params(4).unwrap();
    let profile = dev.get_trigger_mode_profile(4).unwrap();

    assert_eq!(
        dev.transport().commands()[..2],
        ["TRIGGER 4 800 1", "TRIGP 4 0 400 100000"]
    );
    assert_eq!(params.polarity, Polarity::Falling);
    assert!(profile.is_empty());
}

#[test]
fn test_echo_line_discarded_before_profile_parsing() {
    let mut dev = session(MockTransport::with_responder(|cmd| {
        if cmd == "?STRP 1" {
            lines(&[cmd, "#200 50000", "#200 50000"])
        } else {
            lines(&[cmd])
        }
    }));
    dev.echo_on().unwrap();

    let profile = dev.get_strobe_mode_profile(1).unwrap();
    assert_eq!(profile, vec![ProfileStep::from((200, 50_000))]);
}

#[test]
fn test_echo_off_leaves_first_line() {
    let mut dev = session(MockTransport::with_responder(|_| lines(&["#1 1"])));
    assert_eq!(dev.get_mode(1).unwrap(), Mode::Normal);
}

#[test]
fn test_device_info() {
    let mut dev = session(MockTransport::with_responder(|cmd| match cmd {
        "DEVICEINFO" => lines(&["Mightex SLC-SA04-U  Ver:1.1.0 SN:04-100501-001  "]),
        _ => Vec::new(),
    }));
    assert_eq!(
        dev.device_info().unwrap(),
        "Mightex SLC-SA04-U  Ver:1.1.0 SN:04-100501-001"
    );
}

#[test]
fn test_store_restores_timeout_on_success() {
    let mut dev = session(MockTransport::new());
    dev.store().unwrap();

    let mock = dev.transport();
    assert_eq!(mock.commands(), vec!["STORE"]);
    assert_eq!(
        mock.timeout_history(),
        [Duration::from_secs(2), Duration::from_millis(100)]
    );
    assert_eq!(mock.timeout(), Duration::from_millis(100));
}

#[test]
fn test_store_restores_timeout_on_failure() {
    let mut dev = session(MockTransport::new().fail_on("STORE"));
    let err = dev.store().unwrap_err();
    assert!(err.is_transport());

    let mock = dev.transport();
    assert_eq!(
        mock.timeout_history(),
        [Duration::from_secs(2), Duration::from_millis(100)]
    );
    assert_eq!(mock.timeout(), Duration::from_millis(100));
}

#[test]
fn test_restore_defaults_reasserts_modes() {
    let mut dev = session(MockTransport::with_responder(|cmd| {
        match cmd.strip_prefix("?MODE ") {
            Some(ch) => {
                let code = if ch == "2" { 1 } else { 0 };
                vec![format!("#{} {}", ch, code)]
            }
            None => Vec::new(),
        }
    }));
    dev.restore_defaults(false).unwrap();

    assert_eq!(
        dev.transport().commands(),
        vec![
            "RESTOREDEF",
            "?MODE 1",
            "MODE 1 0",
            "?MODE 2",
            "MODE 2 1",
            "?MODE 3",
            "MODE 3 0",
            "?MODE 4",
            "MODE 4 0",
        ]
    );
}

#[test]
fn test_restore_defaults_with_store() {
    let mut dev = session(MockTransport::with_responder(|cmd| {
        if cmd.starts_with("?MODE") {
            lines(&["#1 0"])
        } else {
            Vec::new()
        }
    }));
    dev.restore_defaults(true).unwrap();

    let commands = dev.transport().commands();
    assert_eq!(commands[..3], ["RESTOREDEF", "STORE", "?MODE 1"]);
    assert_eq!(commands.len(), 2 + 2 * 4);
}

#[test]
fn test_reset_without_sleep() {
    let mut dev = session(MockTransport::new());
    dev.reset(false).unwrap();
    assert_eq!(dev.transport().sent(), b"Reset\r\n");
}

#[test]
fn test_reset_with_sleep() {
    let config = SessionConfig {
        reset_sleep_ms: 5,
        ..test_config()
    };
    let mut dev = LedController::new(MockTransport::new(), config).unwrap();
    dev.transport_mut().clear_sent();

    let started = std::time::Instant::now();
    dev.reset(true).unwrap();
    assert!(started.elapsed() >= Duration::from_millis(5));
    assert_eq!(dev.transport().sent(), b"Reset\r\n");
}

#[test]
fn test_close() {
    let dev = session(MockTransport::new());
    assert!(dev.close().is_ok());
}

#[test]
fn test_protocol_error_display() {
    let err = ProtocolError::Transport("link down".to_string());
    assert_eq!(err.to_string(), "Transport error: link down");
}
