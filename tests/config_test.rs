//! Transport configuration: defaults, serde and timeout conversion.

use std::time::Duration;
use thorwire::{ThorwireError, Timeout, TransportConfig, MAX_FRAME_LENGTH, MAX_WRITE_CHUNK};

#[test]
fn defaults() {
    let config = TransportConfig::default();
    assert_eq!(config.max_write_attempts, 3);
    assert_eq!(config.max_frame_length, MAX_FRAME_LENGTH);
    assert_eq!(config.max_write_chunk, MAX_WRITE_CHUNK);
    assert_eq!(config.recv_timeout(), Timeout::Never);
    assert!(config.validate().is_ok());
}

#[test]
fn deserializes_camel_case_options() {
    let config: TransportConfig = serde_json::from_str(
        r#"{"connectTimeout": 2, "sendTimeout": 0.25, "recvTimeout": 1.5, "maxWriteAttempts": 5}"#,
    )
    .unwrap();
    assert_eq!(config.connect_timeout(), Timeout::After(Duration::from_secs(2)));
    assert_eq!(config.send_timeout(), Timeout::After(Duration::from_millis(250)));
    assert_eq!(config.recv_timeout().split(), Some((1, 500_000)));
    assert_eq!(config.max_write_attempts, 5);
    assert_eq!(config.max_frame_length, MAX_FRAME_LENGTH);
}

#[test]
fn negative_timeouts_wait_indefinitely() {
    assert_eq!(Timeout::from_secs_f64(-1.0), Timeout::Never);
    assert_eq!(Timeout::from_secs_f64(-0.5), Timeout::Never);
    assert_eq!(Timeout::from_secs_f64(f64::NAN), Timeout::Never);
    assert_eq!(Timeout::from_secs_f64(f64::INFINITY), Timeout::Never);
    assert_eq!(Timeout::from_secs_f64(0.0), Timeout::After(Duration::ZERO));
    assert_eq!(Timeout::Never.split(), None);
}

#[test]
fn zero_chunk_is_invalid() {
    let config = TransportConfig {
        max_write_chunk: 0,
        ..TransportConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ThorwireError::InvalidConfig(_))
    ));
}

#[test]
fn environment_overrides_defaults() {
    // Every env case lives in this one test so nothing races on process state.
    const KEYS: [&str; 4] = [
        "THORWIRE_CONNECT_TIMEOUT",
        "THORWIRE_SEND_TIMEOUT",
        "THORWIRE_RECV_TIMEOUT",
        "THORWIRE_MAX_WRITE_ATTEMPTS",
    ];
    let clear = || KEYS.iter().for_each(|k| std::env::remove_var(k));

    clear();
    assert_eq!(TransportConfig::from_env().unwrap(), TransportConfig::default());

    std::env::set_var("THORWIRE_CONNECT_TIMEOUT", "1.5");
    std::env::set_var("THORWIRE_SEND_TIMEOUT", " 0.25 ");
    std::env::set_var("THORWIRE_RECV_TIMEOUT", "-1");
    std::env::set_var("THORWIRE_MAX_WRITE_ATTEMPTS", "7");
    let config = TransportConfig::from_env().unwrap();
    assert_eq!(config.connect_timeout(), Timeout::After(Duration::from_millis(1500)));
    assert_eq!(config.send_timeout(), Timeout::After(Duration::from_millis(250)));
    assert_eq!(config.recv_timeout(), Timeout::Never);
    assert_eq!(config.max_write_attempts, 7);
    assert_eq!(config.max_write_chunk, MAX_WRITE_CHUNK);

    std::env::set_var("THORWIRE_MAX_WRITE_ATTEMPTS", "many");
    match TransportConfig::from_env() {
        Err(ThorwireError::InvalidConfig(msg)) => {
            assert_eq!(msg, "THORWIRE_MAX_WRITE_ATTEMPTS=many")
        }
        other => panic!("expected invalid config, got {:?}", other),
    }
    std::env::remove_var("THORWIRE_MAX_WRITE_ATTEMPTS");

    std::env::set_var("THORWIRE_SEND_TIMEOUT", "soon");
    match TransportConfig::from_env() {
        Err(ThorwireError::InvalidConfig(msg)) => assert_eq!(msg, "THORWIRE_SEND_TIMEOUT=soon"),
        other => panic!("expected invalid config, got {:?}", other),
    }

    clear();
}
