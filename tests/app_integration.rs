//! Integration tests for the application container and configuration files.

use std::io::Write;

use smartcab::{
    Action, Error, Light,
    app::{AgentConfig, App},
    q_learning::{StateEncoding, parse_observation},
};

#[test]
fn test_agent_from_partial_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"epsilon": 0.0, "encoding": "full", "seed": 9}}"#).unwrap();

    let config = AgentConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.epsilon, 0.0);
    assert_eq!(config.encoding, StateEncoding::Full);
    assert_eq!(config.learning_rate, AgentConfig::default().learning_rate);

    let agent = App::new().create_agent(config).unwrap();
    assert_eq!(agent.config().seed, Some(9));
    assert_eq!(agent.epsilon(), 0.0);
}

#[test]
fn test_out_of_range_config_file_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"discount_factor": 1.5}}"#).unwrap();

    let err = AgentConfig::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration { .. }));
}

#[test]
fn test_missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AgentConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn test_probe_observation_maps_to_state() {
    let (percepts, waypoint) =
        parse_observation("waypoint=forward,light=green,left=none,right=none,oncoming=none")
            .unwrap();
    assert_eq!(waypoint, Action::Forward);
    assert_eq!(percepts.light, Light::Green);

    let agent = App::new()
        .create_agent(AgentConfig::default().with_epsilon(0.0))
        .unwrap();
    let state = agent.config().encoding.encode(&percepts, waypoint);
    assert_eq!(agent.best_action(&state), Action::Forward);
}

#[test]
fn test_malformed_probes_fail_fast() {
    let cases = [
        // unknown key
        "waypoint=forward,light=green,left=none,right=none,oncoming=none,behind=left",
        // bad light value
        "waypoint=forward,light=yellow,left=none,right=none,oncoming=none",
        // missing waypoint
        "light=green,left=none,right=none,oncoming=none",
        // missing percept
        "waypoint=left,light=red,left=none,right=none",
        // not key=value
        "waypoint=left,light",
        // repeated waypoint
        "waypoint=left,waypoint=right,light=green,left=none,right=none,oncoming=none",
        // waypoint under both spellings
        "waypoint=left,next_waypoint=right,light=green,left=none,right=none,oncoming=none",
    ];
    for case in cases {
        assert!(parse_observation(case).is_err(), "accepted '{case}'");
    }
}
