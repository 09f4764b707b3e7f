//! Tests for solver configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        environment_mode = "full_assert"

        [termination]
        seconds_spent_limit = 30
        node_limit = 100000

        [defaults.shift]
        hard_min = 6
        soft_min = 6
        min_cost = 0
        soft_max = 8
        hard_max = 9
        max_cost = 2
    "#;

    let config = SolverConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
    assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
    assert_eq!(config.node_limit(), Some(100_000));
    assert_eq!(config.defaults.shift, BoundTuple::new(6, 6, 0, 8, 9, 2));
    assert_eq!(config.defaults.weekly, DEFAULT_WEEKLY_BOUNDS);
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        environment_mode: full_assert
        termination:
          millis_spent_limit: 250
        defaults:
          weekly:
            hard_min: 20
            soft_min: 30
            min_cost: 1
            soft_max: 40
            hard_max: 45
            max_cost: 1
    "#;

    let config = SolverConfig::from_yaml_str(yaml).unwrap();
    assert!(config.environment_mode.is_asserted());
    assert_eq!(config.time_limit(), Some(Duration::from_millis(250)));
    assert_eq!(config.defaults.weekly, BoundTuple::new(20, 30, 1, 40, 45, 1));
    assert_eq!(config.defaults.shift, DEFAULT_SHIFT_BOUNDS);
}

#[test]
fn test_defaults() {
    let config = SolverConfig::default();
    assert_eq!(config.environment_mode, EnvironmentMode::NonReproducible);
    assert_eq!(config.time_limit(), None);
    assert_eq!(config.effective_time_limit(), DEFAULT_TIME_LIMIT);
    assert_eq!(config.node_limit(), None);
    assert_eq!(config.defaults, PolicyDefaults::default());
}

#[test]
fn test_builder() {
    let config = SolverConfig::new()
        .with_termination_seconds(60)
        .with_node_limit(500)
        .with_defaults(PolicyDefaults::new(
            BoundTuple::hard(2, 4),
            BoundTuple::hard(0, 20),
        ));

    assert_eq!(config.time_limit(), Some(Duration::from_secs(60)));
    assert_eq!(config.node_limit(), Some(500));
    assert_eq!(config.defaults.shift.hard_max, 4);

    let config = config.with_time_limit(Duration::from_millis(1500));
    assert_eq!(config.time_limit(), Some(Duration::from_millis(1500)));
    assert_eq!(config.node_limit(), Some(500));
}

#[test]
fn test_crossing_default_bounds_are_rejected() {
    let toml = r#"
        [defaults.weekly]
        hard_min = 50
        soft_min = 0
        min_cost = 1
        soft_max = 38
        hard_max = 40
        max_cost = 1
    "#;

    let err = SolverConfig::from_toml_str(toml).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_missing_file() {
    let err = SolverConfig::load("does/not/exist.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
