//! Validation mode specs
//!
//! Verify that the validation mode is set once and governs input checks.

use crate::prelude::*;

#[test]
fn runtime_mode_is_the_default() {
    let config = Config::default();
    assert_eq!(config.validation(), ValidationMode::Runtime);
    assert!(!config.is_locked());
}

#[test]
fn mode_locks_when_a_hub_is_built() {
    let config = Config::default();
    config.set_validation(ValidationMode::CompileTime).unwrap();
    let _world = World::with_config(&config);

    let err = config.set_validation(ValidationMode::Runtime).unwrap_err();
    assert!(err.to_string().contains("locked"));
    assert_eq!(config.validation(), ValidationMode::CompileTime);
}

#[test]
fn compile_time_mode_skips_input_checks() {
    let world = World::with_config(&Config::new(ValidationMode::CompileTime));

    let future = world.hub.wait(["x"], ["x"], None).unwrap();
    world.emit("x");
    future.resolved_with("x");

    assert!(world.hub.registry().subscribe(NONE).is_ok());
}

#[test]
fn mode_can_be_read_from_toml() {
    let config = Config::from_toml_str(r#"validation = "compile-time""#).unwrap();
    assert_eq!(config.validation(), ValidationMode::CompileTime);

    assert!(Config::from_toml_str(r#"validation = "sometimes""#).is_err());
    assert!(Config::from_toml_str(r#"strict = true"#).is_err());
}
