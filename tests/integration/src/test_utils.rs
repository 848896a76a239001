//! Test utilities for integration tests

use civicdispatch_core::Config;
use civicdispatch_dispatch::{DispatchEngine, InMemoryRegistry};
use civicdispatch_domain::Unit;

/// Fleet used across scenarios, in registration order
pub const CITY_FLEET: &str = r#"
    [dispatch]
    audit_log_capacity = 100

    [[units]]
    id = "F-01"
    kind = "Fire"
    location = "City Center"
    water_capacity = 5000

    [[units]]
    id = "F-02"
    kind = "Fire"
    location = "City Center"
    water_capacity = 2500

    [[units]]
    id = "A-01"
    kind = "Medical"
    location = "City Hospital"
    medical_tier = "A"

    [[units]]
    id = "P-01"
    kind = "Security"
    location = "Downtown"
    patrol_zone = "Zone-1"
    officer_count = 25

    [[units]]
    id = "H-01"
    kind = "Hazmat"
    location = "Industrial Park"
    protection_level = "B"
"#;

/// Install a test subscriber so `tracing` output shows up with `--nocapture`
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// Engine with every unit from `config` registered
pub fn engine_from_config(config: &Config) -> DispatchEngine {
    let mut engine = DispatchEngine::with_log_capacity(
        InMemoryRegistry::with_log_capacity(config.dispatch.audit_log_capacity),
        config.dispatch.audit_log_capacity,
    );
    for spec in &config.units {
        let unit = Unit::from_spec(spec).expect("valid unit spec");
        engine.register_unit(unit).expect("unique unit id");
    }
    tracing::debug!(
        units = config.units.len(),
        log_capacity = config.dispatch.audit_log_capacity,
        "test fleet registered"
    );
    engine
}

/// Engine loaded with [`CITY_FLEET`]
pub fn city_engine() -> DispatchEngine {
    let config = Config::from_toml_str(CITY_FLEET).expect("valid fleet config");
    engine_from_config(&config)
}
