//! End-to-end dispatch scenarios over a config-loaded fleet

use civicdispatch_core::Error;
use civicdispatch_dispatch::{
    generate_intervention_plan, DispatchResult, ReadinessLevel, UnitRegistry, PLAN_TRAILER,
};
use civicdispatch_domain::UnitStatus;

use crate::test_utils::{city_engine, init_test_logging};

#[test]
fn test_city_fleet_initial_readiness() {
    init_test_logging();
    let engine = city_engine();

    let stats = engine.operational_stats();
    assert_eq!(stats.total_units, 5);
    assert_eq!(stats.available_units, 5);
    assert_eq!(stats.readiness_percentage, 100.0);
    assert_eq!(stats.readiness_level, ReadinessLevel::Optimal);
    assert_eq!(stats.active_incidents, 0);
}

#[test]
fn test_high_rise_fire_walkthrough() {
    init_test_logging();
    let mut engine = city_engine();

    let incident = engine
        .create_incident_report("FIRE-2025-001", "Fire", 4, "Grand Plaza Hotel")
        .unwrap();

    let f01 = engine.registry().get_unit_by_id("F-01").unwrap();
    let plan = generate_intervention_plan(&incident, f01);
    assert!(plan.starts_with("PLAN ID: FIRE-2025-001-PLAN"));
    assert!(plan.contains("Call for backup water tankers."));
    assert!(plan.ends_with(PLAN_TRAILER));

    assert_eq!(
        engine.dispatch_nearest_unit(&incident),
        DispatchResult::Dispatched {
            unit_id: "F-01".to_string(),
            location: "Grand Plaza Hotel".to_string(),
        }
    );

    // F-01 is busy, so the next fire goes to F-02
    let second = engine
        .create_incident_report("FIRE-2025-002", "Fire", 2, "Warehouse 9")
        .unwrap();
    assert_eq!(engine.dispatch_nearest_unit(&second).unit_id(), Some("F-02"));

    let third = engine
        .create_incident_report("FIRE-2025-003", "Fire", 2, "Bakery")
        .unwrap();
    assert!(matches!(
        engine.dispatch_nearest_unit(&third),
        DispatchResult::NoAvailableUnit { .. }
    ));

    let stats = engine.operational_stats();
    assert_eq!(stats.available_units, 3);
    assert_eq!(stats.readiness_percentage, 60.0);
    assert_eq!(stats.active_incidents, 3);
}

#[test]
fn test_hazmat_under_protected_for_major_spill() {
    let mut engine = city_engine();

    let spill = engine
        .create_incident_report("HAZ-01", "Hazmat", 5, "Chemical Plant")
        .unwrap();
    assert_eq!(
        engine.dispatch_nearest_unit(&spill),
        DispatchResult::Rejected {
            unit_id: "H-01".to_string()
        }
    );
    assert_eq!(engine.unit_status("H-01"), Some(UnitStatus::Idle));

    let minor = engine
        .create_incident_report("HAZ-02", "Radiation", 2, "Lab 4")
        .unwrap();
    assert!(engine.dispatch_nearest_unit(&minor).is_dispatched());
    assert_eq!(engine.unit_status("H-01"), Some(UnitStatus::OnScene));
}

#[test]
fn test_water_exhaustion_and_recovery() {
    let mut engine = city_engine();

    let unit = engine.registry_mut().get_unit_mut("F-01").unwrap();
    unit.consume_water(6_000).unwrap();
    assert_eq!(unit.status(), UnitStatus::Maintenance);

    let incident = engine
        .create_incident_report("FIRE-1", "Fire", 3, "Mall")
        .unwrap();
    assert_eq!(engine.dispatch_nearest_unit(&incident).unit_id(), Some("F-02"));

    let unit = engine.registry_mut().get_unit_mut("F-01").unwrap();
    unit.refill().unwrap();
    unit.finish_repair().unwrap();

    let incident = engine
        .create_incident_report("FIRE-2", "Fire", 3, "School")
        .unwrap();
    assert_eq!(engine.dispatch_nearest_unit(&incident).unit_id(), Some("F-01"));
}

#[test]
fn test_resolve_cycle_restores_readiness() {
    let mut engine = city_engine();

    let incident = engine
        .create_incident_report("MED-1", "Medical", 3, "Central Park")
        .unwrap();
    engine.dispatch_nearest_unit(&incident);
    assert_eq!(engine.operational_stats().available_units, 4);

    engine.resolve_incident("MED-1", "A-01").unwrap();
    assert_eq!(engine.operational_stats().available_units, 5);
    assert_eq!(engine.total_active_cases(), 0);

    // archived history is kept after resolution, and stats count it
    assert_eq!(engine.registry().get_incident_history().len(), 1);
    assert_eq!(engine.operational_stats().active_incidents, 1);
}

#[test]
fn test_resolve_rejects_a_unit_sent_elsewhere() {
    init_test_logging();
    let mut engine = city_engine();

    let med = engine
        .create_incident_report("MED-1", "Medical", 3, "Central Park")
        .unwrap();
    let fire = engine
        .create_incident_report("FIRE-1", "Fire", 3, "Mall")
        .unwrap();
    engine.dispatch_nearest_unit(&med);
    engine.dispatch_nearest_unit(&fire);

    let err = engine.resolve_incident("MED-1", "F-01").unwrap_err();
    assert!(matches!(err, Error::UnitNotAssigned { .. }));
    assert_eq!(engine.unit_status("A-01"), Some(UnitStatus::OnScene));
    assert_eq!(engine.unit_status("F-01"), Some(UnitStatus::OnScene));
    assert_eq!(engine.total_active_cases(), 2);
}

#[test]
fn test_invalid_status_write_rejected() {
    let mut engine = city_engine();

    let unit = engine.registry_mut().get_unit_mut("P-01").unwrap();
    let err = unit.set_status_str("Patrolling").unwrap_err();
    assert!(err.is_validation());
    assert_eq!(engine.unit_status("P-01"), Some(UnitStatus::Idle));
}

#[test]
fn test_severity_boundaries_at_intake() {
    let mut engine = city_engine();

    for (severity, accepted) in [(0, false), (1, true), (5, true), (6, false)] {
        let result = engine.create_incident_report("B-1", "Medical", severity, "Park");
        assert_eq!(result.is_ok(), accepted, "severity {severity}");
        if let Err(err) = result {
            assert!(matches!(err, Error::InvalidSeverity(_)));
        }
    }
}

#[test]
fn test_tie_break_is_stable_across_runs() {
    let picks: Vec<_> = (0..5)
        .map(|_| {
            let mut engine = city_engine();
            let incident = engine
                .create_incident_report("FIRE-X", "Fire", 3, "Mall")
                .unwrap();
            engine
                .dispatch_nearest_unit(&incident)
                .unit_id()
                .map(str::to_string)
        })
        .collect();

    assert!(picks.iter().all(|p| p.as_deref() == Some("F-01")));
}

#[test]
fn test_activity_logs_are_chained() {
    let mut engine = city_engine();
    let incident = engine
        .create_incident_report("SEC-1", "Security", 5, "City Bank")
        .unwrap();
    engine.dispatch_nearest_unit(&incident);

    assert!(engine.activity_log().verify_chain());
    assert!(engine.registry().system_log().verify_chain());

    let rendered = engine.recent_activity(1)[0].to_string();
    assert!(rendered.starts_with('['));
    assert!(rendered.ends_with("Dispatch successful: P-01 dispatched to City Bank (incident SEC-1)"));
}

#[test]
fn test_stats_serialise_for_presentation() {
    let engine = city_engine();
    let json = serde_json::to_value(engine.operational_stats()).unwrap();

    assert_eq!(json["total_units"], 5);
    assert_eq!(json["readiness_level"], "Optimal");
}
