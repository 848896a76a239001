//! Dispatch worker under concurrent callers

use civicdispatch_dispatch::{DispatchResult, DispatchWorker};
use civicdispatch_domain::UnitStatus;
use std::collections::HashSet;

use crate::test_utils::{city_engine, init_test_logging};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_fire_reports_claim_each_engine_once() {
    init_test_logging();
    let (handle, task) = DispatchWorker::spawn(city_engine(), 16);

    let mut callers = Vec::new();
    for i in 0..20 {
        let handle = handle.clone();
        callers.push(tokio::spawn(async move {
            let incident = handle
                .create_incident(&format!("FIRE-{i:03}"), "Fire", 3, "Old Town")
                .await
                .unwrap();
            handle.dispatch(incident).await.unwrap()
        }));
    }

    let mut claimed = Vec::new();
    let mut none_left = 0;
    for caller in callers {
        match caller.await.unwrap() {
            DispatchResult::Dispatched { unit_id, .. } => claimed.push(unit_id),
            DispatchResult::NoAvailableUnit { .. } => none_left += 1,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    let unique: HashSet<_> = claimed.iter().cloned().collect();
    assert_eq!(claimed.len(), 2);
    assert_eq!(unique.len(), 2);
    assert_eq!(none_left, 18);

    assert_eq!(
        handle.unit_status("F-01").await.unwrap(),
        Some(UnitStatus::OnScene)
    );
    assert_eq!(
        handle.unit_status("A-01").await.unwrap(),
        Some(UnitStatus::Idle)
    );

    drop(handle);
    let engine = task.await.unwrap();
    assert_eq!(engine.total_active_cases(), 20);
    assert!(engine.activity_log().verify_chain());
}

#[tokio::test]
async fn test_mixed_workload_through_handle() {
    let (handle, _task) = DispatchWorker::spawn(city_engine(), 4);

    let med = handle
        .create_incident("MED-1", "Medical", 2, "Station Square")
        .await
        .unwrap();
    let sec = handle
        .create_incident("SEC-1", "Security", 4, "Stadium")
        .await
        .unwrap();

    let (med_result, sec_result) = tokio::join!(handle.dispatch(med), handle.dispatch(sec));
    assert_eq!(med_result.unwrap().unit_id(), Some("A-01"));
    assert_eq!(sec_result.unwrap().unit_id(), Some("P-01"));

    let stats = handle.stats().await.unwrap();
    assert_eq!(stats.available_units, 3);

    handle.resolve("SEC-1", "P-01").await.unwrap();
    let recent = handle.recent_activity(1).await.unwrap();
    assert!(recent[0].ends_with("Incident SEC-1 resolved, unit P-01 back in service"));
}
