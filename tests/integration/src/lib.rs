//! Cross-crate integration tests
//!
//! This test suite validates:
//! - Config-driven fleet registration feeding the dispatch engine
//! - End-to-end incident intake, dispatch, planning and recovery
//! - Readiness statistics across the unit lifecycle
//! - Serialised dispatch through the worker under concurrent load

pub mod test_utils;

#[cfg(test)]
mod dispatch_scenarios;

#[cfg(test)]
mod worker_load_tests;
