//! civicdispatch dispatch core
//!
//! This crate provides:
//! - The [`UnitRegistry`] seam and an in-memory implementation
//! - The first-eligible-match [`DispatchEngine`]
//! - Deterministic intervention plans
//! - A single-task [`DispatchWorker`] for concurrent hosts
//!
//! # Examples
//!
//! ```
//! use civicdispatch_dispatch::{DispatchEngine, DispatchResult, InMemoryRegistry};
//! use civicdispatch_domain::Unit;
//!
//! let mut engine = DispatchEngine::new(InMemoryRegistry::new());
//! engine.register_unit(Unit::fire("F-01", "Central Station", 5_000).unwrap()).unwrap();
//!
//! let incident = engine
//!     .create_incident_report("FIRE-2025-001", "Fire", 4, "Grand Plaza Hotel")
//!     .unwrap();
//! let result = engine.dispatch_nearest_unit(&incident);
//! assert!(matches!(result, DispatchResult::Dispatched { .. }));
//! ```

pub mod engine;
pub mod plan;
pub mod registry;
pub mod worker;

pub use engine::{DispatchEngine, DispatchResult};
pub use plan::{generate_intervention_plan, render_plan, PLAN_TRAILER};
pub use registry::{InMemoryRegistry, OperationalStats, ReadinessLevel, UnitRegistry};
pub use worker::{DispatchHandle, DispatchWorker};
