//! Single dispatch worker
//!
//! One tokio task owns the [`DispatchEngine`] and serves requests from any
//! number of [`DispatchHandle`] clones, one at a time. That serialises every
//! filter-select-respond sequence, so two concurrent dispatches can never
//! both claim the same idle unit.

use civicdispatch_core::{Error, Result};
use civicdispatch_domain::{Incident, Unit, UnitStatus};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::engine::{DispatchEngine, DispatchResult};
use crate::registry::{OperationalStats, UnitRegistry};

enum Request {
    RegisterUnit {
        unit: Unit,
        reply: oneshot::Sender<Result<()>>,
    },
    CreateIncident {
        incident_id: String,
        incident_type: String,
        severity: i64,
        location: String,
        reply: oneshot::Sender<Result<Incident>>,
    },
    Dispatch {
        incident: Incident,
        reply: oneshot::Sender<DispatchResult>,
    },
    GeneratePlan {
        incident: Incident,
        unit_id: String,
        reply: oneshot::Sender<Option<String>>,
    },
    UnitStatus {
        unit_id: String,
        reply: oneshot::Sender<Option<UnitStatus>>,
    },
    Resolve {
        incident_id: String,
        unit_id: String,
        reply: oneshot::Sender<Result<Incident>>,
    },
    Stats {
        reply: oneshot::Sender<OperationalStats>,
    },
    RecentActivity {
        count: usize,
        reply: oneshot::Sender<Vec<String>>,
    },
}

/// Spawns the task that owns the engine
pub struct DispatchWorker;

impl DispatchWorker {
    /// Move `engine` onto a tokio task.
    ///
    /// The task ends once every handle is dropped and hands the engine back
    /// through the returned `JoinHandle`. Must be called inside a runtime.
    pub fn spawn<R>(
        engine: DispatchEngine<R>,
        queue_depth: usize,
    ) -> (DispatchHandle, JoinHandle<DispatchEngine<R>>)
    where
        R: UnitRegistry + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(queue_depth.max(1));
        let task = tokio::spawn(run(engine, rx));
        info!(queue_depth, "dispatch worker started");
        (DispatchHandle { tx }, task)
    }
}

async fn run<R: UnitRegistry>(
    mut engine: DispatchEngine<R>,
    mut rx: mpsc::Receiver<Request>,
) -> DispatchEngine<R> {
    while let Some(request) = rx.recv().await {
        handle(&mut engine, request);
    }
    debug!("all dispatch handles dropped, worker stopping");
    engine
}

// A dropped reply receiver just means the caller went away.
fn handle<R: UnitRegistry>(engine: &mut DispatchEngine<R>, request: Request) {
    match request {
        Request::RegisterUnit { unit, reply } => {
            let _ = reply.send(engine.register_unit(unit));
        }
        Request::CreateIncident {
            incident_id,
            incident_type,
            severity,
            location,
            reply,
        } => {
            let _ = reply.send(engine.create_incident_report(
                &incident_id,
                &incident_type,
                severity,
                &location,
            ));
        }
        Request::Dispatch { incident, reply } => {
            let _ = reply.send(engine.dispatch_nearest_unit(&incident));
        }
        Request::GeneratePlan {
            incident,
            unit_id,
            reply,
        } => {
            let _ = reply.send(engine.plan_for(&incident, &unit_id));
        }
        Request::UnitStatus { unit_id, reply } => {
            let _ = reply.send(engine.unit_status(&unit_id));
        }
        Request::Resolve {
            incident_id,
            unit_id,
            reply,
        } => {
            let _ = reply.send(engine.resolve_incident(&incident_id, &unit_id));
        }
        Request::Stats { reply } => {
            let _ = reply.send(engine.operational_stats());
        }
        Request::RecentActivity { count, reply } => {
            let lines = engine
                .recent_activity(count)
                .iter()
                .map(|e| e.to_string())
                .collect();
            let _ = reply.send(lines);
        }
    }
}

/// Cloneable client for the dispatch worker
#[derive(Debug, Clone)]
pub struct DispatchHandle {
    tx: mpsc::Sender<Request>,
}

impl DispatchHandle {
    async fn call<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Request) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| Error::WorkerClosed)?;
        rx.await.map_err(|_| Error::WorkerClosed)
    }

    pub async fn register_unit(&self, unit: Unit) -> Result<()> {
        self.call(|reply| Request::RegisterUnit { unit, reply })
            .await?
    }

    pub async fn create_incident(
        &self,
        incident_id: &str,
        incident_type: &str,
        severity: i64,
        location: &str,
    ) -> Result<Incident> {
        self.call(|reply| Request::CreateIncident {
            incident_id: incident_id.to_string(),
            incident_type: incident_type.to_string(),
            severity,
            location: location.to_string(),
            reply,
        })
        .await?
    }

    pub async fn dispatch(&self, incident: Incident) -> Result<DispatchResult> {
        self.call(|reply| Request::Dispatch { incident, reply })
            .await
    }

    /// Plan for a registered unit; `None` if the unit id is unknown
    pub async fn generate_plan(&self, incident: Incident, unit_id: &str) -> Result<Option<String>> {
        self.call(|reply| Request::GeneratePlan {
            incident,
            unit_id: unit_id.to_string(),
            reply,
        })
        .await
    }

    pub async fn unit_status(&self, unit_id: &str) -> Result<Option<UnitStatus>> {
        self.call(|reply| Request::UnitStatus {
            unit_id: unit_id.to_string(),
            reply,
        })
        .await
    }

    pub async fn resolve(&self, incident_id: &str, unit_id: &str) -> Result<Incident> {
        self.call(|reply| Request::Resolve {
            incident_id: incident_id.to_string(),
            unit_id: unit_id.to_string(),
            reply,
        })
        .await?
    }

    pub async fn stats(&self) -> Result<OperationalStats> {
        self.call(|reply| Request::Stats { reply }).await
    }

    /// Newest `count` activity lines, rendered, oldest first
    pub async fn recent_activity(&self, count: usize) -> Result<Vec<String>> {
        self.call(|reply| Request::RecentActivity { count, reply })
            .await
    }
}
