use anyhow::{bail, Context};
use civicdispatch_core::{logging, Config};
use civicdispatch_dispatch::{DispatchEngine, DispatchWorker, InMemoryRegistry};
use civicdispatch_domain::Unit;
use serde::Serialize;
use std::path::PathBuf;

mod scenario;

use scenario::Scenario;

const NODE_RUNTIME_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct NodeVersionHandshake {
    version: &'static str,
    runtime_version: u32,
}

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    scenario: Option<PathBuf>,
    json: bool,
    version_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args(std::env::args().skip(1))?;

    if args.version_json {
        let handshake = NodeVersionHandshake {
            version: env!("CARGO_PKG_VERSION"),
            runtime_version: NODE_RUNTIME_VERSION,
        };
        println!("{}", serde_json::to_string(&handshake)?);
        return Ok(());
    }

    let config_path = args
        .config
        .context("missing required --config <path> argument")?;
    let config = Config::from_file(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    logging::init_with(&config.logging);

    let mut engine = DispatchEngine::with_log_capacity(
        InMemoryRegistry::with_log_capacity(config.dispatch.audit_log_capacity),
        config.dispatch.audit_log_capacity,
    );
    for spec in &config.units {
        let unit = Unit::from_spec(spec).with_context(|| format!("unit {}", spec.id))?;
        engine.register_unit(unit)?;
    }
    tracing::info!(
        units = config.units.len(),
        config = %config_path.display(),
        "dispatch node started"
    );

    let scenario = match &args.scenario {
        Some(path) => Scenario::from_file(path)?,
        None => Scenario::demo(),
    };

    let (handle, worker) = DispatchWorker::spawn(engine, config.dispatch.worker_queue_depth);
    let mut stdout = std::io::stdout();
    scenario::run(&handle, &scenario, args.json, &mut stdout).await?;

    drop(handle);
    let engine = worker.await.context("dispatch worker panicked")?;
    tracing::info!(
        active_incidents = engine.total_active_cases(),
        "dispatch node finished"
    );
    Ok(())
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => match args.next() {
                Some(path) => parsed.config = Some(PathBuf::from(path)),
                None => bail!("--config was provided without a path"),
            },
            "--scenario" => match args.next() {
                Some(path) => parsed.scenario = Some(PathBuf::from(path)),
                None => bail!("--scenario was provided without a path"),
            },
            "--json" => parsed.json = true,
            "--version-json" => parsed.version_json = true,
            other => bail!("unrecognised argument {other}"),
        }
    }
    Ok(parsed)
}
