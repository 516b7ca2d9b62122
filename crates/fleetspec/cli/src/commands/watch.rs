//! `fleetspec watch`: wait until a task's targets converge, fail or
//! time out.

use super::ResolveArgs;
use anyhow::bail;
use clap::Args;
use colored::Colorize;
use fleetspec_deploy::DeployConfig;
use fleetspec_orchestrator::InMemoryOrchestrator;
use fleetspec_overlay::TASKS_DIR;
use fleetspec_watch::{WatchState, Watcher};
use std::sync::Arc;
use std::time::Duration;

#[derive(Args)]
pub struct WatchArgs {
    #[command(flatten)]
    resolve: ResolveArgs,

    /// Task whose service targets to watch
    #[arg(short, long)]
    task: String,

    /// Seconds between samples
    #[arg(long, default_value_t = 10)]
    interval: u64,

    /// Seconds before a still-polling target is reported as timed out
    #[arg(long, default_value_t = 600)]
    timeout: u64,
}

pub async fn run(args: WatchArgs) -> anyhow::Result<()> {
    let root = args.resolve.project_root()?;
    let target = args.resolve.target()?;

    let config = DeployConfig::load(&target.resolve_under(&root.join(TASKS_DIR)))?;
    let grouped = config.services_by_cluster(&args.task);
    if grouped.is_empty() {
        bail!("no service targets configured for task {:?}", args.task);
    }

    // development backend; a real provider implements the same traits
    let orchestrator = Arc::new(InMemoryOrchestrator::new());
    let watcher = Watcher::new(
        orchestrator,
        Duration::from_secs(args.interval),
        Duration::from_secs(args.timeout),
    );

    let mut receivers: Vec<_> = grouped
        .iter()
        .map(|(cluster, services)| watcher.watch(cluster, services.clone()))
        .collect();

    let mut unconverged = 0usize;
    for rx in &mut receivers {
        while let Some(result) = rx.recv().await {
            let place = format!("[cluster: {}, service: {}]", result.cluster, result.service);
            let detail = result.detail.unwrap_or_default();
            match result.state {
                WatchState::Converged => println!("{} {place}", "Deployed".green()),
                WatchState::DeployFailed => {
                    println!("{} {place}: {detail}", "Failed to deploy".red());
                    unconverged += 1;
                }
                WatchState::Errored => {
                    println!("{} {place}: {detail}", "Error watching".red());
                    unconverged += 1;
                }
                WatchState::TimedOut => {
                    println!("{} {place}", "Timed out waiting for".yellow());
                    unconverged += 1;
                }
                WatchState::Polling => {}
            }
        }
    }

    if unconverged > 0 {
        bail!("{unconverged} target(s) did not converge");
    }
    Ok(())
}
