//! `fleetspec deploy`: register a revision, show per-target diffs and
//! reconcile every target with a non-empty diff.

use super::ResolveArgs;
use anyhow::bail;
use clap::Args;
use colored::Colorize;
use fleetspec_deploy::{canonicalize_keys, DeployConfig, DeploymentDiffer, ReconcileDriver};
use fleetspec_orchestrator::{InMemoryOrchestrator, Orchestrator};
use fleetspec_overlay::{TaskResolver, TASKS_DIR};
use std::sync::Arc;
use tracing::info;

#[derive(Args)]
pub struct DeployArgs {
    #[command(flatten)]
    resolve: ResolveArgs,

    /// Task name to deploy
    #[arg(short, long)]
    task: String,

    /// Register the revision and print diffs without updating any
    /// target
    #[arg(long)]
    register_only: bool,
}

pub async fn run(args: DeployArgs) -> anyhow::Result<()> {
    let root = args.resolve.project_root()?;
    let target = args.resolve.target()?;

    let config = DeployConfig::load(&target.resolve_under(&root.join(TASKS_DIR)))?;
    let targets = config.targets(&args.task);
    if targets.is_empty() {
        bail!("no deploy targets configured for task {:?}", args.task);
    }

    let resolver = TaskResolver::new(root);
    let bindings = resolver.resolve_variables(&target, &args.resolve.overrides())?;
    let document = resolver.resolve_task(&target, &args.task, &bindings)?;
    let content = canonicalize_keys(serde_json::to_value(&document)?);

    // development backend; a real provider implements the same traits
    let orchestrator = Arc::new(InMemoryOrchestrator::new());
    let revision = orchestrator.register_revision(&args.task, content).await?;
    info!(revision = %revision.id, "revision registered");

    let differ = DeploymentDiffer::new(orchestrator.clone(), orchestrator.clone());
    let diffs = differ.diff(&targets, &revision).await?;
    for (target, diff) in &diffs {
        println!("Deploy to {target}");
        if diff.is_empty() {
            println!("  already up to date");
        } else {
            print_diff(diff);
        }
    }

    if args.register_only {
        return Ok(());
    }

    let driver = ReconcileDriver::new(orchestrator.clone(), orchestrator.clone());
    let summary = driver.apply(&diffs, &revision).await;
    for report in &summary.reports {
        println!("{}: {}", report.target, report.outcome);
    }
    if summary.has_failures() {
        bail!("{} target(s) failed to update", summary.failed().len());
    }
    Ok(())
}

fn print_diff(text: &str) {
    for line in text.lines() {
        if line.starts_with('+') && !line.starts_with("+++") {
            println!("{}", line.green());
        } else if line.starts_with('-') && !line.starts_with("---") {
            println!("{}", line.red());
        } else {
            println!("{line}");
        }
    }
}
