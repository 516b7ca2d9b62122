//! `fleetspec generate`: print the final task document for a target.

use super::ResolveArgs;
use clap::Args;
use fleetspec_overlay::TaskResolver;

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    resolve: ResolveArgs,

    /// Task name to resolve
    #[arg(short, long)]
    task: String,
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let root = args.resolve.project_root()?;
    let target = args.resolve.target()?;

    let resolver = TaskResolver::new(root);
    let bindings = resolver.resolve_variables(&target, &args.resolve.overrides())?;
    let task = resolver.resolve_task(&target, &args.task, &bindings)?;
    print!("{}", serde_yaml::to_string(&task)?);
    Ok(())
}
