//! `fleetspec variables`: print the effective bindings for a target.

use super::ResolveArgs;
use clap::Args;
use fleetspec_overlay::TaskResolver;

#[derive(Args)]
pub struct VariablesArgs {
    #[command(flatten)]
    resolve: ResolveArgs,
}

pub fn run(args: VariablesArgs) -> anyhow::Result<()> {
    let root = args.resolve.project_root()?;
    let target = args.resolve.target()?;

    let resolver = TaskResolver::new(root);
    let bindings = resolver.resolve_variables(&target, &args.resolve.overrides())?;
    print!("{}", serde_yaml::to_string(&bindings)?);
    Ok(())
}
