//! Subcommand implementations and the arguments they share.

pub mod deploy;
pub mod generate;
pub mod variables;
pub mod watch;

use anyhow::Context;
use clap::Args;
use fleetspec_types::TargetPath;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Arguments shared by every command that resolves fragments.
#[derive(Args)]
pub struct ResolveArgs {
    /// Target path within the hierarchy, e.g. /app1/development
    #[arg(short, long, default_value = "/")]
    pub path: String,

    /// Project root holding tasks/ and containers/ (defaults to the
    /// current directory)
    #[arg(short, long, env = "FLEETSPEC_ROOT")]
    pub root_path: Option<PathBuf>,

    /// Variable override, KEY=VALUE (repeatable)
    #[arg(short = 'v', long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,
}

impl ResolveArgs {
    pub fn project_root(&self) -> anyhow::Result<PathBuf> {
        let root = match &self.root_path {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("cannot determine current directory")?,
        };
        root.canonicalize()
            .with_context(|| format!("project root {} is not accessible", root.display()))
    }

    pub fn target(&self) -> anyhow::Result<TargetPath> {
        Ok(TargetPath::new(&self.path)?)
    }

    pub fn overrides(&self) -> BTreeMap<String, String> {
        self.vars.iter().cloned().collect()
    }
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}
