//! fleetspec command-line interface.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fleetspec", about = "Hierarchical workload specifications and fleet deployment")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective variables for a target path
    Variables(commands::variables::VariablesArgs),

    /// Generate the final task document for a target path
    Generate(commands::generate::GenerateArgs),

    /// Register a task revision, diff it against live targets and
    /// reconcile them (runs against the built-in development backend)
    Deploy(commands::deploy::DeployArgs),

    /// Watch a task's targets until they converge, fail or time out
    /// (runs against the built-in development backend)
    Watch(commands::watch::WatchArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Variables(args) => commands::variables::run(args),
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Deploy(args) => commands::deploy::run(args).await,
        Commands::Watch(args) => commands::watch::run(args).await,
    }
}
