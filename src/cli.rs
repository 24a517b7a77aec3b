use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "groupctl")]
#[command(version)]
#[command(about = "Declarative lifecycle management for remote directory groups", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show what apply would change, without changing anything
    Plan(PlanArgs),

    /// Reconcile remote groups with the manifest
    Apply(ApplyArgs),

    /// Look up one group by name or server id
    Get(GetArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct PlanArgs {
    /// Manifest file declaring the desired groups
    #[arg(short, long, default_value = "groupctl.json", env = "GROUPCTL_CONFIG")]
    pub config: PathBuf,

    /// State file tracking observed groups
    #[arg(short, long, default_value = "groupctl.state.json", env = "GROUPCTL_STATE")]
    pub state: PathBuf,

    /// Plan against the state file as-is, without refreshing from the service
    #[arg(long)]
    pub no_refresh: bool,

    /// Per-operation timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Manifest file declaring the desired groups
    #[arg(short, long, default_value = "groupctl.json", env = "GROUPCTL_CONFIG")]
    pub config: PathBuf,

    /// State file tracking observed groups
    #[arg(short, long, default_value = "groupctl.state.json", env = "GROUPCTL_STATE")]
    pub state: PathBuf,

    /// Apply against the state file as-is, without refreshing from the service
    #[arg(long)]
    pub no_refresh: bool,

    /// Dry run - plan and report, but change nothing
    #[arg(short, long)]
    pub dry_run: bool,

    /// Per-operation timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,
}

#[derive(Args)]
pub struct GetArgs {
    /// Group name or server id to resolve
    pub identifier: String,

    /// Manifest file providing the connection settings
    #[arg(short, long, default_value = "groupctl.json", env = "GROUPCTL_CONFIG")]
    pub config: PathBuf,

    /// Per-operation timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,
}
