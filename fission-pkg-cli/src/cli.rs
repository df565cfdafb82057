//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use fission_pkg::config::SERVER_URL_ENV;
use fission_pkg::core::DEFAULT_NAMESPACE;

/// Register and inspect Fission packages
#[derive(Debug, Parser)]
#[command(name = "fission-pkg")]
#[command(about = "Register and inspect Fission packages", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Fission control-plane URL
    #[arg(long, global = true, env = SERVER_URL_ENV, default_value = "")]
    pub server: String,

    /// Namespace for packages and environment references
    #[arg(long, global = true, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<f64>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a package from local files
    Create(CreateArgs),
    /// Show a package as JSON
    Get {
        /// Package name
        #[arg(long)]
        name: String,
    },
    /// List packages
    List,
    /// Delete a package
    Delete {
        /// Package name
        #[arg(long)]
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Environment the package runs in
    #[arg(long = "env")]
    pub environment: String,

    /// Source archive to be built by the builder
    #[arg(long = "src")]
    pub source: Option<PathBuf>,

    /// Deployment archive, runnable as-is
    #[arg(long = "deploy")]
    pub deployment: Option<PathBuf>,

    /// Custom build command
    #[arg(long = "buildcmd")]
    pub build_command: Option<String>,

    /// Package description
    #[arg(long = "desc", default_value = "")]
    pub description: String,
}
