//! `fission-pkg`: register and inspect Fission packages.
//!
//! Any error is printed as a single line on stderr and the process exits
//! with status 1.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use fission_pkg::client::resolve_client;
use fission_pkg::config::ClientConfig;
use fission_pkg::package::ArchiveBuilder;

mod cli;
mod commands;

use cli::{Cli, Command};

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fission_pkg=warn".into());
    let layer = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    tracing_subscriber::registry().with(filter).with(layer).init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::resolve(Some(cli.server.as_str())).with_namespace(&cli.namespace);
    if let Some(seconds) = cli.timeout {
        config = config.with_timeout(seconds);
    }
    let controller = resolve_client(&config)?;
    tracing::debug!(command = ?cli.command, namespace = %config.namespace, "Dispatching command");
    let mut out = std::io::stdout().lock();

    match cli.command {
        Command::Create(args) => {
            let storage = controller.storage_client()?;
            let builder =
                ArchiveBuilder::new(&storage).with_literal_size_limit(config.literal_size_limit);
            commands::run_create(&controller, &builder, &config.namespace, args, &mut out).await
        }
        Command::Get { name } => {
            commands::run_get(&controller, &config.namespace, &name, &mut out).await
        }
        Command::List => commands::run_list(&controller, &mut out).await,
        Command::Delete { name } => {
            commands::run_delete(&controller, &config.namespace, &name, &mut out).await
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    if let Err(err) = run(cli).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
