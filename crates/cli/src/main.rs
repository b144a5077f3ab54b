//! `atelier`: headless front-end for the grid maker and the portrait
//! retouch generator.

mod args;
mod catalog;
mod grid;
mod retouch;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::{Cli, Command};

const DEFAULT_LOG_FILTER: &str = "atelier=info,atelier_grid=info,atelier_generation=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match cli.command {
        Command::Grid(args) => grid::run(args),
        Command::Retouch(args) => retouch::run(args).await,
        Command::Catalog => catalog::run(),
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
