use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use graphql_hello_bench::config::{Config, Overrides};
use graphql_hello_bench::graphql::create_schema;
use graphql_hello_bench::{logging, metrics, server};

#[derive(Parser)]
#[command(name = "graphql_hello_bench")]
#[command(about = "Minimal GraphQL-over-HTTP server for load testing")]
#[command(version)]
struct Cli {
    /// TOML config file; flags take precedence over its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Optional; lets RUST_LOG live in a .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };
    config.apply_overrides(&cli.overrides);

    let _guard = logging::init_logging(&config.logging).context("initializing logging")?;
    info!(?config, "starting GraphQL benchmark server");

    let metrics_handle = if config.metrics.enabled {
        Some(metrics::install_recorder()?)
    } else {
        None
    };

    let app = server::create_server(&config.server, create_schema(), metrics_handle);

    let bound = match server::bind(config.server.socket_addr(), app) {
        Ok(bound) => bound,
        Err(e) => {
            error!(error = %e, "failed to start listener");
            return Err(e.into());
        }
    };

    println!("Benchmark app listening on port {}!", bound.local_addr().port());

    bound.run_until(server::shutdown_signal()).await?;
    Ok(())
}
