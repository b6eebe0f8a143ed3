use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use graphql_hello_bench::config::LoggingConfig;
use graphql_hello_bench::graphql::workload::{run_benchmark, Workload};
use graphql_hello_bench::logging;

#[derive(Parser)]
#[command(name = "executor_bench")]
#[command(about = "Time GraphQL query execution in-process, without HTTP")]
#[command(version)]
struct Cli {
    /// Schema and query to execute
    #[arg(long, value_enum, default_value_t = Workload::Example)]
    workload: Workload,

    /// Number of timed executions
    #[arg(short = 'n', long, default_value_t = 10_000)]
    iterations: u64,

    /// Untimed executions run first
    #[arg(long, default_value_t = 100)]
    warmup: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let _guard = logging::init_logging(&LoggingConfig::default()).context("initializing logging")?;

    info!(workload = ?cli.workload, iterations = cli.iterations, warmup = cli.warmup, "starting executor benchmark");

    let report = run_benchmark(cli.workload, cli.iterations, cli.warmup)
        .await
        .context("benchmark aborted")?;

    info!(
        ns_per_op = report.ns_per_op,
        ops_per_sec = report.ops_per_sec,
        "benchmark finished"
    );
    println!("{}", serde_json::to_string(&report)?);

    Ok(())
}
