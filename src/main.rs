use std::error::Error;
use std::time::Duration;

use clap::Parser;
use request_race::{Config, Spawner, MAX_DURATION, MAX_REQUESTS, MIN_DURATION};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "request-race", version)]
#[command(about = "Race a batch of simulated requests and keep the first success")]
struct Cli {
    /// Upper bound of the request count; at least one request is always made
    #[arg(long, default_value_t = MAX_REQUESTS)]
    max_requests: usize,

    /// Shortest simulated request latency, in milliseconds
    #[arg(long, default_value_t = MIN_DURATION.as_millis() as u64)]
    min_duration_ms: u64,

    /// Longest simulated request latency, in milliseconds
    #[arg(long, default_value_t = MAX_DURATION.as_millis() as u64)]
    max_duration_ms: u64,
}

fn main() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::default()
        .with_max_requests(cli.max_requests)
        .with_durations(
            Duration::from_millis(cli.min_duration_ms),
            Duration::from_millis(cli.max_duration_ms),
        );
    let spawner = Spawner::new(config)?;

    let response = async_io::block_on(request_race::run(&spawner));
    println!("Response: {response}");
    Ok(())
}
