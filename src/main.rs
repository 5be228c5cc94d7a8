use std::sync::Arc;

use tokio::io::BufReader;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use resume_tracker::config::Config;
use resume_tracker::console::{ConsolePage, run_console};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("tracker-console")
        .enable_all()
        .build()?;

    let result = runtime.block_on(run(config));

    // A stdin read parked on the blocking pool can't be cancelled; don't wait for it
    runtime.shutdown_background();
    result
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Using backend at {}", config.base_url);

    let state = resume_tracker::build_state(config, Arc::new(ConsolePage))?;

    if resume_tracker::start(&state).await.is_err() {
        eprintln!("! Initial load failed; use `refresh` to retry");
    }

    let interrupted = async {
        let _ = signal::ctrl_c().await;
    };
    run_console(&state, BufReader::new(tokio::io::stdin()), interrupted).await?;
    Ok(())
}
