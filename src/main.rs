use std::process::ExitCode;
use std::sync::Arc;

use contention_classifier::api::{self, ApiContext};
use contention_classifier::config::{self, AppConfig};
use contention_classifier::core_state::ClassifierContext;
use contention_classifier::pipeline::stats::TracingSink;

fn main() -> ExitCode {
    contention_classifier::init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Classifier failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let addr = config.socket_addr()?;

    // Tables load and the blocking ML client is built before any runtime exists.
    let core = Arc::new(ClassifierContext::from_config(&config)?);
    let ctx = ApiContext::new(core, Arc::new(TracingSink), config.ml.clone());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let server = api::start_server(ctx, addr).await?;
        tracing::info!(addr = %server.addr, "Classifier listening");

        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for shutdown signal");
        }
        server.shutdown().await;
        Ok::<_, std::io::Error>(())
    })?;

    Ok(())
}
