use anyhow::Context;
use tokio::net::TcpListener;

use imgpress_server::Config;

mod cli;
mod logging;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("unable to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }

    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // a missing .env file is fine, settings may come from the environment
    dotenv::dotenv().ok();

    let args = cli::CliOptions::parse()?;
    logging::init(args.verbose)?;

    let config = Config::from_options(args.bind.as_deref(), args.max_upload_mb)?;

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("unable to bind {}", config.bind))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        max_upload_bytes = config.max_upload_bytes,
        "imgpress-server {} listening",
        env!("CARGO_PKG_VERSION")
    );

    imgpress_server::serve(listener, &config, shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Goodbye.");

    Ok(())
}
