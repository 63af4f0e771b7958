use std::{process, sync::Arc};

use relay_irc::{registry::Registry, server, settings::Settings, telemetry, ServerContext};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    telemetry::init("info");

    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let settings = Settings::new()?;
    let context = ServerContext::new(settings);

    let listener = server::bind(&context).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind {}:{}: {}",
            context.settings.host,
            context.settings.port,
            e
        )
    })?;

    info!(port = context.settings.port, "IRC server running");

    server::run_server(context, listener, Arc::new(Registry::new())).await?;
    Ok(())
}
