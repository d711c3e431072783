use anyhow::Context;
use tokio::net::TcpListener;

mod common;
mod config;
mod logging;
mod middlewares;
mod models;
mod routes;
mod server;
mod services;
mod state;
#[cfg(test)]
mod test_support;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load()?;
    logging::registry_logs(config.logs.level, config.logs.file_path())?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    server::run_until_done(&config, listener).await
}
