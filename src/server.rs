use crate::config::Config;
use crate::{routes, state};
use anyhow::Context;
use sqlx::migrate::Migrator;
use sqlx::sqlite;
use std::path::Path;
use std::time::Duration;
use tokio::{net::TcpListener, signal, task::JoinSet};
use tokio_util::sync::CancellationToken;

static MIGRATOR: Migrator = sqlx::migrate!();

pub(crate) async fn connect_database(
    path: &Path,
    busy_timeout: Duration,
) -> anyhow::Result<sqlx::SqlitePool> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create database directory: {}", dir.display()))?;
    }
    let options = sqlite::SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(busy_timeout);
    let pool = sqlx::SqlitePool::connect_with(options)
        .await
        .with_context(|| format!("Failed to connect to SQLite database: {}", path.display()))?;
    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    Ok(pool)
}

/// Single connection in-memory database, migrated.
#[cfg(test)]
pub(crate) async fn connect_memory_database() -> sqlx::SqlitePool {
    use std::str::FromStr;
    let options = sqlite::SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    MIGRATOR.run(&pool).await.unwrap();
    pool
}

pub async fn run_until_done(config: &Config, bind: TcpListener) -> anyhow::Result<()> {
    let mut join_set = JoinSet::new();
    let shutdown_signal = CancellationToken::new();
    let pool = connect_database(
        &config.storage.database_path(),
        config.database_busy_timeout(),
    )
    .await?;
    let state = state::AppState::build(pool, config)?;
    tracing::info!(
        "Storing uploads in {:?}, analysis server at {}",
        config.storage.upload_dir(),
        config.analysis.url
    );
    // axum serve
    {
        let shutdown_signal = shutdown_signal.clone();
        let routes = routes::build(config.server.body_limit()).with_state(state);
        join_set.spawn(async move {
            axum::serve(bind, routes.into_make_service())
                .with_graceful_shutdown(async move {
                    shutdown_signal.cancelled().await;
                })
                .await
                .context("Server terminated unexpectedly")
        });
    }
    // register ctrl+c signal
    {
        let shutdown_signal = shutdown_signal.clone();
        join_set.spawn(async move {
            let _ = signal::ctrl_c().await;
            tracing::debug!("Received Ctrl+C, start terminating");
            shutdown_signal.cancel();
            Ok(())
        });
    }
    #[cfg(unix)]
    {
        let shutdown_signal = shutdown_signal.clone();
        join_set.spawn(async move {
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
            sigterm.recv().await;
            tracing::debug!("Received SIGTERM signal, start terminating");
            shutdown_signal.cancel();
            Ok(())
        });
    }
    while let Some(r) = join_set.join_next().await {
        if shutdown_signal.is_cancelled() {
            join_set.shutdown().await;
            break;
        }
        match r {
            Ok(Ok(_)) => (),
            Ok(Err(e)) => return Err(e),
            Err(e) => anyhow::bail!("Internal error in spawn: {e}"),
        }
    }
    tracing::info!("Server stopped");
    Ok(())
}
