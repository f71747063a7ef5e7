//! Ownership of the single live connection.

use crate::config::DatabaseConfig;
use crate::error::{CallError, CallResult};
use tokio_postgres::NoTls;

/// Owns the one connection of a request lifecycle.
///
/// Construction establishes the connection; a failure here is unrecoverable,
/// with no retry and no fallback. Statements issue sequentially through this
/// handle; concurrent requests must each construct their own `Database`.
///
/// Release happens exactly once: dropping the handle (or calling
/// [`close`](Database::close), which also waits for the connection task to
/// wind down) closes the connection. Consuming `self` makes a double release
/// unrepresentable.
pub struct Database {
    client: tokio_postgres::Client,
    driver: Option<tokio::task::JoinHandle<()>>,
}

impl Database {
    /// Establish the connection and spawn its driver task.
    pub async fn connect(config: &DatabaseConfig) -> CallResult<Self> {
        let (client, connection) = config
            .pg_config()
            .connect(NoTls)
            .await
            .map_err(|e| CallError::Connection(e.to_string()))?;
        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(target: "pgcall.db", error = %e, "database connection terminated");
            }
        });
        tracing::debug!(target: "pgcall.db", host = %config.host, dbname = %config.dbname, "connected");
        Ok(Self {
            client,
            driver: Some(driver),
        })
    }

    pub(crate) fn client(&self) -> &tokio_postgres::Client {
        &self.client
    }

    /// Release the connection and wait for the driver task to finish.
    pub async fn close(mut self) {
        let driver = self.driver.take();
        drop(self);
        if let Some(driver) = driver {
            let _ = driver.await;
        }
    }
}
