use std::str::FromStr;
use std::time::Duration;

use cascade_core::config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub type DbPool = sqlx::SqlitePool;

/// Session pragmas applied to every pooled connection. Foreign keys keep the
/// catalog references honest; WAL plus a busy timeout let the CLI and tests
/// share one database file.
const SESSION_PRAGMAS: &[(&str, &str)] =
    &[("foreign_keys", "ON"), ("journal_mode", "WAL"), ("busy_timeout", "5000")];

/// Opens the pool the repositories run on, sized and timed per the loaded
/// configuration. A missing database file is created rather than treated as
/// an error, so `cascade migrate` works on a fresh checkout.
pub async fn connect(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(Duration::from_secs(config.timeout_secs.max(1)))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                for (pragma, value) in SESSION_PRAGMAS {
                    sqlx::query(&format!("PRAGMA {pragma} = {value}"))
                        .execute(&mut *conn)
                        .await?;
                }
                Ok(())
            })
        })
        .connect_with(options)
        .await
}
