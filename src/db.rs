//! SQLite connection pool for the visit ledger.
//!
//! Every pooled connection enforces foreign keys, so deleting a client
//! cascades to its ledger. WAL mode and the lock wait come from
//! [`DatabaseConfig`].

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError, PooledConnection};
use diesel::sqlite::SqliteConnection;

use crate::models::config::DatabaseConfig;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Pragmas run on every connection the pool hands out.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SqlitePragmas {
    wal: bool,
    busy_timeout: Duration,
}

impl SqlitePragmas {
    fn script(&self) -> String {
        // busy_timeout first: switching to WAL needs the lock.
        let mut script = format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;",
            self.busy_timeout.as_millis()
        );
        if self.wal {
            script.push_str(" PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;");
        }
        script
    }
}

impl From<&DatabaseConfig> for SqlitePragmas {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            wal: config.wal,
            busy_timeout: Duration::from_secs(config.busy_timeout_secs),
        }
    }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&self.script())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Opens a pool on `database_url` tuned by `config`.
pub fn establish_connection_pool(
    database_url: &str,
    config: &DatabaseConfig,
) -> Result<DbPool, PoolError> {
    log::debug!(
        "Opening SQLite pool on {database_url} ({} connections, wal: {}, busy timeout: {}s)",
        config.max_connections.max(1),
        config.wal,
        config.busy_timeout_secs
    );

    Pool::builder()
        .max_size(config.max_connections.max(1))
        .connection_customizer(Box::new(SqlitePragmas::from(config)))
        .build(ConnectionManager::<SqliteConnection>::new(database_url))
}

/// Checks a connection out of the pool, logging exhaustion.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, PoolError> {
    pool.get().map_err(|err| {
        log::error!("No database connection available: {err}");
        err
    })
}
