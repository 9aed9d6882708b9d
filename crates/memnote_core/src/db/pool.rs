//! Pooled SQLite connections for concurrent request handling.
//!
//! # Responsibility
//! - Build an `r2d2` pool whose connections carry the bootstrap pragmas.
//! - Run schema migrations exactly once, before the pool is handed out.
//!
//! # Invariants
//! - Every connection produced by the pool went through `configure_connection`.
//! - In-memory databases use a single long-lived connection, so all callers
//!   observe the same data for the lifetime of the pool.

use super::migrations::apply_migrations;
use super::open::configure_connection;
use super::DbResult;
use log::info;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const MEMORY_LOCATION: &str = ":memory:";
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

pub type DbPool = Pool<SqliteConnectionManager>;
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Where the note table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    Memory,
}

impl DbLocation {
    /// Parses a configured database path; `:memory:` selects an in-memory db.
    pub fn from_setting(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed == MEMORY_LOCATION {
            Self::Memory
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

/// Builds the connection pool and applies pending migrations.
///
/// `max_connections` is clamped to at least one and ignored for in-memory
/// databases.
pub fn build_pool(location: &DbLocation, max_connections: u32) -> DbResult<DbPool> {
    let started_at = Instant::now();
    let builder = Pool::builder().connection_timeout(CONNECTION_TIMEOUT);
    let (manager, builder) = match location {
        DbLocation::File(path) => (
            SqliteConnectionManager::file(path),
            builder.max_size(max_connections.max(1)),
        ),
        DbLocation::Memory => (
            SqliteConnectionManager::memory(),
            builder.max_size(1).max_lifetime(None).idle_timeout(None),
        ),
    };

    let pool = builder.build(manager.with_init(configure_connection))?;
    {
        let mut conn = pool.get()?;
        apply_migrations(&mut conn)?;
    }

    info!(
        "event=db_pool module=db status=ok mode={} max_size={} duration_ms={}",
        location.mode(),
        pool.max_size(),
        started_at.elapsed().as_millis()
    );
    Ok(pool)
}
