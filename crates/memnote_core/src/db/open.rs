//! Single-connection opens, used by tools and tests outside the pool.
//!
//! Returned connections are configured and fully migrated.

use super::migrations::apply_migrations;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating if needed) the database file at `path`.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    timed_open("file", || Ok(Connection::open(path)?))
}

pub fn open_db_in_memory() -> DbResult<Connection> {
    timed_open("memory", || Ok(Connection::open_in_memory()?))
}

/// Per-connection pragmas. Also installed as the pool's connection init hook.
pub fn configure_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)
}

fn timed_open(
    mode: &'static str,
    connect: impl FnOnce() -> DbResult<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let opened = connect().and_then(|mut conn| {
        configure_connection(&mut conn)?;
        apply_migrations(&mut conn)?;
        Ok(conn)
    });
    let duration_ms = started_at.elapsed().as_millis();

    match &opened {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={duration_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={duration_ms} error={err}"
        ),
    }
    opened
}
