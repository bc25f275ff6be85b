//! Embedded schema migrations for the catalog store.
//!
//! The catalog schema is one table, `products`, grown by append-only SQL
//! files compiled into the binary:
//! - `0001_products.sql` creates `products` with an `AUTOINCREMENT` key, so
//!   product numbers of deleted rows are never reissued, and `CHECK`
//!   constraints mirroring `Product::validate` (non-negative price/stock,
//!   `created_at <= updated_at`).
//! - `0002_products_name_index.sql` indexes `name` for the name finders.
//!
//! # Invariants
//! - Shipped files are never edited; schema changes add a new version.
//! - `version` values are strictly increasing and equal the file prefix.
//! - All pending versions run in one transaction together with the
//!   `PRAGMA user_version` bump, so a failed upgrade leaves the store on
//!   its previous version.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_products.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_products_name_index.sql"),
    },
];

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies every migration newer than the store's current version.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS
        .iter()
        .filter(|migration| migration.version > current_version)
    {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={current_version} to_version={latest}"
    );
    Ok(())
}

/// Reads `PRAGMA user_version` from the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
