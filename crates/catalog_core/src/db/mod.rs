//! SQLite store bootstrap for the product catalog.
//!
//! # Responsibility
//! - Open file-backed or in-memory catalog stores through one bootstrap path.
//! - Install the catalog's scalar SQL functions (`functions`) on each
//!   connection; query rendering depends on them.
//! - Bring the `products` schema up to the version this build ships.
//!
//! # Invariants
//! - A store opened here has `foreign_keys=ON`, a busy timeout, the catalog
//!   functions, and `PRAGMA user_version == migrations::latest_version()`.
//! - A store stamped by a newer build is refused, never downgraded.
//! - DAO and repository constructors re-check the schema, so connections
//!   opened elsewhere are rejected until migrated.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod functions;
pub mod migrations;
mod open;

pub use functions::register_functions;
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage bootstrap failure.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The store was written by a newer build of the catalog.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "catalog schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
