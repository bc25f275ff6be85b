//! Scalar SQL functions the catalog installs on its connections.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// Unicode-aware lowercase. SQLite's built-in `lower()` folds ASCII only.
pub const UNICODE_LOWER: &str = "unicode_lower";

/// Registers catalog scalar functions on `conn`. Safe to call repeatedly.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        UNICODE_LOWER,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<String>(0)?.to_lowercase()),
    )
}
