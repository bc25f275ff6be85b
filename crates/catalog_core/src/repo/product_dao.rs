//! Product data-access object: single-record CRUD over `products`.
//!
//! # Responsibility
//! - Assign identity and audit timestamps on insert.
//! - Refresh `updated_at` on every name change.
//! - Report missing rows on update/delete as `RepoError::NotFound`.
//!
//! # Invariants
//! - `number` comes from `AUTOINCREMENT`, so deleted numbers are never reissued.
//! - `updated_at` never moves backwards, even if the clock does.

use super::{
    ensure_connection_ready, parse_product_row, RepoError, RepoResult, PRODUCT_SELECT_SQL,
};
use crate::model::product::{validate_name, NewProduct, Product, ProductNumber};
use log::{info, warn};
use rusqlite::{params, Connection};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Source of audit timestamps in epoch milliseconds.
pub type Clock = fn() -> i64;

/// Data-access contract for single products.
pub trait ProductDao {
    /// Persists a new product and returns the stored record.
    fn insert_product(&self, product: &NewProduct) -> RepoResult<Product>;
    /// Looks up one product. Absence is `Ok(None)`, not an error.
    fn select_product(&self, number: ProductNumber) -> RepoResult<Option<Product>>;
    /// Lists every product by ascending number.
    fn select_all(&self) -> RepoResult<Vec<Product>>;
    /// Overwrites `name` and refreshes `updated_at`.
    fn update_product_name(&self, number: ProductNumber, name: &str) -> RepoResult<Product>;
    /// Removes one product.
    fn delete_product(&self, number: ProductNumber) -> RepoResult<()>;
}

/// SQLite-backed product DAO.
pub struct SqliteProductDao<'conn> {
    conn: &'conn Connection,
    clock: Clock,
}

impl<'conn> SqliteProductDao<'conn> {
    /// Constructs a DAO from a migrated connection, stamping with wall-clock time.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Self::with_clock(conn, now_epoch_ms)
    }

    /// Constructs a DAO that stamps audit fields from `clock`.
    pub fn with_clock(conn: &'conn Connection, clock: Clock) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn, clock })
    }
}

impl ProductDao for SqliteProductDao<'_> {
    fn insert_product(&self, product: &NewProduct) -> RepoResult<Product> {
        product.validate()?;
        let started_at = Instant::now();
        let now = (self.clock)();

        self.conn.execute(
            "INSERT INTO products (
                name,
                price,
                stock,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?4);",
            params![product.name.as_str(), product.price, product.stock, now],
        )?;
        let number = self.conn.last_insert_rowid();

        let stored = self.select_product(number)?.ok_or_else(|| {
            RepoError::InvalidData(format!("inserted product {number} missing on read-back"))
        })?;
        info!(
            "event=product_insert module=repo status=ok number={number} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(stored)
    }

    fn select_product(&self, number: ProductNumber) -> RepoResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE number = ?1;"))?;
        let mut rows = stmt.query([number])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }
        Ok(None)
    }

    fn select_all(&self) -> RepoResult<Vec<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} ORDER BY number ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut products = Vec::new();
        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }
        Ok(products)
    }

    fn update_product_name(&self, number: ProductNumber, name: &str) -> RepoResult<Product> {
        validate_name(name)?;
        let started_at = Instant::now();

        let changed = self.conn.execute(
            "UPDATE products
             SET
                name = ?2,
                updated_at = MAX(updated_at, ?3)
             WHERE number = ?1;",
            params![number, name, (self.clock)()],
        )?;

        if changed == 0 {
            warn!("event=product_update_name module=repo status=not_found number={number}");
            return Err(RepoError::NotFound(number));
        }

        let updated = self.select_product(number)?.ok_or(RepoError::NotFound(number))?;
        info!(
            "event=product_update_name module=repo status=ok number={number} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(updated)
    }

    fn delete_product(&self, number: ProductNumber) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE number = ?1;", [number])?;

        if changed == 0 {
            warn!("event=product_delete module=repo status=not_found number={number}");
            return Err(RepoError::NotFound(number));
        }

        info!("event=product_delete module=repo status=ok number={number}");
        Ok(())
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
