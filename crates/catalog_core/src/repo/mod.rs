//! Persistence layer for products.
//!
//! # Responsibility
//! - `product_dao`: single-record insert/select/update/delete.
//! - `product_repo`: filtered, sorted, paged and projected reads.
//! - Shared error type, row decoding and connection readiness checks.
//!
//! # Invariants
//! - Write paths validate input before any SQL mutation.
//! - Updates and deletes that match no row fail with `NotFound`.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod product_dao;
pub mod product_repo;

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::product::{Product, ProductNumber, ProductValidationError};
use crate::query::QueryError;
use rusqlite::{Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) const PRODUCT_SELECT_SQL: &str = "SELECT
    number,
    name,
    price,
    stock,
    created_at,
    updated_at
FROM products";

const PRODUCT_COLUMNS: [&str; 6] = [
    "number",
    "name",
    "price",
    "stock",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for product persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ProductValidationError),
    Db(DbError),
    /// No product carries this number.
    NotFound(ProductNumber),
    InvalidQuery(QueryError),
    /// Connection schema is not at the version this build expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(number) => write!(f, "product not found: {number}"),
            Self::InvalidQuery(err) => write!(f, "invalid product query: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "product repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "product repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "product repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted product data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidQuery(err) => Some(err),
            Self::NotFound(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<ProductValidationError> for RepoError {
    fn from(value: ProductValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<QueryError> for RepoError {
    fn from(value: QueryError) -> Self {
        Self::InvalidQuery(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Verifies the connection was opened through `db::open_db*` and carries
/// the full `products` schema.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "products")? {
        return Err(RepoError::MissingRequiredTable("products"));
    }

    for column in PRODUCT_COLUMNS {
        if !table_has_column(conn, "products", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "products",
                column,
            });
        }
    }

    Ok(())
}

pub(crate) fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let product = Product {
        number: row.get("number")?,
        name: row.get("name")?,
        price: row.get("price")?,
        stock: row.get("stock")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    product.validate().map_err(|err| {
        RepoError::InvalidData(format!("product {}: {err}", product.number))
    })?;
    Ok(product)
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
