//! Product query repository.
//!
//! # Responsibility
//! - Execute `ProductQuery` values: list, first match, count, page, projection.
//! - Offer name-based finders on top of the generic executors.
//!
//! # Invariants
//! - Row order is total (sort keys, then `number ASC`), so consecutive pages
//!   never overlap or skip rows while the data is unchanged.
//! - Projected rows list values in the projection's declared field order.
//! - A page's items and totals come from one read snapshot.

use super::{ensure_connection_ready, parse_product_row, RepoResult, PRODUCT_SELECT_SQL};
use crate::db::register_functions;
use crate::model::product::{FieldValue, Product, ProductField};
use crate::query::{Page, PageRequest, Predicate, ProductQuery, ProjectedRow, Projection, Sort};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

/// Read-side contract for product queries.
pub trait ProductRepository {
    /// Returns every product matching `query`, in query order.
    fn fetch(&self, query: &ProductQuery) -> RepoResult<Vec<Product>>;
    /// Returns the first product in query order, if any.
    fn fetch_one(&self, query: &ProductQuery) -> RepoResult<Option<Product>>;
    /// Counts products matching the query filter.
    fn count(&self, query: &ProductQuery) -> RepoResult<u64>;
    /// Returns one page of matches plus totals for the whole match set.
    fn fetch_page(&self, query: &ProductQuery, page: PageRequest) -> RepoResult<Page<Product>>;
    /// Selects only `projection` fields from matching products.
    fn fetch_projection(
        &self,
        query: &ProductQuery,
        projection: &Projection,
    ) -> RepoResult<Vec<ProjectedRow>>;

    fn find_by_name(&self, name: &str) -> RepoResult<Vec<Product>> {
        self.fetch(&ProductQuery::new().filter(Predicate::name_eq(name)))
    }

    fn find_by_name_sorted(&self, name: &str, sort: Sort) -> RepoResult<Vec<Product>> {
        self.fetch(
            &ProductQuery::new()
                .filter(Predicate::name_eq(name))
                .order_by(sort),
        )
    }

    fn find_by_name_paged(&self, name: &str, page: PageRequest) -> RepoResult<Page<Product>> {
        self.fetch_page(&ProductQuery::new().filter(Predicate::name_eq(name)), page)
    }

    /// Bound-parameter lookup returning full records.
    fn find_by_name_param(&self, name: &str) -> RepoResult<Vec<Product>> {
        self.find_by_name(name)
    }

    /// Bound-parameter lookup returning only the projected fields.
    fn find_by_name_param_projection(
        &self,
        name: &str,
        projection: &Projection,
    ) -> RepoResult<Vec<ProjectedRow>> {
        self.fetch_projection(
            &ProductQuery::new().filter(Predicate::name_eq(name)),
            projection,
        )
    }

    fn find_one(&self, predicate: Predicate) -> RepoResult<Option<Product>> {
        self.fetch_one(&ProductQuery::new().filter(predicate))
    }

    fn find_all(&self, predicate: Predicate) -> RepoResult<Vec<Product>> {
        self.fetch(&ProductQuery::new().filter(predicate))
    }
}

/// SQLite-backed product query repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Constructs a repository from a migrated connection and installs the
    /// catalog scalar functions on it.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        register_functions(conn)?;
        Ok(Self { conn })
    }

    fn query_products(&self, sql: &str, binds: Vec<Value>) -> RepoResult<Vec<Product>> {
        debug!("event=product_query module=repo binds={}", binds.len());
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut products = Vec::new();
        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }
        Ok(products)
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn fetch(&self, query: &ProductQuery) -> RepoResult<Vec<Product>> {
        let mut binds = Vec::new();
        let sql = format!(
            "{PRODUCT_SELECT_SQL}{}{};",
            query.render_where(&mut binds),
            query.render_order()
        );
        self.query_products(&sql, binds)
    }

    fn fetch_one(&self, query: &ProductQuery) -> RepoResult<Option<Product>> {
        let mut binds = Vec::new();
        let sql = format!(
            "{PRODUCT_SELECT_SQL}{}{} LIMIT 1;",
            query.render_where(&mut binds),
            query.render_order()
        );
        Ok(self.query_products(&sql, binds)?.into_iter().next())
    }

    fn count(&self, query: &ProductQuery) -> RepoResult<u64> {
        let mut binds = Vec::new();
        let sql = format!(
            "SELECT COUNT(*) FROM products{};",
            query.render_where(&mut binds)
        );
        let total: i64 = self
            .conn
            .query_row(&sql, params_from_iter(binds), |row| row.get(0))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    fn fetch_page(&self, query: &ProductQuery, page: PageRequest) -> RepoResult<Page<Product>> {
        // Inside a caller's transaction the snapshot is already theirs.
        let tx = if self.conn.is_autocommit() {
            Some(self.conn.unchecked_transaction()?)
        } else {
            None
        };

        let total_elements = self.count(query)?;

        let mut binds = Vec::new();
        let mut sql = format!(
            "{PRODUCT_SELECT_SQL}{}{}",
            query.render_where(&mut binds),
            query.render_order()
        );
        sql.push_str(" LIMIT ? OFFSET ?;");
        binds.push(Value::Integer(i64::from(page.size())));
        binds.push(Value::Integer(page.offset()));

        let items = self.query_products(&sql, binds)?;
        if let Some(tx) = tx {
            tx.commit()?;
        }
        Ok(Page::new(items, page, total_elements))
    }

    fn fetch_projection(
        &self,
        query: &ProductQuery,
        projection: &Projection,
    ) -> RepoResult<Vec<ProjectedRow>> {
        let mut binds = Vec::new();
        let sql = format!(
            "SELECT {} FROM products{}{};",
            projection.render_columns(),
            query.render_where(&mut binds),
            query.render_order()
        );
        debug!(
            "event=product_projection module=repo fields={} binds={}",
            projection.fields().len(),
            binds.len()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut projected = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(projection.fields().len());
            for (index, field) in projection.fields().iter().enumerate() {
                let value = match field {
                    ProductField::Name => FieldValue::Text(row.get(index)?),
                    _ => FieldValue::Integer(row.get(index)?),
                };
                values.push(value);
            }
            projected.push(ProjectedRow {
                fields: projection.fields().to_vec(),
                values,
            });
        }
        Ok(projected)
    }
}
