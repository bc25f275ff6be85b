//! Composable product query and field projections.

use super::filter::Predicate;
use super::order::Sort;
use super::QueryError;
use crate::model::product::{FieldValue, ProductField};
use rusqlite::types::Value;
use serde::Serialize;

/// Filter plus sort over the `products` table.
///
/// An empty query matches every product in `number` order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    predicate: Option<Predicate>,
    sort: Sort,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition; repeated calls are combined with AND.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    /// Replaces the sort specification.
    pub fn order_by(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Renders ` WHERE ...` (or nothing) and collects its bind values.
    pub(crate) fn render_where(&self, binds: &mut Vec<Value>) -> String {
        match &self.predicate {
            Some(predicate) => {
                let mut sql = String::from(" WHERE ");
                predicate.render(&mut sql, binds);
                sql
            }
            None => String::new(),
        }
    }

    pub(crate) fn render_order(&self) -> String {
        self.sort.render()
    }
}

/// Ordered, non-empty list of fields to select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<ProductField>,
}

impl Projection {
    pub fn of(fields: impl IntoIterator<Item = ProductField>) -> Result<Self, QueryError> {
        let fields: Vec<ProductField> = fields.into_iter().collect();
        if fields.is_empty() {
            return Err(QueryError::EmptyProjection);
        }
        Ok(Self { fields })
    }

    /// Parses a comma-separated field list such as `name,price`.
    pub fn parse(value: &str) -> Result<Self, QueryError> {
        let fields = value
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(|field| {
                ProductField::parse(field)
                    .ok_or_else(|| QueryError::UnknownField(field.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::of(fields)
    }

    pub fn fields(&self) -> &[ProductField] {
        &self.fields
    }

    pub(crate) fn render_columns(&self) -> String {
        self.fields
            .iter()
            .map(|field| field.column())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One projected row; `values[i]` belongs to `fields[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedRow {
    pub fields: Vec<ProductField>,
    pub values: Vec<FieldValue>,
}

impl ProjectedRow {
    /// Returns the value of `field` if it was selected.
    pub fn get(&self, field: ProductField) -> Option<&FieldValue> {
        self.fields
            .iter()
            .position(|candidate| *candidate == field)
            .and_then(|index| self.values.get(index))
    }
}
