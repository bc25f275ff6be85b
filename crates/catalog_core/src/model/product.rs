//! Product record, unsaved product input and field metadata.
//!
//! # Invariants
//! - `name` is non-blank; `price` and `stock` are never negative.
//! - Audit timestamps are Unix epoch milliseconds.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned product identity.
pub type ProductNumber = i64;

/// Persisted product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Identity assigned on insert; immutable afterwards.
    pub number: ProductNumber,
    pub name: String,
    pub price: i64,
    pub stock: i64,
    /// Epoch ms of insertion. Never mutated.
    pub created_at: i64,
    /// Epoch ms of the last mutation. Starts equal to `created_at`.
    pub updated_at: i64,
}

impl Product {
    /// Checks field rules plus audit timestamp ordering.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        validate_fields(&self.name, self.price, self.stock)?;
        if self.created_at > self.updated_at {
            return Err(ProductValidationError::AuditOrder {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }

    /// Reads a single field as a projection value.
    pub fn field_value(&self, field: ProductField) -> FieldValue {
        match field {
            ProductField::Number => FieldValue::Integer(self.number),
            ProductField::Name => FieldValue::Text(self.name.clone()),
            ProductField::Price => FieldValue::Integer(self.price),
            ProductField::Stock => FieldValue::Integer(self.stock),
            ProductField::CreatedAt => FieldValue::Integer(self.created_at),
            ProductField::UpdatedAt => FieldValue::Integer(self.updated_at),
        }
    }
}

/// Product content before the store assigns identity and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: i64,
    pub stock: i64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: i64, stock: i64) -> Self {
        Self {
            name: name.into(),
            price,
            stock,
        }
    }

    pub fn validate(&self) -> Result<(), ProductValidationError> {
        validate_fields(&self.name, self.price, self.stock)
    }
}

/// Rejects blank product names.
pub fn validate_name(name: &str) -> Result<(), ProductValidationError> {
    if name.trim().is_empty() {
        return Err(ProductValidationError::EmptyName);
    }
    Ok(())
}

fn validate_fields(name: &str, price: i64, stock: i64) -> Result<(), ProductValidationError> {
    validate_name(name)?;
    if price < 0 {
        return Err(ProductValidationError::NegativePrice(price));
    }
    if stock < 0 {
        return Err(ProductValidationError::NegativeStock(stock));
    }
    Ok(())
}

/// Field-level rule violation for product content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    EmptyName,
    NegativePrice(i64),
    NegativeStock(i64),
    AuditOrder { created_at: i64, updated_at: i64 },
}

impl Display for ProductValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "product name must not be blank"),
            Self::NegativePrice(price) => write!(f, "product price must be >= 0, got {price}"),
            Self::NegativeStock(stock) => write!(f, "product stock must be >= 0, got {stock}"),
            Self::AuditOrder {
                created_at,
                updated_at,
            } => write!(
                f,
                "created_at {created_at} is later than updated_at {updated_at}"
            ),
        }
    }
}

impl Error for ProductValidationError {}

/// Queryable product columns.
///
/// Closed set, so sort and projection input never reaches SQL as free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductField {
    Number,
    Name,
    Price,
    Stock,
    CreatedAt,
    UpdatedAt,
}

impl ProductField {
    pub const ALL: [ProductField; 6] = [
        ProductField::Number,
        ProductField::Name,
        ProductField::Price,
        ProductField::Stock,
        ProductField::CreatedAt,
        ProductField::UpdatedAt,
    ];

    /// SQL column backing this field.
    pub fn column(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Name => "name",
            Self::Price => "price",
            Self::Stock => "stock",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }

    /// External (camelCase) field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Name => "name",
            Self::Price => "price",
            Self::Stock => "stock",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }

    /// Parses either the external or the column spelling.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == value || field.column() == value)
    }
}

impl Display for ProductField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One projected column value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
}

impl FieldValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Integer(_) => None,
            Self::Text(value) => Some(value.as_str()),
        }
    }
}
