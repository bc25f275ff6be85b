//! Product use-case service.
//!
//! # Responsibility
//! - Accept `ProductDto` input and return `ProductResponseDto` output.
//! - Turn absent products into `ProductServiceError::ProductNotFound`.
//!
//! # Invariants
//! - The service never bypasses DAO validation.
//! - The DAO is injected at construction; the service owns no storage.

use crate::model::product::{NewProduct, Product, ProductNumber};
use crate::repo::product_dao::ProductDao;
use crate::repo::RepoError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Save request shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDto {
    pub name: String,
    pub price: i64,
    pub stock: i64,
}

impl ProductDto {
    pub fn new(name: impl Into<String>, price: i64, stock: i64) -> Self {
        Self {
            name: name.into(),
            price,
            stock,
        }
    }
}

/// Response shape. Audit timestamps are omitted from JSON when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponseDto {
    pub number: ProductNumber,
    pub name: String,
    pub price: i64,
    pub stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl From<Product> for ProductResponseDto {
    fn from(value: Product) -> Self {
        Self {
            number: value.number,
            name: value.name,
            price: value.price,
            stock: value.stock,
            created_at: Some(value.created_at),
            updated_at: Some(value.updated_at),
        }
    }
}

/// Service error for product use-cases.
#[derive(Debug)]
pub enum ProductServiceError {
    ProductNotFound(ProductNumber),
    Repo(RepoError),
}

impl Display for ProductServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProductNotFound(number) => write!(f, "product not found: {number}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProductServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::ProductNotFound(_) => None,
        }
    }
}

impl From<RepoError> for ProductServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(number) => Self::ProductNotFound(number),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ProductServiceError>;

/// Product service facade over a DAO implementation.
pub struct ProductService<D: ProductDao> {
    dao: D,
}

impl<D: ProductDao> ProductService<D> {
    pub fn new(dao: D) -> Self {
        Self { dao }
    }

    /// Fetches one product by number.
    pub fn get_product(&self, number: ProductNumber) -> ServiceResult<ProductResponseDto> {
        self.dao
            .select_product(number)?
            .map(ProductResponseDto::from)
            .ok_or(ProductServiceError::ProductNotFound(number))
    }

    /// Creates a product from request input.
    pub fn save_product(&self, input: &ProductDto) -> ServiceResult<ProductResponseDto> {
        let product = NewProduct::new(input.name.as_str(), input.price, input.stock);
        let saved = self.dao.insert_product(&product)?;
        Ok(saved.into())
    }

    /// Renames a product; other fields stay untouched.
    pub fn change_product_name(
        &self,
        number: ProductNumber,
        name: &str,
    ) -> ServiceResult<ProductResponseDto> {
        Ok(self.dao.update_product_name(number, name)?.into())
    }

    pub fn delete_product(&self, number: ProductNumber) -> ServiceResult<()> {
        self.dao.delete_product(number)?;
        Ok(())
    }
}
