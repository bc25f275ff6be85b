//! Product catalog core.
//!
//! SQLite-backed product records with a DAO for single-record CRUD, a query
//! repository for filtered/sorted/paged/projected reads, and a DTO-facing
//! service layer.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use config::CatalogConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::product::{
    FieldValue, NewProduct, Product, ProductField, ProductNumber, ProductValidationError,
};
pub use query::{
    Direction, Page, PageRequest, Predicate, ProductQuery, ProjectedRow, Projection, QueryError,
    Sort, SortOrder,
};
pub use repo::product_dao::{ProductDao, SqliteProductDao};
pub use repo::product_repo::{ProductRepository, SqliteProductRepository};
pub use repo::{RepoError, RepoResult};
pub use service::product_service::{
    ProductDto, ProductResponseDto, ProductService, ProductServiceError, ServiceResult,
};

/// Minimal health-check API for linkage checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
