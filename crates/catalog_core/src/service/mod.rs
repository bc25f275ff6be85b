//! Use-case services over the product DAO.
//!
//! # Responsibility
//! - Map external DTOs to store records and back.
//! - Keep callers independent of SQLite details.

pub mod product_service;
