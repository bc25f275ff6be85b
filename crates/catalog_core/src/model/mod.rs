//! Product domain model.
//!
//! # Responsibility
//! - Define the canonical product record and its unsaved input shape.
//! - Own field-level validation shared by every write path.
//!
//! # Invariants
//! - `number` is assigned by the store and never reused.
//! - `created_at <= updated_at` for every persisted product.

pub mod product;
