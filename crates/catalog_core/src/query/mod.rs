//! Product query building blocks.
//!
//! # Responsibility
//! - Express the {filter, sort, paginate, project} capability set as
//!   plain values that callers compose.
//! - Render those values into parameterized SQL for the repository layer.
//!
//! # Invariants
//! - User-supplied values are always bound, never spliced into SQL text.
//! - Column names only come from `ProductField`.
//! - Every rendered ORDER BY ends with `number ASC`, so row order is total.

pub mod builder;
pub mod filter;
pub mod order;
pub mod page;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub use builder::{ProductQuery, ProjectedRow, Projection};
pub use filter::Predicate;
pub use order::{Direction, Sort, SortOrder};
pub use page::{Page, PageRequest};

/// Rejected query shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    ZeroPageSize,
    EmptyProjection,
    UnknownField(String),
    InvalidDirection(String),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroPageSize => write!(f, "page size must be at least 1"),
            Self::EmptyProjection => write!(f, "projection must select at least one field"),
            Self::UnknownField(value) => write!(f, "unknown product field `{value}`"),
            Self::InvalidDirection(value) => {
                write!(f, "invalid sort direction `{value}`; expected asc|desc")
            }
        }
    }
}

impl Error for QueryError {}
