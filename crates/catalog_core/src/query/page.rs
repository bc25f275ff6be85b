//! Page requests and page envelopes.

use super::QueryError;
use serde::Serialize;

/// Zero-based page index plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    pub fn of(page: u32, size: u32) -> Result<Self, QueryError> {
        if size == 0 {
            return Err(QueryError::ZeroPageSize);
        }
        Ok(Self { page, size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
        }
    }
}

/// One page of results plus totals for the whole match set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub(crate) fn new(items: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size);
        let total_pages = total_elements.div_ceil(size);
        Self {
            items,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        }
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages
    }

    pub fn is_first(&self) -> bool {
        self.page == 0
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }
}
