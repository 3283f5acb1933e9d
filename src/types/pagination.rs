//! Page/limit normalisation for list endpoints.

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};

// SQL binds LIMIT and OFFSET as signed 64-bit integers.
const MAX_BIND_VALUE: u64 = i64::MAX as u64;

/// Normalised pagination cursor.
///
/// Built from raw request values: a zero page means the first page and a zero
/// limit means the default page size. Limit and offset never exceed what the
/// database can bind, so an out-of-range page is simply empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    page: u64,
    limit: u64,
}

impl PaginationParams {
    pub fn new(page: u64, limit: u64) -> Self {
        let page = if page == 0 { DEFAULT_PAGE_NUMBER } else { page };
        let limit = match limit {
            0 => DEFAULT_PAGE_SIZE,
            l => l.min(MAX_BIND_VALUE),
        };
        Self { page, limit }
    }

    /// 1-based page number
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Effective page size
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.limit)
            .min(MAX_BIND_VALUE)
    }

    /// A full page suggests more rows may follow.
    pub fn has_next_page(&self, fetched: usize) -> bool {
        fetched as u64 == self.limit
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE)
    }
}
