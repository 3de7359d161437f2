//! Pagination utilities
//!
//! Pages are 1-indexed; a page past the end of the data is empty rather
//! than clamped back onto the last page.

use crate::error::CatalogError;

/// Default page size for song listings
pub const DEFAULT_SONG_LIMIT: u32 = 10;

/// Default page size for verse listings (one verse per page)
pub const DEFAULT_VERSE_LIMIT: u32 = 1;

/// A validated page request (page >= 1, limit >= 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate page and limit
    ///
    /// # Examples
    /// ```
    /// use songlib_catalog::pagination::PageRequest;
    ///
    /// let p = PageRequest::new(3, 10).unwrap();
    /// assert_eq!(p.offset(), 20);
    ///
    /// assert!(PageRequest::new(0, 10).is_err());
    /// assert!(PageRequest::new(1, 0).is_err());
    /// ```
    pub fn new(page: u32, limit: u32) -> Result<Self, CatalogError> {
        if page < 1 {
            return Err(CatalogError::Validation("Invalid page number".to_string()));
        }
        if limit < 1 {
            return Err(CatalogError::Validation("Invalid limit".to_string()));
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Row offset: (page - 1) * limit
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// `[start, end)` bounds of this page within `total` items
    ///
    /// Both bounds are clamped to `total`, so a page past the end yields an
    /// empty range.
    pub fn slice_bounds(&self, total: usize) -> (usize, usize) {
        let total_u64 = total as u64;
        let start = self.offset().min(total_u64);
        let end = start.saturating_add(u64::from(self.limit)).min(total_u64);
        (start as usize, end as usize)
    }
}
