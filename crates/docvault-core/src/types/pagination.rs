//! Offset/limit pagination types for list operations.

use serde::{Deserialize, Serialize};

/// Maximum number of items one page may request.
const MAX_LIMIT: u64 = 100;

/// Request parameters for paginated queries.
///
/// Offset/limit based; each list operation supplies its own default
/// limit (10 for documents, 20 for audit logs).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Maximum number of items to return.
    pub limit: u64,
    /// Number of items to skip.
    #[serde(default)]
    pub offset: u64,
}

impl PageRequest {
    /// Create a new page request, clamping the limit to the allowed range.
    pub fn new(limit: u64, offset: u64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            offset,
        }
    }

    /// A first page with the given default limit.
    pub fn first(limit: u64) -> Self {
        Self::new(limit, 0)
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T: Serialize> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// The limit that was applied.
    pub limit: u64,
    /// The offset that was applied.
    pub offset: u64,
}

impl<T: Serialize> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(items: Vec<T>, total: u64, page: &PageRequest) -> Self {
        Self {
            items,
            total,
            limit: page.limit,
            offset: page.offset,
        }
    }

    /// Whether more items exist past this page.
    pub fn has_next(&self) -> bool {
        self.offset + (self.items.len() as u64) < self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_clamped() {
        let page = PageRequest::new(1000, 0);
        assert_eq!(page.limit, 100);
        let page = PageRequest::new(0, 0);
        assert_eq!(page.limit, 1);
    }

    #[test]
    fn test_has_next() {
        let page = PageRequest::new(5, 0);
        let resp = PageResponse::new(vec![1, 2, 3, 4, 5], 15, &page);
        assert!(resp.has_next());

        let page = PageRequest::new(5, 10);
        let resp = PageResponse::new(vec![11, 12, 13, 14, 15], 15, &page);
        assert!(!resp.has_next());
    }
}
