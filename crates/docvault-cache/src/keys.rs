//! Cache key builders for all DocVault cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses. Keys are unprefixed here;
//! the Redis provider applies the configured key prefix.

use uuid::Uuid;

use docvault_core::types::filter::DocumentFilter;

/// Cache key for a single document by ID.
pub fn document_detail(document_id: Uuid) -> String {
    format!("documents:detail:{document_id}")
}

/// Cache key for the document id list under the given filter.
///
/// The same logical filter always yields the same key: filter values
/// are trimmed, case-normalised and sorted by field name before being
/// joined, so equivalent queries share one cache entry. Pagination is
/// applied after the cached id list is resolved, so the key carries no
/// page parameters.
pub fn document_list(filter: &DocumentFilter) -> String {
    let pairs = filter.normalized_pairs();
    if pairs.is_empty() {
        return "documents:list:all".to_string();
    }

    let joined = pairs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("documents:list:{joined}")
}

/// Pattern matching every document listing key.
///
/// Used for write-driven invalidation: any document mutation deletes
/// all list entries, since a change can affect any filtered listing.
pub fn document_list_pattern() -> String {
    "documents:list:*".to_string()
}
