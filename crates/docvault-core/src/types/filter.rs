//! Document list filter set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Filter criteria for document listing.
///
/// An explicit optional-field struct rather than an open-ended map, so
/// cache-key derivation and validation stay precise. Empty strings are
/// treated the same as absent values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentFilter {
    /// Case-insensitive substring match on the title.
    pub title: Option<String>,
    /// Case-insensitive substring match on the content type.
    pub content_type: Option<String>,
    /// Exact match on the uploading user's ID.
    pub uploaded_by: Option<Uuid>,
    /// Inclusive lower bound on the creation timestamp.
    pub created_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the creation timestamp.
    pub created_before: Option<DateTime<Utc>>,
}

impl DocumentFilter {
    /// Whether no effective criteria are set.
    pub fn is_empty(&self) -> bool {
        self.normalized_pairs().is_empty()
    }

    /// The filter as sorted `(name, value)` pairs with empty or absent
    /// values excluded.
    ///
    /// This is the canonical form used for cache-key derivation:
    /// equivalent filter sets produce identical pair lists regardless of
    /// how they were constructed.
    pub fn normalized_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(title) = self.title.as_deref() {
            let trimmed = title.trim();
            if !trimmed.is_empty() {
                pairs.push(("title", trimmed.to_lowercase()));
            }
        }
        if let Some(content_type) = self.content_type.as_deref() {
            let trimmed = content_type.trim();
            if !trimmed.is_empty() {
                pairs.push(("content_type", trimmed.to_lowercase()));
            }
        }
        if let Some(uploaded_by) = self.uploaded_by {
            pairs.push(("uploaded_by", uploaded_by.to_string()));
        }
        if let Some(after) = self.created_after {
            pairs.push(("created_after", after.to_rfc3339()));
        }
        if let Some(before) = self.created_before {
            pairs.push(("created_before", before.to_rfc3339()));
        }

        pairs.sort_by_key(|(name, _)| *name);
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter() {
        assert!(DocumentFilter::default().is_empty());
        let filter = DocumentFilter {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(filter.is_empty());
    }

    #[test]
    fn test_pairs_sorted_and_trimmed() {
        let filter = DocumentFilter {
            content_type: Some(" PDF ".to_string()),
            title: Some("Alpha".to_string()),
            ..Default::default()
        };
        let pairs = filter.normalized_pairs();
        assert_eq!(
            pairs,
            vec![
                ("content_type", "pdf".to_string()),
                ("title", "alpha".to_string()),
            ]
        );
    }
}
