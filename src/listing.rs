//! Builds typed listings from raw store pages and enforces the ordering
//! contract.
//!
//! The remote store promises that, within a page, object entries are strictly
//! increasing under lexicographic comparison on (name, generation) and
//! collapsed runs are strictly increasing as strings; across continued pages,
//! everything in an earlier page is strictly less than everything in a later
//! one. The engine's job is to preserve that contract end-to-end: it never
//! re-sorts, never deduplicates, and never re-groups collapsed runs across a
//! page boundary. A page that breaks the contract is reported as
//! `CorruptListing` instead of being silently repaired, because repairing it
//! here would hide the violation from callers that rely on the cross-page
//! guarantee.

use crate::errors::{StoreError, StoreResult};
use crate::models::object::Object;
use serde::{Deserialize, Serialize};

/// One raw page as returned by the remote store, prior to validation.
#[derive(Clone, Debug, Default)]
pub struct RawPage {
    /// Object entries, in the store's order.
    pub entries: Vec<Object>,

    /// Delimiter-collapsed name runs, in the store's order. Grouping is
    /// decided per page by the store.
    pub collapsed: Vec<String>,

    /// Cursor for the next page; `None` on the final page. Opaque.
    pub next_token: Option<String>,
}

/// A set of objects and delimiter-collapsed runs returned by one call to
/// `list_objects`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Listing {
    /// Records for objects matching the listing criteria. Strictly increasing
    /// under lexicographic comparison on (name, generation).
    pub objects: Vec<Object>,

    /// Collapsed entries for runs of names sharing a prefix followed by a
    /// delimiter. Strictly increasing.
    pub collapsed_runs: Vec<String>,

    /// If present, this listing is not the full result set; pass the token
    /// back in [`crate::requests::ListObjectsRequest::continuation_token`] to
    /// continue where this page left off. Propagated verbatim from the store
    /// and never parsed or constructed locally.
    pub continuation_token: Option<String>,
}

/// Validate a raw page against the ordering contract and convert it into a
/// [`Listing`].
pub fn build(page: RawPage) -> StoreResult<Listing> {
    for pair in page.entries.windows(2) {
        if pair[1].sort_key() <= pair[0].sort_key() {
            return Err(StoreError::CorruptListing(format!(
                "object entries out of order: `{}#{}` not strictly after `{}#{}`",
                pair[1].name, pair[1].generation, pair[0].name, pair[0].generation
            )));
        }
    }

    for pair in page.collapsed.windows(2) {
        if pair[1] <= pair[0] {
            return Err(StoreError::CorruptListing(format!(
                "collapsed runs out of order: `{}` not strictly after `{}`",
                pair[1], pair[0]
            )));
        }
    }

    // An empty token is neither a real cursor nor a clean end-of-results
    // signal; the store must send one or the other.
    if page.next_token.as_deref() == Some("") {
        return Err(StoreError::CorruptListing(
            "store returned an empty continuation token".into(),
        ));
    }

    Ok(Listing {
        objects: page.entries,
        collapsed_runs: page.collapsed,
        continuation_token: page.next_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn obj(name: &str, generation: i64) -> Object {
        Object {
            name: name.to_string(),
            generation,
            content_type: None,
            content_language: None,
            content_encoding: None,
            cache_control: None,
            metadata: BTreeMap::new(),
            size: 0,
            etag: None,
            updated: Utc::now(),
        }
    }

    #[test]
    fn passes_through_a_well_ordered_page() {
        let page = RawPage {
            entries: vec![obj("a", 3), obj("b", 1), obj("b", 2)],
            collapsed: vec!["c/".to_string(), "d/".to_string()],
            next_token: Some("cursor".to_string()),
        };
        let listing = build(page).unwrap();
        assert_eq!(listing.objects.len(), 3);
        assert_eq!(listing.collapsed_runs, vec!["c/", "d/"]);
        assert_eq!(listing.continuation_token.as_deref(), Some("cursor"));
    }

    #[test]
    fn accepts_an_empty_final_page() {
        let listing = build(RawPage::default()).unwrap();
        assert!(listing.objects.is_empty());
        assert!(listing.collapsed_runs.is_empty());
        assert!(listing.continuation_token.is_none());
    }

    #[test]
    fn rejects_out_of_order_objects() {
        let page = RawPage {
            entries: vec![obj("b", 1), obj("a", 1)],
            ..RawPage::default()
        };
        assert!(matches!(build(page), Err(StoreError::CorruptListing(_))));
    }

    #[test]
    fn rejects_duplicate_name_generation_pairs() {
        let page = RawPage {
            entries: vec![obj("a", 1), obj("a", 1)],
            ..RawPage::default()
        };
        assert!(matches!(build(page), Err(StoreError::CorruptListing(_))));
    }

    #[test]
    fn generation_breaks_name_ties() {
        // Same name, decreasing generation is a violation.
        let page = RawPage {
            entries: vec![obj("a", 2), obj("a", 1)],
            ..RawPage::default()
        };
        assert!(build(page).is_err());

        let page = RawPage {
            entries: vec![obj("a", 1), obj("a", 2)],
            ..RawPage::default()
        };
        assert!(build(page).is_ok());
    }

    #[test]
    fn rejects_out_of_order_collapsed_runs() {
        let page = RawPage {
            collapsed: vec!["b/".to_string(), "a/".to_string()],
            ..RawPage::default()
        };
        assert!(matches!(build(page), Err(StoreError::CorruptListing(_))));
    }

    #[test]
    fn rejects_an_empty_continuation_token() {
        let page = RawPage {
            next_token: Some(String::new()),
            ..RawPage::default()
        };
        assert!(matches!(build(page), Err(StoreError::CorruptListing(_))));
    }

    #[test]
    fn never_resorts_a_sortable_page() {
        // A page that would become valid if re-sorted must still be rejected.
        let page = RawPage {
            entries: vec![obj("c", 1), obj("a", 1), obj("b", 1)],
            ..RawPage::default()
        };
        assert!(build(page).is_err());
    }
}
