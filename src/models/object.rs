//! Represents an object (blob) stored in a bucket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata record for a single object within a bucket, as reported by the
/// remote store at a point in time.
///
/// Object identity is the `(name, generation)` pair; within one bucket that
/// pair is unique. Records are immutable snapshots: updating an object yields
/// a fresh record rather than mutating an existing one.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Object {
    /// Object name (path-like identifier within the bucket).
    pub name: String,

    /// Monotonically-assigned version of this object's contents. Zero means
    /// "latest/unspecified" in read contexts and never appears on a record
    /// returned by the store.
    pub generation: i64,

    /// Content type (MIME type).
    pub content_type: Option<String>,

    /// Content language, e.g. "en".
    pub content_language: Option<String>,

    /// Content encoding, e.g. "gzip".
    pub content_encoding: Option<String>,

    /// Cache-Control directive served alongside the object.
    pub cache_control: Option<String>,

    /// User-provided string metadata.
    pub metadata: BTreeMap<String, String>,

    /// Size of the contents in bytes.
    pub size: u64,

    /// Checksum of the contents, as reported by the store.
    pub etag: Option<String>,

    /// When the object was last written or patched.
    pub updated: DateTime<Utc>,
}

impl Object {
    /// Ordering key for listing guarantees: lexicographic on
    /// (name, generation).
    pub fn sort_key(&self) -> (&str, i64) {
        (self.name.as_str(), self.generation)
    }
}
