//! Request value objects accepted by the bucket facade.
//!
//! All requests are plain immutable values built by the caller; they carry no
//! identity beyond their fields and are never mutated after construction.
//! Validation happens at the facade boundary, before any store call.

use crate::errors::{StoreError, StoreResult};
use std::collections::BTreeMap;

pub const MAX_OBJECT_NAME_LEN: usize = 1024;

/// Validate an object name at the store boundary.
///
/// Names must be non-empty, no longer than 1024 bytes, and must not contain
/// U+000A (line feed) or U+000D (carriage return). Valid UTF-8 is guaranteed
/// by the `&str` type.
pub fn validate_object_name(name: &str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(StoreError::InvalidArgument("object name is empty".into()));
    }
    if name.len() > MAX_OBJECT_NAME_LEN {
        return Err(StoreError::InvalidArgument(format!(
            "object name is {} bytes, longer than the {} byte maximum",
            name.len(),
            MAX_OBJECT_NAME_LEN
        )));
    }
    if name.contains(['\n', '\r']) {
        return Err(StoreError::InvalidArgument(
            "object name contains a line feed or carriage return".into(),
        ));
    }
    Ok(())
}

/// Validate a generation supplied in a read context, where zero means
/// "latest".
pub fn validate_read_generation(generation: i64) -> StoreResult<()> {
    if generation < 0 {
        return Err(StoreError::InvalidArgument(format!(
            "generation must be non-negative, got {generation}"
        )));
    }
    Ok(())
}

/// Tri-state update for a scalar attribute: leave untouched, delete, or set.
///
/// This distinguishes "no change" from "set to empty string", which a nullable
/// string sentinel cannot. There is no facility for setting an attribute to
/// the empty string; the store does not accept that as a legal value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FieldUpdate {
    #[default]
    Unset,
    Delete,
    SetTo(String),
}

/// A request to create or overwrite an object.
///
/// The object contents travel as a separate stream argument to
/// [`crate::bucket::Bucket::create_object`], so the request itself stays a
/// cheap, cloneable value.
#[derive(Clone, Debug, Default)]
pub struct CreateObjectRequest {
    /// The name with which to create the object. Must pass
    /// [`validate_object_name`].
    pub name: String,

    pub content_type: Option<String>,
    pub content_language: Option<String>,
    pub content_encoding: Option<String>,
    pub cache_control: Option<String>,

    /// User-provided string metadata attached to the object.
    pub metadata: BTreeMap<String, String>,

    /// If set, the write succeeds only when the object's current generation
    /// equals this value. Zero means the object must not currently exist.
    pub generation_precondition: Option<i64>,
}

impl CreateObjectRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A request to read the contents of an object at a particular generation.
#[derive(Clone, Debug)]
pub struct ReadObjectRequest {
    pub name: String,

    /// The generation to read. Zero means the latest generation.
    pub generation: i64,
}

impl ReadObjectRequest {
    /// Read the latest generation of the named object.
    pub fn latest(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generation: 0,
        }
    }
}

/// A request for the metadata record of the named object.
#[derive(Clone, Debug)]
pub struct StatObjectRequest {
    pub name: String,
}

/// A request to enumerate objects in a bucket.
#[derive(Clone, Debug, Default)]
pub struct ListObjectsRequest {
    /// List only objects whose names begin with this prefix. Empty means no
    /// filter.
    pub prefix: String,

    /// If set, runs of names of the form `<prefix><S><delimiter><...>`, where
    /// `S` contains no delimiter, collapse to a single listing entry
    /// `<prefix><S><delimiter>` instead of one record per object.
    pub delimiter: Option<String>,

    /// Continues a listing where a previous one left off. Opaque; only ever a
    /// value taken verbatim from a prior [`crate::listing::Listing`].
    pub continuation_token: Option<String>,

    /// Advisory upper bound on objects plus collapsed runs returned. The
    /// store may return fewer. Zero means the store's default.
    pub max_results: usize,
}

impl ListObjectsRequest {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// The same request pointed at the next page of results.
    pub fn continued(&self, token: impl Into<String>) -> Self {
        Self {
            continuation_token: Some(token.into()),
            ..self.clone()
        }
    }
}

/// A request to update the metadata of an object.
///
/// Semantics per scalar field: `Unset` leaves the stored attribute untouched,
/// `Delete` removes it, and `SetTo` replaces it. The content type can never
/// be deleted; requesting that is an input error.
///
/// For user metadata, keys absent from the map are untouched; a key mapped to
/// `None` is deleted and a key mapped to `Some` is set.
#[derive(Clone, Debug, Default)]
pub struct UpdateObjectRequest {
    pub name: String,

    pub content_type: FieldUpdate,
    pub content_encoding: FieldUpdate,
    pub content_language: FieldUpdate,
    pub cache_control: FieldUpdate,

    pub metadata: BTreeMap<String, Option<String>>,
}

impl UpdateObjectRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        validate_object_name("photos/2025/img.jpg").unwrap();
        validate_object_name("a").unwrap();
        validate_object_name(&"x".repeat(MAX_OBJECT_NAME_LEN)).unwrap();
    }

    #[test]
    fn rejects_empty_name() {
        assert!(matches!(
            validate_object_name(""),
            Err(StoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_overlong_name() {
        let name = "x".repeat(MAX_OBJECT_NAME_LEN + 1);
        assert!(matches!(
            validate_object_name(&name),
            Err(StoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn length_limit_is_bytes_not_chars() {
        // 513 two-byte characters exceed the limit at 1026 bytes.
        let name = "é".repeat(513);
        assert!(validate_object_name(&name).is_err());
    }

    #[test]
    fn rejects_line_breaks() {
        assert!(validate_object_name("a\nb").is_err());
        assert!(validate_object_name("a\rb").is_err());
    }

    #[test]
    fn rejects_negative_read_generation() {
        assert!(validate_read_generation(-1).is_err());
        validate_read_generation(0).unwrap();
        validate_read_generation(7).unwrap();
    }
}
